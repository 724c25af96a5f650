use clap::AppSettings::DeriveDisplayOrder;
use clap::Parser;
use log::{error, info};
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

pub mod config;
pub mod error;
pub mod extend;
pub mod homopolymer;
pub mod index;
pub mod long_scanner;
pub mod pattern;
pub mod pipeline;
pub mod qc;
pub mod read_holder;
pub mod record;
pub mod recruiter;
pub mod seq;
pub mod short_scanner;

use config::Config;
use record::FastxReader;

// The arguments end up in the Cli struct
#[derive(Parser, Debug)]
#[structopt(global_settings=&[DeriveDisplayOrder])]
#[clap(author, version, about = "Find CRISPR arrays in sequencing reads", long_about = None)]
pub struct Cli {
    /// FASTA/FASTQ input, optionally gzip-compressed; "-" reads stdin
    #[clap(validator=is_file_or_stdin)]
    input: String,

    /// Write the tab-delimited summary here instead of stdout
    #[clap(short, long, value_parser)]
    output: Option<PathBuf>,

    /// inclusive lower bound on repeat length
    #[clap(long, value_parser, default_value_t = 23)]
    low_dr: usize,

    /// inclusive upper bound on repeat length
    #[clap(long, value_parser, default_value_t = 47)]
    high_dr: usize,

    /// inclusive lower bound on spacer length
    #[clap(long, value_parser, default_value_t = 26)]
    low_spacer: usize,

    /// inclusive upper bound on spacer length
    #[clap(long, value_parser, default_value_t = 50)]
    high_spacer: usize,

    /// seed kmer length used by the long scanner
    #[clap(long, value_parser, default_value_t = 8)]
    search_window_len: usize,

    /// interval pairs required before boundary extension triggers
    #[clap(long, value_parser, default_value_t = 2)]
    min_num_repeats: usize,

    /// fraction of voters required to extend the repeat boundary by one base
    #[clap(long, value_parser, default_value_t = 0.75)]
    trim_confidence: f32,

    /// similarity threshold above which QC rejects a candidate
    #[clap(long, value_parser, default_value_t = 0.75)]
    max_similarity: f32,

    /// QC tolerance for spacer-to-spacer length drift
    #[clap(long, value_parser, default_value_t = 30)]
    spacer_to_spacer_delta: usize,

    /// QC tolerance for repeat-to-spacer length drift
    #[clap(long, value_parser, default_value_t = 30)]
    spacer_to_repeat_delta: usize,

    /// per-base frequency cap before a repeat is rejected as low-complexity
    #[clap(long, value_parser, default_value_t = 0.75)]
    low_complexity_threshold: f32,

    /// run-length encode homopolymers before scanning
    #[clap(long, value_parser, default_value_t = false)]
    remove_homopolymers: bool,

    /// number of leading records sampled to pick the scanner
    #[clap(long, value_parser, default_value_t = 50)]
    max_reads_for_decision: usize,

    /// worker threads for the primary scan
    #[clap(short, long, value_parser, default_value_t = 8)]
    threads: usize,

    /// half-width of the window scanRight searches for the next repeat copy
    #[clap(long, value_parser, default_value_t = 24)]
    scan_range: usize,
}

fn is_file_or_stdin(pathname: &str) -> Result<(), String> {
    if pathname == "-" {
        return Ok(());
    }
    let path = PathBuf::from(pathname);
    if path.is_file() {
        Ok(())
    } else {
        Err(format!("Input file {} is invalid", path.display()))
    }
}

impl From<&Cli> for Config {
    fn from(args: &Cli) -> Self {
        Config {
            low_dr: args.low_dr,
            high_dr: args.high_dr,
            low_spacer: args.low_spacer,
            high_spacer: args.high_spacer,
            search_window_len: args.search_window_len,
            min_num_repeats: args.min_num_repeats,
            trim_confidence: args.trim_confidence,
            max_similarity: args.max_similarity,
            spacer_to_spacer_delta: args.spacer_to_spacer_delta,
            spacer_to_repeat_delta: args.spacer_to_repeat_delta,
            low_complexity_threshold: args.low_complexity_threshold,
            remove_homopolymers: args.remove_homopolymers,
            max_reads_for_decision: args.max_reads_for_decision,
            threads: args.threads,
            scan_range: args.scan_range,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let args = Cli::parse();
    info!("Collected arguments");

    let config = Config::from(&args);
    if let Err(e) = config.validate() {
        error!("{e}");
        return ExitCode::FAILURE;
    }

    let source = match FastxReader::open(&args.input) {
        Ok(source) => source,
        Err(e) => {
            error!("{}: {e}", args.input);
            return ExitCode::FAILURE;
        }
    };

    let (index, stats) = match pipeline::run(source, &config) {
        Ok(result) => result,
        Err(e) => {
            error!("{e}");
            return ExitCode::FAILURE;
        }
    };
    info!(
        "{} records read, {} published in phase 1, {} recruited in phase 2, {} distinct repeats",
        stats.records_read,
        stats.phase1_published,
        stats.phase2_published,
        index.len()
    );

    let write_result = match &args.output {
        Some(path) => File::create(path).and_then(|mut f| pipeline::write_summary(&index, &mut f)),
        None => pipeline::write_summary(&index, &mut io::stdout()),
    };
    if let Err(e) = write_result {
        error!("failed writing output: {e}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

#[cfg(test)]
#[ctor::ctor]
fn init() {
    env_logger::init();
}

#[test]
fn verify_app() {
    use clap::CommandFactory;
    Cli::command().debug_assert()
}
