//! Orchestrates one full run over an input stream: buffer records, decide
//! which per-record scanner to use, run phase 1 (primary scan, optionally
//! parallel across records), freeze the pattern set, then run phase 2
//! (singleton recruitment). Phase 1 runs to completion before the pattern
//! set is frozen and phase 2 begins, so there is never a concurrent
//! reader/writer across phases.

use std::io::{self, Write};
use std::sync::Mutex;

use log::{debug, info, warn};
use rayon::prelude::*;

use crate::config::{Config, ScannerKind};
use crate::error::CoreError;
use crate::index::{ReadIndex, SeenReadIds};
use crate::long_scanner;
use crate::read_holder::ReadHolder;
use crate::record::{Record, RecordSource};
use crate::recruiter;
use crate::short_scanner;

/// Per-pass counters, returned instead of accumulated in a global so a
/// caller running multiple passes never shares mutable state between them.
#[derive(Debug, Default, Clone)]
pub struct RunStats {
    pub records_read: usize,
    pub records_malformed: usize,
    pub scanner: Option<ScannerKind>,
    pub phase1_published: usize,
    pub phase2_published: usize,
}

/// Run the full two-phase pipeline to completion over `source`, returning
/// the populated `ReadIndex` and run counters. The only fatal error is a
/// stream-level I/O failure while buffering records; everything else is a
/// per-record skip.
pub fn run(mut source: impl RecordSource, config: &Config) -> Result<(ReadIndex, RunStats), CoreError> {
    let mut stats = RunStats::default();

    // The recruiter needs a second pass over every record, and RecordSource
    // is a forward-only stream, so the whole pass is buffered up front.
    let mut records = Vec::new();
    while let Some(record) = source.next_record()? {
        if record.seq.is_empty() {
            warn!("{}: empty sequence, skipping", record.id);
            stats.records_malformed += 1;
            continue;
        }
        records.push(record);
    }
    stats.records_read = records.len();

    let scanner_kind = decide_scanner(&records, config);
    stats.scanner = Some(scanner_kind);
    info!(
        "selected {scanner_kind:?} scanner from {} sampled of {} records",
        records.len().min(config.max_reads_for_decision),
        records.len()
    );

    let mut index = ReadIndex::new();
    let mut seen = SeenReadIds::new();

    // ---- phase 1: primary scan ----
    let accepted = scan_all(&records, scanner_kind, config);
    for holder in accepted {
        seen.insert(holder.id.clone());
        index.insert(holder);
        stats.phase1_published += 1;
    }

    // ---- phase 2: singleton recruitment ----
    let patterns = index.freeze_patterns();
    stats.phase2_published = recruiter::recruit(&records, &patterns, &mut seen, &mut index);

    Ok((index, stats))
}

/// Average read length over the first `max_reads_for_decision` records
/// decides the scanner. An empty input defaults to the short scanner
/// (nothing to scan either way).
fn decide_scanner(records: &[Record], config: &Config) -> ScannerKind {
    let sample_n = records.len().min(config.max_reads_for_decision);
    if sample_n == 0 {
        return ScannerKind::Short;
    }
    let total: usize = records[..sample_n].iter().map(|r| r.seq.len()).sum();
    let avg = total as f32 / sample_n as f32;
    config.decide_scanner(avg)
}

/// Dispatch every record to the chosen scanner, in parallel across records
/// via a `rayon` thread pool and a `Mutex`-guarded accumulator when
/// `config.threads > 1`, with a plain sequential fallback for
/// `threads == 1`.
fn scan_all(records: &[Record], kind: ScannerKind, config: &Config) -> Vec<ReadHolder> {
    if config.threads > 1 {
        rayon::ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .build()
            .unwrap();
        let accepted = Mutex::new(Vec::new());
        records.par_iter().for_each(|record| {
            if let Some(holder) = scan_one(record, kind, config) {
                accepted.lock().unwrap().push(holder);
            }
        });
        accepted.into_inner().unwrap()
    } else {
        records
            .iter()
            .filter_map(|record| scan_one(record, kind, config))
            .collect()
    }
}

fn scan_one(record: &Record, kind: ScannerKind, config: &Config) -> Option<ReadHolder> {
    if record.seq.len() < config.low_dr {
        debug!("{}: shorter than the minimum repeat length, skipping", record.id);
        return None;
    }
    let holder = ReadHolder::new(
        record.id.clone(),
        record.seq.clone(),
        record.comment.clone(),
        record.quality.clone(),
    );
    match kind {
        ScannerKind::Long => long_scanner::scan(holder, config),
        ScannerKind::Short => short_scanner::scan(holder, config),
    }
}

/// Thin convenience serializer for `--output`: one tab-delimited line per
/// published read (id, canonical repeat, interval list). Downstream
/// spacer-graph construction is a separate system and has no stake here.
pub fn write_summary(index: &ReadIndex, out: &mut impl Write) -> io::Result<()> {
    for (repeat, reads) in index.iter() {
        let repeat_str = String::from_utf8_lossy(repeat);
        for read in reads {
            let intervals: Vec<String> = read
                .start_stops
                .chunks(2)
                .map(|p| format!("{}-{}", p[0], p[1]))
                .collect();
            writeln!(out, "{}\t{}\t{}", read.id, repeat_str, intervals.join(","))?;
        }
    }
    Ok(())
}
