//! ShortScanner: finds exactly one repeat pair per read under the
//! configured size constraints. No boundary extension is performed — the
//! repeat length is fixed at `low_dr`. CRASS itself guards its short-read
//! extension loop with a condition that never holds, so this mirrors the
//! behavior actually observed rather than the apparent intent.

use crate::config::Config;
use crate::pattern;
use crate::qc;
use crate::read_holder::ReadHolder;

pub fn scan(mut holder: ReadHolder, config: &Config) -> Option<ReadHolder> {
    if config.remove_homopolymers {
        holder.encode_homopolymers();
    }

    let l = holder.seq_len();
    if l < config.low_dr + 1 {
        return None;
    }
    let search_end = l - config.low_dr - 1;

    let mut first_start = 0usize;
    while first_start + config.low_dr + config.low_spacer < search_end {
        let search_begin = first_start + config.low_dr + config.low_spacer;
        if search_begin >= search_end {
            break;
        }

        let pattern = holder.seq[first_start..first_start + config.low_dr].to_vec();
        let text = &holder.seq[search_begin..];
        let hit = pattern::find(text, &pattern);

        if hit >= 0 {
            let second_start = search_begin + hit as usize;
            let second_end = second_start + config.low_dr;
            holder.start_stops_add(first_start, first_start + config.low_dr);
            holder.start_stops_add(second_start, second_end);
            holder.repeat_len = config.low_dr;

            let avg_spacer = holder.average_spacer_length();
            if holder.repeat_len <= config.high_dr
                && avg_spacer >= config.low_spacer as f32
                && avg_spacer <= config.high_spacer as f32
            {
                holder.decode();
                if holder.validate().is_ok() && qc::passes(&holder, config) {
                    return Some(holder);
                }
            }
            first_start = holder.back();
            holder.clear_start_stops();
        }
        first_start += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_pair_short_read_publishes() {
        let r = b"ATCGATCGATCGATCGATCGATCG"; // 24bp, lowDR default
        let mut seq = vec![b'N'; 10];
        seq.extend_from_slice(r);
        seq.extend_from_slice(&vec![b'T'; 40]);
        seq.extend_from_slice(r);
        seq.extend_from_slice(&vec![b'N'; 40]);

        let config = Config { low_dr: 24, ..Config::default() };
        let holder = ReadHolder::new("r1".into(), seq, None, None);
        let found = scan(holder, &config).expect("expected a publish");
        assert_eq!(found.num_repeats(), 2);
        assert_eq!(found.start_stops, vec![10, 34, 74, 98]);
        assert_eq!(found.repeat_string_at(0), r.as_slice());
    }

    #[test]
    fn canonicalization_keeps_orientation_when_already_smallest() {
        let r = b"ATCGATCGATCGATCGATCGATCG";
        let mut seq = vec![b'N'; 10];
        seq.extend_from_slice(r);
        seq.extend_from_slice(&vec![b'T'; 40]);
        seq.extend_from_slice(r);
        seq.extend_from_slice(&vec![b'N'; 40]);

        let config = Config { low_dr: 24, ..Config::default() };
        let holder = ReadHolder::new("r1".into(), seq, None, None);
        let mut found = scan(holder, &config).expect("expected a publish");
        found.canonicalize();
        assert!(found.was_low_lexi);
    }

    #[test]
    fn no_repeat_found_returns_none() {
        let holder = ReadHolder::new("r1".into(), vec![b'N'; 200], None, None);
        let config = Config::default();
        assert!(scan(holder, &config).is_none());
    }
}
