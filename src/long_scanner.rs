//! LongScanner: seeds with a small window, scans right at regular spacing
//! to find further repeats, then grows the repeat boundary with consensus
//! extension.

use crate::config::Config;
use crate::extend::{extend_pre_repeat, scan_right};
use crate::pattern;
use crate::qc;
use crate::read_holder::ReadHolder;

/// Try to find a CRISPR array in one record. Returns the accepted
/// `ReadHolder` (in working, not yet canonicalized, orientation) or `None`
/// if nothing passed every test.
pub fn scan(mut holder: ReadHolder, config: &Config) -> Option<ReadHolder> {
    if config.remove_homopolymers {
        holder.encode_homopolymers();
    }

    let l = holder.seq_len();
    let w = config.search_window_len;

    let skips = (config.low_dr as i64 - (2 * w as i64 - 1)).max(1) as usize;
    let search_end = l as i64 - config.high_dr as i64 - config.high_spacer as i64 - w as i64 - 1;
    if search_end < 0 {
        return None;
    }
    let search_end = search_end as usize;

    let mut j = 0usize;
    while j <= search_end {
        let begin_search = j + config.low_dr + config.low_spacer;
        let mut end_search = (j + config.high_dr + config.high_spacer + w).min(l.saturating_sub(1));
        if end_search < begin_search {
            end_search = begin_search;
        }

        if begin_search < end_search && end_search <= l {
            let pattern = holder.seq[j..j + w].to_vec();
            let text = &holder.seq[begin_search..end_search];
            let p = pattern::find(text, &pattern);
            if p >= 0 {
                let p = p as usize;
                holder.start_stops_add(j, j + w);
                holder.start_stops_add(begin_search + p, begin_search + p + w);
                scan_right(&mut holder, &pattern, config.low_spacer, config.scan_range);
            }
        }

        if holder.num_repeats() > config.min_num_repeats {
            let repeat_len = extend_pre_repeat(&mut holder, w, config.low_spacer, config.trim_confidence);

            if repeat_len >= config.low_dr && repeat_len <= config.high_dr {
                holder.decode();
                holder.drop_partials();
                if holder.num_repeats() >= 2 && holder.validate().is_ok() && qc::passes(&holder, config) {
                    return Some(holder);
                }
            }
            j = holder.back().saturating_sub(1);
        }
        holder.clear_start_stops();
        j += skips;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(r: &[u8], spacers: &[&[u8]]) -> Vec<u8> {
        let mut seq = vec![b'N'; 20];
        for s in spacers {
            seq.extend_from_slice(r);
            seq.extend_from_slice(s);
        }
        seq.extend_from_slice(r);
        seq.extend_from_slice(&vec![b'N'; 20]);
        seq
    }

    #[test]
    fn three_copy_identical_spacers_rejected_by_qc() {
        let r = b"GTTTCCGTCCCCTCATGGGGGACGGAAAC";
        let s: Vec<u8> = vec![b'A'; 30];
        let seq = build(r, &[&s, &s]);
        let holder = ReadHolder::new("r1".into(), seq, None, None);
        let config = Config::default();
        assert!(scan(holder, &config).is_none());
    }

    #[test]
    fn three_copy_distinct_spacers_published() {
        let r = b"GTTTCCGTCCCCTCATGGGGGACGGAAAC";
        let s1: Vec<u8> = b"ACGT".iter().cycle().take(32).copied().collect();
        let s2: Vec<u8> = b"CTAG".iter().cycle().take(32).copied().collect();
        let seq = build(r, &[&s1, &s2]);
        let holder = ReadHolder::new("r1".into(), seq, None, None);
        let config = Config::default();
        let found = scan(holder, &config).expect("expected a published read");
        assert_eq!(found.num_repeats(), 3);
        assert_eq!(found.repeat_string_at(0), r.as_slice());
        assert_eq!(found.repeat_string_at(1), r.as_slice());
        assert_eq!(found.repeat_string_at(2), r.as_slice());
    }

    #[test]
    fn low_complexity_repeat_rejected() {
        let r = vec![b'A'; 23];
        let s1: Vec<u8> = b"ACGT".iter().cycle().take(32).copied().collect();
        let s2: Vec<u8> = b"CTAG".iter().cycle().take(32).copied().collect();
        let seq = build(&r, &[&s1, &s2]);
        let holder = ReadHolder::new("r1".into(), seq, None, None);
        let config = Config::default();
        assert!(scan(holder, &config).is_none());
    }

    #[test]
    fn too_short_read_is_skipped() {
        let holder = ReadHolder::new("short".into(), b"ACGTACGTACGT".to_vec(), None, None);
        let config = Config::default();
        assert!(scan(holder, &config).is_none());
    }
}
