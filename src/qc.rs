//! Quality-control filter applied to a candidate repeat before it is
//! published: rejects low-complexity repeats, repeats too similar to their
//! spacers, spacer-length heterogeneity, and repeat/spacer length
//! disparity. Any one failure rejects the whole read.

use crate::config::Config;
use crate::pattern::similarity;
use crate::read_holder::ReadHolder;

/// A single base's frequency in the repeat (Ns share the same rule)
/// exceeds `low_complexity_threshold * len`.
fn is_low_complexity(repeat: &[u8], threshold: f32) -> bool {
    let len = repeat.len();
    if len == 0 {
        return true;
    }
    let cutoff = (len as f32 * threshold) as usize;
    let mut counts = [0usize; 5]; // A, C, G, T, N
    for &b in repeat {
        let idx = match b {
            b'A' => 0,
            b'C' => 1,
            b'G' => 2,
            b'T' => 3,
            _ => 4,
        };
        counts[idx] += 1;
    }
    counts.iter().any(|&c| c > cutoff)
}

/// Run the QC filter. Requires at least one repeat pair (two intervals);
/// callers should not invoke this on a holder with fewer.
pub fn passes(holder: &ReadHolder, config: &Config) -> bool {
    debug_assert!(holder.num_repeats() >= 2, "QC needs at least two repeat occurrences");

    let repeat = holder.repeat_string_at(0).to_vec();
    if is_low_complexity(&repeat, config.low_complexity_threshold) {
        return false;
    }

    let spacers: Vec<Vec<u8>> = holder
        .all_spacer_strings()
        .into_iter()
        .map(|s| s.to_vec())
        .collect();

    if spacers.len() >= 2 {
        let n = spacers.len() as f32;
        let diff_cutoff = n * config.max_similarity;

        let sum_repeat_spacer_sim: f32 = spacers.iter().map(|s| similarity(&repeat, s)).sum();
        let sum_spacer_spacer_sim: f32 = spacers
            .windows(2)
            .map(|w| similarity(&w[0], &w[1]))
            .sum();
        // spacer-spacer similarity is a mean over adjacent *pairs*
        // (n-1 of them), not over the n spacers themselves.
        let spacer_spacer_pairs = (spacers.len() - 1) as f32;

        if sum_spacer_spacer_sim / spacer_spacer_pairs > config.max_similarity {
            return false;
        }
        if sum_repeat_spacer_sim > diff_cutoff {
            return false;
        }

        let sum_spacer_to_spacer_len_diff: i64 = spacers
            .windows(2)
            .map(|w| w[0].len() as i64 - w[1].len() as i64)
            .sum();
        let sum_repeat_to_spacer_len_diff: i64 =
            spacers.iter().map(|s| repeat.len() as i64 - s.len() as i64).sum();

        let spacer_len_cutoff = (n * config.spacer_to_spacer_delta as f32) as i64;
        if sum_spacer_to_spacer_len_diff.abs() > spacer_len_cutoff {
            return false;
        }
        let repeat_len_cutoff = (n * config.spacer_to_repeat_delta as f32) as i64;
        if sum_repeat_to_spacer_len_diff.abs() > repeat_len_cutoff {
            return false;
        }
    } else if spacers.len() == 1 {
        let spacer = &spacers[0];
        if similarity(&repeat, spacer) > config.max_similarity {
            return false;
        }
        let len_diff = (repeat.len() as i64 - spacer.len() as i64).abs();
        if len_diff > config.spacer_to_repeat_delta as i64 {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder_with(repeat: &[u8], spacers: &[&[u8]]) -> ReadHolder {
        let mut seq = Vec::new();
        seq.extend_from_slice(repeat);
        let mut start_stops = vec![0, repeat.len()];
        for s in spacers {
            seq.extend_from_slice(s);
            let spacer_end = seq.len();
            seq.extend_from_slice(repeat);
            start_stops.push(spacer_end);
            start_stops.push(seq.len());
        }
        let mut h = ReadHolder::new("r".into(), seq, None, None);
        h.start_stops = start_stops;
        h.repeat_len = repeat.len();
        h
    }

    #[test]
    fn low_complexity_repeat_rejected() {
        let repeat = b"AAAAAAAAAAAAAAAAAAAAAAA"; // 23 x A
        let h = holder_with(repeat, &[b"ACGTACGTACGTACGTACGTACGTACGTA"]);
        let c = Config::default();
        assert!(!passes(&h, &c));
    }

    #[test]
    fn identical_spacers_rejected_by_similarity() {
        let repeat = b"GTTTCCGTCCCCTCATGGGGGACGGAAAC";
        let spacer: Vec<u8> = vec![b'A'; 30];
        let h = holder_with(repeat, &[&spacer, &spacer]);
        let c = Config::default();
        // identical spacers vs each other (similarity 1.0) should fail
        assert!(!passes(&h, &c));
    }

    #[test]
    fn distinct_spacers_pass() {
        let repeat = b"GTTTCCGTCCCCTCATGGGGGACGGAAAC";
        let s1: Vec<u8> = b"ACGT".iter().cycle().take(32).copied().collect();
        let s2: Vec<u8> = b"CTAG".iter().cycle().take(32).copied().collect();
        let h = holder_with(repeat, &[&s1, &s2]);
        let c = Config::default();
        assert!(passes(&h, &c));
    }

    #[test]
    fn single_spacer_too_similar_rejected() {
        let repeat = b"ATCGATCGATCGATCGATCGATCG";
        let h = holder_with(repeat, &[repeat]);
        let c = Config::default();
        assert!(!passes(&h, &c));
    }

    #[test]
    fn single_spacer_distinct_passes() {
        let repeat = b"ATCGATCGATCGATCGATCGATCG";
        let spacer: Vec<u8> = b"GGTACCTTAAGGCCATGGAGCTCCTTAAGG".to_vec();
        let h = holder_with(repeat, &[&spacer]);
        let c = Config::default();
        assert!(passes(&h, &c));
    }
}
