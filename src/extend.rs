//! The repeat-boundary extension machinery shared by [`crate::long_scanner`]:
//! `scan_right` walks further down a read looking for more copies of a
//! seed kmer at roughly regular spacing, and `extend_pre_repeat` grows the
//! repeat boundary symmetrically using per-column majority voting across
//! every occurrence found so far.

use crate::pattern;
use crate::read_holder::ReadHolder;

/// Seek `pattern` repeatedly further down the read at roughly the spacing
/// already observed between the last two hits, appending an interval for
/// every further hit. Stops when the spacing between successive hits would
/// fall below `min_spacer + pattern.len()`, or when the pattern can no
/// longer be found. Returns the last search window's end, mostly useful
/// for diagnostics.
pub fn scan_right(
    holder: &mut ReadHolder,
    pattern: &[u8],
    min_spacer: usize,
    scan_range: usize,
) -> usize {
    let pattern_len = pattern.len();
    let n = holder.num_repeats();
    let mut last_idx = holder.start_stops_at(2 * n - 2);
    let mut prev_idx = holder.start_stops_at(2 * n - 4);
    let mut spacing = last_idx - prev_idx;
    let read_len = holder.seq_len();

    loop {
        let candidate = last_idx + spacing;
        let mut begin_search = candidate.saturating_sub(scan_range);
        let mut end_search = candidate + pattern_len + scan_range;

        let scan_right_min_begin = last_idx + pattern_len + min_spacer;
        if begin_search < scan_right_min_begin {
            begin_search = scan_right_min_begin;
        }
        if begin_search > read_len.saturating_sub(1) {
            return read_len.saturating_sub(1);
        }
        if end_search > read_len {
            end_search = read_len;
        }
        if begin_search >= end_search {
            return end_search;
        }

        let text = &holder.seq[begin_search..end_search];
        let hit = pattern::find(text, pattern);
        if hit < 0 {
            return end_search;
        }
        let hit = hit as usize;
        holder.start_stops_add(begin_search + hit, begin_search + hit + pattern_len);
        prev_idx = last_idx;
        last_idx = begin_search + hit;
        spacing = last_idx - prev_idx;
        if spacing < min_spacer + pattern_len {
            return end_search;
        }
    }
}

fn vote_cutoff(trim_confidence: f32, n: usize) -> usize {
    let cutoff = (trim_confidence * n as f32).floor() as usize;
    cutoff.max(2)
}

/// Tally A/C/G/T at `col` (the base just past the current right edge, or
/// just before the current left edge) across the intervals in
/// `voters`, skipping any interval whose column would run off the read.
/// Ties are broken in A, C, G, T order by construction (the caller checks
/// counts in that order).
fn vote(holder: &ReadHolder, voters: impl Iterator<Item = usize>, col: impl Fn(usize) -> Option<usize>) -> [usize; 4] {
    let mut counts = [0usize; 4];
    for start in voters {
        let Some(pos) = col(start) else { continue };
        if pos >= holder.seq_len() {
            continue;
        }
        match holder.seq_char_at(pos) {
            b'A' => counts[0] += 1,
            b'C' => counts[1] += 1,
            b'G' => counts[2] += 1,
            b'T' => counts[3] += 1,
            _ => {}
        }
    }
    counts
}

/// Grow the repeat boundary symmetrically by per-column majority vote
/// across every occurrence recorded so far. Sets `holder.repeat_len` to
/// `window_len` initially (the seed kmer length), then extends right then
/// left, and finally applies the learned extension to every interval.
/// Returns the final `repeat_len`.
pub fn extend_pre_repeat(
    holder: &mut ReadHolder,
    window_len: usize,
    min_spacer: usize,
    trim_confidence: f32,
) -> usize {
    let n = holder.num_repeats();
    holder.repeat_len = window_len;
    let mut cutoff = vote_cutoff(trim_confidence, n);

    let starts: Vec<usize> = (0..n).map(|i| holder.start_stops_at(2 * i)).collect();
    let mut min_spacing = usize::MAX;
    for w in starts.windows(2) {
        min_spacing = min_spacing.min(w[1] - w[0]);
    }

    let first_repeat_start = holder.get_first_repeat_start();
    let last_repeat_start = holder.get_last_repeat_start();
    let seq_len = holder.seq_len();

    // ---- right extend ----
    let mut max_right = min_spacing.saturating_sub(min_spacer);
    let dist_to_end = seq_len.saturating_sub(last_repeat_start + 1);
    let mut right_voters: Vec<usize> = starts.clone();
    if dist_to_end < max_right {
        right_voters.pop();
        cutoff = vote_cutoff(trim_confidence, n.saturating_sub(1));
    }
    let mut right_extension_length = 0usize;
    while max_right > 0 {
        let repeat_len = holder.repeat_len;
        let counts = vote(holder, right_voters.iter().copied(), |s| Some(s + repeat_len));
        if counts.iter().any(|&c| c > cutoff) {
            holder.increment_repeat_length();
            max_right -= 1;
            right_extension_length += 1;
        } else {
            break;
        }
    }

    // ---- left extend ----
    // `cutoff` carries forward from the right-extend phase rather than
    // reinitializing: if right-extend's exclusion branch fired, the left
    // phase still votes against that reduced cutoff unless its own
    // exclusion condition fires too.
    let repeat_len_after_right = holder.repeat_len;
    let test_for_negative = min_spacing as i64 - min_spacer as i64 - repeat_len_after_right as i64;
    let max_left = if test_for_negative >= 0 {
        test_for_negative as usize
    } else {
        0
    };
    let mut left_voters: Vec<usize> = starts;
    if max_left > first_repeat_start {
        left_voters.remove(0);
        cutoff = vote_cutoff(trim_confidence, n.saturating_sub(1));
    }
    let mut left_extension_length = 0usize;
    while left_extension_length < max_left {
        let ext = left_extension_length;
        let counts = vote(holder, left_voters.iter().copied(), |s| {
            if s > ext {
                Some(s - ext - 1)
            } else {
                None
            }
        });
        if counts.iter().any(|&c| c > cutoff) {
            holder.increment_repeat_length();
            left_extension_length += 1;
        } else {
            break;
        }
    }

    // ---- apply extension to every interval ----
    let num_pairs = holder.num_repeats();
    for i in 0..num_pairs {
        let s = holder.start_stops_at(2 * i);
        let e = holder.start_stops_at(2 * i + 1);
        let new_s = if s < left_extension_length { 0 } else { s - left_extension_length };
        let mut new_e = e + right_extension_length;
        if new_e > seq_len {
            new_e = seq_len;
        }
        holder.start_stops[2 * i] = new_s;
        holder.start_stops[2 * i + 1] = new_e;
    }

    holder.repeat_len
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::read_holder::ReadHolder;

    #[test]
    fn extends_to_full_repeat_length() {
        let r = b"GTTTCCGTCCCCTCATGGGGGACGGAAAC"; // 29bp
        let s1 = vec![b'A'; 30];
        let s2 = vec![b'C'; 30];
        let mut seq = Vec::new();
        seq.extend_from_slice(&vec![b'N'; 20]);
        let r1 = seq.len();
        seq.extend_from_slice(r);
        seq.extend_from_slice(&s1);
        let r2 = seq.len();
        seq.extend_from_slice(r);
        seq.extend_from_slice(&s2);
        let r3 = seq.len();
        seq.extend_from_slice(r);
        seq.extend_from_slice(&vec![b'N'; 20]);

        let w = 8;
        let mut holder = ReadHolder::new("r".into(), seq, None, None);
        holder.start_stops_add(r1, r1 + w);
        holder.start_stops_add(r2, r2 + w);
        holder.start_stops_add(r3, r3 + w);

        let final_len = extend_pre_repeat(&mut holder, w, 26, 0.75);
        assert_eq!(final_len, r.len());
        assert_eq!(holder.repeat_string_at(0), r.as_slice());
        assert_eq!(holder.repeat_string_at(1), r.as_slice());
        assert_eq!(holder.repeat_string_at(2), r.as_slice());
    }
}
