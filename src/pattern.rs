//! String search primitives used by the scanners.
//!
//! `find` is a single-pattern Boyer-Moore-Horspool search (expected
//! O(|text|), independent of |pattern| in the common case). `multi_search`
//! generalizes the same bad-character idea to a whole pattern set in one
//! pass, in the spirit of Wu-Manber: a shift table is built once over the
//! shortest pattern in the set, then the text is scanned with that shift,
//! checking every pattern for a full match whenever the window can't be
//! skipped past.

use std::collections::HashMap;

/// Horspool's bad-character table: for each byte, how far we can safely
/// jump the window when that byte is seen at the window's last position.
fn horspool_table(pattern: &[u8]) -> HashMap<u8, usize> {
    let m = pattern.len();
    let mut table = HashMap::with_capacity(m);
    for (i, &b) in pattern[..m - 1].iter().enumerate() {
        table.insert(b, m - 1 - i);
    }
    table
}

/// First index of `pattern` in `text`, or -1 if absent.
pub fn find(text: &[u8], pattern: &[u8]) -> i64 {
    let (n, m) = (text.len(), pattern.len());
    if m == 0 || m > n {
        return -1;
    }
    let table = horspool_table(pattern);
    let mut pos = 0usize;
    while pos <= n - m {
        let window = &text[pos..pos + m];
        if window == pattern {
            return pos as i64;
        }
        let last = window[m - 1];
        let shift = table.get(&last).copied().unwrap_or(m);
        pos += shift;
    }
    -1
}

/// One entry of the frozen multi-pattern search.
pub struct MultiPattern {
    patterns: Vec<Vec<u8>>,
    min_len: usize,
    shift: HashMap<u8, usize>,
}

impl MultiPattern {
    /// Freeze a pattern set for repeated `search` calls. Patterns are
    /// expected to be non-empty; callers (the recruiter) guarantee this
    /// since they come straight out of accepted repeats.
    pub fn new(patterns: Vec<Vec<u8>>) -> Option<Self> {
        let min_len = patterns.iter().map(|p| p.len()).min()?;
        if min_len == 0 {
            return None;
        }
        let mut shift = HashMap::new();
        for p in &patterns {
            for (i, &b) in p[..min_len - 1].iter().enumerate() {
                let candidate = min_len - 1 - i;
                shift
                    .entry(b)
                    .and_modify(|s| *s = (*s).min(candidate))
                    .or_insert(candidate);
            }
        }
        Some(MultiPattern {
            patterns,
            min_len,
            shift,
        })
    }

    /// Leftmost hit among any pattern in the set, scanning `text` once.
    /// Returns the matched pattern and the index it starts at.
    pub fn search(&self, text: &[u8]) -> Option<(&[u8], usize)> {
        let n = text.len();
        if n < self.min_len {
            return None;
        }
        let mut pos = 0usize;
        while pos <= n - self.min_len {
            for p in &self.patterns {
                if pos + p.len() <= n && &text[pos..pos + p.len()] == p.as_slice() {
                    return Some((p.as_slice(), pos));
                }
            }
            let last = text[pos + self.min_len - 1];
            let shift = self.shift.get(&last).copied().unwrap_or(self.min_len);
            pos += shift;
        }
        None
    }
}

/// Normalized similarity in [0, 1]: 1.0 for identical strings, 0.0 for
/// strings that share nothing, monotone in edit distance for equal-length
/// inputs. Built on Levenshtein distance scaled by the longer string's
/// length.
pub fn similarity(a: &[u8], b: &[u8]) -> f32 {
    let max_len = a.len().max(b.len());
    if max_len == 0 {
        return 1.0;
    }
    // levenshtein::levenshtein works on &str; the alphabet here is ASCII
    // so the byte slices are always valid UTF-8.
    let a_str = std::str::from_utf8(a).unwrap_or("");
    let b_str = std::str::from_utf8(b).unwrap_or("");
    let dist = levenshtein::levenshtein(a_str, b_str);
    1.0 - (dist as f32 / max_len as f32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn find_basic() {
        assert_eq!(find(b"ACGTACGTACGT", b"GTAC"), 2);
        assert_eq!(find(b"ACGTACGTACGT", b"TTTT"), -1);
        assert_eq!(find(b"ACGT", b"ACGT"), 0);
        assert_eq!(find(b"AC", b"ACGT"), -1);
    }

    #[test]
    fn multi_search_finds_leftmost() {
        let patterns = vec![b"CCCC".to_vec(), b"GGGG".to_vec()];
        let mp = MultiPattern::new(patterns).unwrap();
        let (pat, idx) = mp.search(b"AAAAGGGGAAACCCC").unwrap();
        assert_eq!(idx, 4);
        assert_eq!(pat, b"GGGG");
    }

    #[test]
    fn multi_search_no_hit() {
        let patterns = vec![b"CCCC".to_vec()];
        let mp = MultiPattern::new(patterns).unwrap();
        assert!(mp.search(b"AAAAAAAAAAAA").is_none());
    }

    #[test]
    fn similarity_bounds() {
        assert_eq!(similarity(b"ACGT", b"ACGT"), 1.0);
        assert_eq!(similarity(b"AAAA", b"CCCC"), 0.0);
        let half = similarity(b"ACGT", b"ACGG");
        assert!(half > 0.0 && half < 1.0);
    }
}
