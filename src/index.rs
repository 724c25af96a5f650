//! The read-to-repeat map: canonical repeat strings are interned to dense
//! `u32` tokens (0 reserved for "absent") and each bucket keeps every
//! `ReadHolder` exhibiting that repeat, in acceptance order. Also home to
//! the two small pieces of state phase 1 and phase 2 share: the growing
//! `PatternSet` snapshot handed to the recruiter, and the `SeenReadIds` set
//! used to avoid double-publishing a read.

use std::collections::{HashMap, HashSet};

use crate::read_holder::ReadHolder;

/// Canonical map from a repeat's interned token to the reads exhibiting it.
/// Canonicalization happens here, at insertion time, so every other
/// component can treat a `ReadHolder` that reaches the index as already in
/// its published orientation.
#[derive(Default)]
pub struct ReadIndex {
    tokens: HashMap<Vec<u8>, u32>,
    buckets: Vec<(Vec<u8>, Vec<ReadHolder>)>,
    /// Repeat strings as they appeared in the read, before the
    /// canonicalizing reverse-complement flip `insert` may apply. The
    /// recruiter's multi-pattern search runs against un-canonicalized
    /// forward records (`recruiter::recruit`), so it needs patterns in
    /// that same as-found orientation rather than the bucket keys, which
    /// may be reverse-complemented relative to how the repeat was read.
    raw_patterns: Vec<Vec<u8>>,
}

impl ReadIndex {
    pub fn new() -> Self {
        ReadIndex {
            tokens: HashMap::new(),
            buckets: Vec::new(),
            raw_patterns: Vec::new(),
        }
    }

    /// Canonicalize `holder`, intern its repeat string, and push it into
    /// the matching bucket (creating one on first sight). Returns the
    /// token assigned.
    pub fn insert(&mut self, mut holder: ReadHolder) -> u32 {
        self.raw_patterns.push(holder.repeat_string_at(0).to_vec());
        holder.canonicalize();
        let key = holder.repeat_string_at(0).to_vec();
        let token = match self.tokens.get(&key) {
            Some(&t) => t,
            None => {
                let t = self.tokens.len() as u32 + 1; // dense from 1, 0 reserved
                self.tokens.insert(key.clone(), t);
                self.buckets.push((key, Vec::new()));
                t
            }
        };
        self.buckets[token as usize - 1].1.push(holder);
        token
    }

    pub fn token_for(&self, canonical_repeat: &[u8]) -> Option<u32> {
        self.tokens.get(canonical_repeat).copied()
    }

    pub fn reads_for_token(&self, token: u32) -> Option<&[ReadHolder]> {
        self.buckets
            .get(token as usize - 1)
            .map(|(_, reads)| reads.as_slice())
    }

    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Iterate every bucket as `(canonical repeat, reads)`, in the order
    /// buckets were first created.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[ReadHolder])> {
        self.buckets.iter().map(|(k, v)| (k.as_slice(), v.as_slice()))
    }

    /// Snapshot the as-found repeat strings seen so far, for the recruiter
    /// to build its multi-pattern searcher from. Uses the orientation each
    /// repeat was published in before canonicalization, not the (possibly
    /// reverse-complemented) bucket keys, since the recruiter searches
    /// forward records. Called once, after phase 1 has run to completion.
    pub fn freeze_patterns(&self) -> PatternSet {
        PatternSet(self.raw_patterns.clone())
    }
}

/// Snapshot of repeat strings known after phase 1, frozen before phase 2
/// starts. Grows monotonically only during phase 1.
pub struct PatternSet(Vec<Vec<u8>>);

impl PatternSet {
    pub fn patterns(&self) -> &[Vec<u8>] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Read ids already published, shared across both phases so the recruiter
/// never double-publishes a read the primary scan already accepted.
#[derive(Default)]
pub struct SeenReadIds(HashSet<String>);

impl SeenReadIds {
    pub fn new() -> Self {
        SeenReadIds(HashSet::new())
    }

    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    /// Records `id`, returning `true` if it was newly inserted.
    pub fn insert(&mut self, id: String) -> bool {
        self.0.insert(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn holder_with_repeat(id: &str, repeat: &[u8]) -> ReadHolder {
        let mut seq = repeat.to_vec();
        seq.extend_from_slice(&vec![b'N'; 10]);
        seq.extend_from_slice(repeat);
        let mut h = ReadHolder::new(id.into(), seq, None, None);
        h.start_stops_add(0, repeat.len());
        h.start_stops_add(repeat.len() + 10, 2 * repeat.len() + 10);
        h.repeat_len = repeat.len();
        h
    }

    #[test]
    fn same_repeat_shares_a_bucket() {
        let mut idx = ReadIndex::new();
        let r = b"ATCGATCGATCGATCGATCGATCG";
        let t1 = idx.insert(holder_with_repeat("r1", r));
        let t2 = idx.insert(holder_with_repeat("r2", r));
        assert_eq!(t1, t2);
        assert_eq!(idx.reads_for_token(t1).unwrap().len(), 2);
    }

    #[test]
    fn distinct_repeats_get_distinct_tokens_from_one() {
        let mut idx = ReadIndex::new();
        let t1 = idx.insert(holder_with_repeat("r1", b"ATCGATCGATCGATCGATCGATCG"));
        let t2 = idx.insert(holder_with_repeat("r2", b"GGGGCCCCTTTTAAAAGGGGCCCC"));
        assert_ne!(t1, t2);
        assert_eq!(t1, 1);
        assert_eq!(t2, 2);
    }

    #[test]
    fn canonicalizes_on_insert_so_rc_orientation_shares_the_bucket() {
        // "TTTT..." revcomp is a smaller string, so insertion should flip it
        // to match a read already stored in the canonical ("AAAA"-leading)
        // orientation.
        let mut idx = ReadIndex::new();
        let fwd = b"AAAAGGGGCCCCTTTTAAAAGGGG";
        let rc: Vec<u8> = fwd.iter().rev().map(|&b| match b {
            b'A' => b'T',
            b'T' => b'A',
            b'C' => b'G',
            b'G' => b'C',
            _ => b,
        }).collect();
        let t1 = idx.insert(holder_with_repeat("r1", fwd));
        let t2 = idx.insert(holder_with_repeat("r2", &rc));
        assert_eq!(t1, t2);
    }

    #[test]
    fn freeze_patterns_snapshots_current_keys() {
        let mut idx = ReadIndex::new();
        idx.insert(holder_with_repeat("r1", b"ATCGATCGATCGATCGATCGATCG"));
        let frozen = idx.freeze_patterns();
        assert_eq!(frozen.patterns().len(), 1);
        idx.insert(holder_with_repeat("r2", b"GGGGCCCCTTTTAAAAGGGGCCCC"));
        // snapshot taken before the second insert must not grow
        assert_eq!(frozen.patterns().len(), 1);
    }

    #[test]
    fn seen_read_ids_insert_is_idempotent() {
        let mut seen = SeenReadIds::new();
        assert!(seen.insert("r1".into()));
        assert!(!seen.insert("r1".into()));
        assert!(seen.contains("r1"));
    }
}
