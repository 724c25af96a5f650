//! `ReadHolder`: the in-flight representation of a candidate read while a
//! scanner is working on it. Owned exclusively by the scan until it is
//! published into a [`crate::index::ReadIndex`] bucket, at which point
//! ownership transfers and the core treats it as immutable.

use crate::error::CoreError;
use crate::homopolymer::{self, Encoding};
use crate::seq;

#[derive(Debug, Clone)]
pub struct ReadHolder {
    pub id: String,
    pub comment: Option<String>,
    pub quality: Option<Vec<u8>>,
    /// Working sequence: homopolymer-encoded while a scan is in progress if
    /// `remove_homopolymers` is set, otherwise identical to the original.
    pub seq: Vec<u8>,
    /// Present only while `seq` is homopolymer-encoded; lets [`decode`]
    /// restore the original sequence and translate coordinates.
    raw_seq: Option<Vec<u8>>,
    encoding: Option<Encoding>,
    /// Set during canonicalization: true if the repeat's first occurrence
    /// was already in its canonical (lexicographically smallest) form, so
    /// no reverse-complement flip was needed.
    pub was_low_lexi: bool,
    /// Even-length, non-decreasing, non-overlapping list of interval
    /// boundaries; interpreted pairwise as `[start, end)` repeat
    /// occurrences.
    pub start_stops: Vec<usize>,
    /// Current common length shared by (non-partial) repeat intervals.
    pub repeat_len: usize,
}

impl ReadHolder {
    pub fn new(id: String, sequence: Vec<u8>, comment: Option<String>, quality: Option<Vec<u8>>) -> Self {
        ReadHolder {
            id,
            comment,
            quality,
            seq: seq::normalize(&sequence),
            raw_seq: None,
            encoding: None,
            was_low_lexi: false,
            start_stops: Vec::new(),
            repeat_len: 0,
        }
    }

    pub fn seq_len(&self) -> usize {
        self.seq.len()
    }

    pub fn seq_char_at(&self, i: usize) -> u8 {
        self.seq[i]
    }

    /// Run-length encode the working sequence, keeping the original around
    /// so [`decode`] can restore it later.
    pub fn encode_homopolymers(&mut self) {
        let (encoded, encoding) = homopolymer::encode(&self.seq);
        self.raw_seq = Some(std::mem::replace(&mut self.seq, encoded));
        self.encoding = Some(encoding);
    }

    /// Undo [`encode_homopolymers`]: restore the original sequence and
    /// translate every interval boundary (and `repeat_len`, via the first
    /// interval) from encoded space back to decoded space.
    pub fn decode(&mut self) {
        if let Some(encoding) = self.encoding.take() {
            for pos in self.start_stops.iter_mut() {
                *pos = encoding.to_decoded(*pos);
            }
            if let Some(raw) = self.raw_seq.take() {
                self.seq = raw;
            }
            // A boundary interval may have been clamped to less than the
            // true repeat length; take the widest span as the decoded
            // repeat length rather than assuming the first pair is whole.
            self.repeat_len = self
                .start_stops
                .chunks(2)
                .map(|p| p[1] - p[0])
                .max()
                .unwrap_or(0);
        }
    }

    pub fn start_stops_add(&mut self, start: usize, end: usize) {
        self.start_stops.push(start);
        self.start_stops.push(end);
    }

    pub fn clear_start_stops(&mut self) {
        self.start_stops.clear();
        self.repeat_len = 0;
    }

    pub fn num_repeats(&self) -> usize {
        self.start_stops.len() / 2
    }

    pub fn num_spacers(&self) -> usize {
        self.num_repeats().saturating_sub(1)
    }

    pub fn start_stops_at(&self, i: usize) -> usize {
        self.start_stops[i]
    }

    pub fn get_first_repeat_start(&self) -> usize {
        self.start_stops[0]
    }

    pub fn get_last_repeat_start(&self) -> usize {
        self.start_stops[self.start_stops.len() - 2]
    }

    /// Last value in the interval list; scanners resume their outer loop
    /// from just before this point after a failed candidate.
    pub fn back(&self) -> usize {
        *self.start_stops.last().expect("start_stops is non-empty")
    }

    pub fn increment_repeat_length(&mut self) {
        self.repeat_len += 1;
    }

    pub fn repeat_string_at(&self, i: usize) -> &[u8] {
        let s = self.start_stops[2 * i];
        let e = self.start_stops[2 * i + 1];
        &self.seq[s..e]
    }

    pub fn spacer_string_at(&self, i: usize) -> &[u8] {
        let s = self.start_stops[2 * i + 1];
        let e = self.start_stops[2 * i + 2];
        &self.seq[s..e]
    }

    pub fn all_spacer_strings(&self) -> Vec<&[u8]> {
        (0..self.num_spacers()).map(|i| self.spacer_string_at(i)).collect()
    }

    pub fn average_spacer_length(&self) -> f32 {
        let spacers = self.all_spacer_strings();
        if spacers.is_empty() {
            return 0.0;
        }
        spacers.iter().map(|s| s.len()).sum::<usize>() as f32 / spacers.len() as f32
    }

    /// Remove a first or last interval that the extension step could not
    /// grow to the full `repeat_len` because it abutted a read boundary:
    /// its left edge sits at 0, or its right edge sits at the sequence
    /// end, and its span is shorter than `repeat_len`.
    pub fn drop_partials(&mut self) {
        if self.num_repeats() < 2 {
            return;
        }
        let (s0, e0) = (self.start_stops[0], self.start_stops[1]);
        if s0 == 0 && (e0 - s0) < self.repeat_len {
            self.start_stops.drain(0..2);
        }
        if self.num_repeats() < 2 {
            return;
        }
        let n = self.start_stops.len();
        let (sl, el) = (self.start_stops[n - 2], self.start_stops[n - 1]);
        if el == self.seq_len() && (el - sl) < self.repeat_len {
            self.start_stops.drain(n - 2..n);
        }
    }

    /// Internal consistency check. Catches programming errors rather than
    /// biological ones; a failure here means a record must be dropped, not
    /// published, per the error-handling policy.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.start_stops.len() % 2 != 0 {
            return Err(CoreError::Record(format!(
                "{}: odd-length interval list",
                self.id
            )));
        }
        if self.start_stops.len() < 2 {
            return Err(CoreError::Record(format!(
                "{}: fewer than one repeat interval",
                self.id
            )));
        }
        let mut prev_end = 0usize;
        for pair in self.start_stops.chunks(2) {
            let (s, e) = (pair[0], pair[1]);
            if s >= e || e > self.seq_len() {
                return Err(CoreError::Record(format!(
                    "{}: invalid interval [{s},{e})",
                    self.id
                )));
            }
            if s < prev_end {
                return Err(CoreError::Record(format!(
                    "{}: overlapping or unordered intervals",
                    self.id
                )));
            }
            prev_end = e;
        }
        Ok(())
    }

    /// Orient the read so the first interval's substring is the canonical
    /// (lexicographically smallest of forward/reverse-complement) form of
    /// the repeat. Idempotent: calling it twice leaves the read unchanged.
    pub fn canonicalize(&mut self) {
        let dr = self.repeat_string_at(0).to_vec();
        let rc = seq::reverse_complement(&dr);
        if dr <= rc {
            self.was_low_lexi = true;
            return;
        }
        self.was_low_lexi = false;
        let l = self.seq_len();
        self.seq = seq::reverse_complement(&self.seq);
        if let Some(q) = self.quality.as_mut() {
            q.reverse();
        }
        let mut new_pairs: Vec<(usize, usize)> = self
            .start_stops
            .chunks(2)
            .map(|p| (l - p[1], l - p[0]))
            .collect();
        new_pairs.reverse();
        self.start_stops = new_pairs.into_iter().flat_map(|(s, e)| [s, e]).collect();
    }
}
