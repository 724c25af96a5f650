//! Run-length encoding of homopolymer stretches.
//!
//! Long-read technologies with homopolymer-length errors benefit from
//! collapsing runs of the same base to a single symbol before scanning,
//! then translating any coordinates discovered in encoded space back to
//! the original read before QC and publication.

/// Keeps the run lengths needed to invert an [`encode`] call and to
/// translate encoded-space coordinates into decoded-space coordinates.
#[derive(Debug, Clone)]
pub struct Encoding {
    /// `prefix[i]` is the decoded-space offset of encoded position `i`.
    /// Has `encoded_len + 1` entries so both interval ends can be mapped.
    prefix: Vec<usize>,
}

impl Encoding {
    /// Translate an encoded-space coordinate to its decoded-space
    /// equivalent. `pos` may equal the encoded length (exclusive interval
    /// ends are common in this pipeline).
    pub fn to_decoded(&self, pos: usize) -> usize {
        self.prefix[pos]
    }

    pub fn encoded_len(&self) -> usize {
        self.prefix.len() - 1
    }
}

/// Collapse runs of identical bases to one base each, returning the
/// encoded sequence and the bookkeeping needed to invert it.
pub fn encode(seq: &[u8]) -> (Vec<u8>, Encoding) {
    let mut encoded = Vec::new();
    let mut prefix = vec![0usize];
    let mut i = 0;
    while i < seq.len() {
        let base = seq[i];
        let mut run = 1;
        while i + run < seq.len() && seq[i + run] == base {
            run += 1;
        }
        encoded.push(base);
        prefix.push(prefix.last().unwrap() + run);
        i += run;
    }
    (encoded, Encoding { prefix })
}

/// Invert [`encode`]: expand each encoded base back into its original run.
pub fn decode(encoded: &[u8], encoding: &Encoding) -> Vec<u8> {
    let mut out = Vec::with_capacity(encoding.to_decoded(encoded.len()));
    for (i, &b) in encoded.iter().enumerate() {
        let run_len = encoding.prefix[i + 1] - encoding.prefix[i];
        out.extend(std::iter::repeat(b).take(run_len));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let seq = b"AAAACGTTTTGGGGGACGT".to_vec();
        let (encoded, enc) = encode(&seq);
        assert_eq!(decode(&encoded, &enc), seq);
    }

    #[test]
    fn no_runs_is_identity() {
        let seq = b"ACGTACGT".to_vec();
        let (encoded, enc) = encode(&seq);
        assert_eq!(encoded, seq);
        assert_eq!(decode(&encoded, &enc), seq);
    }

    #[test]
    fn coordinate_translation() {
        // positions: A(4) C(1) G(1) T(4) G(5) ...
        let seq = b"AAAACGTTTTGGGGG".to_vec();
        let (_encoded, enc) = encode(&seq);
        // encoded indices: 0=A,1=C,2=G,3=T,4=G
        assert_eq!(enc.to_decoded(0), 0);
        assert_eq!(enc.to_decoded(1), 4);
        assert_eq!(enc.to_decoded(4), 10);
        assert_eq!(enc.to_decoded(5), 15);
    }
}
