//! Record source: FASTA/FASTQ, optionally gzip-compressed, consumed as an
//! ordered stream. Leans on `bio::io::{fasta, fastq}` for the parsing
//! itself and `flate2` for transparent decompression.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use bio::io::{fasta, fastq};
use flate2::read::MultiGzDecoder;

use crate::error::CoreError;

/// One sequencing read, in whichever orientation it arrived.
#[derive(Debug, Clone)]
pub struct Record {
    pub id: String,
    pub comment: Option<String>,
    pub seq: Vec<u8>,
    pub quality: Option<Vec<u8>>,
}

/// Produces records from an input stream, one at a time.
pub trait RecordSource {
    fn next_record(&mut self) -> Result<Option<Record>, CoreError>;
}

enum Inner {
    Fasta(fasta::Reader<Box<dyn BufRead>>),
    Fastq(fastq::Reader<Box<dyn BufRead>>),
}

/// A `RecordSource` over a FASTA or FASTQ file, plain or gzip-compressed.
/// A path of `-` reads from standard input.
pub struct FastxReader {
    inner: Inner,
}

impl FastxReader {
    pub fn open(path: &str) -> Result<Self, CoreError> {
        let raw: Box<dyn Read> = if path == "-" {
            Box::new(io::stdin())
        } else {
            let file = File::open(Path::new(path))
                .map_err(|e| CoreError::Io(io::Error::new(e.kind(), format!("{path}: {e}"))))?;
            Box::new(file)
        };

        let mut buffered: Box<dyn BufRead> = if path.ends_with(".gz") {
            Box::new(BufReader::new(MultiGzDecoder::new(raw)))
        } else {
            Box::new(BufReader::new(raw))
        };

        let first_byte = buffered.fill_buf()?.first().copied();
        let inner = match first_byte {
            Some(b'@') => Inner::Fastq(fastq::Reader::from_bufread(buffered)),
            Some(b'>') => Inner::Fasta(fasta::Reader::from_bufread(buffered)),
            Some(other) => {
                return Err(CoreError::Record(format!(
                    "unrecognized record format, first byte {:?}",
                    other as char
                )))
            }
            None => {
                // empty input: treat as FASTA with zero records
                Inner::Fasta(fasta::Reader::from_bufread(buffered))
            }
        };
        Ok(FastxReader { inner })
    }
}

impl RecordSource for FastxReader {
    fn next_record(&mut self) -> Result<Option<Record>, CoreError> {
        match &mut self.inner {
            Inner::Fasta(r) => {
                let mut rec = fasta::Record::new();
                r.read(&mut rec)
                    .map_err(|e| CoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
                if rec.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Record {
                    id: rec.id().to_string(),
                    comment: rec.desc().map(|s| s.to_string()),
                    seq: rec.seq().to_vec(),
                    quality: None,
                }))
            }
            Inner::Fastq(r) => {
                let mut rec = fastq::Record::new();
                r.read(&mut rec)
                    .map_err(|e| CoreError::Io(io::Error::new(io::ErrorKind::InvalidData, e)))?;
                if rec.is_empty() {
                    return Ok(None);
                }
                Ok(Some(Record {
                    id: rec.id().to_string(),
                    comment: rec.desc().map(|s| s.to_string()),
                    seq: rec.seq().to_vec(),
                    quality: Some(rec.qual().to_vec()),
                }))
            }
        }
    }
}

/// An in-memory record source, used by tests and by anything that already
/// has records in hand (e.g. the singleton recruiter re-scanning a buffered
/// pass).
pub struct VecRecordSource {
    records: std::vec::IntoIter<Record>,
}

impl VecRecordSource {
    pub fn new(records: Vec<Record>) -> Self {
        VecRecordSource {
            records: records.into_iter(),
        }
    }
}

impl RecordSource for VecRecordSource {
    fn next_record(&mut self) -> Result<Option<Record>, CoreError> {
        Ok(self.records.next())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn vec_source_yields_in_order() {
        let recs = vec![
            Record {
                id: "r1".into(),
                comment: None,
                seq: b"ACGT".to_vec(),
                quality: None,
            },
            Record {
                id: "r2".into(),
                comment: None,
                seq: b"TTTT".to_vec(),
                quality: None,
            },
        ];
        let mut src = VecRecordSource::new(recs);
        assert_eq!(src.next_record().unwrap().unwrap().id, "r1");
        assert_eq!(src.next_record().unwrap().unwrap().id, "r2");
        assert!(src.next_record().unwrap().is_none());
    }
}
