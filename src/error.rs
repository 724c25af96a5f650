use thiserror::Error;

/// Errors surfaced by the core detection pipeline.
///
/// Only [`CoreError::Io`] is fatal to a pass; the rest are logged and the
/// offending record is skipped.
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("input stream error: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed record: {0}")]
    Record(String),

    #[error("invalid configuration: {0}")]
    Config(String),
}
