use std::path::PathBuf;

use noisechan_bits::BitError;

/// Errors raised by endpoint programs.
#[derive(Debug, thiserror::Error)]
pub enum NodeError {
    #[error("channel error: {0}")]
    Bit(#[from] BitError),

    #[error("failed reading corpus {path}: {source}")]
    CorpusRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("corpus is empty")]
    EmptyCorpus,

    /// More words than the protocol can address.
    #[error("corpus has {len} words, at most {max} are addressable")]
    CorpusTooLarge { len: usize, max: usize },

    #[error("word {0:?} is not in the corpus")]
    UnknownWord(String),

    #[error("corpus index {index} out of range (corpus has {len} words)")]
    IndexOutOfRange { index: u64, len: usize },

    #[error("sentence has {count} words, expected {min} to {max}")]
    WordCount {
        count: usize,
        min: usize,
        max: usize,
    },

    #[error("invalid word count interval ({low}, {high})")]
    WordRange { low: usize, high: usize },

    #[error("no sentence on input")]
    MissingInput,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, NodeError>;
