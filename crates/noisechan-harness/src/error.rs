use std::process::ExitStatus;

use noisechan_bits::Role;
use noisechan_pipeline::{ConfigError, PipelineError};

/// Errors that can abort a harness run.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    /// Invalid configuration, reported before any endpoint starts.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// An endpoint process could not be started.
    #[error("failed to launch {role}: {source}")]
    Launch {
        role: Role,
        source: std::io::Error,
    },

    /// A stream the harness asked for was not piped.
    #[error("{role} {stream} is not piped")]
    MissingPipe { role: Role, stream: &'static str },

    /// The transfer failed (for example, the sender wrote a non-bit).
    #[error("transfer failed: {0}")]
    Pipeline(#[from] PipelineError),

    /// A relay or capture thread panicked.
    #[error("{role} {stream} thread panicked")]
    ThreadPanicked { role: Role, stream: &'static str },

    /// The sender exited unsuccessfully.
    #[error("sender exited unsuccessfully ({status}) after writing {genuine_bits} bits")]
    SenderFailed {
        status: ExitStatus,
        genuine_bits: u64,
    },

    /// An I/O error occurred while managing endpoint processes.
    #[error("endpoint I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, HarnessError>;
