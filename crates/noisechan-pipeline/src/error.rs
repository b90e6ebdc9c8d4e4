use noisechan_bits::{BitError, UnknownRole};

/// Invalid operator input, detected before any endpoint is started.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    /// The zero-pad interval is negative or reversed.
    #[error("invalid zero pad interval ({low}, {high}): expected 0 <= low <= high")]
    InvalidPadRange { low: i64, high: i64 },

    /// The flip probability is not a real number in [0, 1].
    #[error("flip probability must be within [0, 1], got {0}")]
    InvalidFlipProbability(f64),

    /// A trail of zero bits would never engage the trail stage.
    #[error("trail length must be at least 1")]
    ZeroTrail,

    /// No command was given for the endpoints.
    #[error("endpoint command must not be empty")]
    EmptyCommand,

    /// An endpoint role other than sender or receiver.
    #[error(transparent)]
    UnknownRole(#[from] UnknownRole),
}

/// Errors that can abort a transfer.
#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The sender emitted something other than a bit, or a stream failed.
    #[error("bit stream error: {0}")]
    Bit(#[from] BitError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
