use std::fmt;
use std::io;

use noisechan_bits::BitError;
use noisechan_harness::HarnessError;
use noisechan_node::NodeError;
use noisechan_pipeline::{ConfigError, PipelineError};

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const ENDPOINT_ERROR: i32 = 3;
pub const PERMISSION_DENIED: i32 = 50;
pub const DATA_INVALID: i32 = 60;
pub const USAGE: i32 = 64;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn io_error(context: &str, err: io::Error) -> CliError {
    let code = match err.kind() {
        io::ErrorKind::PermissionDenied => PERMISSION_DENIED,
        io::ErrorKind::NotFound => ENDPOINT_ERROR,
        io::ErrorKind::BrokenPipe => FAILURE,
        _ => INTERNAL,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn config_error(context: &str, err: ConfigError) -> CliError {
    CliError::new(USAGE, format!("{context}: {err}"))
}

pub fn bit_error(context: &str, err: BitError) -> CliError {
    match err {
        BitError::Io(source) => io_error(context, source),
        BitError::Malformed { .. } | BitError::Invalid { .. } => {
            CliError::new(DATA_INVALID, format!("{context}: {err}"))
        }
        BitError::WrongDirection { .. } => CliError::new(INTERNAL, format!("{context}: {err}")),
        other => CliError::new(FAILURE, format!("{context}: {other}")),
    }
}

pub fn harness_error(context: &str, err: HarnessError) -> CliError {
    match err {
        HarnessError::Config(err) | HarnessError::Pipeline(PipelineError::Config(err)) => {
            config_error(context, err)
        }
        HarnessError::Pipeline(PipelineError::Bit(err)) => bit_error(context, err),
        HarnessError::Launch { .. } => CliError::new(ENDPOINT_ERROR, format!("{context}: {err}")),
        HarnessError::SenderFailed { .. } => CliError::new(FAILURE, format!("{context}: {err}")),
        HarnessError::Io(source) => io_error(context, source),
        other => CliError::new(INTERNAL, format!("{context}: {other}")),
    }
}

pub fn node_error(context: &str, err: NodeError) -> CliError {
    match err {
        NodeError::Bit(err) => bit_error(context, err),
        NodeError::Io(source) => io_error(context, source),
        NodeError::CorpusRead { .. } => CliError::new(ENDPOINT_ERROR, format!("{context}: {err}")),
        NodeError::WordRange { .. } => CliError::new(USAGE, format!("{context}: {err}")),
        other => CliError::new(DATA_INVALID, format!("{context}: {other}")),
    }
}
