/// Errors that can occur while reading or writing ASCII bit streams.
#[derive(Debug, thiserror::Error)]
pub enum BitError {
    /// A non-whitespace byte that is not a decimal digit.
    #[error("cannot read bit {:?}", as_char(.byte))]
    Malformed { byte: u8 },

    /// A decimal digit other than 0 or 1.
    #[error("invalid bit {value}")]
    Invalid { value: u8 },

    /// The consumer closed its end of the stream (broken pipe).
    #[error("peer closed the stream")]
    PeerClosed,

    /// A bit was requested after the stream ended.
    #[error("cannot read bit because the stream has ended")]
    StreamEnded,

    /// The channel was used against its role's direction.
    #[error("{role} channel cannot {operation}")]
    WrongDirection {
        role: crate::role::Role,
        operation: &'static str,
    },

    /// An I/O error occurred on the underlying stream.
    #[error("bit stream I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BitError>;

fn as_char(byte: &u8) -> char {
    char::from(*byte)
}
