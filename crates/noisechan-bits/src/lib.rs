//! ASCII bit stream adapters for noisechan.
//!
//! This is the lowest layer. The wire format is a byte stream where every
//! non-whitespace byte is the ASCII digit `0` or `1`:
//! - [`BitReader`] turns any `Read` into a sequence of [`Bit`] values
//! - [`BitWriter`] writes bits as ASCII digits, flushing after each one
//! - [`Channel`] is the endpoint-side view used by sender and receiver programs
//!
//! A downstream reader closing its end of the pipe surfaces as
//! [`BitError::PeerClosed`], never as a panic.

pub mod bit;
pub mod channel;
pub mod error;
pub mod reader;
pub mod role;
pub mod writer;

pub use bit::Bit;
pub use channel::{Channel, ReceiverChannel, SenderChannel};
pub use error::{BitError, Result};
pub use reader::BitReader;
pub use role::{Role, UnknownRole};
pub use writer::BitWriter;
