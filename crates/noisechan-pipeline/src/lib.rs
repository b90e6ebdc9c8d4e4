//! Seeded stream transformation for a simulated binary channel.
//!
//! Bits pulled from the sender pass through a fixed chain of lazy stages:
//!
//! 1. **pad** — a run of zero bits whose length is drawn once per run
//! 2. **payload** — the sender's genuine bits, counted
//! 3. **trail** — unbounded zero bits once the payload is exhausted
//! 4. **noise** — every bit from 1–3 is flipped with a fixed probability
//!
//! All randomness comes from one ChaCha8 generator seeded from
//! [`ChannelConfig::seed`], drawn in a fixed order (pad length first, then one
//! draw per bit), so a seed reproduces the exact noisy stream.

pub mod config;
pub mod error;
pub mod stream;
pub mod transfer;

pub use config::{ChannelConfig, PadRange, TrailMode, DEFAULT_PAD_RANGE};
pub use error::{ConfigError, PipelineError, Result};
pub use stream::{ChannelBit, ChannelStream, SeededChannel, Stage, StreamStats};
pub use transfer::{transfer, Termination, TransferSummary};
