//! Process harness for the simulated channel.
//!
//! Launches a sender and a receiver from one command template, pipes the
//! sender's output through the seeded pipeline into the receiver, relays
//! both endpoints' stderr, and reports how many genuine bits were sent along
//! with whatever the receiver printed.

pub mod endpoint;
pub mod error;
pub mod harness;
pub mod relay;

pub use endpoint::{Endpoint, EndpointCommand, EndpointPair, ESCAPE_PREFIX, VERBOSE_FLAG};
pub use error::{HarnessError, Result};
pub use harness::{Harness, HarnessConfig, RunReport};
pub use relay::{prefix_for, spawn_capture, spawn_relay, CaptureHandle, DiagnosticSink, RelayHandle};
