//! Simulated noisy binary channel for protocol testing.
//!
//! noisechan runs a sender and a receiver as separate processes and sits
//! between them: padding, noise and trailing zeros are injected into the bit
//! stream deterministically from a seed, so a protocol can be exercised
//! against an unreliable channel without real hardware.
//!
//! # Crate Structure
//!
//! - [`bits`] — ASCII bit stream adapters and endpoint channels
//! - [`pipeline`] — Seeded pad, noise and trail stages
//! - [`harness`] — Process launch, diagnostic relays, run orchestration (behind `harness` feature)
//! - [`node`] — Endpoint runtime and sentence protocols (behind `node` feature)

/// Re-export bit stream types.
pub mod bits {
    pub use noisechan_bits::*;
}

/// Re-export pipeline types.
pub mod pipeline {
    pub use noisechan_pipeline::*;
}

/// Re-export harness types (requires `harness` feature).
#[cfg(feature = "harness")]
pub mod harness {
    pub use noisechan_harness::*;
}

/// Re-export endpoint runtime types (requires `node` feature).
#[cfg(feature = "node")]
pub mod node {
    pub use noisechan_node::*;
}
