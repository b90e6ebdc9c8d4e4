use std::io::Write;

use noisechan_bits::{Bit, BitError, BitWriter};
use serde::Serialize;

use crate::config::TrailMode;
use crate::error::Result;
use crate::stream::{ChannelStream, StreamStats};

/// How the transfer loop ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// The payload was exhausted and the required trail bits were forwarded.
    Completed,
    /// The receiver closed its input before the transfer finished.
    PeerClosed,
}

/// Outcome of driving a [`ChannelStream`] into a receiver.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TransferSummary {
    pub pad_len: u64,
    pub stats: StreamStats,
    /// Bits actually written to the receiver.
    pub forwarded: u64,
    pub termination: Termination,
}

impl TransferSummary {
    /// Bits that came from the sender, excluding pad and trail.
    pub fn genuine_bits(&self) -> u64 {
        self.stats.genuine_bits
    }
}

/// Forward the channel stream into `sink` until it is finished.
///
/// The loop ends when the payload is exhausted and `trail` is satisfied, or
/// when the receiver closes its input. In the second case the stream keeps
/// being pulled, without writing, until the payload is exhausted and the
/// trail stage has produced a bit, so the genuine bit count always covers the
/// sender's whole output.
///
/// Bit errors from the payload source abort immediately.
pub fn transfer<I, W>(
    stream: &mut ChannelStream<I>,
    sink: &mut BitWriter<W>,
    trail: TrailMode,
) -> Result<TransferSummary>
where
    I: Iterator<Item = std::result::Result<Bit, BitError>>,
    W: Write,
{
    let termination = loop {
        let next = stream.next_bit()?;

        match sink.write_bit(next.bit) {
            Ok(()) => {}
            Err(BitError::PeerClosed) => {
                tracing::info!(
                    forwarded = sink.bits_written(),
                    "receiver closed its input, the stream presumably ended"
                );
                break Termination::PeerClosed;
            }
            Err(err) => return Err(err.into()),
        }

        if trail.is_satisfied(stream.stats().trail_bits) {
            break Termination::Completed;
        }
    };

    while !stream.trail_engaged() {
        stream.next_bit()?;
    }

    let summary = TransferSummary {
        pad_len: stream.pad_len(),
        stats: *stream.stats(),
        forwarded: sink.bits_written(),
        termination,
    };
    tracing::debug!(
        genuine_bits = summary.stats.genuine_bits,
        trail_bits = summary.stats.trail_bits,
        flipped_bits = summary.stats.flipped_bits,
        forwarded = summary.forwarded,
        "transfer finished"
    );
    Ok(summary)
}
