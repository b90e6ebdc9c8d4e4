use noisechan_bits::{Bit, BitError};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::config::ChannelConfig;

/// Which stage produced a bit, before noise is applied.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Pad,
    Payload,
    Trail,
}

/// A bit as it leaves the channel.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelBit {
    /// The bit after noise.
    pub bit: Bit,
    pub stage: Stage,
    pub flipped: bool,
}

/// Counters for everything the stream has produced so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct StreamStats {
    pub pad_bits: u64,
    /// Bits pulled from the payload source.
    pub genuine_bits: u64,
    pub trail_bits: u64,
    pub flipped_bits: u64,
}

impl StreamStats {
    pub fn total_bits(&self) -> u64 {
        self.pad_bits + self.genuine_bits + self.trail_bits
    }
}

/// A seeded generator with the pad length already drawn.
///
/// The pad length is the first value drawn from the generator, before any
/// bit is produced. Attach a payload source with [`SeededChannel::into_stream`].
pub struct SeededChannel {
    rng: ChaCha8Rng,
    flip_prob: f64,
    pad_len: u64,
}

impl SeededChannel {
    pub fn new(config: &ChannelConfig) -> Self {
        let mut rng = ChaCha8Rng::seed_from_u64(config.seed);
        let pad_len = rng.gen_range(config.pad.low()..=config.pad.high());
        Self {
            rng,
            flip_prob: config.flip_prob,
            pad_len,
        }
    }

    pub fn pad_len(&self) -> u64 {
        self.pad_len
    }

    pub fn into_stream<I>(self, source: I) -> ChannelStream<I>
    where
        I: Iterator<Item = Result<Bit, BitError>>,
    {
        ChannelStream {
            rng: self.rng,
            flip_prob: self.flip_prob,
            pad_len: self.pad_len,
            source,
            stage: if self.pad_len > 0 {
                Stage::Pad
            } else {
                Stage::Payload
            },
            stats: StreamStats::default(),
        }
    }
}

/// The pad → payload → trail chain with noise applied to every bit.
///
/// This is an unbounded stream: once the payload source is exhausted it
/// produces trail bits forever. Bits are produced one at a time on demand and
/// nothing is buffered ahead of the caller.
pub struct ChannelStream<I> {
    rng: ChaCha8Rng,
    flip_prob: f64,
    pad_len: u64,
    source: I,
    stage: Stage,
    stats: StreamStats,
}

impl<I> ChannelStream<I>
where
    I: Iterator<Item = Result<Bit, BitError>>,
{
    pub fn new(config: &ChannelConfig, source: I) -> Self {
        SeededChannel::new(config).into_stream(source)
    }

    pub fn pad_len(&self) -> u64 {
        self.pad_len
    }

    /// The stage the next bit will come from, as far as is known.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn stats(&self) -> &StreamStats {
        &self.stats
    }

    /// Whether the payload has been exhausted and the trail stage engaged.
    pub fn trail_engaged(&self) -> bool {
        self.stats.trail_bits > 0
    }

    /// Produce the next bit.
    ///
    /// Blocks while the payload source blocks. A source error is returned as
    /// is and consumes no noise draw.
    pub fn next_bit(&mut self) -> Result<ChannelBit, BitError> {
        let (bit, stage) = self.next_clean_bit()?;
        let flipped = self.rng.gen::<f64>() < self.flip_prob;
        if flipped {
            self.stats.flipped_bits += 1;
        }

        Ok(ChannelBit {
            bit: if flipped { bit.flipped() } else { bit },
            stage,
            flipped,
        })
    }

    fn next_clean_bit(&mut self) -> Result<(Bit, Stage), BitError> {
        if self.stage == Stage::Pad {
            self.stats.pad_bits += 1;
            if self.stats.pad_bits == self.pad_len {
                self.stage = Stage::Payload;
            }
            return Ok((Bit::Zero, Stage::Pad));
        }

        if self.stage == Stage::Payload {
            match self.source.next() {
                Some(bit) => {
                    let bit = bit?;
                    self.stats.genuine_bits += 1;
                    return Ok((bit, Stage::Payload));
                }
                None => {
                    tracing::debug!(
                        genuine_bits = self.stats.genuine_bits,
                        "payload exhausted"
                    );
                    self.stage = Stage::Trail;
                }
            }
        }

        self.stats.trail_bits += 1;
        Ok((Bit::Zero, Stage::Trail))
    }
}

impl<I> Iterator for ChannelStream<I>
where
    I: Iterator<Item = Result<Bit, BitError>>,
{
    type Item = Result<ChannelBit, BitError>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_bit())
    }
}
