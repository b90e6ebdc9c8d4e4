use std::fmt;

use serde::Serialize;

use crate::error::ConfigError;

/// Default zero-pad interval, in bits.
pub const DEFAULT_PAD_RANGE: (i64, i64) = (100, 1000);

/// Closed interval `[low, high]` the pad length is drawn from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct PadRange {
    low: u64,
    high: u64,
}

impl PadRange {
    /// Validate `0 <= low <= high`.
    pub fn new(low: i64, high: i64) -> Result<Self, ConfigError> {
        if low < 0 || low > high {
            return Err(ConfigError::InvalidPadRange { low, high });
        }
        Ok(Self {
            low: low as u64,
            high: high as u64,
        })
    }

    /// A fixed pad length.
    pub fn exactly(len: u64) -> Self {
        Self {
            low: len,
            high: len,
        }
    }

    pub fn low(&self) -> u64 {
        self.low
    }

    pub fn high(&self) -> u64 {
        self.high
    }

    pub fn contains(&self, len: u64) -> bool {
        (self.low..=self.high).contains(&len)
    }
}

impl Default for PadRange {
    fn default() -> Self {
        Self {
            low: DEFAULT_PAD_RANGE.0 as u64,
            high: DEFAULT_PAD_RANGE.1 as u64,
        }
    }
}

impl fmt::Display for PadRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.low, self.high)
    }
}

/// When the transfer may stop once the payload is exhausted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TrailMode {
    /// Stop after this many trail bits have been forwarded.
    AtLeast(u64),
    /// Keep forwarding trail bits until the receiver closes its input.
    UntilClosed,
}

impl TrailMode {
    /// Whether the transfer has forwarded enough trail bits to stop.
    pub fn is_satisfied(self, trail_bits: u64) -> bool {
        match self {
            TrailMode::AtLeast(min) => trail_bits >= min,
            TrailMode::UntilClosed => false,
        }
    }
}

impl Default for TrailMode {
    fn default() -> Self {
        TrailMode::AtLeast(1)
    }
}

/// Parameters fixed for a single run of the channel.
#[derive(Clone, Debug, PartialEq)]
pub struct ChannelConfig {
    pub pad: PadRange,
    pub flip_prob: f64,
    pub seed: u64,
    pub trail: TrailMode,
}

impl ChannelConfig {
    /// A noiseless channel with the default pad interval.
    pub fn new(seed: u64) -> Self {
        Self {
            pad: PadRange::default(),
            flip_prob: 0.0,
            seed,
            trail: TrailMode::default(),
        }
    }

    pub fn with_pad(mut self, pad: PadRange) -> Self {
        self.pad = pad;
        self
    }

    pub fn with_flip_prob(mut self, flip_prob: f64) -> Self {
        self.flip_prob = flip_prob;
        self
    }

    pub fn with_trail(mut self, trail: TrailMode) -> Self {
        self.trail = trail;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.flip_prob) {
            return Err(ConfigError::InvalidFlipProbability(self.flip_prob));
        }
        if self.trail == TrailMode::AtLeast(0) {
            return Err(ConfigError::ZeroTrail);
        }
        if self.pad.low > self.pad.high {
            return Err(ConfigError::InvalidPadRange {
                low: self.pad.low as i64,
                high: self.pad.high as i64,
            });
        }
        Ok(())
    }
}
