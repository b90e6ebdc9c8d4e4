use std::fmt;
use std::ops::BitXor;

use crate::error::{BitError, Result};

/// A single transmitted bit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bit {
    Zero,
    One,
}

impl Bit {
    /// Parse one byte of the wire format.
    ///
    /// Returns `Ok(None)` for ASCII whitespace, which carries no bit.
    pub fn from_ascii(byte: u8) -> Result<Option<Self>> {
        if byte.is_ascii_whitespace() {
            return Ok(None);
        }
        if !byte.is_ascii_digit() {
            return Err(BitError::Malformed { byte });
        }
        Self::try_from(byte - b'0').map(Some)
    }

    /// The ASCII digit for this bit.
    pub fn as_ascii(self) -> u8 {
        match self {
            Bit::Zero => b'0',
            Bit::One => b'1',
        }
    }

    pub fn flipped(self) -> Self {
        self ^ Bit::One
    }

    pub fn is_one(self) -> bool {
        self == Bit::One
    }
}

impl TryFrom<u8> for Bit {
    type Error = BitError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Bit::Zero),
            1 => Ok(Bit::One),
            value => Err(BitError::Invalid { value }),
        }
    }
}

impl From<bool> for Bit {
    fn from(value: bool) -> Self {
        if value {
            Bit::One
        } else {
            Bit::Zero
        }
    }
}

impl From<Bit> for u8 {
    fn from(bit: Bit) -> Self {
        match bit {
            Bit::Zero => 0,
            Bit::One => 1,
        }
    }
}

impl BitXor for Bit {
    type Output = Bit;

    fn bitxor(self, rhs: Bit) -> Bit {
        Bit::from(self != rhs)
    }
}

impl fmt::Display for Bit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", char::from(self.as_ascii()))
    }
}
