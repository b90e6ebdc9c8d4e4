use std::io::{ErrorKind, Write};

use crate::bit::Bit;
use crate::error::{BitError, Result};

/// Writes [`Bit`] values as ASCII digits to any `Write` stream.
///
/// Every bit is flushed as soon as it is written so a concurrent reader on the
/// other end of a pipe sees it immediately. No separators are written.
pub struct BitWriter<T> {
    inner: T,
    written: u64,
}

impl<T: Write> BitWriter<T> {
    pub fn new(inner: T) -> Self {
        Self { inner, written: 0 }
    }

    /// Write and flush a single bit (blocking).
    ///
    /// Returns `Err(BitError::PeerClosed)` when the reading side has gone away.
    pub fn write_bit(&mut self, bit: Bit) -> Result<()> {
        let byte = [bit.as_ascii()];
        loop {
            match self.inner.write(&byte) {
                Ok(0) => return Err(BitError::PeerClosed),
                Ok(_) => break,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(classify(err)),
            }
        }
        self.flush()?;
        self.written += 1;
        Ok(())
    }

    /// Write every bit from `bits` in order.
    pub fn write_bits<I: IntoIterator<Item = Bit>>(&mut self, bits: I) -> Result<()> {
        for bit in bits {
            self.write_bit(bit)?;
        }
        Ok(())
    }

    /// Write raw bytes that are not bits, such as a closing newline.
    pub fn write_separator(&mut self, bytes: &[u8]) -> Result<()> {
        self.inner.write_all(bytes).map_err(classify)?;
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(classify)
    }

    /// Number of bits successfully written so far.
    pub fn bits_written(&self) -> u64 {
        self.written
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the writer and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

fn classify(err: std::io::Error) -> BitError {
    if err.kind() == ErrorKind::BrokenPipe {
        BitError::PeerClosed
    } else {
        BitError::Io(err)
    }
}
