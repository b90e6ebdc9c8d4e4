use std::io::{ErrorKind, Read};

use bytes::{Buf, BytesMut};

use crate::bit::Bit;
use crate::error::{BitError, Result};

const READ_CHUNK_SIZE: usize = 4 * 1024;

/// Reads [`Bit`] values from any `Read` stream of ASCII digits.
///
/// Whitespace between digits is skipped. Reads return as soon as the
/// underlying stream has any bytes available, so a pipe written one bit at a
/// time is consumed one bit at a time.
pub struct BitReader<T> {
    inner: T,
    buf: BytesMut,
    eof: bool,
}

impl<T: Read> BitReader<T> {
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(READ_CHUNK_SIZE),
            eof: false,
        }
    }

    /// Read the next bit (blocking).
    ///
    /// Returns `Ok(None)` once the stream is exhausted. A byte that is not a
    /// bit is an error; the reader does not try to resynchronize past it.
    pub fn read_bit(&mut self) -> Result<Option<Bit>> {
        loop {
            while self.buf.has_remaining() {
                if let Some(bit) = Bit::from_ascii(self.buf.get_u8())? {
                    return Ok(Some(bit));
                }
            }

            if self.eof || !self.fill()? {
                return Ok(None);
            }
        }
    }

    /// Read the next bit, treating end of stream as an error.
    pub fn expect_bit(&mut self) -> Result<Bit> {
        self.read_bit()?.ok_or(BitError::StreamEnded)
    }

    fn fill(&mut self) -> Result<bool> {
        let mut chunk = [0u8; READ_CHUNK_SIZE];
        loop {
            match self.inner.read(&mut chunk) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(false);
                }
                Ok(n) => {
                    self.buf.extend_from_slice(&chunk[..n]);
                    return Ok(true);
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(BitError::Io(err)),
            }
        }
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> Iterator for BitReader<T> {
    type Item = Result<Bit>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_bit().transpose()
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    fn read_all(input: &[u8]) -> Result<Vec<Bit>> {
        BitReader::new(Cursor::new(input.to_vec())).collect()
    }

    #[test]
    fn reads_bits_and_skips_whitespace() {
        let bits = read_all(b"1 0\n1\t1\r\n0  ").unwrap();
        assert_eq!(bits, vec![Bit::One, Bit::Zero, Bit::One, Bit::One, Bit::Zero]);
    }

    #[test]
    fn empty_and_whitespace_only_streams_end_cleanly() {
        assert!(read_all(b"").unwrap().is_empty());
        assert!(read_all(b" \n\n ").unwrap().is_empty());
    }

    #[test]
    fn malformed_byte_stops_the_stream() {
        let mut reader = BitReader::new(Cursor::new(b"10x1".to_vec()));
        assert_eq!(reader.read_bit().unwrap(), Some(Bit::One));
        assert_eq!(reader.read_bit().unwrap(), Some(Bit::Zero));
        let err = reader.read_bit().unwrap_err();
        assert!(matches!(err, BitError::Malformed { byte: b'x' }));
    }

    #[test]
    fn out_of_range_digit_is_invalid() {
        let err = read_all(b"012").unwrap_err();
        assert!(matches!(err, BitError::Invalid { value: 2 }));
    }

    #[test]
    fn expect_bit_reports_stream_end() {
        let mut reader = BitReader::new(Cursor::new(b"1".to_vec()));
        assert_eq!(reader.expect_bit().unwrap(), Bit::One);
        assert!(matches!(reader.expect_bit(), Err(BitError::StreamEnded)));
        // Stays ended.
        assert!(matches!(reader.read_bit(), Ok(None)));
    }

    #[test]
    fn byte_by_byte_source() {
        let source = ByteByByteReader {
            bytes: b"0 1 1".to_vec(),
            pos: 0,
        };
        let bits: Vec<Bit> = BitReader::new(source).collect::<Result<_>>().unwrap();
        assert_eq!(bits, vec![Bit::Zero, Bit::One, Bit::One]);
    }

    #[test]
    fn interrupted_read_retries() {
        let source = InterruptedThenData {
            interrupted: false,
            inner: Cursor::new(b"10".to_vec()),
        };
        let bits: Vec<Bit> = BitReader::new(source).collect::<Result<_>>().unwrap();
        assert_eq!(bits, vec![Bit::One, Bit::Zero]);
    }

    #[test]
    fn io_errors_propagate() {
        let mut reader = BitReader::new(FailingReader);
        let err = reader.read_bit().unwrap_err();
        assert!(matches!(err, BitError::Io(e) if e.kind() == ErrorKind::ConnectionReset));
    }

    struct ByteByByteReader {
        bytes: Vec<u8>,
        pos: usize,
    }

    impl Read for ByteByByteReader {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if self.pos >= self.bytes.len() || buf.is_empty() {
                return Ok(0);
            }
            buf[0] = self.bytes[self.pos];
            self.pos += 1;
            Ok(1)
        }
    }

    struct InterruptedThenData {
        interrupted: bool,
        inner: Cursor<Vec<u8>>,
    }

    impl Read for InterruptedThenData {
        fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
            if !self.interrupted {
                self.interrupted = true;
                return Err(std::io::Error::from(ErrorKind::Interrupted));
            }
            self.inner.read(buf)
        }
    }

    struct FailingReader;

    impl Read for FailingReader {
        fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::from(ErrorKind::ConnectionReset))
        }
    }
}
