use std::io::{Read, Write};

use crate::bit::Bit;
use crate::error::{BitError, Result};
use crate::reader::BitReader;
use crate::role::Role;
use crate::writer::BitWriter;

/// The endpoint-side view of the channel.
///
/// Sender programs only call [`Channel::send`], receiver programs only call
/// [`Channel::get`]; the other direction fails with
/// [`BitError::WrongDirection`].
pub trait Channel {
    fn send(&mut self, bit: Bit) -> Result<()>;

    fn get(&mut self) -> Result<Bit>;

    /// Send the low `width` bits of `value`, most significant first.
    fn send_uint(&mut self, value: u64, width: u32) -> Result<()> {
        for shift in (0..width).rev() {
            self.send(Bit::from((value >> shift) & 1 == 1))?;
        }
        Ok(())
    }

    /// Read `width` bits, most significant first.
    fn get_uint(&mut self, width: u32) -> Result<u64> {
        let mut value = 0u64;
        for _ in 0..width {
            value = (value << 1) | u64::from(u8::from(self.get()?));
        }
        Ok(value)
    }
}

/// Writes bits to the endpoint's primary output.
pub struct SenderChannel<W> {
    writer: BitWriter<W>,
    sent: Vec<Bit>,
    verbose: bool,
}

impl<W: Write> SenderChannel<W> {
    pub fn new(inner: W, verbose: bool) -> Self {
        if verbose {
            tracing::info!(role = %Role::Sender, "starting");
        }
        Self {
            writer: BitWriter::new(inner),
            sent: Vec::new(),
            verbose,
        }
    }

    pub fn sent(&self) -> &[Bit] {
        &self.sent
    }

    /// Terminate the stream with a newline (ignored by readers) and return
    /// the bits sent.
    pub fn finish(mut self) -> Result<Vec<Bit>> {
        self.writer.write_separator(b"\n")?;
        if self.verbose {
            tracing::info!(
                role = %Role::Sender,
                count = self.sent.len(),
                bits = %render(&self.sent),
                "bits sent"
            );
        }
        Ok(self.sent)
    }
}

impl<W: Write> Channel for SenderChannel<W> {
    fn send(&mut self, bit: Bit) -> Result<()> {
        self.writer.write_bit(bit)?;
        self.sent.push(bit);
        Ok(())
    }

    fn get(&mut self) -> Result<Bit> {
        Err(BitError::WrongDirection {
            role: Role::Sender,
            operation: "get",
        })
    }
}

/// Reads bits from the endpoint's primary input.
pub struct ReceiverChannel<R> {
    reader: BitReader<R>,
    read: Vec<Bit>,
    verbose: bool,
}

impl<R: Read> ReceiverChannel<R> {
    pub fn new(inner: R, verbose: bool) -> Self {
        if verbose {
            tracing::info!(role = %Role::Receiver, "starting");
        }
        Self {
            reader: BitReader::new(inner),
            read: Vec::new(),
            verbose,
        }
    }

    pub fn received(&self) -> &[Bit] {
        &self.read
    }

    pub fn finish(self) -> Vec<Bit> {
        if self.verbose {
            tracing::info!(
                role = %Role::Receiver,
                count = self.read.len(),
                bits = %render(&self.read),
                "bits read"
            );
        }
        self.read
    }
}

impl<R: Read> Channel for ReceiverChannel<R> {
    fn send(&mut self, _bit: Bit) -> Result<()> {
        Err(BitError::WrongDirection {
            role: Role::Receiver,
            operation: "send",
        })
    }

    fn get(&mut self) -> Result<Bit> {
        let bit = self.reader.expect_bit()?;
        self.read.push(bit);
        Ok(bit)
    }
}

fn render(bits: &[Bit]) -> String {
    bits.iter().map(|bit| char::from(bit.as_ascii())).collect()
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;

    #[test]
    fn sender_writes_bits_and_trailing_newline() {
        let mut out = Vec::new();
        let mut channel = SenderChannel::new(&mut out, false);
        channel.send(Bit::One).unwrap();
        channel.send_uint(0b01, 2).unwrap();
        let sent = channel.finish().unwrap();

        assert_eq!(sent, vec![Bit::One, Bit::Zero, Bit::One]);
        assert_eq!(out, b"101\n");
    }

    #[test]
    fn receiver_reads_uints_msb_first() {
        let mut channel = ReceiverChannel::new(Cursor::new(b"0000000001100101".to_vec()), false);
        assert_eq!(channel.get_uint(16).unwrap(), 101);
        assert_eq!(channel.finish().len(), 16);
    }

    #[test]
    fn receiver_fails_at_end_of_stream() {
        let mut channel = ReceiverChannel::new(Cursor::new(b"1\n".to_vec()), false);
        assert_eq!(channel.get().unwrap(), Bit::One);
        assert!(matches!(channel.get(), Err(BitError::StreamEnded)));
        assert_eq!(channel.received(), &[Bit::One]);
    }

    #[test]
    fn channels_reject_the_wrong_direction() {
        let mut sender = SenderChannel::new(Vec::new(), false);
        assert!(matches!(
            sender.get(),
            Err(BitError::WrongDirection { role: Role::Sender, .. })
        ));

        let mut receiver = ReceiverChannel::new(Cursor::new(Vec::new()), false);
        let err = receiver.send(Bit::Zero).unwrap_err();
        assert_eq!(err.to_string(), "receiver channel cannot send");
    }

    #[test]
    fn uint_helpers_agree() {
        let mut out = Vec::new();
        let mut sender = SenderChannel::new(&mut out, false);
        sender.send_uint(0xBEEF, 16).unwrap();
        drop(sender);

        let mut receiver = ReceiverChannel::new(Cursor::new(out), false);
        assert_eq!(receiver.get_uint(16).unwrap(), 0xBEEF);
    }
}
