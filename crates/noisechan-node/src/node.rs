use std::io::{self, BufRead, Read, Write};

use noisechan_bits::{Bit, ReceiverChannel, Role, SenderChannel};

use crate::corpus::Corpus;
use crate::error::{NodeError, Result};
use crate::protocol::Protocol;

/// Read the sentence from the first line of `input` and send it.
///
/// Returns the bits written to `output`.
pub fn run_sender<R, W>(
    protocol: Protocol,
    corpus: &Corpus,
    mut input: R,
    output: W,
    verbose: bool,
) -> Result<Vec<Bit>>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(NodeError::MissingInput);
    }
    let sentence = line.trim();
    tracing::info!(data = ?sentence, "the data to be sent");

    let mut channel = SenderChannel::new(output, verbose);
    protocol.send(&mut channel, corpus, sentence)?;
    Ok(channel.finish()?)
}

/// Decode one sentence from `input` and print it to `output`.
pub fn run_receiver<R, W>(
    protocol: Protocol,
    corpus: &Corpus,
    input: R,
    mut output: W,
    verbose: bool,
) -> Result<String>
where
    R: Read,
    W: Write,
{
    let mut channel = ReceiverChannel::new(input, verbose);
    let sentence = protocol.receive(&mut channel, corpus)?;
    channel.finish();

    writeln!(output, "The string returned by the receiver is {sentence:?}")?;
    output.flush()?;
    Ok(sentence)
}

/// Run as `role` over the process's own stdin and stdout.
pub fn run_node(role: Role, protocol: Protocol, corpus: &Corpus, verbose: bool) -> Result<()> {
    match role {
        Role::Sender => {
            run_sender(protocol, corpus, io::stdin().lock(), io::stdout(), verbose)?;
        }
        Role::Receiver => {
            run_receiver(protocol, corpus, io::stdin().lock(), io::stdout(), verbose)?;
        }
    }
    Ok(())
}
