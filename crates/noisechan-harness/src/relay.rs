use std::io::{self, BufRead, BufReader, Read, Write};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};

use noisechan_bits::Role;

use crate::error::{HarnessError, Result};

/// Line prefix for relayed sender diagnostics.
pub const SENDER_PREFIX: &str = "  [Sender stderr] ";
/// Line prefix for relayed receiver diagnostics.
pub const RECEIVER_PREFIX: &str = "[Receiver stderr] ";

pub fn prefix_for(role: Role) -> &'static str {
    match role {
        Role::Sender => SENDER_PREFIX,
        Role::Receiver => RECEIVER_PREFIX,
    }
}

/// Shared destination for relayed diagnostic lines.
///
/// Each line is assembled first and handed to the writer in a single
/// `write_all` under one lock. Lines from different relays never interleave
/// mid-line, and neither do other writers that lock the same stream per call
/// (`io::Stderr` does).
#[derive(Clone)]
pub struct DiagnosticSink {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl DiagnosticSink {
    pub fn new<W: Write + Send + 'static>(writer: W) -> Self {
        Self {
            inner: Arc::new(Mutex::new(Box::new(writer))),
        }
    }

    pub fn stderr() -> Self {
        Self::new(io::stderr())
    }

    /// Write `prefix` + `line`, adding a newline if `line` lacks one.
    pub fn write_line(&self, prefix: &str, line: &[u8]) -> io::Result<()> {
        let mut buf = Vec::with_capacity(prefix.len() + line.len() + 1);
        buf.extend_from_slice(prefix.as_bytes());
        buf.extend_from_slice(line);
        if !line.ends_with(b"\n") {
            buf.push(b'\n');
        }

        let mut out = self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        out.write_all(&buf)?;
        out.flush()
    }
}

impl std::fmt::Debug for DiagnosticSink {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiagnosticSink").finish_non_exhaustive()
    }
}

/// A running stderr relay.
#[derive(Debug)]
pub struct RelayHandle {
    role: Role,
    handle: JoinHandle<io::Result<u64>>,
}

impl RelayHandle {
    /// Wait for the relay to reach end of stream. Returns the number of lines
    /// relayed.
    pub fn join(self) -> Result<u64> {
        let lines = self
            .handle
            .join()
            .map_err(|_| HarnessError::ThreadPanicked {
                role: self.role,
                stream: "stderr",
            })??;
        tracing::debug!(role = %self.role, lines, "diagnostic relay finished");
        Ok(lines)
    }
}

/// Relay `stream` line by line into `sink` on a dedicated thread.
///
/// The thread ends by itself when the stream is closed.
pub fn spawn_relay<R>(role: Role, stream: R, sink: DiagnosticSink) -> Result<RelayHandle>
where
    R: Read + Send + 'static,
{
    let handle = thread::Builder::new()
        .name(format!("{role}-stderr"))
        .spawn(move || relay_lines(stream, prefix_for(role), &sink))?;
    Ok(RelayHandle { role, handle })
}

fn relay_lines<R: Read>(stream: R, prefix: &str, sink: &DiagnosticSink) -> io::Result<u64> {
    let mut reader = BufReader::new(stream);
    let mut line = Vec::new();
    let mut count = 0u64;
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(count);
        }
        sink.write_line(prefix, &line)?;
        count += 1;
    }
}

/// Collects an endpoint's stdout on a dedicated thread.
#[derive(Debug)]
pub struct CaptureHandle {
    role: Role,
    handle: JoinHandle<io::Result<Vec<u8>>>,
}

impl CaptureHandle {
    pub fn join(self) -> Result<Vec<u8>> {
        let captured = self
            .handle
            .join()
            .map_err(|_| HarnessError::ThreadPanicked {
                role: self.role,
                stream: "stdout",
            })??;
        Ok(captured)
    }
}

/// Read `stream` to the end on a dedicated thread, so the endpoint never
/// stalls on a full pipe while the transfer is running.
pub fn spawn_capture<R>(role: Role, mut stream: R) -> Result<CaptureHandle>
where
    R: Read + Send + 'static,
{
    let handle = thread::Builder::new()
        .name(format!("{role}-stdout"))
        .spawn(move || {
            let mut captured = Vec::new();
            stream.read_to_end(&mut captured)?;
            Ok(captured)
        })?;
    Ok(CaptureHandle { role, handle })
}
