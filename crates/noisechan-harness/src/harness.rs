use noisechan_bits::{BitReader, BitWriter, Role};
use noisechan_pipeline::{transfer, ChannelConfig, SeededChannel, Termination, TransferSummary};
use serde::Serialize;

use crate::endpoint::{EndpointCommand, EndpointPair};
use crate::error::{HarnessError, Result};
use crate::relay::{spawn_capture, spawn_relay, CaptureHandle, DiagnosticSink, RelayHandle};

/// Everything a single harness run needs.
#[derive(Clone, Debug)]
pub struct HarnessConfig {
    pub channel: ChannelConfig,
    pub command: EndpointCommand,
    /// Log endpoint command lines at info rather than debug.
    pub verbose: bool,
}

/// Final result of a run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub seed: u64,
    pub pad_len: u64,
    /// Bits read from the sender, excluding injected pad and trail bits.
    pub genuine_bits: u64,
    pub trail_bits: u64,
    pub flipped_bits: u64,
    /// Bits that reached the receiver's input.
    pub forwarded_bits: u64,
    pub termination: Termination,
    pub sender_exit: Option<i32>,
    pub receiver_exit: Option<i32>,
    /// The receiver's stdout, decoded for display (invalid UTF-8 replaced).
    pub receiver_output: String,
    /// The receiver's stdout, byte for byte.
    #[serde(skip)]
    pub receiver_stdout: Vec<u8>,
}

/// Orchestrates one run: seed, launch, transfer, drain, report.
#[derive(Debug)]
pub struct Harness {
    config: HarnessConfig,
    diagnostics: DiagnosticSink,
}

struct Relays {
    sender: RelayHandle,
    receiver: RelayHandle,
    output: CaptureHandle,
}

impl Harness {
    pub fn new(config: HarnessConfig) -> Self {
        Self {
            config,
            diagnostics: DiagnosticSink::stderr(),
        }
    }

    /// Send relayed endpoint diagnostics somewhere other than stderr.
    pub fn with_diagnostics(mut self, sink: DiagnosticSink) -> Self {
        self.diagnostics = sink;
        self
    }

    pub fn config(&self) -> &HarnessConfig {
        &self.config
    }

    /// Run the channel to completion.
    ///
    /// The report is produced only after the transfer has finished and both
    /// diagnostic relays have reached end of stream.
    pub fn run(&self) -> Result<RunReport> {
        let channel = &self.config.channel;
        channel.validate()?;

        let seeded = SeededChannel::new(channel);
        tracing::info!(seed = channel.seed, "using random seed");
        tracing::info!(
            pad_len = seeded.pad_len(),
            interval = %channel.pad,
            flip_prob = channel.flip_prob,
            "padding with zeroes"
        );
        self.log_commands();

        let mut pair = EndpointPair::launch(&self.config.command)?;
        let (relays, sender_stdout, receiver_stdin) = match self.wire(&mut pair) {
            Ok(wired) => wired,
            Err(err) => {
                pair.shutdown();
                return Err(err);
            }
        };

        let mut stream = seeded.into_stream(BitReader::new(sender_stdout));
        let mut sink = BitWriter::new(receiver_stdin);
        let outcome = transfer(&mut stream, &mut sink, channel.trail);
        // Closing both ends lets the endpoints observe end of stream.
        drop(sink);
        drop(stream);

        let summary = match outcome {
            Ok(summary) => summary,
            Err(err) => {
                pair.kill();
                if let Err(drain_err) = drain(relays) {
                    tracing::warn!(error = %drain_err, "drain after failed transfer");
                }
                let _ = pair.sender.wait();
                let _ = pair.receiver.wait();
                return Err(err.into());
            }
        };

        let output = drain(relays)?;
        let sender_status = pair.sender.wait()?;
        let receiver_status = pair.receiver.wait()?;
        tracing::debug!("finished");

        if !sender_status.success() {
            tracing::warn!(genuine_bits = summary.genuine_bits(), "sender failed");
            return Err(HarnessError::SenderFailed {
                status: sender_status,
                genuine_bits: summary.genuine_bits(),
            });
        }

        Ok(report(
            channel.seed,
            &summary,
            sender_status.code(),
            receiver_status.code(),
            output,
        ))
    }

    fn log_commands(&self) {
        let sender = self.config.command.argv(Role::Sender).join(" ");
        let receiver = self.config.command.argv(Role::Receiver).join(" ");
        if self.config.verbose {
            tracing::info!(%sender, %receiver, "endpoint commands");
        } else {
            tracing::debug!(%sender, %receiver, "endpoint commands");
        }
    }

    fn wire(
        &self,
        pair: &mut EndpointPair,
    ) -> Result<(Relays, std::process::ChildStdout, std::process::ChildStdin)> {
        let sender_stdout = pair.sender.take_stdout()?;
        let receiver_stdin = pair.receiver.take_stdin()?;

        let relays = Relays {
            sender: spawn_relay(
                Role::Sender,
                pair.sender.take_stderr()?,
                self.diagnostics.clone(),
            )?,
            receiver: spawn_relay(
                Role::Receiver,
                pair.receiver.take_stderr()?,
                self.diagnostics.clone(),
            )?,
            output: spawn_capture(Role::Receiver, pair.receiver.take_stdout()?)?,
        };
        Ok((relays, sender_stdout, receiver_stdin))
    }
}

fn drain(relays: Relays) -> Result<Vec<u8>> {
    let sender = relays.sender.join();
    let receiver = relays.receiver.join();
    let output = relays.output.join();
    sender?;
    receiver?;
    output
}

fn report(
    seed: u64,
    summary: &TransferSummary,
    sender_exit: Option<i32>,
    receiver_exit: Option<i32>,
    output: Vec<u8>,
) -> RunReport {
    RunReport {
        seed,
        pad_len: summary.pad_len,
        genuine_bits: summary.stats.genuine_bits,
        trail_bits: summary.stats.trail_bits,
        flipped_bits: summary.stats.flipped_bits,
        forwarded_bits: summary.forwarded,
        termination: summary.termination,
        sender_exit,
        receiver_exit,
        receiver_output: String::from_utf8_lossy(&output).into_owned(),
        receiver_stdout: output,
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use noisechan_bits::BitError;
    use noisechan_pipeline::{ConfigError, PadRange, PipelineError, TrailMode};

    use super::*;

    #[derive(Clone, Default)]
    struct SharedBuf(Arc<Mutex<Vec<u8>>>);

    impl SharedBuf {
        fn contents(&self) -> String {
            String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
        }
    }

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    /// Both endpoints run `sh -c script`; the role arrives as `$0`.
    fn harness(script: &str, channel: ChannelConfig) -> (Harness, SharedBuf) {
        let diagnostics = SharedBuf::default();
        let config = HarnessConfig {
            channel,
            command: EndpointCommand::new(["sh", "-c", script]).unwrap(),
            verbose: false,
        };
        let harness =
            Harness::new(config).with_diagnostics(DiagnosticSink::new(diagnostics.clone()));
        (harness, diagnostics)
    }

    #[test]
    fn forwards_sender_bits_to_receiver() {
        let script = r#"
            if [ "$0" = sender ]; then
                printf '1 0 1 1\n0 0 1\n'
                echo "sender says hi" >&2
            else
                head -c 12 | tr -d '\n'
                echo
                echo "receiver says hi" >&2
            fi
        "#;
        let channel = ChannelConfig::new(5).with_pad(PadRange::exactly(5));
        let (harness, diagnostics) = harness(script, channel);

        let report = harness.run().unwrap();
        assert_eq!(report.genuine_bits, 7);
        assert_eq!(report.pad_len, 5);
        assert_eq!(report.receiver_output, "000001011001\n");
        assert_eq!(report.sender_exit, Some(0));

        let diag = diagnostics.contents();
        assert!(diag.contains("  [Sender stderr] sender says hi\n"));
        assert!(diag.contains("[Receiver stderr] receiver says hi\n"));
    }

    #[test]
    fn receiver_exiting_early_still_reports_full_count() {
        let script = r#"
            if [ "$0" = sender ]; then
                i=0
                while [ $i -lt 300 ]; do printf '10'; i=$((i+1)); done
            else
                head -c 3 >/dev/null
                echo done
            fi
        "#;
        let channel = ChannelConfig::new(8).with_pad(PadRange::exactly(0));
        let (harness, _) = harness(script, channel);

        let report = harness.run().unwrap();
        assert_eq!(report.genuine_bits, 600);
        assert_eq!(report.trail_bits, 1);
        assert_eq!(report.receiver_output, "done\n");
    }

    #[test]
    fn malformed_sender_output_is_fatal() {
        let script = r#"
            if [ "$0" = sender ]; then
                printf 'x1'
            else
                cat > /dev/null
            fi
        "#;
        let channel = ChannelConfig::new(1).with_pad(PadRange::exactly(0));
        let (harness, _) = harness(script, channel);

        let err = harness.run().unwrap_err();
        assert!(matches!(
            err,
            HarnessError::Pipeline(PipelineError::Bit(BitError::Malformed { byte: b'x' }))
        ));
    }

    #[test]
    fn failing_sender_is_fatal() {
        let script = r#"
            if [ "$0" = sender ]; then
                printf '11'
                exit 3
            else
                cat > /dev/null
            fi
        "#;
        let channel = ChannelConfig::new(1).with_pad(PadRange::exactly(0));
        let (harness, _) = harness(script, channel);

        let err = harness.run().unwrap_err();
        assert!(matches!(
            err,
            HarnessError::SenderFailed {
                genuine_bits: 2,
                ..
            }
        ));
    }

    #[test]
    fn invalid_config_fails_before_launch() {
        let channel = ChannelConfig::new(1).with_trail(TrailMode::AtLeast(0));
        let (harness, diagnostics) = harness("echo should-not-run >&2", channel);

        let err = harness.run().unwrap_err();
        assert!(matches!(err, HarnessError::Config(ConfigError::ZeroTrail)));
        assert!(diagnostics.contents().is_empty());
    }

    #[test]
    fn unknown_program_is_a_launch_error() {
        let config = HarnessConfig {
            channel: ChannelConfig::new(1),
            command: EndpointCommand::new(["/nonexistent/noisechan-endpoint"]).unwrap(),
            verbose: true,
        };
        let err = Harness::new(config).run().unwrap_err();
        assert!(matches!(err, HarnessError::Launch { .. }));
    }

    #[test]
    fn report_serializes_termination_in_snake_case() {
        let summary = TransferSummary {
            pad_len: 2,
            stats: noisechan_pipeline::StreamStats {
                pad_bits: 2,
                genuine_bits: 3,
                trail_bits: 1,
                flipped_bits: 0,
            },
            forwarded: 4,
            termination: Termination::PeerClosed,
        };
        let report = report(9, &summary, Some(0), None, b"out".to_vec());
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["termination"], "peer_closed");
        assert_eq!(json["genuine_bits"], 3);
        assert_eq!(json["receiver_exit"], serde_json::Value::Null);
        assert_eq!(json["receiver_output"], "out");
        assert!(json.get("receiver_stdout").is_none());
    }

    #[test]
    fn receiver_output_bytes_are_kept_verbatim() {
        let script = r#"
            if [ "$0" = sender ]; then
                printf '1'
            else
                cat > /dev/null
                printf '\377ok\n'
            fi
        "#;
        let channel = ChannelConfig::new(2).with_pad(PadRange::exactly(0));
        let (harness, _) = harness(script, channel);

        let report = harness.run().unwrap();
        assert_eq!(report.receiver_stdout, b"\xffok\n");
        assert_eq!(report.receiver_output, "\u{FFFD}ok\n");
    }
}
