use std::io::Write;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use noisechan_harness::RunReport;
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Bit count line followed by the receiver's output.
    Pretty,
    Json,
    Table,
    /// Receiver output only.
    Raw,
}

#[derive(Serialize)]
struct ReportOutput<'a> {
    schema_id: &'a str,
    #[serde(flatten)]
    report: &'a RunReport,
}

#[derive(Serialize)]
struct SentenceOutput<'a> {
    schema_id: &'a str,
    seed: u64,
    sentence: &'a str,
}

pub fn print_report(report: &RunReport, format: OutputFormat) {
    match format {
        OutputFormat::Pretty => {
            println!(
                "Exactly {} bits were written by the sender.",
                report.genuine_bits
            );
            print_raw(&report.receiver_stdout);
        }
        OutputFormat::Json => {
            let out = ReportOutput {
                schema_id: "noisechan/cli/v1/run-report",
                report,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (field, value) in [
                ("seed", report.seed.to_string()),
                ("pad bits", report.pad_len.to_string()),
                ("genuine bits", report.genuine_bits.to_string()),
                ("trail bits", report.trail_bits.to_string()),
                ("flipped bits", report.flipped_bits.to_string()),
                ("forwarded bits", report.forwarded_bits.to_string()),
                ("termination", termination_label(report).to_string()),
                ("sender exit", exit_label(report.sender_exit)),
                ("receiver exit", exit_label(report.receiver_exit)),
                ("receiver output", report.receiver_output.trim_end().to_string()),
            ] {
                table.add_row(vec![field.to_string(), value]);
            }
            println!("{table}");
        }
        OutputFormat::Raw => print_raw(&report.receiver_stdout),
    }
}

pub fn print_sentence(sentence: &str, seed: u64, format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            let out = SentenceOutput {
                schema_id: "noisechan/cli/v1/sentence",
                seed,
                sentence,
            };
            println!(
                "{}",
                serde_json::to_string(&out).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["SEED", "SENTENCE"])
                .add_row(vec![seed.to_string(), sentence.to_string()]);
            println!("{table}");
        }
        OutputFormat::Pretty | OutputFormat::Raw => println!("{sentence}"),
    }
}

fn termination_label(report: &RunReport) -> &'static str {
    match report.termination {
        noisechan_pipeline::Termination::Completed => "completed",
        noisechan_pipeline::Termination::PeerClosed => "receiver closed",
    }
}

fn exit_label(code: Option<i32>) -> String {
    code.map_or_else(|| "signal".to_string(), |code| code.to_string())
}

fn print_raw(bytes: &[u8]) {
    let mut stdout = std::io::stdout().lock();
    let _ = stdout.write_all(bytes);
    let _ = stdout.flush();
}
