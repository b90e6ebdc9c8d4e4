use clap::{Args, Subcommand, ValueEnum};
use std::path::PathBuf;

use noisechan_node::{Protocol, DEFAULT_CORPUS_FILE};

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod channel;
pub mod node;
pub mod sentence;
pub mod version;

/// Flip probability used by `noisy` when `-f` is not given.
pub const DEFAULT_FLIP_PROB: f64 = 0.01;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run a sender and a receiver over a channel that never flips bits.
    Clean(CleanArgs),
    /// Run a sender and a receiver over a channel that flips bits at random.
    Noisy(NoisyArgs),
    /// Act as one endpoint of the channel, speaking a sentence protocol.
    Node(NodeArgs),
    /// Print a random sentence drawn from a corpus.
    Sentence(SentenceArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Clean(args) => channel::run(args.channel, 0.0, format),
        Command::Noisy(args) => channel::run(args.channel, args.flip_prob, format),
        Command::Node(args) => node::run(args),
        Command::Sentence(args) => sentence::run(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct ChannelArgs {
    /// Interval for the number of zeros prepended to the sender's bits.
    #[arg(
        short = 'z',
        long = "zero-pad",
        num_args = 2,
        value_names = ["ZLOW", "ZHIGH"],
        default_values_t = [100_i64, 1000],
        allow_negative_numbers = true
    )]
    pub zero_pad: Vec<i64>,

    /// Seed for the pad length and noise. Drawn at random when omitted.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Pass --verbose to both endpoints and log the endpoint commands.
    #[arg(short, long)]
    pub verbose: bool,

    /// Zeros to forward after the sender's output ends.
    #[arg(long, value_name = "N", default_value_t = 1, conflicts_with = "trail_until_closed")]
    pub trail: u64,

    /// Keep forwarding zeros until the receiver stops reading.
    #[arg(long)]
    pub trail_until_closed: bool,

    /// Command for both endpoints; the role ("sender" or "receiver") is
    /// appended. A leading "___" on an argument is stripped.
    #[arg(
        value_name = "COMMAND",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub command: Vec<String>,
}

#[derive(Args, Debug)]
pub struct CleanArgs {
    #[command(flatten)]
    pub channel: ChannelArgs,
}

#[derive(Args, Debug)]
pub struct NoisyArgs {
    /// Probability that any bit is flipped.
    #[arg(short, long, value_name = "P", default_value_t = DEFAULT_FLIP_PROB)]
    pub flip_prob: f64,

    #[command(flatten)]
    pub channel: ChannelArgs,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ProtocolArg {
    /// Start bit, 2-bit word count, 16-bit indices (3 to 6 words).
    Count,
    /// Start bit, 16-bit indices, 0xFFFF ends short sentences (1 to 5 words).
    Sentinel,
}

impl From<ProtocolArg> for Protocol {
    fn from(arg: ProtocolArg) -> Self {
        match arg {
            ProtocolArg::Count => Protocol::Count,
            ProtocolArg::Sentinel => Protocol::Sentinel,
        }
    }
}

#[derive(Args, Debug)]
pub struct NodeArgs {
    /// "sender" or "receiver".
    pub role: String,

    /// Sentence protocol spoken over the channel.
    #[arg(long, value_enum, default_value = "count")]
    pub protocol: ProtocolArg,

    /// Whitespace-separated word list shared by both endpoints.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CORPUS_FILE)]
    pub corpus: PathBuf,

    /// Log the bits sent or received.
    #[arg(short, long)]
    pub verbose: bool,
}

#[derive(Args, Debug)]
pub struct SentenceArgs {
    /// Corpus to draw words from.
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_CORPUS_FILE)]
    pub corpus: PathBuf,

    /// Seed for word selection. Drawn at random when omitted.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Interval for the number of words.
    #[arg(
        short = 'w',
        long = "words",
        num_args = 2,
        value_names = ["WLOW", "WHIGH"],
        default_values_t = [3_usize, 5]
    )]
    pub words: Vec<usize>,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show build details.
    #[arg(long)]
    pub extended: bool,
}
