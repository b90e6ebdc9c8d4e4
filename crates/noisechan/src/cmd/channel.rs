use noisechan_harness::{EndpointCommand, Harness, HarnessConfig};
use noisechan_pipeline::{ChannelConfig, PadRange, TrailMode};
use tracing::debug;

use crate::cmd::ChannelArgs;
use crate::exit::{config_error, harness_error, CliError, CliResult, SUCCESS, USAGE};
use crate::output::{print_report, OutputFormat};

pub fn run(args: ChannelArgs, flip_prob: f64, format: OutputFormat) -> CliResult<i32> {
    let config = harness_config(args, flip_prob)?;
    let report = Harness::new(config)
        .run()
        .map_err(|err| harness_error("channel run failed", err))?;

    print_report(&report, format);
    Ok(SUCCESS)
}

fn harness_config(args: ChannelArgs, flip_prob: f64) -> CliResult<HarnessConfig> {
    let [low, high] = args.zero_pad[..] else {
        return Err(CliError::new(USAGE, "-z takes exactly two values"));
    };
    let pad = PadRange::new(low, high).map_err(|err| config_error("invalid -z", err))?;

    let seed = args.seed.unwrap_or_else(rand::random);
    if args.seed.is_none() {
        debug!(seed, "drew random seed");
    }

    let trail = if args.trail_until_closed {
        TrailMode::UntilClosed
    } else {
        TrailMode::AtLeast(args.trail)
    };

    let command = EndpointCommand::new(args.command)
        .map_err(|err| config_error("invalid endpoint command", err))?
        .with_verbose(args.verbose);

    let channel = ChannelConfig::new(seed)
        .with_pad(pad)
        .with_flip_prob(flip_prob)
        .with_trail(trail);
    channel
        .validate()
        .map_err(|err| config_error("invalid channel", err))?;

    Ok(HarnessConfig {
        channel,
        command,
        verbose: args.verbose,
    })
}
