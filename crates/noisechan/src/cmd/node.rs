use noisechan_bits::Role;
use noisechan_node::{run_node, Corpus};
use noisechan_pipeline::ConfigError;

use crate::cmd::NodeArgs;
use crate::exit::{config_error, node_error, CliResult, SUCCESS};

pub fn run(args: NodeArgs) -> CliResult<i32> {
    let role: Role = args
        .role
        .parse()
        .map_err(|err| config_error("invalid role", ConfigError::from(err)))?;

    let corpus = Corpus::load(&args.corpus).map_err(|err| node_error("corpus", err))?;
    run_node(role, args.protocol.into(), &corpus, args.verbose)
        .map_err(|err| node_error(role.as_str(), err))?;

    Ok(SUCCESS)
}
