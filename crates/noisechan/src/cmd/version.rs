use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    if !args.extended {
        println!("noisechan {}", env!("CARGO_PKG_VERSION"));
        return Ok(SUCCESS);
    }

    println!("name: noisechan");
    println!("version: {}", env!("CARGO_PKG_VERSION"));
    println!(
        "target: {}",
        option_env!("NOISECHAN_BUILD_TARGET").unwrap_or("unknown")
    );
    println!(
        "profile: {}",
        option_env!("NOISECHAN_BUILD_PROFILE").unwrap_or("unknown")
    );
    println!(
        "features: harness={}, node={}, cli=true",
        cfg!(feature = "harness"),
        cfg!(feature = "node")
    );

    Ok(SUCCESS)
}
