use crate::cmd::VersionArgs;
use crate::exit::{CliResult, SUCCESS};

pub fn run(args: VersionArgs) -> CliResult<i32> {
    println!("mmwire {}", env!("CARGO_PKG_VERSION"));
    if args.extended {
        println!(
            "target: {}",
            option_env!("MMWIRE_BUILD_TARGET").unwrap_or("unknown")
        );
        println!(
            "profile: {}",
            option_env!("MMWIRE_BUILD_PROFILE").unwrap_or("unknown")
        );
    }
    Ok(SUCCESS)
}
