use mmwire_api::{Command, CommandKind};

use crate::cmd::RequestArgs;
use crate::exit::{api_error, CliResult, SUCCESS};
use crate::output::{print_request, OutputFormat};

pub fn run(args: RequestArgs, format: OutputFormat) -> CliResult<i32> {
    let command = build_command(&args.command, args.target.as_deref())?;
    let request = command
        .request()
        .map_err(|err| api_error("invalid request", err))?;
    print_request(&command, &request, format);
    Ok(SUCCESS)
}

/// Resolve a CLI action name and optional target into a typed command.
pub(crate) fn build_command(name: &str, target: Option<&str>) -> CliResult<Command> {
    let kind: CommandKind = name
        .parse()
        .map_err(|err| api_error("unknown action", err))?;
    Command::new(kind, target).map_err(|err| api_error("invalid target", err))
}
