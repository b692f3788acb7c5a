use mmwire_api::{ApiClient, ReplayTransport};
use mmwire_notify::Severity;

use crate::cmd::request::build_command;
use crate::cmd::ReplayArgs;
use crate::exit::{api_error, io_error, CliResult, FAILURE, SUCCESS};
use crate::output::{print_notification, print_summary, OutputFormat};

pub fn run(args: ReplayArgs, format: OutputFormat) -> CliResult<i32> {
    let command = build_command(&args.command, args.target.as_deref())?;
    let body = std::fs::read(&args.body)
        .map_err(|err| io_error(&format!("failed reading {}", args.body.display()), err))?;

    let chunk_size = usize::try_from(args.chunk_size).unwrap_or(usize::MAX);
    let transport = ReplayTransport::new(body).with_chunk_size(chunk_size);
    let mut client = ApiClient::new(transport);

    let mut errors = 0usize;
    let mut sink = |message: &str, severity: Severity| {
        if severity == Severity::Error {
            errors += 1;
        }
        print_notification(message, severity, format);
    };
    let summary = client
        .run(&command, &mut sink)
        .map_err(|err| api_error("replay failed", err))?;

    print_summary(&summary, format);
    if errors > 0 {
        tracing::warn!(errors, command = %command.kind(), "action reported errors");
        return Ok(FAILURE);
    }
    Ok(SUCCESS)
}
