mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(
    name = "mmwire",
    version,
    about = "Decode and replay streamed dashboard notifications"
)]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "warn", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_decode_subcommand() {
        let cli = Cli::try_parse_from(["mmwire", "decode", "stream.txt", "--chunk-size", "3"])
            .expect("decode args should parse");
        match cli.command {
            Command::Decode(args) => assert_eq!(args.chunk_size, 3),
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_chunk_size() {
        let err = Cli::try_parse_from(["mmwire", "decode", "--chunk-size", "0"])
            .expect_err("zero chunk size should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn encode_requires_a_frame() {
        let err = Cli::try_parse_from(["mmwire", "encode"]).expect_err("frame is required");
        assert_eq!(
            err.kind(),
            clap::error::ErrorKind::MissingRequiredArgument
        );
    }

    #[test]
    fn parses_replay_with_global_format() {
        let cli = Cli::try_parse_from([
            "mmwire",
            "replay",
            "deploy",
            "shop",
            "--body",
            "body.txt",
            "--format",
            "json",
        ])
        .expect("replay args should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.command, Command::Replay(_)));
    }
}
