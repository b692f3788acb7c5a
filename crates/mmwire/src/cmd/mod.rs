use clap::{Args, Subcommand};
use std::path::PathBuf;

use crate::exit::CliResult;
use crate::output::OutputFormat;

pub mod commands;
pub mod decode;
pub mod encode;
pub mod replay;
pub mod request;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Decode a recorded stream and print its frames.
    Decode(DecodeArgs),
    /// Encode frames and write the wire bytes to stdout.
    Encode(EncodeArgs),
    /// Show the request a dashboard action sends.
    Request(RequestArgs),
    /// Run an action against a recorded response body.
    Replay(ReplayArgs),
    /// List the supported dashboard actions.
    Commands,
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Decode(args) => decode::run(args, format),
        Command::Encode(args) => encode::run(args),
        Command::Request(args) => request::run(args, format),
        Command::Replay(args) => replay::run(args, format),
        Command::Commands => commands::run(format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct DecodeArgs {
    /// Recorded stream to decode. Reads stdin when omitted.
    pub file: Option<PathBuf>,
    /// Bytes to feed the decoder per read.
    #[arg(long, default_value = "8192", value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: u64,
    /// Reject frames declaring a larger payload (bytes).
    #[arg(long, value_name = "BYTES")]
    pub max_payload: Option<usize>,
}

#[derive(Args, Debug)]
pub struct EncodeArgs {
    /// Frame to encode as TAG:PAYLOAD, repeatable. TAG is one character.
    #[arg(long = "frame", short = 'f', value_name = "TAG:PAYLOAD", required = true)]
    pub frames: Vec<String>,
}

#[derive(Args, Debug)]
pub struct RequestArgs {
    /// Action name, see `mmwire commands`.
    pub command: String,
    /// Machine or deploy name the action targets.
    pub target: Option<String>,
}

#[derive(Args, Debug)]
pub struct ReplayArgs {
    /// Action name, see `mmwire commands`.
    pub command: String,
    /// Machine or deploy name the action targets.
    pub target: Option<String>,
    /// Recorded response body.
    #[arg(long, value_name = "FILE")]
    pub body: PathBuf,
    /// Deliver the body in chunks of this many bytes.
    #[arg(long, default_value = "8192", value_parser = clap::value_parser!(u64).range(1..))]
    pub chunk_size: u64,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}
