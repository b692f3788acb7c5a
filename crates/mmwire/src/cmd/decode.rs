use std::fs::File;
use std::io::Read;

use mmwire_frame::{DecoderConfig, FrameReader};

use crate::cmd::DecodeArgs;
use crate::exit::{frame_error, io_error, CliResult, SUCCESS};
use crate::output::{print_frame, OutputFormat};

pub fn run(args: DecodeArgs, format: OutputFormat) -> CliResult<i32> {
    let input: Box<dyn Read> = match &args.file {
        Some(path) => Box::new(
            File::open(path)
                .map_err(|err| io_error(&format!("failed opening {}", path.display()), err))?,
        ),
        None => Box::new(std::io::stdin().lock()),
    };

    let mut config = DecoderConfig::default();
    if let Some(max) = args.max_payload {
        config.max_payload_size = max;
    }
    let chunk_size = usize::try_from(args.chunk_size).unwrap_or(usize::MAX);
    let reader = FrameReader::with_config(input, config).with_chunk_size(chunk_size);

    let mut count = 0usize;
    for frame in reader {
        let frame = frame.map_err(|err| frame_error("decode failed", err))?;
        print_frame(count, &frame, format);
        count += 1;
    }
    tracing::debug!(frames = count, "decode complete");

    Ok(SUCCESS)
}
