use mmwire_frame::{Channel, FrameWriter};

use crate::cmd::EncodeArgs;
use crate::exit::{frame_error, CliError, CliResult, SUCCESS, USAGE};

pub fn run(args: EncodeArgs) -> CliResult<i32> {
    let frames = args
        .frames
        .iter()
        .map(|arg| parse_frame_arg(arg))
        .collect::<CliResult<Vec<_>>>()?;

    let mut writer = FrameWriter::new(std::io::stdout().lock());
    for (channel, payload) in frames {
        writer
            .send_text(channel, payload)
            .map_err(|err| frame_error("encode failed", err))?;
    }
    writer
        .flush()
        .map_err(|err| frame_error("encode failed", err))?;

    Ok(SUCCESS)
}

fn parse_frame_arg(arg: &str) -> CliResult<(Channel, &str)> {
    let (tag, payload) = arg
        .split_once(':')
        .ok_or_else(|| CliError::new(USAGE, format!("frame must be TAG:PAYLOAD: {arg:?}")))?;

    let mut chars = tag.chars();
    let channel = match (chars.next(), chars.next()) {
        (Some(tag), None) => Channel::try_from(tag).map_err(|tag| {
            CliError::new(USAGE, format!("tag {tag:?} does not fit in one byte"))
        })?,
        _ => {
            return Err(CliError::new(
                USAGE,
                format!("tag must be exactly one character: {tag:?}"),
            ))
        }
    };
    Ok((channel, payload))
}
