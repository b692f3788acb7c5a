use std::borrow::Cow;

use bytes::{BufMut, Bytes, BytesMut};

use crate::channel::Channel;
use crate::error::{FrameError, Result};

/// Frame header: tag (1) + hex length (8) = 9 bytes.
pub const HEADER_SIZE: usize = 1 + LENGTH_DIGITS;

/// Width of the zero-padded hexadecimal length field.
pub const LENGTH_DIGITS: usize = 8;

/// Default maximum payload size: 16 MiB.
pub const DEFAULT_MAX_PAYLOAD: usize = 16 * 1024 * 1024;

/// Largest length the 8-digit field can express.
const MAX_ENCODABLE: usize = u32::MAX as usize;

/// A decoded frame with its channel tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The channel this frame belongs to.
    pub channel: Channel,
    /// The frame payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(channel: impl Into<Channel>, payload: impl Into<Bytes>) -> Self {
        Self {
            channel: channel.into(),
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }

    /// The payload as UTF-8 text, if it is valid.
    pub fn text(&self) -> std::result::Result<&str, std::str::Utf8Error> {
        std::str::from_utf8(&self.payload)
    }

    /// The payload as text, replacing invalid UTF-8 sequences.
    pub fn text_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.payload)
    }

    /// Encode this frame into a fresh buffer.
    pub fn encode(&self) -> Result<Bytes> {
        let mut dst = BytesMut::with_capacity(self.wire_size());
        encode_frame(self.channel, &self.payload, &mut dst)?;
        Ok(dst.freeze())
    }
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────────┬──────────────────┬─────────────────┐
/// │ Tag (1B) │ Length (8B hex)  │ Payload          │
/// │ 'N'      │ "0000001a"       │ (Length bytes)   │
/// └──────────┴──────────────────┴─────────────────┘
/// ```
pub fn encode_frame(channel: impl Into<Channel>, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_ENCODABLE {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_ENCODABLE,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_u8(channel.into().as_byte());
    dst.put_slice(format!("{:08x}", payload.len()).as_bytes());
    dst.put_slice(payload);
    Ok(())
}

/// Parse a complete header.
///
/// `header` must be exactly [`HEADER_SIZE`] bytes. The length field accepts
/// hex digits of either case and nothing else; `u32::from_str_radix` alone
/// would let a leading `+` through.
pub(crate) fn parse_header(header: &[u8]) -> Result<(Channel, usize)> {
    debug_assert_eq!(header.len(), HEADER_SIZE);
    let field = &header[1..HEADER_SIZE];
    let invalid = || FrameError::InvalidLength {
        field: String::from_utf8_lossy(field).into_owned(),
    };

    let mut len = 0usize;
    for &digit in field {
        let value = char::from(digit).to_digit(16).ok_or_else(invalid)?;
        len = (len << 4) | value as usize;
    }
    Ok((Channel(header[0]), len))
}
