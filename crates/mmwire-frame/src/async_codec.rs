//! `tokio_util::codec` adapter for streamed response bodies.

use bytes::{Buf, BytesMut};
use tokio_util::codec::{Decoder, Encoder};

use crate::codec::{encode_frame, parse_header, Frame, DEFAULT_MAX_PAYLOAD, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Frame codec for use with `FramedRead` / `FramedWrite`.
///
/// Decoding follows [`crate::FrameDecoder`]: frames are produced as soon as
/// they are complete, and EOF inside a frame is `FrameError::Truncated`.
#[derive(Debug, Clone)]
pub struct TextFrameCodec {
    max_payload_size: usize,
}

impl TextFrameCodec {
    /// Create a codec with the default payload limit.
    pub fn new() -> Self {
        Self::with_max_payload(DEFAULT_MAX_PAYLOAD)
    }

    /// Create a codec with an explicit payload limit.
    pub fn with_max_payload(max_payload_size: usize) -> Self {
        Self { max_payload_size }
    }
}

impl Default for TextFrameCodec {
    fn default() -> Self {
        Self::new()
    }
}

impl Decoder for TextFrameCodec {
    type Item = Frame;
    type Error = FrameError;

    fn decode(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        if src.len() < HEADER_SIZE {
            return Ok(None);
        }

        let (channel, len) = parse_header(&src[..HEADER_SIZE])?;
        if len > self.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: len,
                max: self.max_payload_size,
            });
        }

        let total = HEADER_SIZE + len;
        if src.len() < total {
            src.reserve(total - src.len());
            return Ok(None);
        }

        src.advance(HEADER_SIZE);
        let payload = src.split_to(len).freeze();
        Ok(Some(Frame { channel, payload }))
    }

    fn decode_eof(&mut self, src: &mut BytesMut) -> Result<Option<Frame>> {
        if let Some(frame) = self.decode(src)? {
            return Ok(Some(frame));
        }
        if src.is_empty() {
            return Ok(None);
        }

        if src.len() < HEADER_SIZE {
            return Err(FrameError::Truncated {
                expected: HEADER_SIZE,
                available: src.len(),
            });
        }
        let (_, len) = parse_header(&src[..HEADER_SIZE])?;
        Err(FrameError::Truncated {
            expected: len,
            available: src.len() - HEADER_SIZE,
        })
    }
}

impl Encoder<Frame> for TextFrameCodec {
    type Error = FrameError;

    fn encode(&mut self, frame: Frame, dst: &mut BytesMut) -> Result<()> {
        if frame.payload.len() > self.max_payload_size {
            return Err(FrameError::PayloadTooLarge {
                size: frame.payload.len(),
                max: self.max_payload_size,
            });
        }
        encode_frame(frame.channel, &frame.payload, dst)
    }
}
