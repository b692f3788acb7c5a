//! Incremental decoder for tagged, hex length-prefixed text frames.
//!
//! Streamed API responses multiplex several notification channels into one
//! response body. Every frame on the wire is:
//! - A 1-byte channel tag (`N`, `W`, `E`, ... any byte is accepted)
//! - An 8-digit hexadecimal payload length, zero padded
//! - The payload itself, exactly that many bytes
//!
//! Frames are concatenated with no delimiter. Network chunks carry no
//! alignment with frame boundaries, so [`FrameDecoder`] buffers whatever is
//! incomplete and emits frames the moment they are whole.

pub mod channel;
pub mod codec;
pub mod decoder;
pub mod error;
pub mod reader;
pub mod writer;

#[cfg(feature = "async")]
pub mod async_codec;

pub use channel::{Channel, ERROR, ERROR_ALT, INFO, WARNING};
pub use codec::{encode_frame, Frame, DEFAULT_MAX_PAYLOAD, HEADER_SIZE, LENGTH_DIGITS};
pub use decoder::{DecoderConfig, FrameDecoder, FrameSink};
pub use error::{FrameError, Result};
pub use reader::FrameReader;
pub use writer::FrameWriter;

#[cfg(feature = "async")]
pub use async_codec::TextFrameCodec;
