use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::channel::Channel;
use crate::codec::{encode_frame, Frame, HEADER_SIZE};
use crate::error::{FrameError, Result};

/// Writes frames to any `Write` stream.
///
/// Each frame is encoded whole and handed to the stream in one `write_all`,
/// so a reader never observes a header without its payload from a single
/// writer. Call [`flush`](Self::flush) once the stream is complete.
pub struct FrameWriter<T> {
    inner: T,
    position: u64,
}

impl<T: Write> FrameWriter<T> {
    pub fn new(inner: T) -> Self {
        Self { inner, position: 0 }
    }

    /// Write an already built frame.
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        let wire = frame.encode()?;
        self.write_wire(&wire)
    }

    /// Encode `payload` under `channel` and write it.
    pub fn send(&mut self, channel: impl Into<Channel>, payload: &[u8]) -> Result<()> {
        let mut wire = BytesMut::with_capacity(HEADER_SIZE + payload.len());
        encode_frame(channel, payload, &mut wire)?;
        self.write_wire(&wire)
    }

    pub fn send_text(&mut self, channel: impl Into<Channel>, text: &str) -> Result<()> {
        self.send(channel, text.as_bytes())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.inner.flush().map_err(FrameError::Io)
    }

    /// Bytes written so far; matches the decoder cursor on the other end.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    pub fn into_inner(self) -> T {
        self.inner
    }

    fn write_wire(&mut self, wire: &[u8]) -> Result<()> {
        self.inner.write_all(wire).map_err(|err| match err.kind() {
            ErrorKind::WriteZero => FrameError::ConnectionClosed,
            _ => FrameError::Io(err),
        })?;
        self.position += wire.len() as u64;
        Ok(())
    }
}
