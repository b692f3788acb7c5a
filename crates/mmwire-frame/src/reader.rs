use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use crate::codec::Frame;
use crate::decoder::{DecoderConfig, FrameDecoder};
use crate::error::{FrameError, Result};

const READ_CHUNK_SIZE: usize = 8 * 1024;

/// Reads complete frames from any `Read` stream.
///
/// Handles partial reads internally; callers always get complete frames.
/// End of input at a frame boundary is a clean end of stream, anywhere else
/// it is `FrameError::Truncated`. Frames decoded ahead of a decode error are
/// returned before the error, whatever the read size.
pub struct FrameReader<T> {
    inner: T,
    decoder: FrameDecoder,
    pending: VecDeque<Frame>,
    pending_err: Option<FrameError>,
    chunk_size: usize,
    eof: bool,
}

impl<T: Read> FrameReader<T> {
    /// Create a new frame reader with default configuration.
    pub fn new(inner: T) -> Self {
        Self::with_config(inner, DecoderConfig::default())
    }

    /// Create a new frame reader with explicit configuration.
    pub fn with_config(inner: T, config: DecoderConfig) -> Self {
        Self {
            inner,
            decoder: FrameDecoder::with_config(config),
            pending: VecDeque::new(),
            pending_err: None,
            chunk_size: READ_CHUNK_SIZE,
            eof: false,
        }
    }

    /// Limit how many bytes are pulled from the stream per read.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Read the next complete frame (blocking).
    ///
    /// Returns `Ok(None)` once the stream has ended cleanly, and after a
    /// decode error has been returned.
    pub fn read_frame(&mut self) -> Result<Option<Frame>> {
        let mut chunk = vec![0u8; self.chunk_size];
        loop {
            if let Some(frame) = self.pending.pop_front() {
                return Ok(Some(frame));
            }
            if let Some(err) = self.pending_err.take() {
                return Err(err);
            }
            if self.eof || self.decoder.is_failed() {
                return Ok(None);
            }

            let read = match self.inner.read(&mut chunk) {
                Ok(n) => n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(FrameError::Io(err)),
            };

            let is_final = read == 0;
            self.eof = is_final;
            let pending = &mut self.pending;
            let fed = self
                .decoder
                .feed(&chunk[..read], is_final, &mut |frame: Frame, _: bool| {
                    pending.push_back(frame)
                });
            if let Err(err) = fed {
                self.pending_err = Some(err);
            }
        }
    }

    /// The decoder driving this reader.
    pub fn decoder(&self) -> &FrameDecoder {
        &self.decoder
    }

    /// Borrow the underlying stream.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying stream.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner stream.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

impl<T: Read> Iterator for FrameReader<T> {
    type Item = Result<Frame>;

    fn next(&mut self) -> Option<Self::Item> {
        self.read_frame().transpose()
    }
}
