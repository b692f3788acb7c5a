//! Incremental frame decoder.
//!
//! State machine over a rolling buffer:
//! - `AwaitingHeader`: need [`HEADER_SIZE`] unread bytes
//! - `AwaitingPayload`: header parsed, need `len` unread bytes
//! - `Finished`: the final chunk was accepted; the stream is closed
//! - `Failed`: a decode error occurred; all further input is refused
//!
//! Consumed bytes are split off the front of the buffer, so memory held by a
//! long-lived stream is bounded by one partial frame plus the latest chunk.

use bytes::{Buf, BytesMut};
use tracing::{debug, trace, warn};

use crate::channel::Channel;
use crate::codec::{parse_header, Frame, DEFAULT_MAX_PAYLOAD, HEADER_SIZE};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 8 * 1024;

/// Receives frames as the decoder completes them.
///
/// `is_final` is forwarded from the `feed` call that completed the frame: when
/// true, the stream has closed and no more frames will follow this call.
pub trait FrameSink {
    fn on_frame(&mut self, frame: Frame, is_final: bool);
}

impl<F> FrameSink for F
where
    F: FnMut(Frame, bool),
{
    fn on_frame(&mut self, frame: Frame, is_final: bool) {
        self(frame, is_final)
    }
}

/// Configuration for [`FrameDecoder`].
#[derive(Debug, Clone)]
pub struct DecoderConfig {
    /// Maximum declared payload size in bytes. Default: 16 MiB.
    pub max_payload_size: usize,
    /// Initial capacity of the rolling buffer.
    pub initial_capacity: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_payload_size: DEFAULT_MAX_PAYLOAD,
            initial_capacity: INITIAL_BUFFER_CAPACITY,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitingHeader,
    AwaitingPayload { channel: Channel, len: usize },
    Finished,
    Failed,
}

/// Reassembles frames from an arbitrarily chunked byte stream.
///
/// One decoder serves exactly one stream. Feed chunks in arrival order; each
/// call emits every frame that became complete and keeps the remainder.
#[derive(Debug)]
pub struct FrameDecoder {
    buf: BytesMut,
    state: State,
    position: u64,
    config: DecoderConfig,
}

impl Default for FrameDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDecoder {
    /// Create a decoder with default configuration.
    pub fn new() -> Self {
        Self::with_config(DecoderConfig::default())
    }

    /// Create a decoder with explicit configuration.
    pub fn with_config(config: DecoderConfig) -> Self {
        Self {
            buf: BytesMut::with_capacity(config.initial_capacity),
            state: State::AwaitingHeader,
            position: 0,
            config,
        }
    }

    /// Append a chunk and emit every frame it completes.
    ///
    /// Pass `is_final = true` exactly once, on the last chunk (which may be
    /// empty). Frames completed by that call are delivered first; if a header
    /// or payload is still incomplete afterwards, `FrameError::Truncated` is
    /// returned. Returns the number of frames emitted by this call.
    pub fn feed<S>(&mut self, chunk: &[u8], is_final: bool, sink: &mut S) -> Result<usize>
    where
        S: FrameSink + ?Sized,
    {
        match self.state {
            State::Failed => return Err(FrameError::Aborted),
            State::Finished => return Err(FrameError::Finished),
            _ => {}
        }

        self.buf.extend_from_slice(chunk);
        trace!(
            chunk = chunk.len(),
            buffered = self.buf.len(),
            is_final,
            "decoder fed"
        );

        let mut emitted = 0usize;
        loop {
            match self.advance() {
                Ok(Some(frame)) => {
                    emitted += 1;
                    sink.on_frame(frame, is_final);
                }
                Ok(None) => break,
                Err(err) => return Err(self.fail(err)),
            }
        }

        if is_final {
            if let Some(err) = self.truncation() {
                return Err(self.fail(err));
            }
            self.state = State::Finished;
            debug!(position = self.position, "stream complete");
        }

        Ok(emitted)
    }

    /// Signal end of stream with no further data.
    pub fn finish<S>(&mut self, sink: &mut S) -> Result<usize>
    where
        S: FrameSink + ?Sized,
    {
        self.feed(&[], true, sink)
    }

    /// Append a non-final chunk and collect the frames it completes.
    pub fn push(&mut self, chunk: &[u8]) -> Result<Vec<Frame>> {
        let mut frames = Vec::new();
        self.feed(chunk, false, &mut |frame: Frame, _: bool| frames.push(frame))?;
        Ok(frames)
    }

    /// Decode a complete stream held in memory.
    pub fn decode_all(bytes: &[u8]) -> Result<Vec<Frame>> {
        let mut frames = Vec::new();
        Self::new().feed(bytes, true, &mut |frame: Frame, _: bool| frames.push(frame))?;
        Ok(frames)
    }

    /// Logical cursor: bytes consumed into parsed headers and complete frames.
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes received but not yet consumed.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// True when no partial header or payload is pending.
    pub fn is_idle(&self) -> bool {
        self.state == State::AwaitingHeader && self.buf.is_empty()
    }

    /// True once a decode error has aborted this stream.
    pub fn is_failed(&self) -> bool {
        self.state == State::Failed
    }

    /// True once the final chunk has been accepted without error.
    pub fn is_finished(&self) -> bool {
        self.state == State::Finished
    }

    /// Run the state machine one step.
    ///
    /// Returns `Ok(None)` when more data is needed.
    fn advance(&mut self) -> Result<Option<Frame>> {
        loop {
            match self.state {
                State::AwaitingHeader => {
                    if self.buf.len() < HEADER_SIZE {
                        return Ok(None);
                    }
                    let (channel, len) = parse_header(&self.buf[..HEADER_SIZE])?;
                    if len > self.config.max_payload_size {
                        return Err(FrameError::PayloadTooLarge {
                            size: len,
                            max: self.config.max_payload_size,
                        });
                    }
                    self.buf.advance(HEADER_SIZE);
                    self.position += HEADER_SIZE as u64;
                    self.state = State::AwaitingPayload { channel, len };
                }
                State::AwaitingPayload { channel, len } => {
                    if self.buf.len() < len {
                        return Ok(None);
                    }
                    let payload = self.buf.split_to(len).freeze();
                    self.position += len as u64;
                    self.state = State::AwaitingHeader;
                    trace!(%channel, len, "frame decoded");
                    return Ok(Some(Frame { channel, payload }));
                }
                State::Finished => return Ok(None),
                State::Failed => return Err(FrameError::Aborted),
            }
        }
    }

    fn truncation(&self) -> Option<FrameError> {
        match self.state {
            State::AwaitingHeader if !self.buf.is_empty() => Some(FrameError::Truncated {
                expected: HEADER_SIZE,
                available: self.buf.len(),
            }),
            State::AwaitingPayload { len, .. } => Some(FrameError::Truncated {
                expected: len,
                available: self.buf.len(),
            }),
            _ => None,
        }
    }

    fn fail(&mut self, err: FrameError) -> FrameError {
        warn!(position = self.position, error = %err, "frame decode failed");
        self.state = State::Failed;
        self.buf.clear();
        err
    }
}
