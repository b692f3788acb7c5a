//! The HTTP collaborator, reduced to what the client needs.

use bytes::Bytes;
use tracing::trace;

use crate::command::Request;
use crate::error::Result;

/// Callback receiving response body chunks in arrival order.
pub type ChunkHandler<'a> = dyn FnMut(&[u8]) -> Result<()> + 'a;

/// Request/response mechanism supplied by the embedding application.
///
/// Implementations own URL construction, authentication and status handling;
/// failures are reported as `ApiError::Transport`.
pub trait Transport {
    /// Send a request and return the complete response body.
    fn post(&mut self, request: &Request) -> Result<Vec<u8>>;

    /// Send a request and deliver the response body incrementally.
    ///
    /// Returns once the body is complete. An error from `on_chunk` must stop
    /// delivery and be returned unchanged.
    fn stream(&mut self, request: &Request, on_chunk: &mut ChunkHandler<'_>) -> Result<()>;
}

/// Transport that answers every request with a recorded body.
///
/// Streams are cut into `chunk_size` pieces, which makes it useful for
/// replaying captured responses and for exercising chunk boundaries.
#[derive(Debug, Clone)]
pub struct ReplayTransport {
    body: Bytes,
    chunk_size: usize,
    requests: Vec<Request>,
}

impl ReplayTransport {
    pub fn new(body: impl Into<Bytes>) -> Self {
        Self {
            body: body.into(),
            chunk_size: usize::MAX,
            requests: Vec::new(),
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Requests received so far, oldest first.
    pub fn requests(&self) -> &[Request] {
        &self.requests
    }
}

impl Transport for ReplayTransport {
    fn post(&mut self, request: &Request) -> Result<Vec<u8>> {
        self.requests.push(request.clone());
        Ok(self.body.to_vec())
    }

    fn stream(&mut self, request: &Request, on_chunk: &mut ChunkHandler<'_>) -> Result<()> {
        self.requests.push(request.clone());
        for chunk in self.body.chunks(self.chunk_size) {
            trace!(len = chunk.len(), "replaying chunk");
            on_chunk(chunk)?;
        }
        Ok(())
    }
}
