/// Errors that can occur during frame encoding/decoding.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The 8-digit length field is not plain hexadecimal.
    #[error("invalid frame length field {field:?} (expected 8 hex digits)")]
    InvalidLength { field: String },

    /// The declared payload exceeds the configured maximum size.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// The stream ended while a header or payload was still incomplete.
    #[error("stream truncated mid-frame ({available} of {expected} bytes received)")]
    Truncated { expected: usize, available: usize },

    /// The decoder already failed and refuses further input.
    #[error("decoder aborted by an earlier error")]
    Aborted,

    /// Input arrived after the final chunk of the stream.
    #[error("stream already finished")]
    Finished,

    /// An I/O error occurred while reading or writing frames.
    #[error("frame I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The underlying writer stopped accepting bytes.
    #[error("connection closed (incomplete frame)")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
