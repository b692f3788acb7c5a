/// Errors that can occur while building or running a command.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Decoding the streamed response failed.
    #[error("frame error: {0}")]
    Frame(#[from] mmwire_frame::FrameError),

    /// JSON serialization/deserialization error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// The transport collaborator reported a failure.
    #[error("transport error: {0}")]
    Transport(String),

    /// The command needs a machine or deploy name and none was given.
    #[error("{command} requires a {target} name")]
    MissingTarget {
        command: &'static str,
        target: &'static str,
    },

    /// A target was given to a command that takes none.
    #[error("{0} takes no target")]
    UnexpectedTarget(&'static str),

    /// No command with this name exists.
    #[error("unknown command: {0}")]
    UnknownCommand(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;
