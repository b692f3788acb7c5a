/// Errors raised by the handler registry.
#[derive(Debug, thiserror::Error)]
pub enum NotifyError {
    /// A component with this name is already registered.
    #[error("component {0:?} is already registered")]
    DuplicateComponent(String),

    /// Component names must be non-empty.
    #[error("component name must not be empty")]
    EmptyComponentName,
}

pub type Result<T> = std::result::Result<T, NotifyError>;
