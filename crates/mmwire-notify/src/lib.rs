//! Notification dispatch for decoded frames.
//!
//! Maps channel tags to a notification severity and forwards payloads to a
//! caller-supplied [`NotificationSink`]. Tags with no severity are skipped so
//! newer backends can add channels without breaking older dashboards.
//!
//! [`HandlerRegistry`] is the explicit registration table for named
//! component callbacks.

pub mod dispatch;
pub mod error;
pub mod registry;
pub mod severity;

pub use dispatch::{Dispatcher, Notification, NotificationLog, NotificationSink};
pub use error::{NotifyError, Result};
pub use registry::{HandlerRegistry, HandlerTable};
pub use severity::Severity;
