use mmwire_frame::{Frame, FrameSink};
use serde::Serialize;
use tracing::debug;

use crate::severity::Severity;

/// A notification surface, such as a toast area or a log pane.
pub trait NotificationSink {
    fn notify(&mut self, message: &str, severity: Severity);
}

impl<F> NotificationSink for F
where
    F: FnMut(&str, Severity),
{
    fn notify(&mut self, message: &str, severity: Severity) {
        self(message, severity)
    }
}

/// One delivered notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub severity: Severity,
    pub message: String,
}

/// Sink that records every notification in order.
#[derive(Debug, Default, Clone)]
pub struct NotificationLog {
    entries: Vec<Notification>,
}

impl NotificationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn into_entries(self) -> Vec<Notification> {
        self.entries
    }

    /// True when any recorded notification is an error.
    pub fn has_errors(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.severity == Severity::Error)
    }
}

impl NotificationSink for NotificationLog {
    fn notify(&mut self, message: &str, severity: Severity) {
        self.entries.push(Notification {
            severity,
            message: message.to_string(),
        });
    }
}

/// Routes decoded frames to a [`NotificationSink`] by channel tag.
///
/// Implements [`FrameSink`], so it can be handed straight to
/// `FrameDecoder::feed`.
#[derive(Debug)]
pub struct Dispatcher<S> {
    sink: S,
    delivered: usize,
    ignored: usize,
}

impl<S: NotificationSink> Dispatcher<S> {
    pub fn new(sink: S) -> Self {
        Self {
            sink,
            delivered: 0,
            ignored: 0,
        }
    }

    /// Deliver one frame. Returns the severity used, or `None` when the tag
    /// is not a notification channel.
    pub fn dispatch(&mut self, frame: &Frame) -> Option<Severity> {
        let Some(severity) = Severity::from_tag(frame.channel) else {
            self.ignored += 1;
            debug!(
                channel = %frame.channel,
                len = frame.payload.len(),
                "ignoring frame on unknown channel"
            );
            return None;
        };
        self.sink.notify(&frame.text_lossy(), severity);
        self.delivered += 1;
        Some(severity)
    }

    /// Frames delivered to the sink so far.
    pub fn delivered(&self) -> usize {
        self.delivered
    }

    /// Frames skipped because their tag has no severity.
    pub fn ignored(&self) -> usize {
        self.ignored
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }
}

impl<S: NotificationSink> FrameSink for Dispatcher<S> {
    fn on_frame(&mut self, frame: Frame, _is_final: bool) {
        self.dispatch(&frame);
    }
}
