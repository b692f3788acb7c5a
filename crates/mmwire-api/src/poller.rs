//! Periodic livelist refresh.

use std::time::{Duration, Instant};

use tracing::trace;

use crate::command::Command;

/// Default interval between livelist refreshes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(1);

/// Polling state for the deploy livelist view.
///
/// The view binds with [`start`](Self::start) and unbinds with
/// [`stop`](Self::stop). The owner calls [`poll`](Self::poll) from its event
/// loop; it yields a `GetLivelist` command whenever a refresh is due and a
/// deploy is selected. The first poll after `start` is due immediately.
#[derive(Debug, Clone)]
pub struct LivelistPoller {
    interval: Duration,
    deploy: Option<String>,
    next_due: Option<Instant>,
}

impl Default for LivelistPoller {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}

impl LivelistPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            deploy: None,
            next_due: None,
        }
    }

    /// Begin polling. Restarting an active poller resets its schedule.
    pub fn start(&mut self, now: Instant) {
        self.next_due = Some(now);
    }

    pub fn stop(&mut self) {
        self.next_due = None;
    }

    pub fn is_running(&self) -> bool {
        self.next_due.is_some()
    }

    /// Select the deploy to refresh. `None` or an empty name pauses requests
    /// without stopping the schedule.
    pub fn set_deploy(&mut self, deploy: Option<String>) {
        self.deploy = deploy.filter(|name| !name.is_empty());
    }

    pub fn deploy(&self) -> Option<&str> {
        self.deploy.as_deref()
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// When the next refresh is due, if running.
    pub fn next_due(&self) -> Option<Instant> {
        self.next_due
    }

    /// Advance the schedule to `now`.
    ///
    /// A tick is consumed even when no deploy is selected, matching a timer
    /// that fires and finds nothing to do. When the next tick would fall
    /// outside the clock's range the poller stops after this one.
    pub fn poll(&mut self, now: Instant) -> Option<Command> {
        let due = self.next_due?;
        if now < due {
            return None;
        }
        self.next_due = now.checked_add(self.interval);

        let deploy = self.deploy.clone()?;
        trace!(%deploy, "livelist refresh due");
        Some(Command::GetLivelist { deploy })
    }
}
