//! Debounced search trigger.
//!
//! Raw input events schedule at most one search per 500 ms of inactivity.
//! Cancellation is two-layered: a generation counter makes the controller
//! discard late firings of superseded schedules (last write wins even if the
//! scheduler ever raced), and a [`CancellationToken`] stops the pending
//! timer task outright so it never wakes at all in the common case.

use crate::controller::Event;
use tokio::sync::mpsc::UnboundedSender;
use tokio::time::Duration;
use tokio_util::sync::CancellationToken;

/// Inactivity window before a scheduled search fires.
pub const DEBOUNCE_DELAY: Duration = Duration::from_millis(500);

/// Generation counter deciding which scheduled firing is still current.
///
/// Every [`schedule`](Self::schedule) hands out a fresh generation; every
/// [`cancel`](Self::cancel) invalidates all outstanding ones. A firing is
/// honored only if its generation is still the latest.
#[derive(Debug, Default)]
pub struct DebouncedTrigger {
    generation: u64,
}

impl DebouncedTrigger {
    /// Invalidate any outstanding schedule and arm a new one, returning the
    /// generation the eventual firing must present.
    pub fn schedule(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Invalidate any outstanding schedule.
    pub fn cancel(&mut self) {
        self.generation += 1;
    }

    /// Whether a firing with this generation is still the current one.
    pub fn accepts(&self, generation: u64) -> bool {
        generation == self.generation
    }
}

/// Timer half of the trigger: spawns a sleep task per schedule and delivers
/// the firing back into the controller's event queue.
#[derive(Debug)]
pub(crate) struct DebounceScheduler {
    events: UnboundedSender<Event>,
    pending: Option<CancellationToken>,
}

impl DebounceScheduler {
    pub(crate) fn new(events: UnboundedSender<Event>) -> Self {
        Self {
            events,
            pending: None,
        }
    }

    /// Cancel the pending timer, if any, and start a new one. Requires a
    /// tokio runtime.
    pub(crate) fn schedule(&mut self, generation: u64, delay: Duration) {
        self.cancel();
        let token = CancellationToken::new();
        let guard = token.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            tokio::select! {
                () = guard.cancelled() => {}
                () = tokio::time::sleep(delay) => {
                    // The receiver dropping just means the session is over.
                    let _ = events.send(Event::DebounceElapsed { generation });
                }
            }
        });
        self.pending = Some(token);
    }

    /// Cancel the pending timer, if any.
    pub(crate) fn cancel(&mut self) {
        if let Some(token) = self.pending.take() {
            token.cancel();
        }
    }
}
