//! One-second tick scheduling.
//!
//! The engine itself never schedules anything; a [`Ticker`] owns the one
//! background task that delivers tick signals over a channel. Starting a
//! ticker cancels any previous task first, so at most one tick source is
//! ever live, and dropping the ticker aborts the task.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Cancellable source of 1-second tick signals.
///
/// Must be used from within a tokio runtime.
#[derive(Debug, Default)]
pub struct Ticker {
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    pub fn new() -> Self {
        Self { handle: None }
    }

    /// Spawn the tick task, cancelling any previous one first. Signals
    /// are sent on `tx` once per second; the task exits when the
    /// receiving side is dropped.
    pub fn start(&mut self, tx: mpsc::UnboundedSender<()>) {
        self.cancel();
        self.handle = Some(tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_secs(1));
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);
            // The first tick of a tokio interval fires immediately;
            // consume it so the first signal arrives after one second.
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(()).is_err() {
                    break;
                }
            }
        }));
    }

    /// Abort the tick task if one is live. Safe to call repeatedly.
    pub fn cancel(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_active(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.cancel();
    }
}
