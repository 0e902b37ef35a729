//! Cancellable deadline timers.
//!
//! A timer is a tokio task that sleeps and then posts a [`DeadlineFired`]
//! message. It never touches session state itself; the registry applies the
//! message under the session lock, where the stamp check discards anything
//! stale.

use crate::{DeadlineStamp, RoomId};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

/// A deadline that elapsed.
#[derive(Debug, Clone, PartialEq, Eq, derive_new::new)]
pub struct DeadlineFired {
    /// Room whose session armed the deadline.
    pub room: RoomId,
    /// Stamp the deadline was armed with.
    pub stamp: DeadlineStamp,
}

/// Handle to an armed deadline.
#[derive(Debug)]
pub struct TimerHandle {
    stamp: DeadlineStamp,
    task: JoinHandle<()>,
}

impl TimerHandle {
    /// Stops the timer. Harmless if it already fired.
    pub fn cancel(self) {
        debug!(stamp = ?self.stamp, "Cancelling deadline timer");
        self.task.abort();
    }
}

/// Spawns deadline timers that report to one channel.
#[derive(Debug, Clone)]
pub struct DeadlineScheduler {
    tx: mpsc::UnboundedSender<DeadlineFired>,
}

impl DeadlineScheduler {
    /// Creates a scheduler and the receiver its timers post to.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DeadlineFired>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Arms a timer that fires `stamp` for `room` after `after`.
    #[instrument(skip(self), fields(room = %room))]
    pub fn arm(&self, room: RoomId, stamp: DeadlineStamp, after: Duration) -> TimerHandle {
        let tx = self.tx.clone();
        let task = tokio::spawn(async move {
            tokio::time::sleep(after).await;
            if tx.send(DeadlineFired::new(room, stamp)).is_err() {
                debug!(?stamp, "Deadline fired after registry shut down");
            }
        });
        TimerHandle { stamp, task }
    }
}
