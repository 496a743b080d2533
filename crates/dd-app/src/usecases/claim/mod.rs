//! Timed claim sequence.
//!
//! Publishes progress from 0 to 100 over the configured duration, waits the
//! settle delay and then hands control to a completion callback. Cancelling
//! or dropping the sequence before that point guarantees the callback never
//! runs.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep, Instant};
use tracing::debug;

use dd_core::claim::{ClaimPhase, ClaimProgress, ClaimTiming};

const MIN_TICK: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct ClaimSequencer {
    timing: ClaimTiming,
}

impl ClaimSequencer {
    pub fn new(timing: ClaimTiming) -> Self {
        Self { timing }
    }

    pub fn timing(&self) -> ClaimTiming {
        self.timing
    }

    /// Start a sequence. `on_complete` runs on its own task once progress
    /// reached 100 and the settle delay elapsed.
    pub fn start<F, Fut>(&self, on_complete: F) -> ClaimSequence
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let timing = self.timing;
        let (sender, progress) = watch::channel(ClaimProgress::started());
        let sender = Arc::new(sender);
        let task_sender = Arc::clone(&sender);
        let period = timing.tick.max(MIN_TICK);
        let first_tick = Instant::now() + period;

        let handle = tokio::spawn(async move {
            let ticks = timing.tick_count();
            let mut interval = interval_at(first_tick, period);

            for tick in 1..=ticks {
                interval.tick().await;
                task_sender.send_replace(ClaimProgress::at_tick(tick, ticks));
            }

            sleep(timing.settle).await;
            debug!(ticks, "claim sequence complete");
            // Detached: the callback may stop this sequence.
            tokio::spawn(on_complete());
        });

        ClaimSequence {
            progress,
            sender,
            handle,
        }
    }
}

/// Handle to a running claim sequence. Dropping it cancels the sequence.
#[derive(Debug)]
pub struct ClaimSequence {
    progress: watch::Receiver<ClaimProgress>,
    sender: Arc<watch::Sender<ClaimProgress>>,
    handle: JoinHandle<()>,
}

impl ClaimSequence {
    pub fn progress(&self) -> watch::Receiver<ClaimProgress> {
        self.progress.clone()
    }

    pub fn current(&self) -> ClaimProgress {
        *self.progress.borrow()
    }

    /// Stop the sequence. Watchers see `Cancelled` unless progress had
    /// already completed.
    pub fn cancel(&self) {
        self.handle.abort();
        self.sender.send_if_modified(|progress| {
            if progress.phase == ClaimPhase::Running {
                progress.phase = ClaimPhase::Cancelled;
                true
            } else {
                false
            }
        });
    }

    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for ClaimSequence {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
