//! Timer primitives: a cancellable repeating poll timer and a single-slot
//! debouncer.

use std::future::Future;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Cancels its timer when cancelled explicitly or dropped.
#[derive(Debug)]
pub struct TimerHandle {
    token: CancellationToken,
}

impl TimerHandle {
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }
}

impl Drop for TimerHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

pub struct PollTimer;

impl PollTimer {
    /// Calls `on_tick` every `interval`, first after one full interval, until the
    /// returned handle is cancelled or dropped. A late tick is delayed rather
    /// than fired in a burst.
    pub fn start<F>(runtime: &Handle, interval: Duration, mut on_tick: F) -> TimerHandle
    where
        F: FnMut() + Send + 'static,
    {
        let token = CancellationToken::new();
        let child = token.clone();
        runtime.spawn(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    biased;
                    _ = child.cancelled() => break,
                    _ = ticker.tick() => on_tick(),
                }
            }
        });
        TimerHandle { token }
    }
}

/// Holds at most one pending task. Scheduling a new one cancels the previous
/// task if it is still waiting out its delay; a task that already started runs
/// to completion.
pub struct Debouncer {
    runtime: Handle,
    pending: Option<CancellationToken>,
}

impl Debouncer {
    pub fn new(runtime: Handle) -> Self {
        Self {
            runtime,
            pending: None,
        }
    }

    pub fn schedule<F>(&mut self, delay: Duration, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let token = CancellationToken::new();
        if let Some(previous) = self.pending.replace(token.clone()) {
            previous.cancel();
        }
        self.runtime.spawn(async move {
            tokio::select! {
                biased;
                _ = token.cancelled() => return,
                _ = tokio::time::sleep(delay) => {}
            }
            task.await;
        });
    }

    /// Drops the pending task, if it has not started yet.
    pub fn cancel(&mut self) {
        if let Some(pending) = self.pending.take() {
            pending.cancel();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
