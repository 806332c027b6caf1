//! Delayed task scheduling.
//!
//! The simulator never sleeps itself; it hands a task and a delay to a
//! [`Scheduler`]. Production code uses [`TokioScheduler`]. Tests use
//! [`ManualScheduler`], which only runs tasks when its virtual clock is
//! advanced and doubles as the store's [`Clock`].

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::{DateTime, TimeDelta, Utc};
use thermal_store::Clock;

/// A unit of deferred work.
pub type ScheduledTask = Pin<Box<dyn Future<Output = ()> + Send + 'static>>;

/// Registers tasks to run after a delay. Must not block the caller.
pub trait Scheduler: Send + Sync {
    fn schedule(&self, delay: Duration, task: ScheduledTask);
}

/// Runs each task on its own Tokio task after sleeping for the delay.
///
/// Must be used from within a Tokio runtime.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioScheduler;

impl Scheduler for TokioScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) {
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            task.await;
        });
    }
}

struct PendingTask {
    due: Duration,
    seq: u64,
    task: ScheduledTask,
}

#[derive(Default)]
struct ManualState {
    elapsed: Duration,
    next_seq: u64,
    queue: Vec<PendingTask>,
}

/// Scheduler driven by an explicit virtual clock.
pub struct ManualScheduler {
    origin: DateTime<Utc>,
    inner: Mutex<ManualState>,
}

impl fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        f.debug_struct("ManualScheduler")
            .field("origin", &self.origin)
            .field("elapsed", &state.elapsed)
            .field("pending", &state.queue.len())
            .finish()
    }
}

impl Default for ManualScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::starting_at(Utc::now())
    }

    /// Virtual time zero maps to `origin` when used as a [`Clock`].
    pub fn starting_at(origin: DateTime<Utc>) -> Self {
        Self {
            origin,
            inner: Mutex::new(ManualState::default()),
        }
    }

    fn lock(&self) -> MutexGuard<'_, ManualState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Virtual time elapsed since construction.
    pub fn elapsed(&self) -> Duration {
        self.lock().elapsed
    }

    /// Number of tasks waiting to become due.
    pub fn pending(&self) -> usize {
        self.lock().queue.len()
    }

    /// Move virtual time forward, running every task that falls due on the
    /// way in due-time order (registration order for ties). Tasks scheduled
    /// by a running task are picked up if they fall due within the window.
    /// Returns the number of tasks run.
    pub async fn advance(&self, by: Duration) -> usize {
        let target = self.lock().elapsed + by;
        let mut ran = 0;
        while let Some(task) = self.pop_due(target) {
            task.await;
            ran += 1;
        }
        self.lock().elapsed = target;
        ran
    }

    fn pop_due(&self, limit: Duration) -> Option<ScheduledTask> {
        let mut state = self.lock();
        let index = state
            .queue
            .iter()
            .enumerate()
            .filter(|(_, pending)| pending.due <= limit)
            .min_by_key(|(_, pending)| (pending.due, pending.seq))
            .map(|(index, _)| index)?;
        let pending = state.queue.swap_remove(index);
        state.elapsed = state.elapsed.max(pending.due);
        Some(pending.task)
    }
}

impl Scheduler for ManualScheduler {
    fn schedule(&self, delay: Duration, task: ScheduledTask) {
        let mut state = self.lock();
        let due = state.elapsed + delay;
        let seq = state.next_seq;
        state.next_seq += 1;
        state.queue.push(PendingTask { due, seq, task });
    }
}

impl Clock for ManualScheduler {
    fn now(&self) -> DateTime<Utc> {
        let elapsed = TimeDelta::from_std(self.elapsed()).unwrap_or_else(|_| TimeDelta::zero());
        self.origin + elapsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn recorder(log: &Arc<Mutex<Vec<&'static str>>>, label: &'static str) -> ScheduledTask {
        let log = Arc::clone(log);
        Box::pin(async move {
            log.lock().unwrap().push(label);
        })
    }

    #[tokio::test]
    async fn runs_tasks_in_due_order_only_when_due() {
        let scheduler = ManualScheduler::new();
        let log = Arc::new(Mutex::new(Vec::new()));
        scheduler.schedule(Duration::from_secs(2), recorder(&log, "slow"));
        scheduler.schedule(Duration::from_secs(1), recorder(&log, "fast"));
        scheduler.schedule(Duration::from_secs(1), recorder(&log, "fast-second"));

        assert_eq!(scheduler.advance(Duration::from_millis(999)).await, 0);
        assert_eq!(scheduler.pending(), 3);

        assert_eq!(scheduler.advance(Duration::from_millis(1)).await, 2);
        assert_eq!(*log.lock().unwrap(), vec!["fast", "fast-second"]);

        assert_eq!(scheduler.advance(Duration::from_secs(5)).await, 1);
        assert_eq!(scheduler.pending(), 0);
        assert_eq!(scheduler.elapsed(), Duration::from_secs(6));
    }

    #[test]
    fn clock_follows_virtual_time() {
        let origin = DateTime::parse_from_rfc3339("2024-01-01T00:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let scheduler = ManualScheduler::starting_at(origin);
        assert_eq!(scheduler.now(), origin);

        let rt = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        rt.block_on(scheduler.advance(Duration::from_secs(90)));
        assert_eq!(scheduler.now(), origin + TimeDelta::seconds(90));
    }
}
