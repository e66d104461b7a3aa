//! Real-time scheduler backed by tokio local tasks.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::debug;

use super::{Scheduler, TickCallback, TickHandle};

/// Runs each repeating callback in its own `spawn_local` task.
///
/// Must be used from inside a [`tokio::task::LocalSet`]; the binary runs the
/// whole session in one on a `current_thread` runtime, so ticks and user
/// commands never run concurrently.
#[derive(Default)]
pub struct IntervalScheduler {
    next_id: Cell<u64>,
    tasks: RefCell<HashMap<TickHandle, JoinHandle<()>>>,
}

impl IntervalScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live (not cancelled) tasks.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tasks.borrow().len()
    }
}

impl Scheduler for IntervalScheduler {
    fn schedule_repeating(&self, interval: Duration, mut callback: TickCallback) -> TickHandle {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let handle = TickHandle::new(id);
        // tokio panics on a zero period
        let interval = interval.max(Duration::from_millis(1));

        let task = tokio::task::spawn_local(async move {
            let mut ticker = interval_at(Instant::now() + interval, interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                callback();
            }
        });

        debug!("Scheduled repeating tick {} every {:?}", id, interval);
        self.tasks.borrow_mut().insert(handle, task);
        handle
    }

    fn cancel(&self, handle: TickHandle) {
        if let Some(task) = self.tasks.borrow_mut().remove(&handle) {
            task.abort();
            debug!("Cancelled repeating tick {}", handle.id());
        }
    }
}

impl Drop for IntervalScheduler {
    fn drop(&mut self) {
        for (_, task) in self.tasks.get_mut().drain() {
            task.abort();
        }
    }
}

impl std::fmt::Debug for IntervalScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IntervalScheduler")
            .field("active", &self.active_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;
    use tokio::task::LocalSet;

    fn counter() -> (Rc<Cell<u32>>, TickCallback) {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        (count, Box::new(move || inner.set(inner.get() + 1)))
    }

    #[tokio::test]
    async fn test_ticks_repeatedly() {
        LocalSet::new()
            .run_until(async {
                let scheduler = IntervalScheduler::new();
                let (count, callback) = counter();
                scheduler.schedule_repeating(Duration::from_millis(50), callback);

                tokio::time::sleep(Duration::from_millis(280)).await;

                // ~5 ticks, allow for timing variance
                let ticks = count.get();
                assert!((3..=6).contains(&ticks), "Expected ~5 ticks, got {}", ticks);
            })
            .await;
    }

    #[tokio::test]
    async fn test_first_tick_waits_one_interval() {
        LocalSet::new()
            .run_until(async {
                let scheduler = IntervalScheduler::new();
                let (count, callback) = counter();
                scheduler.schedule_repeating(Duration::from_millis(200), callback);

                tokio::time::sleep(Duration::from_millis(50)).await;
                assert_eq!(count.get(), 0);
            })
            .await;
    }

    #[tokio::test]
    async fn test_cancel_stops_ticks() {
        LocalSet::new()
            .run_until(async {
                let scheduler = IntervalScheduler::new();
                let (count, callback) = counter();
                let handle = scheduler.schedule_repeating(Duration::from_millis(30), callback);

                tokio::time::sleep(Duration::from_millis(100)).await;
                scheduler.cancel(handle);
                assert_eq!(scheduler.active_count(), 0);

                let after_cancel = count.get();
                tokio::time::sleep(Duration::from_millis(150)).await;
                assert_eq!(count.get(), after_cancel);
            })
            .await;
    }

    #[tokio::test]
    async fn test_cancel_twice_is_ignored() {
        LocalSet::new()
            .run_until(async {
                let scheduler = IntervalScheduler::new();
                let handle =
                    scheduler.schedule_repeating(Duration::from_millis(30), Box::new(|| {}));
                scheduler.cancel(handle);
                scheduler.cancel(handle);
                assert_eq!(scheduler.active_count(), 0);
            })
            .await;
    }
}
