//! Manually advanced fake clock.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use super::{Scheduler, TickCallback, TickHandle};

struct Task {
    handle: TickHandle,
    interval: Duration,
    next_due: Duration,
    /// Taken out while the callback runs.
    callback: Option<TickCallback>,
}

/// A scheduler whose clock only moves when [`ManualScheduler::advance`] is
/// called.
///
/// Callbacks fire in due order, one interval at a time, so advancing by ten
/// seconds fires a one-second task exactly ten times. A callback may cancel
/// itself or schedule new tasks while it runs.
#[derive(Default)]
pub struct ManualScheduler {
    now: Cell<Duration>,
    next_id: Cell<u64>,
    tasks: RefCell<Vec<Task>>,
}

impl ManualScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Time elapsed on the fake clock.
    #[must_use]
    pub fn now(&self) -> Duration {
        self.now.get()
    }

    /// Number of live (not cancelled) tasks.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.tasks.borrow().len()
    }

    /// Moves the clock forward by `by`, firing every callback that falls due.
    pub fn advance(&self, by: Duration) {
        let target = self.now.get() + by;

        while let Some((handle, due)) = self.next_due(target) {
            self.now.set(due);

            let callback = {
                let mut tasks = self.tasks.borrow_mut();
                tasks.iter_mut().find(|t| t.handle == handle).and_then(|task| {
                    task.next_due += task.interval;
                    task.callback.take()
                })
            };

            if let Some(mut callback) = callback {
                callback();
                let mut tasks = self.tasks.borrow_mut();
                if let Some(task) = tasks.iter_mut().find(|t| t.handle == handle) {
                    task.callback = Some(callback);
                }
            }
        }

        self.now.set(target);
    }

    /// Advances the clock by whole seconds.
    pub fn advance_secs(&self, secs: u64) {
        self.advance(Duration::from_secs(secs));
    }

    fn next_due(&self, target: Duration) -> Option<(TickHandle, Duration)> {
        self.tasks
            .borrow()
            .iter()
            .filter(|t| t.callback.is_some() && t.next_due <= target)
            .min_by_key(|t| (t.next_due, t.handle.id()))
            .map(|t| (t.handle, t.next_due))
    }
}

impl Scheduler for ManualScheduler {
    fn schedule_repeating(&self, interval: Duration, callback: TickCallback) -> TickHandle {
        // A zero interval would fire forever within a single advance.
        let interval = interval.max(Duration::from_millis(1));

        let id = self.next_id.get();
        self.next_id.set(id + 1);
        let handle = TickHandle::new(id);

        self.tasks.borrow_mut().push(Task {
            handle,
            interval,
            next_due: self.now.get() + interval,
            callback: Some(callback),
        });
        handle
    }

    fn cancel(&self, handle: TickHandle) {
        self.tasks.borrow_mut().retain(|t| t.handle != handle);
    }
}

impl std::fmt::Debug for ManualScheduler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualScheduler")
            .field("now", &self.now.get())
            .field("active", &self.active_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::rc::Rc;

    fn counter() -> (Rc<Cell<u32>>, TickCallback) {
        let count = Rc::new(Cell::new(0));
        let inner = Rc::clone(&count);
        (count, Box::new(move || inner.set(inner.get() + 1)))
    }

    #[test]
    fn test_nothing_fires_before_first_interval() {
        let scheduler = ManualScheduler::new();
        let (count, callback) = counter();
        scheduler.schedule_repeating(Duration::from_secs(1), callback);

        scheduler.advance(Duration::from_millis(999));
        assert_eq!(count.get(), 0);

        scheduler.advance(Duration::from_millis(1));
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_fires_once_per_interval() {
        let scheduler = ManualScheduler::new();
        let (count, callback) = counter();
        scheduler.schedule_repeating(Duration::from_secs(1), callback);

        scheduler.advance_secs(10);
        assert_eq!(count.get(), 10);
        assert_eq!(scheduler.now(), Duration::from_secs(10));
    }

    #[test]
    fn test_cancel_stops_callback() {
        let scheduler = ManualScheduler::new();
        let (count, callback) = counter();
        let handle = scheduler.schedule_repeating(Duration::from_secs(1), callback);

        scheduler.advance_secs(2);
        scheduler.cancel(handle);
        scheduler.advance_secs(5);

        assert_eq!(count.get(), 2);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_cancel_unknown_handle_is_ignored() {
        let scheduler = ManualScheduler::new();
        scheduler.cancel(TickHandle::new(42));
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_independent_tasks_interleave() {
        let scheduler = ManualScheduler::new();
        let (fast, fast_cb) = counter();
        let (slow, slow_cb) = counter();
        scheduler.schedule_repeating(Duration::from_millis(500), fast_cb);
        scheduler.schedule_repeating(Duration::from_secs(2), slow_cb);

        scheduler.advance_secs(4);
        assert_eq!(fast.get(), 8);
        assert_eq!(slow.get(), 2);
    }

    #[test]
    fn test_callback_can_cancel_itself() {
        let scheduler = Rc::new(ManualScheduler::new());
        let count = Rc::new(Cell::new(0));
        let handle_slot: Rc<Cell<Option<TickHandle>>> = Rc::new(Cell::new(None));

        let callback: TickCallback = {
            let scheduler = Rc::clone(&scheduler);
            let count = Rc::clone(&count);
            let handle_slot = Rc::clone(&handle_slot);
            Box::new(move || {
                count.set(count.get() + 1);
                if count.get() == 3 {
                    if let Some(handle) = handle_slot.get() {
                        scheduler.cancel(handle);
                    }
                }
            })
        };
        handle_slot.set(Some(
            scheduler.schedule_repeating(Duration::from_secs(1), callback),
        ));

        scheduler.advance_secs(10);
        assert_eq!(count.get(), 3);
        assert_eq!(scheduler.active_count(), 0);
    }

    #[test]
    fn test_handles_are_unique() {
        let scheduler = ManualScheduler::new();
        let a = scheduler.schedule_repeating(Duration::from_secs(1), Box::new(|| {}));
        let b = scheduler.schedule_repeating(Duration::from_secs(1), Box::new(|| {}));
        assert_ne!(a, b);
        assert_eq!(scheduler.active_count(), 2);
    }
}
