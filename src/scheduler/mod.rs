//! Repeating tick scheduling.
//!
//! The store never touches a clock directly. It asks a [`Scheduler`] for a
//! repeating callback and keeps the returned [`TickHandle`] until it cancels
//! it.
//!
//! - [`IntervalScheduler`]: tokio local tasks driven by `tokio::time::interval`
//! - [`ManualScheduler`]: a fake clock advanced by hand, for tests
//!
//! Both are single-threaded: callbacks are not `Send` and run on the thread
//! that owns the store.

mod interval;
mod manual;

use std::rc::Rc;
use std::time::Duration;

pub use interval::IntervalScheduler;
pub use manual::ManualScheduler;

/// Callback fired on every tick.
pub type TickCallback = Box<dyn FnMut()>;

/// Opaque identifier of a scheduled repeating callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TickHandle(u64);

impl TickHandle {
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw identifier.
    pub fn id(&self) -> u64 {
        self.0
    }
}

/// Schedules repeating callbacks.
pub trait Scheduler {
    /// Calls `callback` every `interval`, first after one full interval.
    fn schedule_repeating(&self, interval: Duration, callback: TickCallback) -> TickHandle;

    /// Stops a callback. Unknown or already cancelled handles are ignored.
    fn cancel(&self, handle: TickHandle);
}

impl<S: Scheduler + ?Sized> Scheduler for Rc<S> {
    fn schedule_repeating(&self, interval: Duration, callback: TickCallback) -> TickHandle {
        (**self).schedule_repeating(interval, callback)
    }

    fn cancel(&self, handle: TickHandle) {
        (**self).cancel(handle)
    }
}

impl<S: Scheduler + ?Sized> Scheduler for Box<S> {
    fn schedule_repeating(&self, interval: Duration, callback: TickCallback) -> TickHandle {
        (**self).schedule_repeating(interval, callback)
    }

    fn cancel(&self, handle: TickHandle) {
        (**self).cancel(handle)
    }
}
