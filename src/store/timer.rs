//! Timer store for the time tracker.
//!
//! This module owns the live [`TimerState`] and everything that happens
//! around a transition:
//! - Restoring the persisted snapshot at construction
//! - Scheduling and cancelling the one-second tick
//! - Ringing the notifier on a phase swap
//! - Persisting after every mutation
//! - Notifying subscribers synchronously after every change

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, info};

use super::persistence::{load_snapshot, save_snapshot};
use crate::notifier::Notifier;
use crate::scheduler::{Scheduler, TickHandle};
use crate::storage::Storage;
use crate::types::{Phase, TimerData, TimerState};

/// Default countdown cadence.
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Callback invoked with the new state after every change.
pub type Subscriber = Box<dyn FnMut(&TimerState)>;

/// Identifies a subscription for [`TimerStore::unsubscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

// ============================================================================
// TimerStoreBuilder
// ============================================================================

/// Builder for [`TimerStore`].
pub struct TimerStoreBuilder {
    defaults: TimerData,
    storage: Box<dyn Storage>,
    scheduler: Box<dyn Scheduler>,
    notifier: Option<Box<dyn Notifier>>,
    tick_interval: Duration,
}

impl TimerStoreBuilder {
    /// Sets the notifier rung on every phase swap.
    pub fn notifier(mut self, notifier: impl Notifier + 'static) -> Self {
        self.notifier = Some(Box::new(notifier));
        self
    }

    /// Overrides the tick cadence (one second by default).
    pub fn tick_interval(mut self, interval: Duration) -> Self {
        self.tick_interval = interval;
        self
    }

    /// Builds the store and restores the persisted snapshot.
    pub fn build(self) -> TimerStore {
        let restored = load_snapshot(&*self.storage, &self.defaults);
        debug!("Timer store restored: {:?}", restored);

        TimerStore {
            inner: Rc::new(StoreInner {
                defaults: self.defaults,
                state: RefCell::new(TimerState::new(&restored)),
                tick_handle: Cell::new(None),
                storage: self.storage,
                scheduler: self.scheduler,
                notifier: self.notifier,
                tick_interval: self.tick_interval,
                subscribers: RefCell::new(Vec::new()),
                next_subscription: Cell::new(0),
                emitting: Cell::new(false),
                emit_pending: Cell::new(false),
                removed_during_emit: RefCell::new(Vec::new()),
            }),
        }
    }
}

// ============================================================================
// TimerStore
// ============================================================================

struct StoreInner {
    /// Constructor defaults, restored by `reset`
    defaults: TimerData,
    state: RefCell<TimerState>,
    /// Live tick, at most one
    tick_handle: Cell<Option<TickHandle>>,
    storage: Box<dyn Storage>,
    scheduler: Box<dyn Scheduler>,
    notifier: Option<Box<dyn Notifier>>,
    tick_interval: Duration,
    subscribers: RefCell<Vec<(SubscriptionId, Subscriber)>>,
    next_subscription: Cell<u64>,
    /// Set while `emit` runs; subscribers are out of the list meanwhile
    emitting: Cell<bool>,
    /// A change happened during `emit` and still has to be delivered
    emit_pending: Cell<bool>,
    removed_during_emit: RefCell<Vec<SubscriptionId>>,
}

impl Drop for StoreInner {
    fn drop(&mut self) {
        if let Some(handle) = self.tick_handle.take() {
            self.scheduler.cancel(handle);
        }
    }
}

/// The timer state machine.
///
/// Cheap to clone; clones share the same state. All access happens on one
/// thread: commands and ticks each run to completion before the next one
/// starts. Commands that violate a guard are silent no-ops.
#[derive(Clone)]
pub struct TimerStore {
    inner: Rc<StoreInner>,
}

impl TimerStore {
    /// Starts building a store.
    ///
    /// `defaults` are the values used when nothing is persisted and the
    /// values `reset` returns to.
    pub fn builder(
        defaults: TimerData,
        storage: impl Storage + 'static,
        scheduler: impl Scheduler + 'static,
    ) -> TimerStoreBuilder {
        TimerStoreBuilder {
            defaults,
            storage: Box::new(storage),
            scheduler: Box::new(scheduler),
            notifier: None,
            tick_interval: TICK_INTERVAL,
        }
    }

    // ------------------------------------------------------------------------
    // Getters
    // ------------------------------------------------------------------------

    /// Returns the countdown formatted as `mm:ss`.
    pub fn timer_value(&self) -> String {
        self.snapshot().formatted()
    }

    /// Returns the remaining seconds.
    pub fn timer_seconds(&self) -> u32 {
        self.inner.state.borrow().remaining_seconds
    }

    /// Returns the work length in minutes.
    pub fn work_length(&self) -> u32 {
        self.inner.state.borrow().work_length
    }

    /// Returns the break length in minutes.
    pub fn break_length(&self) -> u32 {
        self.inner.state.borrow().break_length
    }

    /// Returns true while the countdown is ticking.
    pub fn is_running(&self) -> bool {
        self.inner.state.borrow().is_running
    }

    /// Returns true while the break phase is active.
    pub fn is_on_break(&self) -> bool {
        self.inner.state.borrow().on_break
    }

    /// Returns a copy of the whole state.
    pub fn snapshot(&self) -> TimerState {
        *self.inner.state.borrow()
    }

    // ------------------------------------------------------------------------
    // Commands
    // ------------------------------------------------------------------------

    /// Starts the countdown. No-op if already running.
    pub fn start_timer(&self) {
        if self.is_running() {
            return;
        }

        self.inner.state.borrow_mut().is_running = true;

        let weak: Weak<StoreInner> = Rc::downgrade(&self.inner);
        let handle = self.inner.scheduler.schedule_repeating(
            self.inner.tick_interval,
            Box::new(move || {
                if let Some(inner) = weak.upgrade() {
                    TimerStore { inner }.tick();
                }
            }),
        );
        self.inner.tick_handle.set(Some(handle));

        debug!("Timer started");
        self.emit();
    }

    /// Pauses the countdown. No-op if not running.
    pub fn pause_timer(&self) {
        if !self.is_running() {
            return;
        }

        self.cancel_tick();
        self.inner.state.borrow_mut().is_running = false;

        debug!("Timer paused");
        self.emit();
    }

    /// Sets the work length. See [`TimerStore::set_length`].
    pub fn set_work_length(&self, minutes: u32) {
        self.set_length(Phase::Work, minutes);
    }

    /// Sets the break length. See [`TimerStore::set_length`].
    pub fn set_break_length(&self, minutes: u32) {
        self.set_length(Phase::Break, minutes);
    }

    /// Sets the length of `phase`.
    ///
    /// Ignored while running or if `minutes` is outside 1-60. Editing the
    /// active phase reloads the countdown; editing the other one does not.
    pub fn set_length(&self, phase: Phase, minutes: u32) {
        let applied = self.inner.state.borrow_mut().set_length(phase, minutes);
        if !applied {
            debug!("Rejected {} length {}", phase.as_str(), minutes);
            return;
        }

        debug!("{} length set to {}", phase.as_str(), minutes);
        self.persist();
        self.emit();
    }

    /// Adds one minute to the work length.
    pub fn increment_work_length(&self) {
        self.set_work_length(self.work_length().saturating_add(1));
    }

    /// Removes one minute from the work length.
    pub fn decrement_work_length(&self) {
        self.set_work_length(self.work_length().saturating_sub(1));
    }

    /// Adds one minute to the break length.
    pub fn increment_break_length(&self) {
        self.set_break_length(self.break_length().saturating_add(1));
    }

    /// Removes one minute from the break length.
    pub fn decrement_break_length(&self) {
        self.set_break_length(self.break_length().saturating_sub(1));
    }

    /// Stops the countdown and restores the constructor defaults.
    ///
    /// The persisted snapshot is overwritten with the defaults too.
    pub fn reset(&self) {
        self.cancel_tick();
        self.inner.state.borrow_mut().restore(&self.inner.defaults);

        debug!("Timer reset to defaults");
        self.persist();
        self.emit();
    }

    // ------------------------------------------------------------------------
    // Subscriptions
    // ------------------------------------------------------------------------

    /// Registers `callback`, called with the new state after every change.
    ///
    /// Commands issued from inside a callback are applied at once; the state
    /// they produce is delivered to every subscriber after the current round
    /// of callbacks. A callback that changes the state on every call never
    /// lets the round finish.
    pub fn subscribe(&self, callback: impl FnMut(&TimerState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_subscription.get());
        self.inner.next_subscription.set(id.0 + 1);
        self.inner
            .subscribers
            .borrow_mut()
            .push((id, Box::new(callback)));
        id
    }

    /// Removes a subscription. Unknown ids are ignored.
    ///
    /// Takes effect immediately, even from inside a callback.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.inner
            .subscribers
            .borrow_mut()
            .retain(|(sub_id, _)| *sub_id != id);
        if self.inner.emitting.get() {
            self.inner.removed_during_emit.borrow_mut().push(id);
        }
    }

    // ------------------------------------------------------------------------
    // Internals
    // ------------------------------------------------------------------------

    /// One countdown step, fired by the scheduler.
    fn tick(&self) {
        let (swapped, state) = {
            let mut state = self.inner.state.borrow_mut();
            (state.tick(), *state)
        };

        if swapped {
            info!(
                "Phase changed to {} ({})",
                state.phase().as_str(),
                state.formatted()
            );
            if let Some(notifier) = &self.inner.notifier {
                notifier.notify();
            }
        }

        self.persist();
        self.emit();
    }

    fn cancel_tick(&self) {
        if let Some(handle) = self.inner.tick_handle.take() {
            self.inner.scheduler.cancel(handle);
        }
    }

    fn persist(&self) {
        let data = self.inner.state.borrow().to_data();
        save_snapshot(&*self.inner.storage, &data);
    }

    /// Delivers the current state to every subscriber.
    ///
    /// A change made by a callback is delivered in a further pass once the
    /// current one finishes, so every subscriber ends on the latest state.
    fn emit(&self) {
        if self.inner.emitting.get() {
            self.inner.emit_pending.set(true);
            return;
        }

        self.inner.emitting.set(true);
        loop {
            self.inner.emit_pending.set(false);
            let state = self.snapshot();

            // Taken out so callbacks may call back into the store.
            let mut running = std::mem::take(&mut *self.inner.subscribers.borrow_mut());
            for (id, callback) in running.iter_mut() {
                if !self.inner.removed_during_emit.borrow().contains(id) {
                    callback(&state);
                }
            }

            let mut slot = self.inner.subscribers.borrow_mut();
            let added = std::mem::replace(&mut *slot, running);
            slot.extend(added);
            let removed = std::mem::take(&mut *self.inner.removed_during_emit.borrow_mut());
            slot.retain(|(id, _)| !removed.contains(id));
            drop(slot);

            if !self.inner.emit_pending.get() {
                break;
            }
        }
        self.inner.emitting.set(false);
    }
}

impl std::fmt::Debug for TimerStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TimerStore")
            .field("state", &self.snapshot())
            .field("defaults", &self.inner.defaults)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Tests
// ============================================================================
