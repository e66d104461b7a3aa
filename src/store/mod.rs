//! Timer store module.
//!
//! This module contains the core of the tracker:
//! - `timer`: the [`TimerStore`] state machine, its commands and subscriptions
//! - `persistence`: lenient loading and saving of the persisted snapshot

pub mod persistence;
pub mod timer;

pub use persistence::{load_snapshot, save_snapshot, STORAGE_KEY};
pub use timer::{Subscriber, SubscriptionId, TimerStore, TimerStoreBuilder, TICK_INTERVAL};
