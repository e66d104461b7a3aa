//! Time Tracker Library
//!
//! This library provides the core functionality for the time tracker CLI.
//! It includes:
//! - Timer store driving the work/break state machine
//! - Snapshot persistence through a key-value storage
//! - Tick scheduling on a single-threaded runtime
//! - Phase change notifiers, including sound playback
//! - CLI command parsing, display, and the interactive session
//! - Type definitions for configuration and state

pub mod cli;
pub mod notifier;
pub mod scheduler;
pub mod sound;
pub mod storage;
pub mod store;
pub mod types;

// Re-export commonly used types for convenience
pub use types::{Phase, TimerData, TimerState, TrackerConfig};

pub use notifier::{BellNotifier, MockNotifier, Notifier, SilentNotifier};
pub use scheduler::{IntervalScheduler, ManualScheduler, Scheduler, TickHandle};
pub use storage::{FileStorage, MemoryStorage, Storage, StorageError};
pub use store::{SubscriptionId, TimerStore, TimerStoreBuilder};

// Re-export sound types
pub use sound::{try_create_notifier, AudioNotifier, SoundError, SoundSource};
