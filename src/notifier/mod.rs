//! Phase change notifiers.
//!
//! The store only depends on the [`Notifier`] trait. Implementations:
//!
//! - [`crate::sound::AudioNotifier`]: plays a chime through rodio
//! - [`BellNotifier`]: rings the terminal bell
//! - [`SilentNotifier`]: does nothing (headless use, `--no-sound`)
//! - [`MockNotifier`]: counts calls, for tests

use std::cell::Cell;
use std::io::Write;
use std::rc::Rc;

use tracing::{debug, warn};

/// Emits an audible alert on a phase change.
pub trait Notifier {
    /// Plays the alert once from the start.
    ///
    /// Does nothing if the previous alert is still playing. Never fails;
    /// implementations log and swallow their own errors.
    fn notify(&self);
}

impl<N: Notifier + ?Sized> Notifier for Rc<N> {
    fn notify(&self) {
        (**self).notify()
    }
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self) {
        (**self).notify()
    }
}

// ============================================================================
// SilentNotifier
// ============================================================================

/// A notifier that does nothing.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

impl Notifier for SilentNotifier {
    fn notify(&self) {
        debug!("Silent notifier, skipping alert");
    }
}

// ============================================================================
// BellNotifier
// ============================================================================

/// Rings the terminal bell (`\x07`) on stdout.
#[derive(Debug, Default, Clone, Copy)]
pub struct BellNotifier;

impl Notifier for BellNotifier {
    fn notify(&self) {
        let mut stdout = std::io::stdout();
        if let Err(e) = stdout.write_all(b"\x07").and_then(|()| stdout.flush()) {
            warn!("Failed to ring terminal bell: {}", e);
        }
    }
}

// ============================================================================
// MockNotifier
// ============================================================================

/// Mock notifier for testing.
///
/// Records every call. While [`MockNotifier::set_playing`] is true the mock
/// behaves like an alert that has not finished yet and ignores calls.
#[derive(Debug, Default)]
pub struct MockNotifier {
    calls: Cell<usize>,
    skipped: Cell<usize>,
    playing: Cell<bool>,
}

impl MockNotifier {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of alerts that were played.
    #[must_use]
    pub fn notify_count(&self) -> usize {
        self.calls.get()
    }

    /// Number of calls ignored because an alert was still playing.
    #[must_use]
    pub fn skipped_count(&self) -> usize {
        self.skipped.get()
    }

    pub fn set_playing(&self, playing: bool) {
        self.playing.set(playing);
    }
}

impl Notifier for MockNotifier {
    fn notify(&self) {
        if self.playing.get() {
            self.skipped.set(self.skipped.get() + 1);
            return;
        }
        self.calls.set(self.calls.get() + 1);
    }
}
