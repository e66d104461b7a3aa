//! Core data types for the time tracker.
//!
//! This module defines the data structures used for:
//! - The live timer state and its guarded transitions
//! - The persisted snapshot format
//! - Tracker configuration with validation
//! - `mm:ss` formatting of the countdown

use serde::{Deserialize, Serialize};

// ============================================================================
// Constants
// ============================================================================

/// Shortest configurable work or break length, in minutes.
pub const MIN_LENGTH_MINUTES: u32 = 1;

/// Longest configurable work or break length, in minutes.
pub const MAX_LENGTH_MINUTES: u32 = 60;

/// Largest value the countdown can hold, in seconds.
pub const MAX_TIMER_SECONDS: u32 = MAX_LENGTH_MINUTES * 60;

/// Returns true if `minutes` is an accepted work or break length.
pub fn is_valid_length(minutes: u32) -> bool {
    (MIN_LENGTH_MINUTES..=MAX_LENGTH_MINUTES).contains(&minutes)
}

/// Formats a number of seconds as `mm:ss`.
///
/// ```
/// use time_tracker::types::format_timer_value;
///
/// assert_eq!(format_timer_value(65), "01:05");
/// assert_eq!(format_timer_value(5), "00:05");
/// ```
pub fn format_timer_value(total_seconds: u32) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

// ============================================================================
// Phase
// ============================================================================

/// The two phases the timer alternates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// Work session
    Work,
    /// Break session
    Break,
}

impl Phase {
    /// Returns the string representation of the phase.
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Work => "work",
            Phase::Break => "break",
        }
    }

    /// Returns the opposite phase.
    pub fn other(&self) -> Phase {
        match self {
            Phase::Work => Phase::Break,
            Phase::Break => Phase::Work,
        }
    }
}

// ============================================================================
// TimerData
// ============================================================================

/// The persisted snapshot of the timer.
///
/// Serialized as `{"timerValue", "breakLength", "workLength", "onBreak"}`.
/// The running flag is not part of the snapshot; a restored timer is
/// always stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimerData {
    /// Remaining seconds in the current phase
    pub timer_value: u32,
    /// Break length in minutes
    pub break_length: u32,
    /// Work length in minutes
    pub work_length: u32,
    /// Whether the break phase is active
    pub on_break: bool,
}

impl Default for TimerData {
    fn default() -> Self {
        Self {
            timer_value: 25 * 60,
            break_length: 5,
            work_length: 25,
            on_break: false,
        }
    }
}

// ============================================================================
// TimerState
// ============================================================================

/// The live state of the timer.
///
/// Every transition here is pure; scheduling, persistence and notification
/// live in [`crate::store::TimerStore`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimerState {
    /// Remaining seconds in the current phase
    pub remaining_seconds: u32,
    /// Work length in minutes
    pub work_length: u32,
    /// Break length in minutes
    pub break_length: u32,
    /// Whether the break phase is active
    pub on_break: bool,
    /// Whether the countdown is ticking
    pub is_running: bool,
}

impl TimerState {
    /// Creates a stopped state from a snapshot.
    pub fn new(data: &TimerData) -> Self {
        Self {
            remaining_seconds: data.timer_value,
            work_length: data.work_length,
            break_length: data.break_length,
            on_break: data.on_break,
            is_running: false,
        }
    }

    /// Returns the persisted part of this state.
    pub fn to_data(&self) -> TimerData {
        TimerData {
            timer_value: self.remaining_seconds,
            break_length: self.break_length,
            work_length: self.work_length,
            on_break: self.on_break,
        }
    }

    /// Returns the active phase.
    pub fn phase(&self) -> Phase {
        if self.on_break {
            Phase::Break
        } else {
            Phase::Work
        }
    }

    /// Returns the configured length of `phase` in minutes.
    pub fn length_of(&self, phase: Phase) -> u32 {
        match phase {
            Phase::Work => self.work_length,
            Phase::Break => self.break_length,
        }
    }

    /// Returns the countdown formatted as `mm:ss`.
    pub fn formatted(&self) -> String {
        format_timer_value(self.remaining_seconds)
    }

    /// Advances the countdown by one second.
    ///
    /// At zero the phase swaps instead: the length for the next value is
    /// chosen from `on_break` *before* it is flipped. Returns true if the
    /// phase swapped.
    pub fn tick(&mut self) -> bool {
        if self.remaining_seconds == 0 {
            let next = self.phase().other();
            self.remaining_seconds = self.length_of(next) * 60;
            self.on_break = !self.on_break;
            true
        } else {
            self.remaining_seconds -= 1;
            false
        }
    }

    /// Sets the length of `phase`.
    ///
    /// Rejected while running or when `minutes` is outside 1-60. Editing the
    /// active phase also reloads the countdown. Returns true if applied.
    pub fn set_length(&mut self, phase: Phase, minutes: u32) -> bool {
        if self.is_running || !is_valid_length(minutes) {
            return false;
        }

        match phase {
            Phase::Work => self.work_length = minutes,
            Phase::Break => self.break_length = minutes,
        }

        if self.phase() == phase {
            self.remaining_seconds = minutes * 60;
        }
        true
    }

    /// Replaces every field with `data` and stops the countdown.
    pub fn restore(&mut self, data: &TimerData) {
        *self = Self::new(data);
    }
}

// ============================================================================
// TrackerConfig
// ============================================================================

/// Configuration for a tracker session, built from the command line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrackerConfig {
    /// Work length in minutes (1-60)
    pub work_minutes: u32,
    /// Break length in minutes (1-60)
    pub break_minutes: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            work_minutes: 25,
            break_minutes: 5,
        }
    }
}

impl TrackerConfig {
    /// Creates a new configuration with the specified work length.
    pub fn with_work_minutes(mut self, minutes: u32) -> Self {
        self.work_minutes = minutes;
        self
    }

    /// Creates a new configuration with the specified break length.
    pub fn with_break_minutes(mut self, minutes: u32) -> Self {
        self.break_minutes = minutes;
        self
    }

    /// Validates the configuration.
    ///
    /// Returns an error message if validation fails.
    pub fn validate(&self) -> Result<(), String> {
        if !is_valid_length(self.work_minutes) {
            return Err(format!(
                "work length must be between {} and {} minutes",
                MIN_LENGTH_MINUTES, MAX_LENGTH_MINUTES
            ));
        }
        if !is_valid_length(self.break_minutes) {
            return Err(format!(
                "break length must be between {} and {} minutes",
                MIN_LENGTH_MINUTES, MAX_LENGTH_MINUTES
            ));
        }
        Ok(())
    }

    /// Returns the constructor defaults for a store: a fresh work phase.
    pub fn initial_data(&self) -> TimerData {
        TimerData {
            timer_value: self.work_minutes * 60,
            break_length: self.break_minutes,
            work_length: self.work_minutes,
            on_break: false,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
