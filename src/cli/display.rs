//! Display utilities for the time tracker CLI.
//!
//! This module provides formatted output for:
//! - The live status line of an interactive session
//! - The saved state (`status`)
//! - Help and error messages

use std::io::Write;

use crate::types::{Phase, TimerState};

/// ANSI sequence: return to column 0 and clear the line.
const CLEAR_LINE: &str = "\r\x1b[2K";

// ============================================================================
// Display
// ============================================================================

/// Display utilities for CLI output.
pub struct Display;

impl Display {
    /// Returns the label of a phase.
    pub fn phase_label(phase: Phase) -> &'static str {
        match phase {
            Phase::Work => "Work session",
            Phase::Break => "Break",
        }
    }

    /// Builds the one-line status shown during an interactive session.
    pub fn status_line(state: &TimerState) -> String {
        let run_state = if state.is_running { "running" } else { "paused" };
        format!(
            "{:<12} {}  [{}]  work {}m  break {}m",
            Self::phase_label(state.phase()),
            state.formatted(),
            run_state,
            state.work_length,
            state.break_length,
        )
    }

    /// Redraws the live status line in place.
    pub fn show_live(state: &TimerState) {
        let mut stdout = std::io::stdout();
        let _ = write!(stdout, "{}{}", CLEAR_LINE, Self::status_line(state));
        let _ = stdout.flush();
    }

    /// Shows the saved timer state.
    pub fn show_status(state: &TimerState) {
        println!("Time tracker status");
        println!("─────────────────────────────");
        println!("Phase:        {}", Self::phase_label(state.phase()));
        println!("Remaining:    {}", state.formatted());
        println!("Work length:  {} min", state.work_length);
        println!("Break length: {} min", state.break_length);
    }

    /// Shows the key bindings of an interactive session.
    pub fn show_help() {
        println!();
        println!("Commands:");
        println!("  s        start");
        println!("  p        pause");
        println!("  r        reset to defaults");
        println!("  w+ / w-  work length +1 / -1 minute");
        println!("  b+ / b-  break length +1 / -1 minute");
        println!("  w <n>    set work length (1-60)");
        println!("  b <n>    set break length (1-60)");
        println!("  h        this help");
        println!("  q        quit");
    }

    /// Ends the live status line.
    pub fn finish_live() {
        println!();
    }

    /// Shows an error message.
    pub fn show_error(message: &str) {
        eprintln!("error: {}", message);
    }
}

// ============================================================================
// Tests
// ============================================================================
