//! Command definitions for the time tracker CLI.
//!
//! Uses clap derive macro for argument parsing.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::types::TrackerConfig;

// ============================================================================
// CLI Structure
// ============================================================================

/// Time Tracker - a terminal Pomodoro work/break timer
#[derive(Parser, Debug)]
#[command(
    name = "time-tracker",
    version,
    about = "Terminal Pomodoro work/break timer",
    long_about = "A Pomodoro-style work/break timer for the terminal.\n\
                  The timer state is saved after every change, so the next run \
                  resumes where the last one stopped.",
    propagate_version = true
)]
pub struct Cli {
    /// Subcommand to execute (defaults to `run`)
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Default work length in minutes (1-60), restored by reset
    #[arg(
        short,
        long,
        global = true,
        default_value = "25",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub work: u32,

    /// Default break length in minutes (1-60), restored by reset
    #[arg(
        short,
        long,
        global = true,
        default_value = "5",
        value_parser = clap::value_parser!(u32).range(1..=60)
    )]
    pub break_time: u32,

    /// Directory holding the saved timer state
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Sound file played on a phase change (wav, mp3, ogg, flac)
    #[arg(long, global = true, value_name = "FILE")]
    pub sound: Option<PathBuf>,

    /// Disable the phase change alert
    #[arg(long, global = true, conflicts_with_all = ["sound", "bell"])]
    pub no_sound: bool,

    /// Use the terminal bell instead of audio playback
    #[arg(long, global = true, conflicts_with = "sound")]
    pub bell: bool,
}

impl Cli {
    /// Returns the tracker configuration described by the flags.
    pub fn config(&self) -> TrackerConfig {
        TrackerConfig::default()
            .with_work_minutes(self.work)
            .with_break_minutes(self.break_time)
    }

    /// Returns which alert the flags select.
    pub fn alert(&self) -> AlertKind {
        if self.no_sound {
            AlertKind::Silent
        } else if self.bell {
            AlertKind::Bell
        } else {
            AlertKind::Audio(self.sound.clone())
        }
    }
}

/// Alert selected on the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertKind {
    /// Audio playback, optionally of a specific file
    Audio(Option<PathBuf>),
    /// Terminal bell
    Bell,
    /// No alert
    Silent,
}

// ============================================================================
// Subcommands
// ============================================================================

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Run the interactive timer (default)
    Run,

    /// Show the saved timer state
    Status,

    /// Set the work length of the saved timer
    SetWork {
        /// Work length in minutes (1-60)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=60))]
        minutes: u32,
    },

    /// Set the break length of the saved timer
    SetBreak {
        /// Break length in minutes (1-60)
        #[arg(value_parser = clap::value_parser!(u32).range(1..=60))]
        minutes: u32,
    },

    /// Reset the saved timer to the defaults
    Reset,

    /// Generate shell completion scripts
    Completions {
        /// Shell type for completion script
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

// ============================================================================
// Tests
// ============================================================================
