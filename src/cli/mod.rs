//! CLI module for the time tracker.
//!
//! This module provides the command-line interface:
//! - `commands`: Command definitions using clap derive
//! - `display`: Output formatting and display logic
//! - `session`: Interactive session reading commands from stdin

pub mod commands;
pub mod display;
pub mod session;

pub use commands::{AlertKind, Cli, Commands};
pub use display::Display;
pub use session::{run_session, Applied, SessionCommand};
