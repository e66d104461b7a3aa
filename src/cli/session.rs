//! Interactive timer session.
//!
//! Reads one command per line from stdin. The status line is redrawn by the
//! store's subscription on every change, and by the loop only when a line
//! changed nothing. The session ends on `q`, end of input or Ctrl-C.

use std::cell::Cell;
use std::rc::Rc;
use std::str::FromStr;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use super::display::Display;
use crate::store::TimerStore;
use crate::types::Phase;

// ============================================================================
// SessionCommand
// ============================================================================

/// A command typed during an interactive session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionCommand {
    Start,
    Pause,
    Reset,
    Increment(Phase),
    Decrement(Phase),
    SetLength(Phase, u32),
    Help,
    Quit,
}

impl FromStr for SessionCommand {
    type Err = String;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let mut parts = input.split_whitespace();
        let head = parts.next().ok_or_else(|| "empty command".to_string())?;
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(format!("too many arguments: '{}'", input.trim()));
        }

        let command = match (head, arg) {
            ("s" | "start", None) => Self::Start,
            ("p" | "pause", None) => Self::Pause,
            ("r" | "reset", None) => Self::Reset,
            ("h" | "help" | "?", None) => Self::Help,
            ("q" | "quit", None) => Self::Quit,
            ("w+", None) => Self::Increment(Phase::Work),
            ("w-", None) => Self::Decrement(Phase::Work),
            ("b+", None) => Self::Increment(Phase::Break),
            ("b-", None) => Self::Decrement(Phase::Break),
            ("w", Some(n)) => Self::SetLength(Phase::Work, parse_minutes(n)?),
            ("b", Some(n)) => Self::SetLength(Phase::Break, parse_minutes(n)?),
            _ => return Err(format!("unknown command: '{}' (h for help)", input.trim())),
        };
        Ok(command)
    }
}

fn parse_minutes(value: &str) -> Result<u32, String> {
    value
        .parse()
        .map_err(|_| format!("not a number of minutes: '{}'", value))
}

/// What applying a [`SessionCommand`] did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The store changed and notified its subscribers.
    Updated,
    /// The command was rejected or only printed output.
    Unchanged,
    Quit,
}

impl SessionCommand {
    /// Applies the command to the store.
    pub fn apply(self, store: &TimerStore) -> Applied {
        let notified = Rc::new(Cell::new(false));
        let flag = Rc::clone(&notified);
        let watch = store.subscribe(move |_| flag.set(true));

        match self {
            Self::Start => store.start_timer(),
            Self::Pause => store.pause_timer(),
            Self::Increment(Phase::Work) => store.increment_work_length(),
            Self::Increment(Phase::Break) => store.increment_break_length(),
            Self::Decrement(Phase::Work) => store.decrement_work_length(),
            Self::Decrement(Phase::Break) => store.decrement_break_length(),
            Self::SetLength(phase, minutes) => store.set_length(phase, minutes),
            Self::Reset => store.reset(),
            Self::Help => Display::show_help(),
            Self::Quit => {}
        }
        store.unsubscribe(watch);

        match self {
            Self::Quit => Applied::Quit,
            _ if notified.get() => Applied::Updated,
            _ => Applied::Unchanged,
        }
    }
}

// ============================================================================
// Session loop
// ============================================================================

/// Runs an interactive session against `store` until the user quits.
///
/// Must run inside a `LocalSet` so that the store's ticks are driven while
/// the session waits for input. The timer is paused when the session ends.
pub async fn run_session(store: &TimerStore) -> Result<()> {
    let subscription = store.subscribe(Display::show_live);
    Display::show_live(&store.snapshot());

    let result = read_commands(store).await;

    store.pause_timer();
    store.unsubscribe(subscription);
    Display::finish_live();
    result
}

async fn read_commands(store: &TimerStore) -> Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line.context("Failed to read from stdin")? else {
                    debug!("End of input, ending session");
                    return Ok(());
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<SessionCommand>() {
                    Ok(command) => {
                        debug!("Session command: {:?}", command);
                        match command.apply(store) {
                            Applied::Updated => {}
                            Applied::Unchanged => Display::show_live(&store.snapshot()),
                            Applied::Quit => return Ok(()),
                        }
                    }
                    Err(message) => {
                        Display::finish_live();
                        Display::show_error(&message);
                        Display::show_live(&store.snapshot());
                    }
                }
            }
            signal = tokio::signal::ctrl_c() => {
                signal.context("Failed to listen for Ctrl-C")?;
                debug!("Interrupted, ending session");
                return Ok(());
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
