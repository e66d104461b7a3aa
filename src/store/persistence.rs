//! Snapshot loading and saving.
//!
//! Loading is lenient: every field of the stored object is checked on its
//! own and only well-typed, in-range fields overlay the defaults. Nothing in
//! here can fail the caller.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::storage::Storage;
use crate::types::{is_valid_length, TimerData, MAX_TIMER_SECONDS};

/// Storage key of the snapshot.
pub const STORAGE_KEY: &str = "TimeTrackerData";

/// Returns `defaults` overlaid with whatever valid fields `storage` holds.
pub fn load_snapshot(storage: &dyn Storage, defaults: &TimerData) -> TimerData {
    let Some(raw) = storage.get(STORAGE_KEY) else {
        debug!("No persisted snapshot, using defaults");
        return *defaults;
    };

    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(fields)) => overlay(defaults, &fields),
        Ok(other) => {
            warn!("Ignoring persisted snapshot that is not an object: {}", other);
            *defaults
        }
        Err(e) => {
            warn!("Ignoring unparseable persisted snapshot: {}", e);
            *defaults
        }
    }
}

/// Writes `data` under [`STORAGE_KEY`]. Failures are logged, not returned.
pub fn save_snapshot(storage: &dyn Storage, data: &TimerData) {
    let json = match serde_json::to_string(data) {
        Ok(json) => json,
        Err(e) => {
            warn!("Failed to serialize snapshot: {}", e);
            return;
        }
    };

    if let Err(e) = storage.set(STORAGE_KEY, &json) {
        warn!("Failed to persist snapshot: {}", e);
    }
}

fn overlay(defaults: &TimerData, fields: &Map<String, Value>) -> TimerData {
    let mut data = *defaults;

    if let Some(value) = read_u32(fields, "timerValue", |v| v <= MAX_TIMER_SECONDS) {
        data.timer_value = value;
    }
    if let Some(value) = read_u32(fields, "breakLength", is_valid_length) {
        data.break_length = value;
    }
    if let Some(value) = read_u32(fields, "workLength", is_valid_length) {
        data.work_length = value;
    }
    match fields.get("onBreak") {
        Some(Value::Bool(on_break)) => data.on_break = *on_break,
        Some(other) => warn!("Ignoring persisted onBreak: {}", other),
        None => {}
    }

    data
}

fn read_u32(
    fields: &Map<String, Value>,
    name: &str,
    in_range: impl Fn(u32) -> bool,
) -> Option<u32> {
    let raw = fields.get(name)?;
    let value = raw
        .as_u64()
        .and_then(|v| u32::try_from(v).ok())
        .filter(|v| in_range(*v));

    if value.is_none() {
        warn!("Ignoring persisted {}: {}", name, raw);
    }
    value
}
