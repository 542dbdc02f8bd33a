//! The project arrangement document.
//!
//! An arrangement is the client's timeline: `{"tracks": [{"id", "name",
//! "isMuted", "clips": [...]}]}`. The server keeps it as an opaque JSON
//! value. The only rule is that the top level is an object; clip bounds,
//! track ids and tempo alignment are the client's business.

use serde_json::{Map, Value};

use crate::error::CoreError;

/// The arrangement stored for a project created without one: `{}`.
pub fn empty() -> Value {
    Value::Object(Map::new())
}

/// Reject arrangements whose top level is not a JSON object.
pub fn validate(arrangement: &Value) -> Result<(), CoreError> {
    if arrangement.is_object() {
        Ok(())
    } else {
        Err(CoreError::Validation(
            "Arrangement must be a JSON object".into(),
        ))
    }
}

/// Number of entries under `tracks`, for log context only.
pub fn track_count(arrangement: &Value) -> usize {
    arrangement
        .get("tracks")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}
