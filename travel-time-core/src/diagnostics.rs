//! Diagnostics export for support requests.

use serde_json::{Map, Value, json};

use crate::{ConfigEntry, CoordinatorState};

/// Placeholder written over redacted values.
pub const REDACTED: &str = "**REDACTED**";

/// Keys whose values never leave the process.
pub const TO_REDACT: [&str; 1] = ["api_key"];

/// Build the diagnostics document for `entry`.
///
/// The document holds the entry with secrets redacted under `config_entry`
/// and the last published result, or an empty object, under `data`.
///
/// # Errors
///
/// Returns a `serde_json` error if the entry cannot be serialised.
///
/// # Examples
/// ```
/// use travel_time_core::{ConfigEntry, CoordinatorState, EntryData, config_entry_diagnostics};
///
/// let entry = ConfigEntry::new("id", EntryData::new("secret", vec![]));
/// let report = config_entry_diagnostics(&entry, &CoordinatorState::default())?;
/// assert_eq!(report["config_entry"]["data"]["api_key"], "**REDACTED**");
/// assert_eq!(report["data"], serde_json::json!({}));
/// # Ok::<(), serde_json::Error>(())
/// ```
pub fn config_entry_diagnostics(
    entry: &ConfigEntry,
    state: &CoordinatorState,
) -> Result<Value, serde_json::Error> {
    let config_entry = redact(serde_json::to_value(entry)?, &TO_REDACT);
    let data = match &state.data {
        Some(result) => serde_json::to_value(result)?,
        None => Value::Object(Map::new()),
    };
    Ok(json!({
        "config_entry": config_entry,
        "data": data,
    }))
}

/// Replace the value of every key in `keys`, at any depth, with [`REDACTED`].
#[must_use]
pub fn redact(value: Value, keys: &[&str]) -> Value {
    match value {
        Value::Object(map) => Value::Object(
            map.into_iter()
                .map(|(key, inner)| {
                    if keys.contains(&key.as_str()) {
                        (key, Value::String(REDACTED.to_owned()))
                    } else {
                        (key, redact(inner, keys))
                    }
                })
                .collect(),
        ),
        Value::Array(items) => Value::Array(items.into_iter().map(|item| redact(item, keys)).collect()),
        other => other,
    }
}
