//! Normalization of raw visitor payloads before they are written
//!
//! Raw input is a JSON object that may carry any subset of the visitor
//! fields. Normalizing it:
//!
//! 1. drops storage-owned keys (`id`, timestamps),
//! 2. rewrites a `DD-MM-YYYY` date into `YYYY-MM-DD`,
//! 3. turns an empty `durationunit` into `null` (absent),
//! 4. drops every `null` or `""` field, except the always-kept ones,
//! 5. fills always-kept fields the caller left out from a baseline record.

use serde_json::{Map, Value};

/// Cleaned field mapping, ready to be merged onto a visitor record
pub type CleanedData = Map<String, Value>;

/// How the cleaner treats a given field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldRule {
    /// Dropped when `null` or an empty string
    DropWhenEmpty,
    /// Always written; `null` means absent
    KeepNullable,
    /// Always written; `null` or `""` falls back to the baseline value
    KeepFlag,
}

/// Fields written on every save, whatever value the caller supplied
pub const ALWAYS_KEPT: [(&str, FieldRule); 5] = [
    ("durationunit", FieldRule::KeepNullable),
    ("isApproved", FieldRule::KeepFlag),
    ("inprogress", FieldRule::KeepFlag),
    ("complete", FieldRule::KeepFlag),
    ("exit", FieldRule::KeepFlag),
];

const STORAGE_OWNED: [&str; 3] = ["id", "created_at", "updated_at"];

/// Rule applied to `key` by the cleaning pass
pub fn rule_for(key: &str) -> FieldRule {
    ALWAYS_KEPT
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, rule)| *rule)
        .unwrap_or(FieldRule::DropWhenEmpty)
}

/// Rewrite `DD-MM-YYYY` as `YYYY-MM-DD`.
///
/// Returns `None` when the value does not look like a day-first date, in
/// which case it must be kept as is. No calendar validation happens here.
pub fn reformat_date(date: &str) -> Option<String> {
    if !date.contains('-') {
        return None;
    }

    let parts: Vec<&str> = date.split('-').collect();
    match parts.as_slice() {
        [day, month, year] if day.chars().count() == 2 => Some(format!("{}-{}-{}", year, month, day)),
        _ => None,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

/// Generic cleaning pass: keep always-kept fields as given, drop empty ones
pub fn clean_fields(raw: Map<String, Value>) -> CleanedData {
    raw.into_iter()
        .filter(|(key, value)| rule_for(key) != FieldRule::DropWhenEmpty || !is_empty(value))
        .collect()
}

/// Make sure every always-kept field is present.
///
/// Missing fields, and empty flags, take their value from `baseline`
/// (the serialized record the cleaned data will be merged onto).
pub fn fill_always_kept(cleaned: &mut CleanedData, baseline: &Map<String, Value>) {
    for (key, rule) in ALWAYS_KEPT {
        let missing = match cleaned.get(key) {
            None => true,
            Some(value) => rule == FieldRule::KeepFlag && is_empty(value),
        };
        if missing {
            let value = baseline.get(key).cloned().unwrap_or(Value::Null);
            cleaned.insert(key.to_string(), value);
        }
    }
}

/// Full normalization of a raw payload against `baseline`
pub fn normalize(mut raw: Map<String, Value>, baseline: &Map<String, Value>) -> CleanedData {
    raw.retain(|key, _| !STORAGE_OWNED.contains(&key.as_str()));

    let iso_date = match raw.get("date") {
        Some(Value::String(date)) => reformat_date(date),
        _ => None,
    };
    if let Some(iso) = iso_date {
        raw.insert("date".to_string(), Value::String(iso));
    }

    if matches!(raw.get("durationunit"), Some(Value::String(unit)) if unit.is_empty()) {
        raw.insert("durationunit".to_string(), Value::Null);
    }

    let mut cleaned = clean_fields(raw);
    fill_always_kept(&mut cleaned, baseline);
    cleaned
}
