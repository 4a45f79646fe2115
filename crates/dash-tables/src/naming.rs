//! Naming and comparison helpers for data tables.

use std::collections::HashSet;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::model::DataTable;

/// First name not in `existing`, numbering duplicates `Name (2)`, `Name (3)`...
///
/// ```
/// use dash_tables::duplicated_name;
///
/// assert_eq!(duplicated_name("Cost", ["Cost"]), "Cost (2)");
/// assert_eq!(duplicated_name("Cost", ["Cost", "Cost (2)"]), "Cost (3)");
/// assert_eq!(duplicated_name("Usage", ["Cost"]), "Usage");
/// ```
pub fn duplicated_name<'a, I>(name: &str, existing: I) -> String
where
    I: IntoIterator<Item = &'a str>,
{
    let existing: HashSet<&str> = existing.into_iter().collect();
    let mut candidate = name.to_string();
    while existing.contains(candidate.as_str()) {
        candidate = next_name(&candidate);
    }
    candidate
}

fn next_name(name: &str) -> String {
    if let Some(body) = name.strip_suffix(')') {
        if let Some(open) = body.rfind('(') {
            if let Ok(n) = body[open + 1..].parse::<u64>() {
                return format!("{} ({})", body[..open].trim_end(), n.saturating_add(1));
            }
        }
    }
    format!("{name} (2)")
}

/// Check if `name` is free for a new column of `table`.
///
/// Any name is free when there is no table yet.
#[must_use]
pub fn is_field_name_valid(name: &str, table: Option<&DataTable>) -> bool {
    table.is_none_or(|t| !t.data_info.contains_key(name) && !t.labels_info.contains_key(name))
}

fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, sorted(v)))
                    .collect::<Map<String, Value>>(),
            )
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}

/// Canonical JSON of `options` with object keys sorted at every level.
pub fn normalized_options<T>(options: &T) -> String
where
    T: Serialize + ?Sized,
{
    serde_json::to_value(options)
        .map(|v| sorted(v).to_string())
        .unwrap_or_default()
}

/// Check if two option sets differ once key order is ignored.
pub fn options_changed<A, B>(before: &A, after: &B) -> bool
where
    A: Serialize + ?Sized,
    B: Serialize + ?Sized,
{
    normalized_options(before) != normalized_options(after)
}
