//! Permissive text extraction from JSON of unknown shape.

use serde_json::Value;

/// Resolves a dotted field path inside `source`.
///
/// An empty path resolves to `source` itself. Array elements can be addressed
/// by numeric segment. Missing intermediate fields yield `None`.
pub fn nested_value<'a>(source: &'a Value, path: &str) -> Option<&'a Value> {
    if path.is_empty() {
        return Some(source);
    }
    path.split('.').try_fold(source, |current, key| match current {
        Value::Object(map) => map.get(key),
        Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

fn non_empty(value: &Value) -> Option<&str> {
    value.as_str().map(str::trim).filter(|s| !s.is_empty())
}

fn first_field_string(value: &Value) -> Option<&str> {
    match value {
        Value::Object(map) => map.values().find_map(non_empty),
        Value::Array(items) => items.iter().find_map(non_empty),
        _ => None,
    }
}

/// Returns the first usable string found along `paths`, trimmed.
///
/// For each path in order:
/// - a non-empty string is returned as is;
/// - an array yields its first non-empty string element, or the first
///   non-empty string inside its first object or array element that has one;
/// - an object yields its first non-empty string field.
///
/// Returns an empty string if no path yields text.
pub fn pick_first_string(source: &Value, paths: &[&str]) -> String {
    paths
        .iter()
        .filter_map(|path| nested_value(source, path))
        .find_map(|value| match value {
            Value::String(_) => non_empty(value),
            Value::Array(items) => items
                .iter()
                .find_map(|item| non_empty(item).or_else(|| first_field_string(item))),
            Value::Object(_) => first_field_string(value),
            _ => None,
        })
        .map(str::to_string)
        .unwrap_or_default()
}
