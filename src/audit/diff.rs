//! Change summaries for audit entries
//!
//! Compares the JSON form of an entity before and after an operation and
//! describes the changed fields. Bookkeeping timestamps are ignored.

use serde_json::{Map, Value};

/// Fields that change on every save and carry no information
const IGNORED_FIELDS: &[&str] = &["created_at", "updated_at"];

const MAX_STRING_LEN: usize = 50;

/// Summarize top-level field changes, e.g. `sizing_value: "100" -> "250"`
pub fn generate_diff(before: &Value, after: &Value) -> Option<String> {
    let changes = match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            object_changes(before_obj, after_obj, "", false)
        }
        _ if before != after => vec![format!(
            "{} -> {}",
            format_value(before),
            format_value(after)
        )],
        _ => Vec::new(),
    };

    if changes.is_empty() {
        None
    } else {
        Some(changes.join(", "))
    }
}

/// Every changed leaf, with dotted paths into nested objects and indexed
/// paths into equal-length arrays (`line_items[0].amount: ...`)
pub fn generate_detailed_diff(before: &Value, after: &Value, prefix: &str) -> Vec<String> {
    match (before, after) {
        (Value::Object(before_obj), Value::Object(after_obj)) => {
            object_changes(before_obj, after_obj, prefix, true)
        }
        (Value::Array(before_arr), Value::Array(after_arr))
            if before_arr.len() == after_arr.len() =>
        {
            before_arr
                .iter()
                .zip(after_arr)
                .enumerate()
                .filter(|(_, (b, a))| b != a)
                .flat_map(|(i, (b, a))| generate_detailed_diff(b, a, &format!("{}[{}]", prefix, i)))
                .collect()
        }
        _ if before != after => vec![format!(
            "{}: {} -> {}",
            prefix,
            format_value(before),
            format_value(after)
        )],
        _ => Vec::new(),
    }
}

fn object_changes(
    before: &Map<String, Value>,
    after: &Map<String, Value>,
    prefix: &str,
    recurse: bool,
) -> Vec<String> {
    let mut changes = Vec::new();
    let path = |key: &str| {
        if prefix.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", prefix, key)
        }
    };

    for (key, before_val) in before {
        if IGNORED_FIELDS.contains(&key.as_str()) {
            continue;
        }
        match after.get(key) {
            Some(after_val) if after_val == before_val => {}
            Some(after_val) if recurse => {
                changes.extend(generate_detailed_diff(before_val, after_val, &path(key)))
            }
            Some(after_val) => changes.push(format!(
                "{}: {} -> {}",
                path(key),
                format_value(before_val),
                format_value(after_val)
            )),
            None => changes.push(format!("{}: {} -> (removed)", path(key), format_value(before_val))),
        }
    }

    for (key, after_val) in after {
        if !before.contains_key(key) && !IGNORED_FIELDS.contains(&key.as_str()) {
            changes.push(format!("{}: (added) -> {}", path(key), format_value(after_val)));
        }
    }

    changes
}

fn format_value(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) if s.chars().count() > MAX_STRING_LEN => {
            let truncated: String = s.chars().take(MAX_STRING_LEN - 3).collect();
            format!("\"{}...\"", truncated)
        }
        Value::String(s) => format!("\"{}\"", s),
        Value::Array(arr) => format!("[{} items]", arr.len()),
        Value::Object(obj) => format!("{{{} fields}}", obj.len()),
    }
}
