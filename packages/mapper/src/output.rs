//! Output tree construction with dotted-path addressing.
//!
//! The output is a `serde_json` object whose keys keep insertion order. A
//! path such as `financial.totalAmount` addresses nested objects; missing
//! intermediate objects are created on the way.

use serde_json::{Map, Value};

use crate::error::Result;

/// Split a dotted output path into its segments.
///
/// Returns `None` for an empty path or one with an empty segment
/// (`a..b`, `.a`, `a.`).
///
/// # Examples
/// ```
/// use xml_mapper::output::split_output_path;
///
/// assert_eq!(split_output_path("a.b.c"), Some(vec!["a", "b", "c"]));
/// assert_eq!(split_output_path("a..b"), None);
/// ```
#[must_use]
pub fn split_output_path(path: &str) -> Option<Vec<&str>> {
    let trimmed = path.trim();
    if trimmed.is_empty() {
        return None;
    }
    let segments: Vec<&str> = trimmed.split('.').collect();
    segments
        .iter()
        .all(|segment| !segment.is_empty())
        .then_some(segments)
}

/// Write a value at a dotted path, replacing any previous value there.
///
/// Intermediate segments become objects; an existing scalar or array in an
/// intermediate position is overwritten with an object. Returns `false`
/// when the path is invalid and nothing was written.
///
/// # Examples
/// ```
/// use serde_json::{json, Map};
/// use xml_mapper::output::set_path;
///
/// let mut root = Map::new();
/// set_path(&mut root, "financial.totalAmount", json!(99.99));
/// assert_eq!(json!(root), json!({"financial": {"totalAmount": 99.99}}));
/// ```
pub fn set_path(root: &mut Map<String, Value>, path: &str, value: Value) -> bool {
    let Some(segments) = split_output_path(path) else {
        tracing::debug!(path, "Invalid output path, value dropped");
        return false;
    };
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = root;
    for segment in parents {
        let slot = current
            .entry(*segment)
            .or_insert_with(|| Value::Object(Map::new()));
        if !slot.is_object() {
            tracing::debug!(path, segment, "Overwriting non-object with object");
            *slot = Value::Object(Map::new());
        }
        current = match slot {
            Value::Object(map) => map,
            _ => return false,
        };
    }

    current.insert((*last).to_string(), value);
    true
}

/// Check whether a dotted path already resolves to a value.
#[must_use]
pub fn contains_path(root: &Map<String, Value>, path: &str) -> bool {
    let Some(segments) = split_output_path(path) else {
        return false;
    };
    let Some((last, parents)) = segments.split_last() else {
        return false;
    };

    let mut current = root;
    for segment in parents {
        match current.get(*segment) {
            Some(Value::Object(map)) => current = map,
            _ => return false,
        }
    }
    current.contains_key(*last)
}

/// Write a value only when the path does not resolve yet.
///
/// Returns `true` when the value was written.
pub fn merge_default_if_absent(root: &mut Map<String, Value>, path: &str, value: Value) -> bool {
    if contains_path(root, path) {
        return false;
    }
    set_path(root, path, value)
}

/// Insert a field, promoting repeated names to arrays.
///
/// The first occurrence is stored as-is, the second turns the field into a
/// two-element array, and later occurrences are appended.
///
/// # Examples
/// ```
/// use serde_json::{json, Map};
/// use xml_mapper::output::insert_or_promote;
///
/// let mut map = Map::new();
/// for x in ["1", "2", "3"] {
///     insert_or_promote(&mut map, "x", json!(x));
/// }
/// assert_eq!(json!(map), json!({"x": ["1", "2", "3"]}));
/// ```
pub fn insert_or_promote(map: &mut Map<String, Value>, key: &str, value: Value) {
    match map.get_mut(key) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(key.to_string(), value);
        }
    }
}

/// Serialize an output tree to JSON text.
pub fn to_json_string(value: &Value, pretty: bool) -> Result<String> {
    let text = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_set_top_level() {
        let mut root = Map::new();
        assert!(set_path(&mut root, "name", json!("Ann")));
        assert_eq!(Value::Object(root), json!({"name": "Ann"}));
    }

    #[test]
    fn test_set_nested_creates_intermediates() {
        let mut root = Map::new();
        set_path(&mut root, "a.b.c", json!(1));
        set_path(&mut root, "a.b.d", json!(2));
        set_path(&mut root, "a.e", json!(3));

        assert_eq!(
            Value::Object(root),
            json!({"a": {"b": {"c": 1, "d": 2}, "e": 3}})
        );
    }

    #[test]
    fn test_set_replaces_last_writer_wins() {
        let mut root = Map::new();
        set_path(&mut root, "x", json!("first"));
        set_path(&mut root, "x", json!("second"));
        assert_eq!(Value::Object(root), json!({"x": "second"}));
    }

    #[test]
    fn test_set_overwrites_scalar_intermediate() {
        let mut root = Map::new();
        set_path(&mut root, "a", json!("scalar"));
        set_path(&mut root, "a.b", json!(1));
        assert_eq!(Value::Object(root), json!({"a": {"b": 1}}));
    }

    #[test]
    fn test_set_rejects_invalid_paths() {
        let mut root = Map::new();
        assert!(!set_path(&mut root, "", json!(1)));
        assert!(!set_path(&mut root, "a..b", json!(1)));
        assert!(!set_path(&mut root, "a.", json!(1)));
        assert!(root.is_empty());
    }

    #[test]
    fn test_insertion_order_is_preserved() {
        let mut root = Map::new();
        set_path(&mut root, "zeta", json!(1));
        set_path(&mut root, "alpha", json!(2));
        set_path(&mut root, "mid", json!(3));

        let keys: Vec<&str> = root.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_contains_path() {
        let mut root = Map::new();
        set_path(&mut root, "a.b", json!(null));

        assert!(contains_path(&root, "a"));
        assert!(contains_path(&root, "a.b"));
        assert!(!contains_path(&root, "a.c"));
        assert!(!contains_path(&root, "a.b.c"));
        assert!(!contains_path(&root, ""));
    }

    #[test]
    fn test_merge_default_if_absent() {
        let mut root = Map::new();
        set_path(&mut root, "status", json!("set"));

        assert!(!merge_default_if_absent(&mut root, "status", json!("default")));
        assert!(merge_default_if_absent(&mut root, "meta.source", json!("xml")));

        assert_eq!(
            Value::Object(root),
            json!({"status": "set", "meta": {"source": "xml"}})
        );
    }

    #[test]
    fn test_insert_or_promote_single_stays_scalar() {
        let mut map = Map::new();
        insert_or_promote(&mut map, "x", json!("1"));
        assert_eq!(Value::Object(map), json!({"x": "1"}));
    }

    #[test]
    fn test_insert_or_promote_second_and_third() {
        let mut map = Map::new();
        insert_or_promote(&mut map, "x", json!("1"));
        insert_or_promote(&mut map, "y", json!("a"));
        insert_or_promote(&mut map, "x", json!("2"));
        assert_eq!(Value::Object(map.clone()), json!({"x": ["1", "2"], "y": "a"}));

        insert_or_promote(&mut map, "x", json!({"k": "3"}));
        assert_eq!(
            Value::Object(map),
            json!({"x": ["1", "2", {"k": "3"}], "y": "a"})
        );
    }

    #[test]
    fn test_to_json_string() {
        let value = json!({"b": 1, "a": [true]});
        assert_eq!(to_json_string(&value, false).unwrap(), r#"{"b":1,"a":[true]}"#);
        assert!(to_json_string(&value, true).unwrap().contains("\n  \"b\": 1"));
    }
}
