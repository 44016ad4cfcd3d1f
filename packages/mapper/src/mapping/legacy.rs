//! Conversion of legacy mapping tables into unified entries.
//!
//! Older configurations spread their mappings over three tables:
//! - `propertyMappings`: a list of single-value entries
//! - `arrayMappings`: an object of `xmlPath` to `jsonPath`, where a key of
//!   the form `path|a:x,b:y` maps each matched element to an object
//! - `nestedPropertyMappings`: a list of array entries whose `properties`
//!   describe the fields of each element

use serde_json::{Map, Value};

use super::types::{MappingEntry, MappingKind};

/// Separator between the element path and its field list.
const COMPLEX_SEPARATOR: char = '|';

/// Legacy property mappings are plain single entries.
pub fn convert_property_mappings(entries: Vec<MappingEntry>) -> impl Iterator<Item = MappingEntry> {
    entries.into_iter().map(|mut entry| {
        entry.kind = MappingKind::Single;
        entry
    })
}

/// Convert the `arrayMappings` table, keeping its key order.
///
/// Entries whose value is not a string, or whose key is not a valid complex
/// path, are skipped.
///
/// # Examples
/// ```
/// use serde_json::json;
/// use xml_mapper::mapping::convert_array_mappings;
///
/// let table = json!({"shop/items/item|@sku:sku,name:title": "items"});
/// let entries = convert_array_mappings(table.as_object().unwrap());
///
/// assert_eq!(entries[0].source_path.as_deref(), Some("shop/items/item"));
/// assert_eq!(entries[0].children().len(), 2);
/// ```
pub fn convert_array_mappings(table: &Map<String, Value>) -> Vec<MappingEntry> {
    table
        .iter()
        .filter_map(|(xml_path, json_path)| {
            let Some(json_path) = json_path.as_str() else {
                tracing::warn!(xml_path = %xml_path, "Array mapping target is not a string, skipped");
                return None;
            };
            convert_array_mapping(xml_path, json_path)
        })
        .collect()
}

fn convert_array_mapping(xml_path: &str, json_path: &str) -> Option<MappingEntry> {
    if !xml_path.contains(COMPLEX_SEPARATOR) {
        return Some(MappingEntry::array(xml_path, json_path));
    }

    let parts: Vec<&str> = xml_path.split(COMPLEX_SEPARATOR).collect();
    let [element_path, fields] = parts.as_slice() else {
        tracing::warn!(xml_path = %xml_path, "Invalid complex array path, skipped");
        return None;
    };

    let children = parse_field_list(fields)
        .map(|(source, output)| MappingEntry {
            output_path: Some(output.to_string()),
            ..MappingEntry::field(source)
        })
        .collect();

    Some(MappingEntry::array(*element_path, json_path).with_children(children))
}

/// Parse `a:x,b:y` into `(a, x)` pairs, skipping malformed pairs.
fn parse_field_list(fields: &str) -> impl Iterator<Item = (&str, &str)> {
    fields
        .split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let parts: Vec<&str> = pair.split(':').collect();
            match parts.as_slice() {
                [source, output] => Some((source.trim(), output.trim())),
                _ => {
                    tracing::debug!(pair, "Malformed field pair, skipped");
                    None
                }
            }
        })
}

/// Nested property mappings are array entries over their `properties`.
pub fn convert_nested_mappings(entries: Vec<MappingEntry>) -> impl Iterator<Item = MappingEntry> {
    entries.into_iter().map(|mut entry| {
        entry.kind = match std::mem::take(&mut entry.kind) {
            MappingKind::Single => MappingKind::Array {
                children: Vec::new(),
            },
            MappingKind::Array { children } | MappingKind::Object { children } => {
                MappingKind::Array { children }
            }
        };
        entry
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::Cardinality;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_simple_array_mapping() {
        let table = json!({"library/books/book/title": "titles"});
        let entries = convert_array_mappings(table.as_object().unwrap());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].cardinality(), Cardinality::Array);
        assert!(entries[0].children().is_empty());
        assert_eq!(entries[0].output_path.as_deref(), Some("titles"));
    }

    #[test]
    fn test_complex_array_mapping() {
        let table = json!({"company/employees/employee|name:fullName, @id:id,bad,x:y:z": "staff"});
        let entries = convert_array_mappings(table.as_object().unwrap());

        let children: Vec<_> = entries[0]
            .children()
            .iter()
            .map(|child| {
                (
                    child.source_path.as_deref().unwrap_or_default(),
                    child.output_path.as_deref().unwrap_or_default(),
                )
            })
            .collect();
        assert_eq!(children, vec![("name", "fullName"), ("@id", "id")]);
    }

    #[test]
    fn test_complex_array_with_empty_field_list() {
        let table = json!({"a/b|": "bs"});
        let entries = convert_array_mappings(table.as_object().unwrap());

        assert_eq!(entries[0].source_path.as_deref(), Some("a/b"));
        assert!(entries[0].children().is_empty());
    }

    #[test]
    fn test_invalid_array_mappings_skipped() {
        let table = json!({"a|b|c": "x", "a/b": 5, "ok/path": "ok"});
        let entries = convert_array_mappings(table.as_object().unwrap());

        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].output_path.as_deref(), Some("ok"));
    }

    #[test]
    fn test_array_mappings_keep_key_order() {
        let table = json!({"z/z": "z", "a/a": "a", "m/m": "m"});
        let outputs: Vec<_> = convert_array_mappings(table.as_object().unwrap())
            .into_iter()
            .filter_map(|entry| entry.output_path)
            .collect();
        assert_eq!(outputs, vec!["z", "a", "m"]);
    }

    #[test]
    fn test_nested_mappings_become_arrays() {
        let nested = vec![MappingEntry::object("a/b", "bs").with_children(vec![
            MappingEntry::field("c"),
            MappingEntry::field("d"),
        ])];
        let converted: Vec<_> = convert_nested_mappings(nested).collect();

        assert_eq!(converted[0].cardinality(), Cardinality::Array);
        assert_eq!(converted[0].children().len(), 2);
    }
}
