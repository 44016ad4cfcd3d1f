//! End-to-end tests from fixture documents and configurations to JSON.
//!
//! Covers the unified JSON and YAML layouts, the legacy table layout and the
//! behaviour callers depend on: absent fields stay absent, empty arrays are
//! never written and repeated runs produce identical output.

use std::fs;
use std::path::{Path, PathBuf};

use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use xml_mapper::coerce::DataType;
use xml_mapper::mapping::{Configuration, MappingEntry};
use xml_mapper::store::{load_config_file, ConfigStore};
use xml_mapper::{MapperError, SourceDocument, Transformer};

fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
        .join(name)
}

/// Load fixture file content.
fn load_fixture(name: &str) -> String {
    let path = fixture_path(name);
    fs::read_to_string(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

fn load_config(name: &str) -> Configuration {
    let path = fixture_path(name);
    load_config_file(&path).unwrap_or_else(|e| panic!("Failed to load {}: {}", path.display(), e))
}

/// Parse expected output from JSON text so numbers keep their literal form.
fn expected(text: &str) -> Value {
    serde_json::from_str(text).unwrap_or_else(|e| panic!("Invalid expected JSON: {e}"))
}

#[test]
fn test_person_fixture() {
    let output = Transformer::new()
        .transform_str(&load_fixture("person.xml"), &load_config("person.json"))
        .unwrap();

    assert_eq!(
        output,
        json!({"fullName": "John Doe", "age": 30, "email": "john.doe@example.com"})
    );
}

#[test]
fn test_company_fixture() {
    let report = Transformer::new()
        .transform_report(&load_fixture("company.xml"), &load_config("company.yaml"))
        .unwrap();

    assert_eq!(
        report.output,
        expected(
            r#"{
                "id": "C-100",
                "name": "TECHCORP",
                "founded": "1998-04-01",
                "financial": {"revenue": 1250000.50, "listed": true},
                "mappedEmployees": [
                    {
                        "id": "E1",
                        "fullName": "Ann de Vries",
                        "role": "Engineer",
                        "pay": {"monthly": 5200},
                        "hired": "2015-03-01",
                        "skills": ["rust", "xml"]
                    },
                    {
                        "id": "E2",
                        "fullName": "Bob Jansen",
                        "role": "Manager",
                        "pay": {"monthly": 6100},
                        "hired": "2012-09-15",
                        "skills": ["planning"]
                    }
                ],
                "offices": ["Den Haag", "Utrecht"],
                "projects": [
                    {"code": "P1", "title": "m1grat1on", "budget": 10000.0},
                    {"code": "P2", "title": "portal", "budget": 25000.0}
                ],
                "contact": {
                    "phone": ["070-1234567", "030-7654321"],
                    "email": "info@techcorp.example"
                },
                "status": "active",
                "meta": {"source": "xml"}
            }"#
        )
    );
    assert_eq!(report.warnings, vec!["company/ceo: Required field is missing"]);
}

#[test]
fn test_company_key_order_follows_configuration() {
    let text = Transformer::new()
        .transform_to_string(&load_fixture("company.xml"), &load_config("company.yaml"), false)
        .unwrap();

    let positions: Vec<usize> = ["\"id\"", "\"name\"", "\"founded\"", "\"financial\"", "\"status\""]
        .iter()
        .map(|key| text.find(key).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert!(text.contains(r#""revenue":1250000.50"#));
}

#[test]
fn test_empty_array_is_never_written() {
    let output = Transformer::new()
        .transform_str(&load_fixture("company.xml"), &load_config("company.yaml"))
        .unwrap();

    assert!(output.get("contractors").is_none());
    assert!(output.get("ceo").is_none());
}

#[test]
fn test_legacy_layout() {
    let output = Transformer::new()
        .transform_str(&load_fixture("library.xml"), &load_config("library_legacy.json"))
        .unwrap();

    assert_eq!(
        output,
        json!({
            "library": {"name": "CITY LIBRARY", "address": "unknown"},
            "genres": ["programming", "reference"],
            "catalog": [
                {"title": "the rust book", "isbn": "978-0-00-000001-1"},
                {"title": "xml in depth", "isbn": "978-0-00-000002-8"}
            ],
            "books": [
                {"title": "The rust book", "published": 2018, "pages": 0},
                {"title": "Xml in depth", "published": 2003, "pages": 0}
            ],
            "source": "legacy"
        })
    );
}

#[test]
fn test_legacy_config_saves_as_unified_layout() {
    let dir = tempfile::tempdir().unwrap();
    let store = ConfigStore::new(dir.path());
    let legacy = load_config("library_legacy.json");

    let path = store.save("library", &legacy).unwrap();
    let saved: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
    assert!(saved.get("propertyMappings").is_none());
    assert_eq!(saved["mappings"].as_array().unwrap().len(), 5);

    let reloaded = ConfigStore::new(dir.path()).load("library").unwrap();
    let xml = load_fixture("library.xml");
    let transformer = Transformer::new();
    assert_eq!(
        transformer.transform_str(&xml, &reloaded).unwrap(),
        transformer.transform_str(&xml, &legacy).unwrap()
    );
}

#[test]
fn test_repeated_runs_are_identical() {
    let transformer = Transformer::new();
    let xml = load_fixture("company.xml");
    let config = load_config("company.yaml");

    let first = transformer.transform_to_string(&xml, &config, true).unwrap();
    let second = transformer.transform_to_string(&xml, &config, true).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_parsed_document_can_be_reused() {
    let document = SourceDocument::parse(&load_fixture("person.xml")).unwrap();
    let transformer = Transformer::new();

    let names = Configuration::new(vec![MappingEntry::single("person/name", "name")]);
    let ages = Configuration::new(vec![
        MappingEntry::single("person/age", "age").with_data_type(DataType::Long)
    ]);

    assert_eq!(
        transformer.transform_document(&document, &names).output,
        json!({"name": "John Doe"})
    );
    assert_eq!(
        transformer.transform_document(&document, &ages).output,
        json!({"age": 30})
    );
}

#[test]
fn test_empty_configuration() {
    let output = Transformer::new()
        .transform_str(&load_fixture("person.xml"), &Configuration::default())
        .unwrap();
    assert_eq!(output, json!({}));
}

#[test]
fn test_malformed_source_aborts() {
    let err = Transformer::new()
        .transform_str("<person><name>unterminated</person>", &load_config("person.json"))
        .unwrap_err();
    assert!(matches!(err, MapperError::SourceParse(_)));
}

#[test]
fn test_dtd_is_rejected() {
    let xml = r#"<?xml version="1.0"?>
<!DOCTYPE person [<!ENTITY boom "boom">]>
<person><name>&boom;</name></person>"#;

    let err = Transformer::new()
        .transform_str(xml, &load_config("person.json"))
        .unwrap_err();
    assert!(err.is_source_error());
}
