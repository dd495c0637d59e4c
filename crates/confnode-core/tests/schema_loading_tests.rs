//! Schema Loading Tests
//!
//! This test suite verifies schema documents loaded from disk.
//!
//! ## Scenarios Covered
//!
//! 1. YAML and JSON schema files load into the same model
//! 2. A missing file is an I/O error
//! 3. Invalid list keys and unsupported versions are rejected

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use std::fs;

use confnode_core::meta::{load_schema_file, MetaKind};
use confnode_core::{NodeError, Value};
use tempfile::TempDir;

#[test]
fn test_load_yaml_schema_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("car.yaml");
    fs::write(&path, common::CAR_SCHEMA).unwrap();

    let schema = load_schema_file(&path).unwrap();

    assert_eq!(schema.module_name(), "car");
    let tire = schema.find_child(schema.root(), "tire").unwrap();
    assert_eq!(schema.list_keys(tire), ["pos".to_string()]);
    let brand = schema.find_child(tire, "brand").unwrap();
    assert_eq!(schema.default_value(brand), Some(&Value::from("generic")));
    let kwh = schema
        .find_child(schema.root(), "battery")
        .and_then(|battery| schema.find_child(battery, "kwh"))
        .unwrap();
    assert!(matches!(schema.kind(kwh), MetaKind::Leaf { .. }));
}

#[test]
fn test_load_json_schema_file() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("app.json");
    fs::write(
        &path,
        r#"{
          "schema_version": 0,
          "module": "app",
          "definitions": [
            {"kind": "leaf", "ident": "port", "type": "uint16", "default": 8080}
          ]
        }"#,
    )
    .unwrap();

    let schema = load_schema_file(&path).unwrap();

    let port = schema.find_child(schema.root(), "port").unwrap();
    assert_eq!(schema.default_value(port), Some(&Value::UInt(8080)));
}

#[test]
fn test_missing_schema_file_is_io_error() {
    let dir = TempDir::new().unwrap();

    let err = load_schema_file(&dir.path().join("absent.yaml")).unwrap_err();

    assert!(matches!(err, NodeError::Io { .. }));
    assert_eq!(err.status(), 500);
}

#[test]
fn test_list_key_must_be_a_leaf() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("bad.yaml");
    fs::write(
        &path,
        r#"
schema_version: 0
module: bad
definitions:
  - kind: list
    ident: item
    key: [missing]
    definitions:
      - { kind: leaf, ident: id, type: string }
"#,
    )
    .unwrap();

    let err = load_schema_file(&path).unwrap_err();

    assert!(matches!(err, NodeError::InvalidSchema { .. }));
}

#[test]
fn test_unsupported_version_is_rejected() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("v9.yaml");
    fs::write(&path, "schema_version: 9\nmodule: m\n").unwrap();

    let err = load_schema_file(&path).unwrap_err();

    assert!(matches!(err, NodeError::InvalidSchema { ref reason } if reason.contains("schema_version")));
}
