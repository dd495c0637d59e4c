//! Edit Strategy Tests
//!
//! This test suite verifies the Upsert/Insert/Update strategy table for
//! containers and leaves.
//!
//! ## Scenarios Covered
//!
//! 1. Containers are created, refined or refused per strategy
//! 2. Absent source leaves leave the destination untouched
//! 3. Write and creation failures abort the walk
//! 4. Strategies parse from operation names, replace is not implemented
//! 5. Selections on different schemas are rejected

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod common;

use common::{app_schema, car_schema, failing_selection, store, FailPoint};
use confnode_core::{EditOptions, EditStrategy, ExErrorKind, NodeError};
use serde_json::json;

// ===== Containers =====

#[test]
fn test_upsert_creates_absent_container_with_defaults() {
    let schema = car_schema();
    let source = store(&schema, json!({"engine": {"running": true}}));
    let target = store(&schema, json!({}));

    target.select(&schema).upsert_from(&source.select(&schema)).unwrap();

    assert_eq!(
        target.to_json(),
        json!({"engine": {"cylinders": 4, "running": true}})
    );
}

#[test]
fn test_upsert_descends_into_present_container() {
    let schema = car_schema();
    let source = store(&schema, json!({"engine": {"running": true}}));
    let target = store(&schema, json!({"engine": {"running": false}}));

    target.select(&schema).upsert_from(&source.select(&schema)).unwrap();

    assert_eq!(target.to_json(), json!({"engine": {"running": true}}));
}

#[test]
fn test_insert_creates_absent_container() {
    let schema = car_schema();
    let source = store(&schema, json!({"name": "c1", "engine": {"running": true}}));
    let target = store(&schema, json!({}));

    target.select(&schema).insert_from(&source.select(&schema)).unwrap();

    assert_eq!(
        target.to_json(),
        json!({"name": "c1", "engine": {"cylinders": 4, "running": true}})
    );
}

#[test]
fn test_insert_present_container_is_conflict() {
    let schema = car_schema();
    let source = store(&schema, json!({"engine": {"running": true}}));
    let target = store(&schema, json!({"engine": {"running": false}}));

    let err = target
        .select(&schema)
        .insert_from(&source.select(&schema))
        .unwrap_err();

    assert_eq!(
        err,
        NodeError::Duplicate {
            ident: "engine".to_string(),
            path: "car/engine".to_string(),
        }
    );
    assert_eq!(err.kind(), ExErrorKind::Conflict);
    assert_eq!(target.to_json(), json!({"engine": {"running": false}}));
}

#[test]
fn test_update_refines_present_container_without_defaults() {
    let schema = car_schema();
    let source = store(&schema, json!({"engine": {"running": true}}));
    let target = store(&schema, json!({"engine": {"running": false}}));

    target.select(&schema).update_from(&source.select(&schema)).unwrap();

    assert_eq!(target.to_json(), json!({"engine": {"running": true}}));
}

#[test]
fn test_update_absent_container_is_not_found() {
    let schema = car_schema();
    let source = store(&schema, json!({"engine": {"running": true}}));
    let target = store(&schema, json!({"name": "c1"}));

    let err = target
        .select(&schema)
        .update_from(&source.select(&schema))
        .unwrap_err();

    assert_eq!(
        err,
        NodeError::NotFound {
            ident: "engine".to_string(),
            path: "car/engine".to_string(),
        }
    );
    assert_eq!(err.status(), 404);
    assert_eq!(target.to_json(), json!({"name": "c1"}));
}

#[test]
fn test_into_variants_mirror_from_variants() {
    let schema = car_schema();
    let source = store(&schema, json!({"engine": {"running": true}}));
    let target = store(&schema, json!({}));

    source.select(&schema).upsert_into(&target.select(&schema)).unwrap();
    let err = source
        .select(&schema)
        .insert_into(&target.select(&schema))
        .unwrap_err();
    source.select(&schema).update_into(&target.select(&schema)).unwrap();

    assert_eq!(err.status(), 409);
    assert_eq!(
        target.to_json(),
        json!({"engine": {"cylinders": 4, "running": true}})
    );
}

// ===== Leaves =====

#[test]
fn test_absent_source_leaf_leaves_destination_untouched() {
    let schema = car_schema();
    let source = store(&schema, json!({"engine": {}}));
    let target = store(&schema, json!({"name": "keep", "engine": {"running": true}}));

    target.select(&schema).upsert_from(&source.select(&schema)).unwrap();

    assert_eq!(
        target.to_json(),
        json!({"name": "keep", "engine": {"running": true}})
    );
}

#[test]
fn test_leaf_write_failure_aborts_walk() {
    let schema = car_schema();
    let source = store(&schema, json!({"engine": {"running": true}, "name": "c1"}));
    let target = store(&schema, json!({}));
    let to = failing_selection(&schema, &target, FailPoint::Write, "car/engine/running");

    let err = to.upsert_from(&source.select(&schema)).unwrap_err();

    assert!(matches!(err, NodeError::Backend { ref path, .. } if path == "car/engine/running"));
    // name is declared before engine and was already written; nothing is rolled back
    assert_eq!(target.to_json(), json!({"name": "c1", "engine": {"cylinders": 4}}));
}

#[test]
fn test_creation_yielding_nothing_is_could_not_create() {
    let schema = car_schema();
    let source = store(&schema, json!({"engine": {"running": true}}));
    let target = store(&schema, json!({}));
    let to = failing_selection(&schema, &target, FailPoint::Refuse, "car/engine");

    let err = to.upsert_from(&source.select(&schema)).unwrap_err();

    assert_eq!(
        err,
        NodeError::CouldNotCreate {
            ident: "engine".to_string(),
            path: "car/engine".to_string(),
        }
    );
    assert_eq!(err.status(), 500);
}

#[test]
fn test_creation_failure_propagates_unchanged() {
    let schema = car_schema();
    let source = store(&schema, json!({"engine": {"running": true}}));
    let target = store(&schema, json!({}));
    let to = failing_selection(&schema, &target, FailPoint::Create, "car/engine");

    let err = to.insert_from(&source.select(&schema)).unwrap_err();

    assert!(matches!(err, NodeError::Backend { .. }));
    assert_eq!(target.to_json(), json!({}));
}

// ===== Strategy selection =====

#[test]
fn test_edit_from_with_parsed_strategy() {
    let schema = car_schema();
    let source = store(&schema, json!({"engine": {"running": true}}));
    let target = store(&schema, json!({}));
    let strategy: EditStrategy = "create".parse().unwrap();

    target
        .select(&schema)
        .edit_from(&source.select(&schema), strategy, &EditOptions::default())
        .unwrap();

    assert_eq!(strategy, EditStrategy::Insert);
    assert_eq!(
        target.to_json(),
        json!({"engine": {"cylinders": 4, "running": true}})
    );
}

#[test]
fn test_unsupported_strategy_is_not_implemented() {
    let err = "replace".parse::<EditStrategy>().unwrap_err();

    assert_eq!(
        err,
        NodeError::StrategyNotImplemented {
            strategy: "replace".to_string()
        }
    );
    assert_eq!(err.status(), 501);
}

// ===== Schema binding =====

#[test]
fn test_edit_across_different_schemas_is_rejected() {
    let car = car_schema();
    let app = app_schema();
    let source = store(&car, json!({"name": "c1", "engine": {"running": true}}));
    let target = store(&app, json!({"server": {"port": 1}}));

    let err = target.select(&app).upsert_from(&source.select(&car)).unwrap_err();

    assert!(matches!(err, NodeError::InvalidInput { .. }));
    assert_eq!(err.status(), 400);
    assert_eq!(target.to_json(), json!({"server": {"port": 1}}));
}

#[test]
fn test_edit_across_equal_schema_instances_is_allowed() {
    let source_schema = car_schema();
    let target_schema = car_schema();
    let source = store(&source_schema, json!({"name": "c1"}));
    let target = store(&target_schema, json!({}));

    target
        .select(&target_schema)
        .upsert_from(&source.select(&source_schema))
        .unwrap();

    assert_eq!(target.to_json(), json!({"name": "c1"}));
}

#[test]
fn test_end_to_end_server_scenario() {
    let schema = common::app_schema();
    let source = store(&schema, json!({"server": {"name": "c1", "port": 8090}}));
    let target = store(&schema, json!({}));

    target.select(&schema).upsert_from(&source.select(&schema)).unwrap();

    assert_eq!(
        target.to_json(),
        json!({"server": {"name": "c1", "port": 8090, "debug": false}})
    );
}
