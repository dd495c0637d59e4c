//! confnode core - schema-driven configuration edit engine
//!
//! This crate merges a partial configuration document into a persisted
//! configuration tree whose shape is described by a schema:
//! - Schema model (containers, lists with keys, leaves, choice/case groups)
//! - Selections binding schema definitions to backing data nodes
//! - The edit engine with Upsert / Insert / Update strategies, default
//!   injection and choice exclusivity
//! - An in-memory backing store with JSON decode/encode
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use confnode_core::meta::parse_schema_yaml;
//! use confnode_core::memory::MemoryStore;
//! use serde_json::json;
//!
//! let schema = Arc::new(parse_schema_yaml(r#"
//! schema_version: 0
//! module: app
//! definitions:
//!   - kind: container
//!     ident: web
//!     definitions:
//!       - { kind: leaf, ident: port, type: int32 }
//!       - { kind: leaf, ident: debug, type: boolean, default: false }
//! "#).unwrap());
//!
//! let source = MemoryStore::from_json(&schema, &json!({"web": {"port": 8090}})).unwrap();
//! let target = MemoryStore::new();
//! target.select(&schema).upsert_from(&source.select(&schema)).unwrap();
//!
//! assert_eq!(target.to_json(), json!({"web": {"port": 8090, "debug": false}}));
//! ```

pub mod edit;
pub mod errors;
pub mod logging_facility;
pub mod memory;
pub mod meta;
pub mod node;
pub mod path;
pub mod selection;
pub mod value;

pub use confnode_core_types as core_types;

// Re-export commonly used types
pub use edit::{EditOptions, EditStrategy, Editor};
pub use errors::{ExError, ExErrorKind, NodeError, Result};
pub use memory::MemoryStore;
pub use meta::{MetaId, Schema};
pub use node::{Node, NodeRef};
pub use path::Path;
pub use selection::Selection;
pub use value::{Value, ValueType};
