//! Schema definition documents
//!
//! Schemas are configuration: a versioned YAML (or JSON) document listing
//! definitions under a module.
//!
//! ```yaml
//! schema_version: 0
//! module: car
//! definitions:
//!   - kind: leaf
//!     ident: name
//!     type: string
//!     default: unnamed
//!   - kind: list
//!     ident: tire
//!     key: [pos]
//!     definitions:
//!       - { kind: leaf, ident: pos, type: string }
//!   - kind: choice
//!     ident: engine
//!     cases:
//!       - ident: gas
//!         definitions:
//!           - { kind: leaf, ident: octane, type: int32 }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value as Json;

use super::{MetaId, Schema, SchemaBuilder};
use crate::errors::{NodeError, Result};
use crate::value::ValueType;

/// Top-level schema document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaV0 {
    /// Format version (must be 0)
    pub schema_version: u32,
    pub module: String,
    #[serde(default)]
    pub definitions: Vec<DefinitionV0>,
}

/// One definition in a schema document
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum DefinitionV0 {
    Container {
        ident: String,
        #[serde(default)]
        definitions: Vec<DefinitionV0>,
    },
    List {
        ident: String,
        #[serde(default)]
        key: Vec<String>,
        #[serde(default)]
        definitions: Vec<DefinitionV0>,
    },
    Leaf {
        ident: String,
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        enumeration: Vec<String>,
        #[serde(default)]
        default: Option<Json>,
    },
    LeafList {
        ident: String,
        #[serde(rename = "type")]
        ty: String,
        #[serde(default)]
        enumeration: Vec<String>,
    },
    Choice {
        ident: String,
        cases: Vec<CaseV0>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaseV0 {
    pub ident: String,
    #[serde(default)]
    pub definitions: Vec<DefinitionV0>,
}

/// Parse a YAML schema document
///
/// # Errors
///
/// `Serialization` for malformed YAML, `InvalidSchema` for definitions that
/// do not form a valid schema.
pub fn parse_schema_yaml(content: &str) -> Result<Schema> {
    let doc: SchemaV0 = serde_yaml::from_str(content)?;
    build_schema(&doc)
}

/// Parse a JSON schema document
///
/// # Errors
///
/// Same as [`parse_schema_yaml`].
pub fn parse_schema_json(content: &str) -> Result<Schema> {
    let doc: SchemaV0 = serde_json::from_str(content)?;
    build_schema(&doc)
}

/// Load a schema file, picking the format from the extension
///
/// `.json` is parsed as JSON, anything else as YAML.
///
/// # Errors
///
/// `Io` when the file cannot be read, otherwise as [`parse_schema_yaml`].
pub fn load_schema_file(path: &Path) -> Result<Schema> {
    let content = fs::read_to_string(path).map_err(|e| NodeError::Io {
        path: path.display().to_string(),
        reason: e.to_string(),
    })?;

    let is_json = path
        .extension()
        .map(|ext| ext == "json")
        .unwrap_or(false);
    if is_json {
        parse_schema_json(&content)
    } else {
        parse_schema_yaml(&content)
    }
}

/// Build a schema from a parsed document
///
/// # Errors
///
/// `InvalidSchema` on an unsupported version, unknown type names, defaults
/// that do not fit their type, or structural problems reported by the builder.
pub fn build_schema(doc: &SchemaV0) -> Result<Schema> {
    if doc.schema_version != 0 {
        return Err(NodeError::InvalidSchema {
            reason: format!(
                "Unsupported schema_version: {}. Expected 0",
                doc.schema_version
            ),
        });
    }

    let mut builder = SchemaBuilder::new(&doc.module);
    let root = builder.root();
    add_definitions(&mut builder, root, &doc.definitions)?;
    builder.build()
}

fn add_definitions(
    builder: &mut SchemaBuilder,
    parent: MetaId,
    defs: &[DefinitionV0],
) -> Result<()> {
    for def in defs {
        match def {
            DefinitionV0::Container { ident, definitions } => {
                let id = builder.container(parent, ident)?;
                add_definitions(builder, id, definitions)?;
            }
            DefinitionV0::List {
                ident,
                key,
                definitions,
            } => {
                let keys: Vec<&str> = key.iter().map(String::as_str).collect();
                let id = builder.list(parent, ident, &keys)?;
                add_definitions(builder, id, definitions)?;
            }
            DefinitionV0::Leaf {
                ident,
                ty,
                enumeration,
                default,
            } => {
                let ty = parse_type(ident, ty, enumeration)?;
                match default {
                    Some(raw) => {
                        let value = ty.coerce(raw).map_err(|found| NodeError::InvalidSchema {
                            reason: format!(
                                "default for '{}' is {} but leaf type is {}",
                                ident,
                                found,
                                ty.name()
                            ),
                        })?;
                        builder.leaf_with_default(parent, ident, ty, value)?;
                    }
                    None => {
                        builder.leaf(parent, ident, ty)?;
                    }
                }
            }
            DefinitionV0::LeafList {
                ident,
                ty,
                enumeration,
            } => {
                let ty = parse_type(ident, ty, enumeration)?;
                builder.leaf_list(parent, ident, ty)?;
            }
            DefinitionV0::Choice { ident, cases } => {
                let choice = builder.choice(parent, ident)?;
                for case in cases {
                    let id = builder.case(choice, &case.ident)?;
                    add_definitions(builder, id, &case.definitions)?;
                }
            }
        }
    }
    Ok(())
}

fn parse_type(ident: &str, name: &str, enumeration: &[String]) -> Result<ValueType> {
    ValueType::from_name(name, enumeration).ok_or_else(|| NodeError::InvalidSchema {
        reason: format!("unsupported type '{}' for '{}'", name, ident),
    })
}
