use super::{MetaId, MetaKind, MetaNode, Schema};
use crate::errors::{NodeError, Result};
use crate::value::{Value, ValueType};

/// Incremental schema construction
///
/// Every `add` checks that the parent can hold the new definition and that
/// no data sibling (choices and cases being transparent) already uses the
/// identifier. `build` checks list keys.
///
/// # Example
///
/// ```
/// use confnode_core::meta::SchemaBuilder;
/// use confnode_core::value::ValueType;
///
/// let mut b = SchemaBuilder::new("car");
/// let root = b.root();
/// let tire = b.list(root, "tire", &["pos"]).unwrap();
/// b.leaf(tire, "pos", ValueType::String).unwrap();
/// let schema = b.build().unwrap();
/// assert!(schema.is_list(tire));
/// ```
#[derive(Debug, Clone)]
pub struct SchemaBuilder {
    nodes: Vec<MetaNode>,
}

impl SchemaBuilder {
    pub fn new(module: &str) -> Self {
        Self {
            nodes: vec![MetaNode {
                ident: module.to_string(),
                kind: MetaKind::Module,
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    pub fn root(&self) -> MetaId {
        MetaId(0)
    }

    pub fn container(&mut self, parent: MetaId, ident: &str) -> Result<MetaId> {
        self.add(parent, ident, MetaKind::Container)
    }

    pub fn list(&mut self, parent: MetaId, ident: &str, keys: &[&str]) -> Result<MetaId> {
        let keys = keys.iter().map(|k| k.to_string()).collect();
        self.add(parent, ident, MetaKind::List { keys })
    }

    pub fn leaf(&mut self, parent: MetaId, ident: &str, ty: ValueType) -> Result<MetaId> {
        self.add(parent, ident, MetaKind::Leaf { ty, default: None })
    }

    pub fn leaf_with_default(
        &mut self,
        parent: MetaId,
        ident: &str,
        ty: ValueType,
        default: Value,
    ) -> Result<MetaId> {
        if !ty.accepts(&default) {
            return Err(NodeError::InvalidSchema {
                reason: format!(
                    "default for '{}' is {} but leaf type is {}",
                    ident,
                    default.type_label(),
                    ty.name()
                ),
            });
        }
        self.add(
            parent,
            ident,
            MetaKind::Leaf {
                ty,
                default: Some(default),
            },
        )
    }

    pub fn leaf_list(&mut self, parent: MetaId, ident: &str, ty: ValueType) -> Result<MetaId> {
        self.add(parent, ident, MetaKind::LeafList { ty })
    }

    pub fn choice(&mut self, parent: MetaId, ident: &str) -> Result<MetaId> {
        self.add(parent, ident, MetaKind::Choice)
    }

    pub fn case(&mut self, choice: MetaId, ident: &str) -> Result<MetaId> {
        self.add(choice, ident, MetaKind::Case)
    }

    fn add(&mut self, parent: MetaId, ident: &str, kind: MetaKind) -> Result<MetaId> {
        let parent_node = self.nodes.get(parent.0).ok_or_else(|| NodeError::InvalidSchema {
            reason: format!("unknown parent definition #{}", parent.0),
        })?;
        if ident.is_empty() {
            return Err(NodeError::InvalidSchema {
                reason: format!("empty identifier under '{}'", parent_node.ident),
            });
        }

        let parent_kind = &parent_node.kind;
        let allowed = match (&kind, parent_kind) {
            (MetaKind::Case, MetaKind::Choice) => true,
            (MetaKind::Case, _) | (_, MetaKind::Choice) => false,
            (MetaKind::Module, _) => false,
            (_, MetaKind::Leaf { .. } | MetaKind::LeafList { .. }) => false,
            _ => true,
        };
        if !allowed {
            return Err(NodeError::InvalidSchema {
                reason: format!(
                    "'{}' cannot be declared under '{}'",
                    ident, parent_node.ident
                ),
            });
        }

        let schema = Schema::from_nodes(std::mem::take(&mut self.nodes));
        let clash = match kind {
            // choice and case names only need to be unique among direct siblings
            MetaKind::Choice | MetaKind::Case => schema
                .children(parent)
                .iter()
                .any(|&c| schema.ident(c) == ident),
            _ => {
                let scope = if schema.is_choice(parent) || schema.is_case(parent) {
                    schema.data_parent(parent).unwrap_or(parent)
                } else {
                    parent
                };
                schema.find_child(scope, ident).is_some()
            }
        };
        let parent_path = schema.schema_path(parent);
        self.nodes = schema.nodes;
        if clash {
            return Err(NodeError::InvalidSchema {
                reason: format!("duplicate identifier '{}' under '{}'", ident, parent_path),
            });
        }

        let id = MetaId(self.nodes.len());
        self.nodes.push(MetaNode {
            ident: ident.to_string(),
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.0].children.push(id);
        Ok(id)
    }

    /// Finish the schema
    ///
    /// # Errors
    ///
    /// Returns `InvalidSchema` when a list key does not name a leaf of the list
    /// or a choice has no cases.
    pub fn build(self) -> Result<Schema> {
        let schema = Schema::from_nodes(self.nodes);
        for index in 0..schema.nodes.len() {
            let id = MetaId(index);
            match schema.kind(id) {
                MetaKind::List { keys } => {
                    for key in keys {
                        let is_leaf = schema
                            .children(id)
                            .iter()
                            .any(|&c| schema.ident(c) == key.as_str()
                                && matches!(schema.kind(c), MetaKind::Leaf { .. }));
                        if !is_leaf {
                            return Err(NodeError::InvalidSchema {
                                reason: format!(
                                    "key '{}' of list '{}' is not a leaf of the list",
                                    key,
                                    schema.schema_path(id)
                                ),
                            });
                        }
                    }
                }
                MetaKind::Choice if schema.children(id).is_empty() => {
                    return Err(NodeError::InvalidSchema {
                        reason: format!("choice '{}' has no cases", schema.schema_path(id)),
                    });
                }
                _ => {}
            }
        }
        Ok(schema)
    }
}
