//! Schema model
//!
//! A schema is an arena of definitions addressed by [`MetaId`]. The root is
//! always the module. Containers, lists, cases and the module hold data
//! definitions; choices hold only cases. Lookups are pure and never touch
//! stored data.

pub mod builder;
pub mod iter;
pub mod parser;

pub use builder::SchemaBuilder;
pub use iter::{choice_case_members, container_children};
pub use parser::{load_schema_file, parse_schema_json, parse_schema_yaml};

use crate::value::{Value, ValueType};

/// Handle of a definition inside a [`Schema`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetaId(pub(crate) usize);

impl MetaId {
    pub fn index(self) -> usize {
        self.0
    }
}

/// Kind of a definition
#[derive(Debug, Clone, PartialEq)]
pub enum MetaKind {
    Module,
    Container,
    List { keys: Vec<String> },
    Leaf { ty: ValueType, default: Option<Value> },
    LeafList { ty: ValueType },
    Choice,
    Case,
}

/// One definition in the arena
#[derive(Debug, Clone, PartialEq)]
pub struct MetaNode {
    pub ident: String,
    pub kind: MetaKind,
    pub parent: Option<MetaId>,
    pub children: Vec<MetaId>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Schema {
    nodes: Vec<MetaNode>,
}

impl Schema {
    pub(crate) fn from_nodes(nodes: Vec<MetaNode>) -> Self {
        Self { nodes }
    }

    pub fn root(&self) -> MetaId {
        MetaId(0)
    }

    pub fn module_name(&self) -> &str {
        self.ident(self.root())
    }

    pub fn node(&self, id: MetaId) -> &MetaNode {
        &self.nodes[id.0]
    }

    pub fn ident(&self, id: MetaId) -> &str {
        &self.node(id).ident
    }

    pub fn kind(&self, id: MetaId) -> &MetaKind {
        &self.node(id).kind
    }

    pub fn parent(&self, id: MetaId) -> Option<MetaId> {
        self.node(id).parent
    }

    /// Direct children in declaration order, choices included
    pub fn children(&self, id: MetaId) -> &[MetaId] {
        &self.node(id).children
    }

    pub fn is_leaf(&self, id: MetaId) -> bool {
        matches!(self.kind(id), MetaKind::Leaf { .. } | MetaKind::LeafList { .. })
    }

    pub fn is_list(&self, id: MetaId) -> bool {
        matches!(self.kind(id), MetaKind::List { .. })
    }

    pub fn is_choice(&self, id: MetaId) -> bool {
        matches!(self.kind(id), MetaKind::Choice)
    }

    pub fn is_case(&self, id: MetaId) -> bool {
        matches!(self.kind(id), MetaKind::Case)
    }

    /// Definitions that can hold data definitions of their own
    pub fn has_data_defs(&self, id: MetaId) -> bool {
        matches!(
            self.kind(id),
            MetaKind::Module | MetaKind::Container | MetaKind::List { .. } | MetaKind::Case
        )
    }

    pub fn leaf_type(&self, id: MetaId) -> Option<&ValueType> {
        match self.kind(id) {
            MetaKind::Leaf { ty, .. } | MetaKind::LeafList { ty } => Some(ty),
            _ => None,
        }
    }

    pub fn default_value(&self, id: MetaId) -> Option<&Value> {
        match self.kind(id) {
            MetaKind::Leaf { default, .. } => default.as_ref(),
            _ => None,
        }
    }

    pub fn list_keys(&self, id: MetaId) -> &[String] {
        match self.kind(id) {
            MetaKind::List { keys } => keys,
            _ => &[],
        }
    }

    /// Find a data definition by identifier under `parent`
    ///
    /// Choices and cases are transparent: a leaf declared in a case is found
    /// as if it were a direct child of the enclosing container.
    pub fn find_child(&self, parent: MetaId, ident: &str) -> Option<MetaId> {
        for &child in self.children(parent) {
            if self.is_choice(child) {
                for &case in self.children(child) {
                    if let Some(found) = self.find_child(case, ident) {
                        return Some(found);
                    }
                }
            } else if self.ident(child) == ident {
                return Some(child);
            }
        }
        None
    }

    /// The case `member` is declared in, if its immediate parent is one
    pub fn enclosing_case(&self, member: MetaId) -> Option<MetaId> {
        self.parent(member).filter(|&p| self.is_case(p))
    }

    /// The choice owning `case`
    pub fn case_choice(&self, case: MetaId) -> Option<MetaId> {
        self.parent(case).filter(|&p| self.is_choice(p))
    }

    /// Nearest ancestor that holds data (skips choices and cases)
    pub fn data_parent(&self, id: MetaId) -> Option<MetaId> {
        let mut current = self.parent(id);
        while let Some(p) = current {
            if !self.is_choice(p) && !self.is_case(p) {
                return Some(p);
            }
            current = self.parent(p);
        }
        None
    }

    /// Slash-separated schema address, for diagnostics
    pub fn schema_path(&self, id: MetaId) -> String {
        let mut segments = vec![self.ident(id)];
        let mut current = self.parent(id);
        while let Some(p) = current {
            segments.push(self.ident(p));
            current = self.parent(p);
        }
        segments.reverse();
        segments.join("/")
    }
}
