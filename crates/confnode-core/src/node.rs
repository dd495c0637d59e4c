//! Backing node protocol
//!
//! A [`Node`] is whatever actually holds configuration data: memory, a
//! database row, a device driver. The engine never touches data except
//! through these calls, and every call receives the [`Selection`] it is
//! made on so the node can see the schema definition and tree address.

use std::sync::Arc;

use crate::errors::Result;
use crate::meta::MetaId;
use crate::path::Path;
use crate::selection::Selection;
use crate::value::Value;

pub type NodeRef = Arc<dyn Node>;

/// Lifecycle bracket around the edit of one node
#[derive(Debug, Clone)]
pub struct NodeRequest<'a> {
    /// Selection the edit is applied to (stays the same while bubbling)
    pub source: &'a Selection,
    /// The node was created by this edit
    pub new: bool,
    /// The node is the root of the whole edit
    pub edit_root: bool,
}

/// Navigate to, create or remove a container or list presence node
#[derive(Debug, Clone)]
pub struct ChildRequest<'a> {
    /// Source selection the child's content will come from, if editing
    pub from: Option<&'a Selection>,
    pub path: Arc<Path>,
    /// Path of the selection the current edit started at
    pub base: Arc<Path>,
    pub meta: MetaId,
    /// Create the child when absent
    pub new: bool,
    /// Remove the child
    pub delete: bool,
}

/// Iterate, look up, create or remove list items
#[derive(Debug, Clone)]
pub struct ListRequest<'a> {
    pub from: Option<&'a Selection>,
    pub path: Arc<Path>,
    pub base: Arc<Path>,
    /// The list definition
    pub meta: MetaId,
    /// Restart iteration at the first item
    pub first: bool,
    /// Position of the requested item when iterating or for keyless lists
    pub row: i64,
    /// When non-empty, address the item with this key instead of by row
    pub key: Vec<Value>,
    pub new: bool,
    pub delete: bool,
}

impl ListRequest<'_> {
    pub fn increment_row(&mut self) {
        self.row += 1;
    }
}

/// Read or write one leaf
#[derive(Debug, Clone)]
pub struct FieldRequest {
    pub path: Arc<Path>,
    pub base: Arc<Path>,
    pub meta: MetaId,
}

/// A backing data node
///
/// `Ok(None)` from a navigation call means the data is absent, which is not
/// an error. Mutations take effect immediately; transactional batching, if
/// any, belongs to the implementation and is usually keyed off the
/// `begin_edit`/`end_edit` bracket.
pub trait Node: Send + Sync {
    /// Resolve, create (`r.new`) or remove (`r.delete`) a container or list
    fn child(&self, sel: &Selection, r: &ChildRequest<'_>) -> Result<Option<NodeRef>>;

    /// Resolve, create or remove a list item, returning the item and its key
    fn next(&self, sel: &Selection, r: &ListRequest<'_>) -> Result<Option<(NodeRef, Vec<Value>)>>;

    /// Read a leaf; `None` means unset
    fn read_field(&self, sel: &Selection, r: &FieldRequest) -> Result<Option<Value>>;

    /// Write a leaf; `None` erases it
    fn write_field(&self, sel: &Selection, r: &FieldRequest, value: Option<Value>) -> Result<()>;

    /// Case of `choice` that currently holds data, if any
    fn choose(&self, sel: &Selection, choice: MetaId) -> Result<Option<MetaId>>;

    fn begin_edit(&self, _sel: &Selection, _r: &NodeRequest<'_>) -> Result<()> {
        Ok(())
    }

    fn end_edit(&self, _sel: &Selection, _r: &NodeRequest<'_>) -> Result<()> {
        Ok(())
    }
}
