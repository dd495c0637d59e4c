//! Selections
//!
//! A [`Selection`] binds one schema definition to one backing node at one
//! tree address. It is the only way the engine reads or mutates data.
//! Selections are cheap to clone; cloning never copies data.

use std::sync::Arc;

use crate::edit::{EditOptions, EditStrategy, Editor};
use crate::errors::{NodeError, Result};
use crate::meta::{MetaId, Schema};
use crate::node::{ChildRequest, FieldRequest, ListRequest, NodeRef, NodeRequest};
use crate::path::Path;
use crate::value::Value;

#[derive(Clone)]
pub struct Selection {
    schema: Arc<Schema>,
    meta: MetaId,
    node: NodeRef,
    path: Arc<Path>,
    parent: Option<Arc<Selection>>,
    inside_list: bool,
    key: Vec<Value>,
}

impl std::fmt::Debug for Selection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Selection")
            .field("path", &self.path.to_string())
            .field("inside_list", &self.inside_list)
            .finish()
    }
}

impl Selection {
    /// Bind `node` to the root (module) of `schema`
    pub fn new(schema: Arc<Schema>, node: NodeRef) -> Self {
        let root = schema.root();
        let path = Path::root(root, schema.ident(root));
        Self {
            schema,
            meta: root,
            node,
            path,
            parent: None,
            inside_list: false,
            key: Vec::new(),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn meta(&self) -> MetaId {
        self.meta
    }

    pub fn node(&self) -> &NodeRef {
        &self.node
    }

    pub fn path(&self) -> &Arc<Path> {
        &self.path
    }

    pub fn parent(&self) -> Option<&Selection> {
        self.parent.as_deref()
    }

    /// Positioned on one item of a list rather than on the list itself
    pub fn inside_list(&self) -> bool {
        self.inside_list
    }

    /// Key of the list item this selection is positioned on
    pub fn key(&self) -> &[Value] {
        &self.key
    }

    fn backend(&self, reason: impl Into<String>) -> NodeError {
        NodeError::Backend {
            path: self.path.to_string(),
            reason: reason.into(),
        }
    }

    /// Navigate to a container or list child
    ///
    /// # Errors
    ///
    /// Whatever the backing node reports.
    pub fn select(&self, r: &ChildRequest<'_>) -> Result<Option<Selection>> {
        let child = self.node.child(self, r)?;
        Ok(child.map(|node| Selection {
            schema: Arc::clone(&self.schema),
            meta: r.meta,
            node,
            path: Arc::clone(&r.path),
            parent: Some(Arc::new(self.clone())),
            inside_list: false,
            key: Vec::new(),
        }))
    }

    /// Navigate to an item of the list this selection is positioned on
    ///
    /// # Errors
    ///
    /// Whatever the backing node reports.
    pub fn select_list_item(&self, r: &ListRequest<'_>) -> Result<Option<(Selection, Vec<Value>)>> {
        let item = self.node.next(self, r)?;
        Ok(item.map(|(node, key)| {
            let sel = Selection {
                schema: Arc::clone(&self.schema),
                meta: r.meta,
                node,
                path: self.path.with_key(key.clone()),
                parent: Some(Arc::new(self.clone())),
                inside_list: true,
                key: key.clone(),
            };
            (sel, key)
        }))
    }

    /// Look up a container or list by identifier, or by a `/`-separated chain
    ///
    /// Never creates anything. Absent data yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// `UnknownIdent` when a segment is not a container or list of the
    /// current definition, otherwise whatever the backing node reports.
    pub fn find(&self, ident: &str) -> Result<Option<Selection>> {
        let mut current = self.clone();
        for segment in ident.split('/').filter(|s| !s.is_empty()) {
            let meta = self
                .schema
                .find_child(current.meta, segment)
                .filter(|&m| !self.schema.is_leaf(m))
                .ok_or_else(|| NodeError::UnknownIdent {
                    ident: segment.to_string(),
                    path: current.path.to_string(),
                })?;
            let r = ChildRequest {
                from: None,
                path: current.path.child(meta, segment),
                base: Arc::clone(&self.path),
                meta,
                new: false,
                delete: false,
            };
            match current.select(&r)? {
                Some(next) => current = next,
                None => return Ok(None),
            }
        }
        Ok(Some(current))
    }

    /// Remove the node this selection is bound to from its parent
    ///
    /// # Errors
    ///
    /// `Backend` when called on the root, otherwise whatever the parent's
    /// backing node reports.
    pub fn delete(&self) -> Result<()> {
        let parent = self
            .parent
            .as_deref()
            .ok_or_else(|| self.backend("cannot delete the root node"))?;
        if self.inside_list {
            let r = ListRequest {
                from: None,
                path: Arc::clone(&self.path),
                base: Arc::clone(&self.path),
                meta: self.meta,
                first: false,
                row: 0,
                key: self.key.clone(),
                new: false,
                delete: true,
            };
            parent.node.next(parent, &r)?;
        } else {
            let r = ChildRequest {
                from: None,
                path: Arc::clone(&self.path),
                base: Arc::clone(&self.path),
                meta: self.meta,
                new: false,
                delete: true,
            };
            parent.node.child(parent, &r)?;
        }
        tracing::debug!(path = %self.path, "deleted node");
        Ok(())
    }

    /// Read a leaf, falling back to its schema default when `use_default`
    ///
    /// # Errors
    ///
    /// Whatever the backing node reports.
    pub fn get_value_hnd(&self, r: &FieldRequest, use_default: bool) -> Result<Option<Value>> {
        let value = self.node.read_field(self, r)?;
        if value.is_none() && use_default {
            return Ok(self.schema.default_value(r.meta).cloned());
        }
        Ok(value)
    }

    /// Write a leaf
    ///
    /// # Errors
    ///
    /// Whatever the backing node reports, e.g. a type mismatch.
    pub fn set_value_hnd(&self, r: &FieldRequest, value: Value) -> Result<()> {
        self.node.write_field(self, r, Some(value))
    }

    /// Erase a leaf to the absent state
    ///
    /// # Errors
    ///
    /// Whatever the backing node reports.
    pub fn clear_field(&self, meta: MetaId) -> Result<()> {
        let r = FieldRequest {
            path: self.path.child(meta, self.schema.ident(meta)),
            base: Arc::clone(&self.path),
            meta,
        };
        self.node.write_field(self, &r, None)
    }

    /// Case of `choice` currently holding data on this node
    ///
    /// # Errors
    ///
    /// Whatever the backing node reports.
    pub fn choose(&self, choice: MetaId) -> Result<Option<MetaId>> {
        self.node.choose(self, choice)
    }

    /// Open the edit bracket on this node, then on every ancestor when `bubble`
    ///
    /// # Errors
    ///
    /// The first hook failure.
    pub fn begin_edit(&self, r: &NodeRequest<'_>, bubble: bool) -> Result<()> {
        self.bracket(r, bubble, |sel, r| sel.node.begin_edit(sel, r))
    }

    /// Close the edit bracket, mirroring [`Selection::begin_edit`]
    ///
    /// # Errors
    ///
    /// The first hook failure.
    pub fn end_edit(&self, r: &NodeRequest<'_>, bubble: bool) -> Result<()> {
        self.bracket(r, bubble, |sel, r| sel.node.end_edit(sel, r))
    }

    fn bracket<F>(&self, r: &NodeRequest<'_>, bubble: bool, hook: F) -> Result<()>
    where
        F: Fn(&Selection, &NodeRequest<'_>) -> Result<()>,
    {
        hook(self, r)?;
        if !bubble {
            return Ok(());
        }
        let ancestor_request = NodeRequest {
            edit_root: false,
            ..r.clone()
        };
        let mut current = self.parent.as_deref();
        while let Some(sel) = current {
            hook(sel, &ancestor_request)?;
            current = sel.parent.as_deref();
        }
        Ok(())
    }

    // ===== Edit entry points =====

    /// Merge `from` into this selection, creating whatever is missing
    ///
    /// # Errors
    ///
    /// The first failure of the walk; see [`Editor::edit`].
    pub fn upsert_from(&self, from: &Selection) -> Result<()> {
        Editor::default().edit(from, self, EditStrategy::Upsert)
    }

    /// Copy `from` into this selection; anything already present is a conflict
    ///
    /// # Errors
    ///
    /// `Duplicate`/`DuplicateListItem` on existing data, see [`Editor::edit`].
    pub fn insert_from(&self, from: &Selection) -> Result<()> {
        Editor::default().edit(from, self, EditStrategy::Insert)
    }

    /// Refine existing data from `from`; anything missing is not found
    ///
    /// # Errors
    ///
    /// `NotFound`/`ListItemNotFound` on absent data, see [`Editor::edit`].
    pub fn update_from(&self, from: &Selection) -> Result<()> {
        Editor::default().edit(from, self, EditStrategy::Update)
    }

    /// Merge this selection into `to`
    ///
    /// # Errors
    ///
    /// See [`Selection::upsert_from`].
    pub fn upsert_into(&self, to: &Selection) -> Result<()> {
        to.upsert_from(self)
    }

    /// # Errors
    ///
    /// See [`Selection::insert_from`].
    pub fn insert_into(&self, to: &Selection) -> Result<()> {
        to.insert_from(self)
    }

    /// # Errors
    ///
    /// See [`Selection::update_from`].
    pub fn update_into(&self, to: &Selection) -> Result<()> {
        to.update_from(self)
    }

    /// Apply `from` with an explicit strategy and options
    ///
    /// # Errors
    ///
    /// See [`Editor::edit`].
    pub fn edit_from(
        &self,
        from: &Selection,
        strategy: EditStrategy,
        options: &EditOptions,
    ) -> Result<()> {
        Editor::new(options).edit(from, self, strategy)
    }
}
