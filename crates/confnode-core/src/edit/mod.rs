//! Edit engine
//!
//! Recursively merges a source selection into a destination selection.
//! Containers and list items are created, required or refused according to
//! the [`EditStrategy`]; leaves are copied with schema defaults injected only
//! into nodes the edit itself created.
//!
//! Processing stops at the first failure. Mutations already applied are not
//! rolled back; a backing store wanting atomicity does so around the
//! `begin_edit`/`end_edit` bracket of the edit root.

mod choice;
mod strategy;

pub use strategy::EditStrategy;

use std::sync::Arc;
use std::time::Instant;

use confnode_core_types::RequestContext;
use serde::{Deserialize, Serialize};

use crate::errors::{ExError, NodeError, Result};
use crate::meta::{self, MetaId};
use crate::node::{ChildRequest, FieldRequest, ListRequest, NodeRequest};
use crate::path::Path;
use crate::selection::Selection;
use crate::value::format_key;
use crate::{log_op_end, log_op_error, log_op_start};

/// Caller-level edit configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditOptions {
    /// Fill schema defaults into every node visited, not just created ones
    #[serde(default)]
    pub use_default: bool,
}

#[derive(Debug, Clone, Default)]
pub struct Editor {
    base_path: Option<Arc<Path>>,
    use_default: bool,
    context: Option<RequestContext>,
}

impl Editor {
    pub fn new(options: &EditOptions) -> Self {
        Self {
            base_path: None,
            use_default: options.use_default,
            context: None,
        }
    }

    /// Path reported to nodes as the base of every request
    ///
    /// Defaults to the destination's path.
    pub fn with_base_path(mut self, base: Arc<Path>) -> Self {
        self.base_path = Some(base);
        self
    }

    /// Correlate log lines and errors with a protocol request
    pub fn with_context(mut self, context: RequestContext) -> Self {
        self.context = Some(context);
        self
    }

    /// Merge `from` into `to`
    ///
    /// The walk starts with `new = false` and the root bracket bubbling to
    /// `to`'s ancestors, so lifecycle hooks see exactly one edit root.
    ///
    /// # Errors
    ///
    /// The first failure encountered: `Duplicate`/`DuplicateListItem` (409)
    /// under Insert, `NotFound`/`ListItemNotFound` (404) under Update, or any
    /// navigation/backend failure (500). `InvalidInput` (400) when `from` and
    /// `to` are bound to different schemas.
    pub fn edit(&self, from: &Selection, to: &Selection, strategy: EditStrategy) -> Result<()> {
        // Definition handles are only meaningful within one schema
        if !std::ptr::eq(from.schema(), to.schema()) && from.schema() != to.schema() {
            return Err(NodeError::InvalidInput {
                reason: format!(
                    "source schema '{}' does not match destination schema '{}'",
                    from.schema().module_name(),
                    to.schema().module_name()
                ),
            });
        }

        let request_id = self
            .context
            .as_ref()
            .map(|c| c.request_id.to_string())
            .unwrap_or_default();
        log_op_start!(
            "edit",
            strategy = strategy.as_str(),
            path = %to.path(),
            request_id = %request_id
        );
        let started = Instant::now();

        let base = self
            .base_path
            .clone()
            .unwrap_or_else(|| Arc::clone(to.path()));
        let walk = Walk {
            base,
            use_default: self.use_default,
        };
        let result = walk.enter(from, to, false, strategy, true, true);

        let duration_ms = started.elapsed().as_millis() as u64;
        match &result {
            Ok(()) => {
                log_op_end!("edit", duration_ms = duration_ms, path = %to.path());
            }
            Err(err) => {
                log_op_error!("edit", err, duration_ms = duration_ms, path = %to.path());
            }
        }
        result
    }

    /// Classify an edit failure for a protocol response
    pub fn describe_error(&self, err: &NodeError) -> ExError {
        let mut ex = ExError::from(err).with_op("edit");
        if let Some(ctx) = &self.context {
            ex = ex.with_request_id(ctx.request_id.clone());
            if let Some(trace_id) = &ctx.trace_id {
                ex = ex.with_trace_id(trace_id.clone());
            }
        }
        ex
    }
}

/// State shared by every frame of one edit call
struct Walk {
    base: Arc<Path>,
    use_default: bool,
}

impl Walk {
    fn enter(
        &self,
        from: &Selection,
        to: &Selection,
        new: bool,
        strategy: EditStrategy,
        root: bool,
        bubble: bool,
    ) -> Result<()> {
        let request = NodeRequest {
            source: to,
            new,
            edit_root: root,
        };
        to.begin_edit(&request, bubble)?;

        let schema = from.schema();
        if schema.is_list(from.meta()) && !from.inside_list() {
            self.list(from, to, strategy)?;
        } else {
            for m in meta::container_children(from)? {
                if schema.is_leaf(m) {
                    self.leaf(from, to, m, new, strategy)?;
                } else {
                    self.node(from, to, m, strategy)?;
                }
            }
        }

        to.end_edit(&request, bubble)
    }

    fn leaf(
        &self,
        from: &Selection,
        to: &Selection,
        m: MetaId,
        new: bool,
        strategy: EditStrategy,
    ) -> Result<()> {
        let r = FieldRequest {
            path: from.path().child(m, from.schema().ident(m)),
            base: Arc::clone(&self.base),
            meta: m,
        };
        let use_default = (strategy != EditStrategy::Update && new) || self.use_default;
        let Some(value) = from.get_value_hnd(&r, use_default)? else {
            return Ok(());
        };

        if strategy == EditStrategy::Upsert {
            choice::clear_on_different_choice_case(to, m)?;
        }
        tracing::trace!(path = %r.path, value = %value, "set leaf");
        to.set_value_hnd(&r, value)
    }

    fn node(&self, from: &Selection, to: &Selection, m: MetaId, strategy: EditStrategy) -> Result<()> {
        let ident = from.schema().ident(m);
        let path = from.path().child(m, ident);
        let from_request = ChildRequest {
            from: None,
            path: Arc::clone(&path),
            base: Arc::clone(&self.base),
            meta: m,
            new: false,
            delete: false,
        };
        let Some(from_child) = from.select(&from_request)? else {
            return Ok(());
        };

        let mut to_request = ChildRequest {
            from: Some(&from_child),
            path: Arc::clone(&path),
            base: Arc::clone(&self.base),
            meta: m,
            new: false,
            delete: false,
        };
        let existing = to.select(&to_request)?;
        to_request.new = true;

        let (to_child, new_child) = match (strategy, existing) {
            (EditStrategy::Insert, Some(_)) => {
                return Err(NodeError::Duplicate {
                    ident: ident.to_string(),
                    path: path.to_string(),
                });
            }
            (EditStrategy::Update, None) => {
                return Err(NodeError::NotFound {
                    ident: ident.to_string(),
                    path: path.to_string(),
                });
            }
            (EditStrategy::Upsert | EditStrategy::Update, Some(child)) => (Some(child), false),
            (EditStrategy::Upsert | EditStrategy::Insert, None) => {
                if strategy == EditStrategy::Upsert {
                    choice::clear_on_different_choice_case(to, m)?;
                }
                (to.select(&to_request)?, true)
            }
        };

        let to_child = to_child.ok_or_else(|| NodeError::CouldNotCreate {
            ident: ident.to_string(),
            path: path.to_string(),
        })?;
        tracing::debug!(path = %path, new = new_child, "enter container");
        self.enter(&from_child, &to_child, new_child, strategy, false, false)
    }

    /// Walk source items in order, resolving each against the destination
    ///
    /// The outer strategy decides whether an item may or must already exist;
    /// item contents are always merged with Upsert.
    fn list(&self, from: &Selection, to: &Selection, strategy: EditStrategy) -> Result<()> {
        let m = from.meta();
        let mut from_request = ListRequest {
            from: None,
            path: Arc::clone(from.path()),
            base: Arc::clone(&self.base),
            meta: m,
            first: true,
            row: 0,
            key: Vec::new(),
            new: false,
            delete: false,
        };
        let Some((mut from_child, mut key)) = from.select_list_item(&from_request)? else {
            return Ok(());
        };

        loop {
            let item_path = from.path().with_key(key.clone());
            let mut to_request = ListRequest {
                from: Some(&from_child),
                path: Arc::clone(&item_path),
                base: Arc::clone(&self.base),
                meta: m,
                first: true,
                row: from_request.row,
                key: key.clone(),
                new: false,
                delete: false,
            };

            let existing = if key.is_empty() {
                None
            } else {
                to.select_list_item(&to_request)?.map(|(item, _)| item)
            };
            to_request.new = true;

            let (to_child, new_item) = match (strategy, existing) {
                (EditStrategy::Update, None) => {
                    return Err(NodeError::ListItemNotFound {
                        key: format_key(&key),
                        path: to.path().to_string(),
                    });
                }
                (EditStrategy::Insert, Some(_)) => {
                    return Err(NodeError::DuplicateListItem {
                        path: to.path().to_string(),
                    });
                }
                (EditStrategy::Upsert | EditStrategy::Update, Some(item)) => (Some(item), false),
                (EditStrategy::Upsert | EditStrategy::Insert, None) => (
                    to.select_list_item(&to_request)?.map(|(item, _)| item),
                    true,
                ),
            };

            let to_child = to_child.ok_or_else(|| NodeError::CouldNotCreateListItem {
                path: to.path().to_string(),
            })?;
            tracing::debug!(path = %item_path, new = new_item, "enter list item");
            self.enter(&from_child, &to_child, new_item, EditStrategy::Upsert, false, false)?;

            from_request.first = false;
            from_request.path = item_path;
            from_request.increment_row();
            match from.select_list_item(&from_request)? {
                Some((next_child, next_key)) => {
                    from_child = next_child;
                    key = next_key;
                }
                None => return Ok(()),
            }
        }
    }
}
