//! In-memory backing store
//!
//! Data lives in records of named slots behind `Arc<Mutex<_>>`, so
//! selections over the same store on different threads see one tree. Each
//! mutation takes effect immediately and is not batched.

mod json;
mod log;

pub use log::{EditEvent, EditHook, EditLog};

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use serde_json::Value as Json;

use crate::errors::{NodeError, Result};
use crate::meta::{choice_case_members, MetaId, MetaKind, Schema};
use crate::node::{ChildRequest, FieldRequest, ListRequest, Node, NodeRef, NodeRequest};
use crate::path::Path;
use crate::selection::Selection;
use crate::value::Value;

type Shared<T> = Arc<Mutex<T>>;

fn shared<T>(value: T) -> Shared<T> {
    Arc::new(Mutex::new(value))
}

// slots hold plain values, so a panic elsewhere cannot leave one half-written
fn guard<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

#[derive(Debug, Clone)]
enum Slot {
    Leaf(Value),
    Container(Shared<Record>),
    List(Shared<Vec<Shared<Record>>>),
}

#[derive(Debug, Default)]
struct Record {
    slots: BTreeMap<String, Slot>,
}

/// Handle on an in-memory configuration tree
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    root: Shared<Record>,
    log: Option<EditLog>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record edit brackets and deletions into `log`
    pub fn with_log(mut self, log: EditLog) -> Self {
        self.log = Some(log);
        self
    }

    /// Decode a JSON document shaped by `schema`
    ///
    /// Object members may be written `ident` or `module:ident`. Leaf values
    /// are coerced to their declared types.
    ///
    /// # Errors
    ///
    /// `UnknownIdent` for members the schema does not define, `TypeMismatch`
    /// for values of the wrong shape, `InvalidInput` for list items missing a
    /// key or data in more than one case of a choice.
    pub fn from_json(schema: &Schema, doc: &Json) -> Result<Self> {
        let root = schema.root();
        let path = Path::root(root, schema.ident(root));
        let record = json::decode_record(schema, root, doc, &path)?;
        Ok(Self {
            root: shared(record),
            log: None,
        })
    }

    /// Encode the whole tree as JSON
    pub fn to_json(&self) -> Json {
        json::encode_record(&self.root)
    }

    pub fn node(&self) -> NodeRef {
        Arc::new(RecordNode {
            record: Arc::clone(&self.root),
            log: self.log.clone(),
        })
    }

    /// Selection on the root of this store
    pub fn select(&self, schema: &Arc<Schema>) -> Selection {
        Selection::new(Arc::clone(schema), self.node())
    }
}

fn record_hook(log: &Option<EditLog>, hook: EditHook, sel: &Selection, r: &NodeRequest<'_>) {
    if let Some(log) = log {
        log.record(EditEvent {
            hook,
            node_path: sel.path().to_string(),
            source_path: r.source.path().to_string(),
            new: r.new,
            edit_root: r.edit_root,
        });
    }
}

fn record_delete(log: &Option<EditLog>, sel: &Selection, deleted: &Path) {
    if let Some(log) = log {
        log.record(EditEvent {
            hook: EditHook::Delete,
            node_path: sel.path().to_string(),
            source_path: deleted.to_string(),
            new: false,
            edit_root: false,
        });
    }
}

fn not_a(kind: &str, sel: &Selection) -> NodeError {
    NodeError::Backend {
        path: sel.path().to_string(),
        reason: format!("node is not a {}", kind),
    }
}

/// A container, list item or the module root
struct RecordNode {
    record: Shared<Record>,
    log: Option<EditLog>,
}

impl RecordNode {
    fn wrap(&self, slot: Slot, r: &ChildRequest<'_>) -> Result<NodeRef> {
        match slot {
            Slot::Container(record) => Ok(Arc::new(RecordNode {
                record,
                log: self.log.clone(),
            })),
            Slot::List(items) => Ok(Arc::new(ListNode {
                items,
                log: self.log.clone(),
            })),
            Slot::Leaf(_) => Err(NodeError::Backend {
                path: r.path.to_string(),
                reason: "slot holds a leaf value".to_string(),
            }),
        }
    }
}

impl Node for RecordNode {
    fn child(&self, sel: &Selection, r: &ChildRequest<'_>) -> Result<Option<NodeRef>> {
        let schema = sel.schema();
        let ident = schema.ident(r.meta);

        let slot = {
            let mut record = guard(&self.record);
            if r.delete {
                record.slots.remove(ident);
                drop(record);
                record_delete(&self.log, sel, &r.path);
                return Ok(None);
            }
            match record.slots.get(ident) {
                Some(slot) => slot.clone(),
                None if r.new => {
                    let slot = if schema.is_list(r.meta) {
                        Slot::List(shared(Vec::new()))
                    } else {
                        Slot::Container(shared(Record::default()))
                    };
                    record.slots.insert(ident.to_string(), slot.clone());
                    slot
                }
                None => return Ok(None),
            }
        };
        self.wrap(slot, r).map(Some)
    }

    fn next(&self, sel: &Selection, _r: &ListRequest<'_>) -> Result<Option<(NodeRef, Vec<Value>)>> {
        Err(not_a("list", sel))
    }

    fn read_field(&self, sel: &Selection, r: &FieldRequest) -> Result<Option<Value>> {
        let record = guard(&self.record);
        match record.slots.get(sel.schema().ident(r.meta)) {
            Some(Slot::Leaf(value)) => Ok(Some(value.clone())),
            Some(_) => Err(NodeError::Backend {
                path: r.path.to_string(),
                reason: "slot holds a container, not a leaf".to_string(),
            }),
            None => Ok(None),
        }
    }

    fn write_field(&self, sel: &Selection, r: &FieldRequest, value: Option<Value>) -> Result<()> {
        let schema = sel.schema();
        let ident = schema.ident(r.meta);
        let Some(value) = value else {
            guard(&self.record).slots.remove(ident);
            return Ok(());
        };

        check_type(schema, r, &value)?;
        guard(&self.record)
            .slots
            .insert(ident.to_string(), Slot::Leaf(value));
        Ok(())
    }

    fn choose(&self, sel: &Selection, choice: MetaId) -> Result<Option<MetaId>> {
        let schema = sel.schema();
        let record = guard(&self.record);
        Ok(active_case(schema, &record, choice))
    }

    fn begin_edit(&self, sel: &Selection, r: &NodeRequest<'_>) -> Result<()> {
        record_hook(&self.log, EditHook::Begin, sel, r);
        Ok(())
    }

    fn end_edit(&self, sel: &Selection, r: &NodeRequest<'_>) -> Result<()> {
        record_hook(&self.log, EditHook::End, sel, r);
        Ok(())
    }
}

fn check_type(schema: &Schema, r: &FieldRequest, value: &Value) -> Result<()> {
    let (fits, expected) = match (schema.kind(r.meta), value) {
        (MetaKind::Leaf { ty, .. }, v) => (ty.accepts(v), ty.name().to_string()),
        (MetaKind::LeafList { ty }, Value::List(items)) => (
            items.iter().all(|v| ty.accepts(v)),
            format!("list of {}", ty.name()),
        ),
        (MetaKind::LeafList { ty }, _) => (false, format!("list of {}", ty.name())),
        _ => (false, "leaf".to_string()),
    };
    if fits {
        Ok(())
    } else {
        Err(NodeError::TypeMismatch {
            path: r.path.to_string(),
            expected,
            found: value.type_label().to_string(),
        })
    }
}

fn active_case(schema: &Schema, record: &Record, choice: MetaId) -> Option<MetaId> {
    schema.children(choice).iter().copied().find(|&case| {
        choice_case_members(schema, case)
            .into_iter()
            .any(|m| record.slots.contains_key(schema.ident(m)))
    })
}

/// The items of one list
struct ListNode {
    items: Shared<Vec<Shared<Record>>>,
    log: Option<EditLog>,
}

impl ListNode {
    fn item_node(&self, item: &Shared<Record>) -> NodeRef {
        Arc::new(RecordNode {
            record: Arc::clone(item),
            log: self.log.clone(),
        })
    }
}

fn key_of(item: &Shared<Record>, keys: &[String], path: &Path) -> Result<Vec<Value>> {
    let record = guard(item);
    keys.iter()
        .map(|k| match record.slots.get(k) {
            Some(Slot::Leaf(v)) => Ok(v.clone()),
            _ => Err(NodeError::Backend {
                path: path.to_string(),
                reason: format!("list item has no key leaf '{}'", k),
            }),
        })
        .collect()
}

fn row_index(r: &ListRequest<'_>) -> Option<usize> {
    let row = if r.first { 0 } else { r.row };
    usize::try_from(row).ok()
}

impl Node for ListNode {
    fn child(&self, sel: &Selection, _r: &ChildRequest<'_>) -> Result<Option<NodeRef>> {
        Err(not_a("container", sel))
    }

    fn next(&self, sel: &Selection, r: &ListRequest<'_>) -> Result<Option<(NodeRef, Vec<Value>)>> {
        let keys = sel.schema().list_keys(r.meta);
        let mut items = guard(&self.items);

        if r.new {
            let mut record = Record::default();
            for (k, v) in keys.iter().zip(&r.key) {
                record.slots.insert(k.clone(), Slot::Leaf(v.clone()));
            }
            let item = shared(record);
            items.push(Arc::clone(&item));
            return Ok(Some((self.item_node(&item), r.key.clone())));
        }

        if r.delete && r.key.is_empty() {
            return Err(NodeError::Backend {
                path: r.path.to_string(),
                reason: "items of a keyless list cannot be deleted individually".to_string(),
            });
        }

        let position = if r.key.is_empty() {
            row_index(r).filter(|&i| i < items.len())
        } else {
            let mut found = None;
            for (i, item) in items.iter().enumerate() {
                if key_of(item, keys, &r.path)? == r.key {
                    found = Some(i);
                    break;
                }
            }
            found
        };
        let Some(index) = position else {
            return Ok(None);
        };

        if r.delete {
            items.remove(index);
            drop(items);
            record_delete(&self.log, sel, &r.path);
            return Ok(None);
        }

        let item = Arc::clone(&items[index]);
        drop(items);
        let key = key_of(&item, keys, &r.path)?;
        Ok(Some((self.item_node(&item), key)))
    }

    fn read_field(&self, sel: &Selection, _r: &FieldRequest) -> Result<Option<Value>> {
        Err(not_a("container", sel))
    }

    fn write_field(&self, sel: &Selection, _r: &FieldRequest, _value: Option<Value>) -> Result<()> {
        Err(not_a("container", sel))
    }

    fn choose(&self, _sel: &Selection, _choice: MetaId) -> Result<Option<MetaId>> {
        Ok(None)
    }

    fn begin_edit(&self, sel: &Selection, r: &NodeRequest<'_>) -> Result<()> {
        record_hook(&self.log, EditHook::Begin, sel, r);
        Ok(())
    }

    fn end_edit(&self, sel: &Selection, r: &NodeRequest<'_>) -> Result<()> {
        record_hook(&self.log, EditHook::End, sel, r);
        Ok(())
    }
}
