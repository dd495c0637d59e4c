use std::sync::Arc;

use confnode_core::memory::{EditLog, MemoryStore};
use confnode_core::meta::{parse_schema_yaml, MetaId, Schema};
use confnode_core::node::{ChildRequest, FieldRequest, ListRequest, Node, NodeRef, NodeRequest};
use confnode_core::{NodeError, Result, Selection, Value};
use serde_json::Value as Json;

pub const CAR_SCHEMA: &str = r#"
schema_version: 0
module: car
definitions:
  - { kind: leaf, ident: name, type: string }
  - { kind: leaf, ident: speed, type: int32, default: 60 }
  - kind: container
    ident: engine
    definitions:
      - { kind: leaf, ident: cylinders, type: int32, default: 4 }
      - { kind: leaf, ident: running, type: boolean }
  - kind: list
    ident: tire
    key: [pos]
    definitions:
      - { kind: leaf, ident: pos, type: string }
      - { kind: leaf, ident: wear, type: int32 }
      - { kind: leaf, ident: brand, type: string, default: generic }
  - kind: list
    ident: note
    definitions:
      - { kind: leaf, ident: text, type: string }
  - kind: choice
    ident: fuel
    cases:
      - ident: gas
        definitions:
          - { kind: leaf, ident: octane, type: int32 }
          - { kind: leaf, ident: tank, type: int32 }
      - ident: electric
        definitions:
          - kind: container
            ident: battery
            definitions:
              - { kind: leaf, ident: kwh, type: int32 }
"#;

pub const APP_SCHEMA: &str = r#"
schema_version: 0
module: app
definitions:
  - kind: container
    ident: server
    definitions:
      - { kind: leaf, ident: name, type: string, default: unnamed }
      - { kind: leaf, ident: port, type: int32 }
      - { kind: leaf, ident: debug, type: boolean, default: false }
"#;

/// A choice nested inside one case of another choice
pub const NESTED_CHOICE_SCHEMA: &str = r#"
schema_version: 0
module: m
definitions:
  - kind: choice
    ident: outer
    cases:
      - ident: a
        definitions:
          - kind: choice
            ident: inner
            cases:
              - ident: x
                definitions:
                  - { kind: leaf, ident: x1, type: int32 }
              - ident: y
                definitions:
                  - { kind: leaf, ident: y1, type: int32 }
      - ident: b
        definitions:
          - { kind: leaf, ident: b1, type: int32 }
"#;

#[allow(dead_code)]
pub fn car_schema() -> Arc<Schema> {
    Arc::new(parse_schema_yaml(CAR_SCHEMA).unwrap())
}

#[allow(dead_code)]
pub fn app_schema() -> Arc<Schema> {
    Arc::new(parse_schema_yaml(APP_SCHEMA).unwrap())
}

#[allow(dead_code)]
pub fn nested_choice_schema() -> Arc<Schema> {
    Arc::new(parse_schema_yaml(NESTED_CHOICE_SCHEMA).unwrap())
}

/// Decode a document into a fresh store
#[allow(dead_code)]
pub fn store(schema: &Schema, doc: Json) -> MemoryStore {
    MemoryStore::from_json(schema, &doc).unwrap()
}

/// A store whose edit hooks are recorded into the returned log
#[allow(dead_code)]
pub fn logged_store(schema: &Schema, doc: Json) -> (MemoryStore, EditLog) {
    let log = EditLog::new();
    let store = store(schema, doc).with_log(log.clone());
    (store, log)
}

#[allow(dead_code)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailPoint {
    /// `begin_edit` on the node at the path
    Begin,
    /// `end_edit` on the node at the path
    End,
    /// Writing the leaf at the path
    Write,
    /// Creating the container, list or list item at the path
    Create,
    /// Creating at the path quietly yields nothing
    Refuse,
}

/// Wraps a backing node and fails one operation at one tree address
pub struct FailingNode {
    inner: NodeRef,
    point: FailPoint,
    path: Arc<str>,
}

#[allow(dead_code)]
impl FailingNode {
    pub fn wrap(inner: NodeRef, point: FailPoint, path: &str) -> NodeRef {
        Arc::new(FailingNode {
            inner,
            point,
            path: Arc::from(path),
        })
    }

    fn child_wrap(&self, inner: NodeRef) -> NodeRef {
        Arc::new(FailingNode {
            inner,
            point: self.point,
            path: Arc::clone(&self.path),
        })
    }

    fn refuses(&self, path: &str) -> bool {
        self.point == FailPoint::Refuse && path == &*self.path
    }

    fn fail(&self, point: FailPoint, path: &str) -> Result<()> {
        if point == self.point && path == &*self.path {
            return Err(NodeError::Backend {
                path: path.to_string(),
                reason: format!("injected {:?} failure", point),
            });
        }
        Ok(())
    }
}

impl Node for FailingNode {
    fn child(&self, sel: &Selection, r: &ChildRequest<'_>) -> Result<Option<NodeRef>> {
        if r.new {
            let path = r.path.to_string();
            self.fail(FailPoint::Create, &path)?;
            if self.refuses(&path) {
                return Ok(None);
            }
        }
        Ok(self.inner.child(sel, r)?.map(|n| self.child_wrap(n)))
    }

    fn next(&self, sel: &Selection, r: &ListRequest<'_>) -> Result<Option<(NodeRef, Vec<Value>)>> {
        if r.new {
            let path = r.path.to_string();
            self.fail(FailPoint::Create, &path)?;
            if self.refuses(&path) {
                return Ok(None);
            }
        }
        Ok(self
            .inner
            .next(sel, r)?
            .map(|(n, key)| (self.child_wrap(n), key)))
    }

    fn read_field(&self, sel: &Selection, r: &FieldRequest) -> Result<Option<Value>> {
        self.inner.read_field(sel, r)
    }

    fn write_field(&self, sel: &Selection, r: &FieldRequest, value: Option<Value>) -> Result<()> {
        self.fail(FailPoint::Write, &r.path.to_string())?;
        self.inner.write_field(sel, r, value)
    }

    fn choose(&self, sel: &Selection, choice: MetaId) -> Result<Option<MetaId>> {
        self.inner.choose(sel, choice)
    }

    fn begin_edit(&self, sel: &Selection, r: &NodeRequest<'_>) -> Result<()> {
        self.fail(FailPoint::Begin, &sel.path().to_string())?;
        self.inner.begin_edit(sel, r)
    }

    fn end_edit(&self, sel: &Selection, r: &NodeRequest<'_>) -> Result<()> {
        self.fail(FailPoint::End, &sel.path().to_string())?;
        self.inner.end_edit(sel, r)
    }
}

/// Selection on `store` whose backing nodes fail at `point`/`path`
#[allow(dead_code)]
pub fn failing_selection(
    schema: &Arc<Schema>,
    store: &MemoryStore,
    point: FailPoint,
    path: &str,
) -> Selection {
    Selection::new(
        Arc::clone(schema),
        FailingNode::wrap(store.node(), point, path),
    )
}
