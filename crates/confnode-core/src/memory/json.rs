//! JSON decode/encode for the in-memory store

use std::sync::Arc;

use serde_json::{Map, Value as Json};

use super::{guard, shared, Record, Shared, Slot};
use crate::errors::{NodeError, Result};
use crate::meta::{choice_case_members, MetaId, MetaKind, Schema};
use crate::path::Path;

fn local_name(member: &str) -> &str {
    member.split_once(':').map_or(member, |(_, ident)| ident)
}

fn as_object<'a>(json: &'a Json, path: &Path) -> Result<&'a Map<String, Json>> {
    json.as_object().ok_or_else(|| NodeError::TypeMismatch {
        path: path.to_string(),
        expected: "object".to_string(),
        found: shape(json).to_string(),
    })
}

fn shape(json: &Json) -> &'static str {
    match json {
        Json::Null => "null",
        Json::Bool(_) => "boolean",
        Json::Number(_) => "number",
        Json::String(_) => "string",
        Json::Array(_) => "array",
        Json::Object(_) => "object",
    }
}

pub(super) fn decode_record(
    schema: &Schema,
    meta: MetaId,
    doc: &Json,
    path: &Arc<Path>,
) -> Result<Record> {
    let mut record = Record::default();
    for (member, value) in as_object(doc, path)? {
        let ident = local_name(member);
        let m = schema
            .find_child(meta, ident)
            .ok_or_else(|| NodeError::UnknownIdent {
                ident: ident.to_string(),
                path: path.to_string(),
            })?;
        let child_path = path.child(m, ident);
        let mismatch = |expected: &str, found: String| NodeError::TypeMismatch {
            path: child_path.to_string(),
            expected: expected.to_string(),
            found,
        };

        let slot = match schema.kind(m) {
            MetaKind::Leaf { ty, .. } => {
                Slot::Leaf(ty.coerce(value).map_err(|found| mismatch(ty.name(), found))?)
            }
            MetaKind::LeafList { ty } => Slot::Leaf(
                ty.coerce_list(value)
                    .map_err(|found| mismatch(&format!("list of {}", ty.name()), found))?,
            ),
            MetaKind::Container => {
                Slot::Container(shared(decode_record(schema, m, value, &child_path)?))
            }
            MetaKind::List { keys } => {
                let items = value
                    .as_array()
                    .ok_or_else(|| mismatch("array", shape(value).to_string()))?;
                let mut decoded = Vec::with_capacity(items.len());
                for item in items {
                    let record = decode_record(schema, m, item, &child_path)?;
                    if let Some(missing) = keys.iter().find(|k| !record.slots.contains_key(*k)) {
                        return Err(NodeError::InvalidInput {
                            reason: format!(
                                "list item at '{}' is missing key leaf '{}'",
                                child_path, missing
                            ),
                        });
                    }
                    decoded.push(shared(record));
                }
                Slot::List(shared(decoded))
            }
            MetaKind::Module | MetaKind::Choice | MetaKind::Case => {
                return Err(NodeError::UnknownIdent {
                    ident: ident.to_string(),
                    path: path.to_string(),
                });
            }
        };
        record.slots.insert(ident.to_string(), slot);
    }

    check_choices(schema, meta, &record, path)?;
    Ok(record)
}

/// Reject data in more than one case of any choice under `meta`
fn check_choices(schema: &Schema, meta: MetaId, record: &Record, path: &Path) -> Result<()> {
    let choices = schema
        .children(meta)
        .iter()
        .copied()
        .filter(|&c| schema.is_choice(c));
    for choice in choices {
        let active: Vec<&str> = schema
            .children(choice)
            .iter()
            .copied()
            .filter(|&case| {
                choice_case_members(schema, case)
                    .into_iter()
                    .any(|m| record.slots.contains_key(schema.ident(m)))
            })
            .map(|case| schema.ident(case))
            .collect();
        if active.len() > 1 {
            return Err(NodeError::InvalidInput {
                reason: format!(
                    "'{}' holds data for cases {} of choice '{}'",
                    path,
                    active.join(" and "),
                    schema.ident(choice)
                ),
            });
        }
        for &case in schema.children(choice) {
            check_choices(schema, case, record, path)?;
        }
    }
    Ok(())
}

pub(super) fn encode_record(record: &Shared<Record>) -> Json {
    let record = guard(record);
    let mut out = Map::new();
    for (ident, slot) in &record.slots {
        let json = match slot {
            Slot::Leaf(value) => value.to_json(),
            Slot::Container(child) => encode_record(child),
            Slot::List(items) => Json::Array(guard(items).iter().map(encode_record).collect()),
        };
        out.insert(ident.clone(), json);
    }
    Json::Object(out)
}
