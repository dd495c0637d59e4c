//! Child enumeration over definitions
//!
//! Two flattenings are needed by the editor: the children to route when
//! walking a populated selection, and every member of a case when that case
//! has to be erased.

use super::{MetaId, Schema};
use crate::errors::Result;
use crate::selection::Selection;

/// Data children of the selection's definition, in declaration order
///
/// A choice contributes the members of the case that is active in `sel`
/// (nested choices resolved the same way); a choice with no active case
/// contributes nothing.
///
/// # Errors
///
/// Propagates a failure of the backing node's `choose`.
pub fn container_children(sel: &Selection) -> Result<Vec<MetaId>> {
    let mut out = Vec::new();
    collect_active(sel, sel.meta(), &mut out)?;
    Ok(out)
}

fn collect_active(sel: &Selection, parent: MetaId, out: &mut Vec<MetaId>) -> Result<()> {
    let schema = sel.schema();
    for &child in schema.children(parent) {
        if schema.is_choice(child) {
            if let Some(case) = sel.choose(child)? {
                collect_active(sel, case, out)?;
            }
        } else {
            out.push(child);
        }
    }
    Ok(())
}

/// Every data definition declared in `case`, depth-first
///
/// Nested choices contribute the members of all of their cases.
pub fn choice_case_members(schema: &Schema, case: MetaId) -> Vec<MetaId> {
    let mut out = Vec::new();
    collect_all(schema, case, &mut out);
    out
}

fn collect_all(schema: &Schema, parent: MetaId, out: &mut Vec<MetaId>) {
    for &child in schema.children(parent) {
        if schema.is_choice(child) {
            for &nested in schema.children(child) {
                collect_all(schema, nested, out);
            }
        } else {
            out.push(child);
        }
    }
}
