//! Choice exclusivity
//!
//! At most one case of a choice may hold data on a node. Before data of one
//! case is written, whatever the destination holds for a different case of
//! the same choice is erased.

use crate::errors::Result;
use crate::meta::{choice_case_members, MetaId};
use crate::selection::Selection;

/// Erase every case that conflicts with writing `want` on `existing`
///
/// Walks outward from `want`'s case through enclosing choices declared on the
/// same node, so a member of a nested choice also evicts the other cases of
/// every choice around it. Constant time for definitions that are not
/// members of a case.
pub(crate) fn clear_on_different_choice_case(existing: &Selection, want: MetaId) -> Result<()> {
    let schema = existing.schema();
    let mut member = want;
    while let Some(want_case) = schema.enclosing_case(member) {
        let Some(choice) = schema.case_choice(want_case) else {
            break;
        };
        match existing.choose(choice)? {
            Some(active) if active != want_case => clear_choice_case(existing, active)?,
            _ => {}
        }
        member = choice;
    }
    Ok(())
}

fn clear_choice_case(sel: &Selection, case: MetaId) -> Result<()> {
    let schema = sel.schema();
    tracing::debug!(
        path = %sel.path(),
        case = schema.ident(case),
        "clearing inactive choice case"
    );
    for m in choice_case_members(schema, case) {
        if schema.is_leaf(m) {
            sel.clear_field(m)?;
        } else if let Some(sub) = sel.find(schema.ident(m))? {
            sub.delete()?;
        }
    }
    Ok(())
}
