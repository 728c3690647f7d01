//! Entity-locator pass.
//!
//! Field names in a `WHERE` clause are resolved against the entity bound by the
//! `FROM` clause, so that entity has to be found before rendering.

use crate::expr::{Bound, Expr};
use cqlmodel_core::EntityRef;

/// Find the entity bound to the first `FROM` clause of the tree.
///
/// A `FROM` clause binds an entity only when it carries exactly one value and that
/// value is an entity reference. The search stops at the first `FROM` clause either
/// way; later `FROM` clauses are never examined. Returns `None` when nothing binds an
/// entity, which is only an error for callers that need one.
pub fn locate(root: &Expr) -> Option<EntityRef> {
    let mut node = Some(root);
    while let Some(current) = node {
        if let Expr::Prefixed(clause) = current {
            if clause.is_from() {
                return match clause.binding.as_slice() {
                    [Bound::Entity(entity)] => Some(entity.clone()),
                    _ => None,
                };
            }
        }
        node = current.child();
    }
    None
}
