//! Expression trees compiled to CQL for CQLModel Rust.
//!
//! `cqlmodel-query` turns an immutable expression tree over typed entities into the
//! statement text and the ordered parameter list a driver's prepared execution call
//! expects.
//!
//! # Pipeline
//!
//! 1. **Build**: callers compose [`Expr`] nodes with the constructors in [`expr`].
//! 2. **Locate**: [`locate`] finds the entity bound by the `FROM` clause.
//! 3. **Render**: [`render`] walks the same tree into text and bindings, resolving
//!    field handles against the entity's descriptor.
//! 4. **Assemble**: [`compile_select`] and [`compile_update`] prefix the exported
//!    column list or the `UPDATE ... SET` clause.
//!
//! # Example
//!
//! ```ignore
//! use cqlmodel_query::{compile_select, expr::*};
//!
//! let query = from(user, where_(field_eq(User::LAST_NAME, "Bond")));
//! let compiled = compile_select(&query)?;
//! assert_eq!(
//!     compiled.cql,
//!     "SELECT id, first_name, last_name FROM User WHERE last_name = ?"
//! );
//! ```

pub mod assemble;
pub mod compile;
pub mod expr;
pub mod locate;
pub mod render;

#[cfg(test)]
#[allow(dead_code)]
mod test_entities;

pub use assemble::{UpdateOptions, columns_with_values, select_fields, update_set};
pub use compile::{CompiledQuery, compile, compile_select, compile_update};
pub use expr::{Bound, Expr, FieldReference, PrefixedClause};
pub use locate::locate;
pub use render::{Rendered, render};
