//! Procedural macros for CQLModel Rust.
//!
//! Provides `#[derive(Entity)]`, which implements `cqlmodel_core::Entity` from the
//! struct definition and its `#[cql(...)]` attributes.
//!
//! # Attributes
//!
//! Struct level:
//! - `#[cql(table = "name")]` overrides the table name (defaults to the type name)
//! - `#[cql(schema = "keyspace")]` qualifies the table as `keyspace.name`
//!
//! Field level:
//! - `#[cql(name = "column")]` overrides the column name; `name = "-"` excludes the field
//! - `#[cql(skip)]` excludes the field
//!
//! Fields that are not `pub` never take part in generated statements.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod entity_derive;

/// Derive `cqlmodel_core::Entity` for a struct with named fields.
///
/// Also generates one `FieldHandle` constant per field, named after the field in
/// upper case, for use in expression trees:
///
/// ```ignore
/// #[derive(Entity)]
/// pub struct User {
///     pub id: String,
///     pub last_name: String,
/// }
///
/// let query = from(user, where_(field_eq(User::LAST_NAME, "Bond")));
/// ```
#[proc_macro_derive(Entity, attributes(cql))]
pub fn derive_entity(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    match entity_derive::parse_entity(&input) {
        Ok(def) => entity_derive::generate_entity_impl(&def).into(),
        Err(err) => err.to_compile_error().into(),
    }
}
