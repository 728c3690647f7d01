//! CQLModel Rust: CQL statements from typed entities.
//!
//! Describe a table once as a Rust struct, build queries as expression trees over its
//! field handles, and get back the CQL text plus the ordered parameter list a driver's
//! prepared execution call expects.
//!
//! # Example
//!
//! ```ignore
//! use cqlmodel::prelude::*;
//!
//! #[derive(Entity, Clone)]
//! pub struct User {
//!     pub id: String,
//!     pub first_name: String,
//!     pub last_name: String,
//! }
//!
//! let bond = User { id: "007".into(), first_name: "James".into(), last_name: "Bond".into() };
//! let query = from(bond, where_(field_eq(User::LAST_NAME, "Bond")));
//!
//! let compiled = compile_select(&query)?;
//! assert_eq!(
//!     compiled.cql,
//!     "SELECT id, first_name, last_name FROM User WHERE last_name = ?"
//! );
//! ```
//!
//! Generated code refers to `cqlmodel_core` by path, so crates deriving `Entity` depend
//! on `cqlmodel-core` alongside this crate.

pub mod broker;
pub mod config;

pub use broker::Broker;
pub use config::BrokerConfig;

pub use cqlmodel_core::{
    AnyEntity, Cx, Entity, EntityDescriptor, EntityRef, Error, FieldDescriptor, FieldHandle,
    FieldInfo, FieldTag, Outcome, Result, Row, Session, Value, resolve,
};
pub use cqlmodel_macros::Entity;
pub use cqlmodel_query::{
    Bound, CompiledQuery, Expr, FieldReference, PrefixedClause, Rendered, UpdateOptions,
    columns_with_values, compile, compile_select, compile_update, locate, render, select_fields,
    update_set,
};

/// Expression constructors.
pub use cqlmodel_query::expr;

/// Everything needed to declare entities and compile queries.
pub mod prelude {
    pub use crate::{
        Broker, BrokerConfig, CompiledQuery, Cx, Entity, EntityRef, Error, Expr, FieldHandle,
        Outcome, Result, Row, Session, UpdateOptions, Value, compile, compile_select,
        compile_update,
    };
    pub use cqlmodel_query::expr::{
        and, contains, delete, eq, field, field_eq, field_only, from, from_only, gt, gte, in_list,
        lt, lte, ne, or, paren, raw, where_,
    };
}
