//! Core types and traits for CQLModel Rust.
//!
//! `cqlmodel-core` is the **foundation layer** for the workspace. It defines the
//! capability traits and data types the query compiler and the facade build on.
//!
//! # Role In The Architecture
//!
//! - **Contract layer**: `Entity` is implemented by user types (usually through
//!   `#[derive(Entity)]`), `Session` is implemented by database drivers.
//! - **Name resolution**: `descriptor` turns an entity type into its qualified table
//!   name and ordered column list, cached once per type.
//! - **Data model**: `Value` and `Row` represent statement inputs and outputs.
//! - **Structured concurrency**: re-exports `Cx` and `Outcome` from asupersync so
//!   session calls are cancel-correct.
//!
//! # Who Uses This Crate
//!
//! - `cqlmodel-macros` generates `Entity` implementations defined here.
//! - `cqlmodel-query` consumes descriptors and `Value` to build CQL.
//! - `cqlmodel` hands compiled statements to a `Session`.

// Re-export asupersync primitives for structured concurrency
pub use asupersync::{Cx, Outcome};

pub mod descriptor;
pub mod entity;
pub mod error;
pub mod field;
pub mod session;
pub mod value;

pub use descriptor::{EntityDescriptor, FieldDescriptor, resolve};
pub use entity::{AnyEntity, Entity, EntityRef};
pub use error::{Error, Result};
pub use field::{EXCLUDE_SENTINEL, FieldHandle, FieldInfo, FieldTag};
pub use session::{Row, Session};
pub use value::Value;
