//! The `Entity` capability and its type-erased reference.
//!
//! An entity is a struct whose fields map to table columns. Instead of inspecting
//! values at runtime, every entity type describes itself through [`Entity`]: its
//! declared fields in order, optional table/schema overrides, and the current values
//! of its exported fields. `#[derive(Entity)]` writes this impl from attributes.

use crate::descriptor::{self, EntityDescriptor};
use crate::error::{Error, Result};
use crate::field::{FieldHandle, FieldInfo};
use crate::value::Value;
use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Trait implemented by every struct that maps to a table.
///
/// # Example
///
/// ```ignore
/// #[derive(Entity)]
/// #[cql(table = "users", schema = "app")]
/// pub struct User {
///     pub id: String,
///     #[cql(name = "surname")]
///     pub last_name: String,
///     #[cql(skip)]
///     pub cached_display: String,
/// }
/// ```
pub trait Entity: Send + Sync + 'static {
    /// Declared type name, used as the table name unless overridden.
    const TYPE_NAME: &'static str;

    /// Fully qualified type path. Owner of this type's [`FieldHandle`]s.
    const TYPE_PATH: &'static str;

    /// All declared fields, in declaration order.
    fn fields() -> &'static [FieldInfo];

    /// Table name override.
    fn table_name_override() -> Option<&'static str> {
        None
    }

    /// Schema (keyspace) name override.
    fn schema_name_override() -> Option<&'static str> {
        None
    }

    /// Current values of the exported fields, keyed by Rust field name.
    fn to_row(&self) -> Vec<(&'static str, Value)>;

    /// Handle of the field declared at `index`.
    fn field_handle(index: usize) -> FieldHandle {
        FieldHandle::new(Self::TYPE_PATH, index)
    }

    /// Handle of the field with the given Rust name.
    fn handle_of(name: &str) -> Option<FieldHandle> {
        Self::fields()
            .iter()
            .position(|f| f.name == name)
            .map(Self::field_handle)
    }
}

/// Object-safe view of an [`Entity`] instance.
///
/// Implemented for every `Entity`; expression trees hold entities through this trait.
pub trait AnyEntity: Send + Sync {
    /// Declared type name.
    fn entity_type_name(&self) -> &'static str;

    /// Resolved descriptor of the entity's type.
    fn descriptor(&self) -> Arc<EntityDescriptor>;

    /// Current exported values, keyed by Rust field name.
    fn row(&self) -> Vec<(&'static str, Value)>;

    /// Upcast for downcasting back to the concrete type.
    fn as_any(&self) -> &dyn Any;
}

impl<E: Entity> AnyEntity for E {
    fn entity_type_name(&self) -> &'static str {
        E::TYPE_NAME
    }

    fn descriptor(&self) -> Arc<EntityDescriptor> {
        descriptor::resolve::<E>()
    }

    fn row(&self) -> Vec<(&'static str, Value)> {
        Entity::to_row(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Shared, read-only reference to one entity instance.
///
/// Cloning is cheap. The entity is never mutated through this reference.
#[derive(Clone)]
pub struct EntityRef(Arc<dyn AnyEntity>);

impl EntityRef {
    /// Wrap an owned entity.
    pub fn new<E: Entity>(entity: E) -> Self {
        Self(Arc::new(entity))
    }

    /// Wrap an already shared entity.
    pub fn from_arc<E: Entity>(entity: Arc<E>) -> Self {
        Self(entity)
    }

    /// Declared type name of the entity.
    pub fn type_name(&self) -> &'static str {
        self.0.entity_type_name()
    }

    /// Resolved descriptor of the entity's type.
    pub fn descriptor(&self) -> Arc<EntityDescriptor> {
        self.0.descriptor()
    }

    /// Values of the exported fields, in descriptor order.
    ///
    /// Every exported field must be reported by the entity's row; a missing one is
    /// [`Error::MissingFieldValue`].
    pub fn field_values(&self) -> Result<Vec<Value>> {
        let descriptor = self.descriptor();
        let mut row = self.0.row();
        descriptor
            .exported()
            .map(|field| {
                row.iter()
                    .position(|(name, _)| *name == field.field_name)
                    .map(|pos| row.swap_remove(pos).1)
                    .ok_or(Error::MissingFieldValue {
                        entity: descriptor.type_name,
                        field: field.field_name,
                    })
            })
            .collect()
    }

    /// Borrow the concrete entity, if it is an `E`.
    pub fn downcast_ref<E: Entity>(&self) -> Option<&E> {
        self.0.as_any().downcast_ref::<E>()
    }

    /// Whether both references point to the same instance.
    pub fn ptr_eq(&self, other: &EntityRef) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl fmt::Debug for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("EntityRef").field(&self.type_name()).finish()
    }
}

impl<E: Entity> From<E> for EntityRef {
    fn from(entity: E) -> Self {
        Self::new(entity)
    }
}

impl<E: Entity> From<Arc<E>> for EntityRef {
    fn from(entity: Arc<E>) -> Self {
        Self::from_arc(entity)
    }
}
