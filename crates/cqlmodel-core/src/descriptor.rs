//! Entity descriptor resolution.
//!
//! Turns an [`Entity`] type into its qualified table name and its ordered field
//! descriptors. Declaration order is preserved: it decides the `SELECT` column order
//! and the `SET`/binding order of updates.
//!
//! Descriptors are computed once per type and cached for the lifetime of the
//! program. Entity layouts never change at runtime, so the cache is never invalidated.

use crate::entity::Entity;
use crate::field::FieldHandle;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, PoisonError, RwLock};

/// Resolved naming of one declared field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    /// Identity of the field
    pub handle: FieldHandle,
    /// Rust field name
    pub field_name: &'static str,
    /// Column name used in generated statements
    pub column_name: &'static str,
    /// Whether the field takes part in generated statements
    pub exported: bool,
}

/// Resolved naming of an entity type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityDescriptor {
    /// Declared type name
    pub type_name: &'static str,
    /// Table name (override or type name)
    pub table_name: &'static str,
    /// Schema (keyspace) name, if overridden
    pub schema_name: Option<&'static str>,
    /// Every declared field, in declaration order
    pub fields: Vec<FieldDescriptor>,
}

impl EntityDescriptor {
    /// Build the descriptor of `E` without consulting the cache.
    pub fn build<E: Entity>() -> Self {
        let fields = E::fields()
            .iter()
            .enumerate()
            .map(|(index, info)| {
                let (column_name, exported) = info.column_name();
                FieldDescriptor {
                    handle: E::field_handle(index),
                    field_name: info.name,
                    column_name,
                    exported,
                }
            })
            .collect();

        Self {
            type_name: E::TYPE_NAME,
            table_name: E::table_name_override().unwrap_or(E::TYPE_NAME),
            schema_name: E::schema_name_override(),
            fields,
        }
    }

    /// Table name as written in statements: `schema.table` or `table`.
    pub fn qualified_table_name(&self) -> String {
        match self.schema_name {
            Some(schema) => format!("{}.{}", schema, self.table_name),
            None => self.table_name.to_string(),
        }
    }

    /// Exported fields, in declaration order.
    pub fn exported(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.iter().filter(|f| f.exported)
    }

    /// Exported column names, in declaration order.
    pub fn column_names(&self) -> Vec<&'static str> {
        self.exported().map(|f| f.column_name).collect()
    }

    /// Look up a field by handle, exported or not.
    pub fn find(&self, handle: &FieldHandle) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.handle == *handle)
    }
}

type DescriptorMap = HashMap<TypeId, Arc<EntityDescriptor>>;

/// Global descriptor cache singleton.
fn descriptor_cache() -> &'static RwLock<DescriptorMap> {
    static CACHE: OnceLock<RwLock<DescriptorMap>> = OnceLock::new();
    CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Resolve the descriptor of `E`, computing it on first use.
///
/// The cache only ever stores fully built descriptors, so a poisoned lock still
/// holds consistent data and is used as is.
pub fn resolve<E: Entity>() -> Arc<EntityDescriptor> {
    let key = TypeId::of::<E>();

    // Fast path: already cached
    {
        let cache = descriptor_cache()
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(descriptor) = cache.get(&key) {
            return Arc::clone(descriptor);
        }
    }

    // Slow path: build outside the lock, first writer wins
    let built = Arc::new(EntityDescriptor::build::<E>());
    let mut cache = descriptor_cache()
        .write()
        .unwrap_or_else(PoisonError::into_inner);
    let descriptor = cache.entry(key).or_insert_with(|| {
        tracing::trace!(
            entity = E::TYPE_NAME,
            table = %built.qualified_table_name(),
            columns = built.exported().count(),
            "Resolved entity descriptor"
        );
        Arc::clone(&built)
    });
    Arc::clone(descriptor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::FieldInfo;
    use crate::value::Value;

    struct Plain;

    impl Entity for Plain {
        const TYPE_NAME: &'static str = "Plain";
        const TYPE_PATH: &'static str = "descriptor_tests::Plain";

        fn fields() -> &'static [FieldInfo] {
            static FIELDS: &[FieldInfo] = &[
                FieldInfo::new("id"),
                FieldInfo::new("first_name").column("given_name"),
                FieldInfo::new("password").exclude(),
                FieldInfo::new("internal").private(),
                FieldInfo::new("last_name"),
            ];
            FIELDS
        }

        fn to_row(&self) -> Vec<(&'static str, Value)> {
            Vec::new()
        }
    }

    struct Custom;

    impl Entity for Custom {
        const TYPE_NAME: &'static str = "Custom";
        const TYPE_PATH: &'static str = "descriptor_tests::Custom";

        fn fields() -> &'static [FieldInfo] {
            &[]
        }

        fn table_name_override() -> Option<&'static str> {
            Some("my_custom_name")
        }

        fn schema_name_override() -> Option<&'static str> {
            Some("my_custom_schema")
        }

        fn to_row(&self) -> Vec<(&'static str, Value)> {
            Vec::new()
        }
    }

    struct TableOnly;

    impl Entity for TableOnly {
        const TYPE_NAME: &'static str = "TableOnly";
        const TYPE_PATH: &'static str = "descriptor_tests::TableOnly";

        fn fields() -> &'static [FieldInfo] {
            &[]
        }

        fn table_name_override() -> Option<&'static str> {
            Some("renamed")
        }

        fn to_row(&self) -> Vec<(&'static str, Value)> {
            Vec::new()
        }
    }

    #[test]
    fn test_default_table_name() {
        let descriptor = resolve::<Plain>();
        assert_eq!(descriptor.table_name, "Plain");
        assert_eq!(descriptor.schema_name, None);
        assert_eq!(descriptor.qualified_table_name(), "Plain");
    }

    #[test]
    fn test_schema_and_table_override() {
        assert_eq!(
            resolve::<Custom>().qualified_table_name(),
            "my_custom_schema.my_custom_name"
        );
        assert_eq!(resolve::<TableOnly>().qualified_table_name(), "renamed");
    }

    #[test]
    fn test_columns_keep_declaration_order() {
        let descriptor = resolve::<Plain>();
        assert_eq!(descriptor.fields.len(), 5);
        assert_eq!(
            descriptor.column_names(),
            vec!["id", "given_name", "last_name"]
        );
    }

    #[test]
    fn test_find_reports_unexported_fields() {
        let descriptor = resolve::<Plain>();
        let password = descriptor
            .find(&Plain::field_handle(2))
            .expect("password is declared");
        assert!(!password.exported);
        let internal = descriptor
            .find(&Plain::field_handle(3))
            .expect("internal is declared");
        assert_eq!(internal.column_name, "internal");
        assert!(!internal.exported);
        assert!(descriptor.find(&Custom::field_handle(0)).is_none());
    }

    #[test]
    fn test_empty_entity_is_not_an_error() {
        let descriptor = resolve::<Custom>();
        assert!(descriptor.fields.is_empty());
        assert!(descriptor.column_names().is_empty());
    }

    #[test]
    fn test_cache_returns_same_descriptor() {
        let a = resolve::<Plain>();
        let b = resolve::<Plain>();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(*a, EntityDescriptor::build::<Plain>());
    }

    #[test]
    fn test_concurrent_resolution() {
        let handles: Vec<_> = (0..8)
            .map(|_| std::thread::spawn(|| resolve::<TableOnly>()))
            .collect();
        let first = resolve::<TableOnly>();
        for handle in handles {
            let descriptor = handle.join().expect("resolver thread panicked");
            assert!(Arc::ptr_eq(&first, &descriptor));
        }
    }
}
