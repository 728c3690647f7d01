//! Hand-written entities shared by the unit tests of this crate.

use cqlmodel_core::{Entity, FieldHandle, FieldInfo, Value};

pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub const ID: FieldHandle = FieldHandle::new(Self::TYPE_PATH, 0);
    pub const FIRST_NAME: FieldHandle = FieldHandle::new(Self::TYPE_PATH, 1);
    pub const LAST_NAME: FieldHandle = FieldHandle::new(Self::TYPE_PATH, 2);

    pub fn bond() -> Self {
        Self {
            id: "007".to_string(),
            first_name: "James".to_string(),
            last_name: "Bond".to_string(),
        }
    }
}

impl Entity for User {
    const TYPE_NAME: &'static str = "User";
    const TYPE_PATH: &'static str = "test_entities::User";

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("id"),
            FieldInfo::new("first_name"),
            FieldInfo::new("last_name"),
        ];
        FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::Text(self.id.clone())),
            ("first_name", Value::Text(self.first_name.clone())),
            ("last_name", Value::Text(self.last_name.clone())),
        ]
    }
}

/// Table and schema overrides, one excluded and one private field.
pub struct Custom {
    pub id: String,
    pub last_name: String,
    pub nickname: String,
    pub session_token: String,
}

impl Custom {
    pub const ID: FieldHandle = FieldHandle::new(Self::TYPE_PATH, 0);
    pub const LAST_NAME: FieldHandle = FieldHandle::new(Self::TYPE_PATH, 1);
    pub const NICKNAME: FieldHandle = FieldHandle::new(Self::TYPE_PATH, 2);
    pub const SESSION_TOKEN: FieldHandle = FieldHandle::new(Self::TYPE_PATH, 3);

    pub fn sample() -> Self {
        Self {
            id: "id".to_string(),
            last_name: "Bond".to_string(),
            nickname: "double-oh".to_string(),
            session_token: "secret".to_string(),
        }
    }
}

impl Entity for Custom {
    const TYPE_NAME: &'static str = "Custom";
    const TYPE_PATH: &'static str = "test_entities::Custom";

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: &[FieldInfo] = &[
            FieldInfo::new("id"),
            FieldInfo::new("last_name"),
            FieldInfo::new("nickname").column("-"),
            FieldInfo::new("session_token").private(),
        ];
        FIELDS
    }

    fn table_name_override() -> Option<&'static str> {
        Some("my_custom_name")
    }

    fn schema_name_override() -> Option<&'static str> {
        Some("my_custom_schema")
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::Text(self.id.clone())),
            ("last_name", Value::Text(self.last_name.clone())),
        ]
    }
}

/// No exported fields at all.
pub struct Opaque;

impl Opaque {
    pub const STATE: FieldHandle = FieldHandle::new(Self::TYPE_PATH, 0);
}

impl Entity for Opaque {
    const TYPE_NAME: &'static str = "Opaque";
    const TYPE_PATH: &'static str = "test_entities::Opaque";

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: &[FieldInfo] = &[FieldInfo::new("state").private()];
        FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        Vec::new()
    }
}

/// Declares `balance` as exported but never reports its value.
pub struct Partial {
    pub id: String,
}

impl Partial {
    pub const ID: FieldHandle = FieldHandle::new(Self::TYPE_PATH, 0);
}

impl Entity for Partial {
    const TYPE_NAME: &'static str = "Partial";
    const TYPE_PATH: &'static str = "test_entities::Partial";

    fn fields() -> &'static [FieldInfo] {
        static FIELDS: &[FieldInfo] = &[FieldInfo::new("id"), FieldInfo::new("balance")];
        FIELDS
    }

    fn to_row(&self) -> Vec<(&'static str, Value)> {
        vec![("id", Value::Text(self.id.clone()))]
    }
}
