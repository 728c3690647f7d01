use cqlmodel::prelude::*;
use cqlmodel::{EntityDescriptor, resolve};
use std::time::Duration;

#[derive(Entity, Debug, Clone)]
pub struct User {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
}

fn bond() -> User {
    User {
        id: "007".to_string(),
        first_name: "James".to_string(),
        last_name: "Bond".to_string(),
    }
}

#[derive(Entity, Debug, Clone)]
#[cql(table = "my_custom_name", schema = "my_custom_schema")]
pub struct Agent {
    pub id: String,
    pub last_name: String,
    #[cql(name = "-")]
    pub nickname: String,
    #[cql(skip)]
    pub cover_story: String,
    #[cql(name = "licence")]
    pub licence_number: i64,
    pub alias: Option<String>,
    #[allow(dead_code)]
    session_token: String,
}

fn agent() -> Agent {
    Agent {
        id: "006".to_string(),
        last_name: "Trevelyan".to_string(),
        nickname: "Alec".to_string(),
        cover_story: "Janus".to_string(),
        licence_number: 6,
        alias: None,
        session_token: "secret".to_string(),
    }
}

#[derive(Entity, Debug, Clone)]
pub struct Tagged {
    pub id: String,
    pub tags: Vec<String>,
    pub views: u64,
    pub aliases: Option<Vec<String>>,
    pub digest: Vec<u8>,
    pub level: u8,
}

#[derive(Entity, Debug, Clone)]
pub struct Sealed {
    #[allow(dead_code)]
    state: i32,
}

#[test]
fn derive_builds_descriptor() {
    let descriptor: std::sync::Arc<EntityDescriptor> = resolve::<Agent>();
    assert_eq!(descriptor.type_name, "Agent");
    assert_eq!(
        descriptor.qualified_table_name(),
        "my_custom_schema.my_custom_name"
    );
    assert_eq!(descriptor.column_names(), vec!["id", "last_name", "licence", "alias"]);
    assert_eq!(descriptor.fields.len(), 7);

    let user = resolve::<User>();
    assert_eq!(user.qualified_table_name(), "User");
    assert!(std::sync::Arc::ptr_eq(&user, &resolve::<User>()));
}

#[test]
fn derive_generates_distinct_handles() {
    assert_ne!(User::ID, User::LAST_NAME);
    assert_ne!(User::ID, Agent::ID);
    assert_eq!(User::LAST_NAME, User::LAST_NAME);
    assert_eq!(Agent::LICENCE_NUMBER.index(), 4);
}

#[test]
fn select_user_by_last_name() {
    let query = from(bond(), where_(field_eq(User::LAST_NAME, "Bond")));
    let compiled = compile_select(&query).expect("compile");
    assert_eq!(
        compiled.cql,
        "SELECT id, first_name, last_name FROM User WHERE last_name = ?"
    );
    assert_eq!(compiled.params, vec![Value::from("Bond")]);
}

#[test]
fn select_with_custom_naming() {
    let query = from(agent(), where_(field_eq(Agent::LAST_NAME, "Bond")));
    let compiled = compile_select(&query).expect("compile");
    assert_eq!(
        compiled.cql,
        "SELECT id, last_name, licence, alias FROM my_custom_schema.my_custom_name WHERE last_name = ?"
    );
    assert_eq!(compiled.params, vec![Value::from("Bond")]);
}

#[test]
fn renamed_column_renders_its_override() {
    let query = from(agent(), where_(field(Agent::LICENCE_NUMBER, gte(5_i64))));
    let compiled = compile_select(&query).expect("compile");
    assert!(compiled.cql.ends_with("WHERE licence >= ?"));
    assert_eq!(compiled.params, vec![Value::BigInt(5)]);
}

#[test]
fn unreachable_fields_are_rejected() {
    for handle in [Agent::NICKNAME, Agent::COVER_STORY, Agent::SESSION_TOKEN] {
        let query = from(agent(), where_(field_eq(handle, "x")));
        let err = compile_select(&query).unwrap_err();
        assert!(
            matches!(err, Error::FieldNotExported { .. }),
            "unexpected error: {err}"
        );
    }
}

#[test]
fn foreign_field_is_not_found() {
    let query = from(agent(), where_(field_eq(User::FIRST_NAME, "James")));
    let err = compile_select(&query).unwrap_err();
    assert!(matches!(err, Error::FieldNotFound { entity: "Agent", .. }));
}

#[test]
fn select_without_from_is_missing_entity() {
    let err = compile_select(&where_(field_eq(User::LAST_NAME, "Bond"))).unwrap_err();
    assert_eq!(err, Error::MissingEntity);
}

#[test]
fn compound_conditions_bind_left_to_right() {
    let query = from(
        bond(),
        where_(
            paren(field_eq(User::FIRST_NAME, "James").or_then(field_eq(User::FIRST_NAME, "Jim")))
                .and_then(field(User::ID, in_list(["007", "006"]))),
        ),
    );
    let compiled = compile_select(&query).expect("compile");
    assert_eq!(
        compiled.cql,
        "SELECT id, first_name, last_name FROM User WHERE ( first_name = ? OR first_name = ? ) AND id IN (?, ?)"
    );
    assert_eq!(
        compiled.params,
        vec![
            Value::from("James"),
            Value::from("Jim"),
            Value::from("007"),
            Value::from("006"),
        ]
    );
}

#[test]
fn update_user_by_id() {
    let entity = EntityRef::new(bond());
    let compiled =
        compile_update(&field_eq(User::ID, "007"), &entity, &UpdateOptions::new()).expect("compile");
    assert_eq!(
        compiled.cql,
        "UPDATE User SET id = ?, first_name = ?, last_name = ? WHERE id = ?"
    );
    assert_eq!(
        compiled.params,
        vec![
            Value::from("007"),
            Value::from("James"),
            Value::from("Bond"),
            Value::from("007"),
        ]
    );
}

#[test]
fn update_with_ttl_binds_optional_as_null() {
    let entity = EntityRef::new(agent());
    let options = UpdateOptions::new().with_ttl(Duration::from_secs(86_400));
    let compiled = compile_update(&field_eq(Agent::ID, "006"), &entity, &options).expect("compile");
    assert_eq!(
        compiled.cql,
        "UPDATE my_custom_schema.my_custom_name USING TTL 86400 SET id = ?, last_name = ?, licence = ?, alias = ? WHERE id = ?"
    );
    assert_eq!(
        compiled.params,
        vec![
            Value::from("006"),
            Value::from("Trevelyan"),
            Value::BigInt(6),
            Value::Null,
            Value::from("006"),
        ]
    );
}

#[test]
fn delete_user_by_id() {
    let compiled =
        compile(&delete(bond(), where_(field_eq(User::ID, "007")))).expect("compile");
    assert_eq!(compiled.cql, "DELETE FROM User WHERE id = ?");
    assert_eq!(compiled.params, vec![Value::from("007")]);
}

#[test]
fn entity_without_exported_fields() {
    let descriptor = resolve::<Sealed>();
    assert_eq!(cqlmodel::select_fields(&descriptor), "");

    let err = compile_select(&from_only(Sealed { state: 1 })).unwrap_err();
    assert_eq!(err, Error::EmptyColumnList { entity: "Sealed" });
}

#[test]
fn compilation_is_idempotent() {
    let query = from(bond(), where_(field_eq(User::LAST_NAME, "Bond")));
    let first = compile_select(&query).expect("compile");
    let second = compile_select(&query).expect("compile");
    assert_eq!(first, second);
}

#[test]
fn collection_and_unsigned_fields_bind() {
    let tagged = Tagged {
        id: "t1".to_string(),
        tags: vec!["spy".to_string(), "retired".to_string()],
        views: u64::MAX,
        aliases: None,
        digest: vec![0xde, 0xad],
        level: 7,
    };
    let entity = EntityRef::new(tagged.clone());
    let compiled =
        compile_update(&field_eq(Tagged::ID, "t1"), &entity, &UpdateOptions::new()).expect("compile");
    assert_eq!(
        compiled.cql,
        "UPDATE Tagged SET id = ?, tags = ?, views = ?, aliases = ?, digest = ?, level = ? WHERE id = ?"
    );
    assert_eq!(
        compiled.params,
        vec![
            Value::from("t1"),
            Value::list(["spy", "retired"]),
            Value::Varint(i128::from(u64::MAX)),
            Value::Null,
            Value::Bytes(vec![0xde, 0xad]),
            Value::Int(7),
            Value::from("t1"),
        ]
    );

    let query = from(tagged, where_(field(Tagged::TAGS, contains("spy"))));
    let compiled = compile_select(&query).expect("compile");
    assert!(compiled.cql.ends_with("FROM Tagged WHERE tags CONTAINS ?"));
}
