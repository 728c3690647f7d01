//! Implementation of the Entity derive macro.
//!
//! Reads `#[cql(...)]` attributes at compile time and generates the
//! `cqlmodel_core::Entity` implementation plus per-field handle constants.

use proc_macro2::TokenStream;
use quote::{ToTokens, format_ident, quote};
use regex::Regex;
use syn::ext::IdentExt;
use syn::{
    Data, DeriveInput, Error, Field, Fields, GenericArgument, Ident, LitStr, PathArguments,
    Result, Type, Visibility,
};

/// Allowed shape of table, schema and column names.
const IDENTIFIER_PATTERN: &str = r"^[A-Za-z_][A-Za-z0-9_]*$";

/// The tag value that excludes a field.
const EXCLUDE_SENTINEL: &str = "-";

/// Collection types bound as a CQL `list` / `set`.
const LIST_TYPES: &[&str] = &["Vec", "VecDeque", "HashSet", "BTreeSet"];

/// Names taken by the `Entity` associated constants.
const RESERVED_CONSTS: &[&str] = &["TYPE_NAME", "TYPE_PATH"];

/// Parsed entity definition from a struct with `#[derive(Entity)]`.
#[derive(Debug)]
pub struct EntityDef {
    /// The struct name.
    pub name: Ident,
    /// Table name override.
    pub table: Option<String>,
    /// Schema name override.
    pub schema: Option<String>,
    /// Parsed fields, in declaration order.
    pub fields: Vec<EntityFieldDef>,
}

/// Naming of a single field as given by its attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldTagDef {
    /// No attribute.
    Default,
    /// `name = "column"`.
    Rename(String),
    /// `skip` or `name = "-"`.
    Exclude,
}

/// How a field's value converts into a bound `Value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueShape {
    /// `Value::from` on the field.
    Scalar,
    /// Collection of convertible items (`Vec<u8>` stays a blob).
    List,
    /// `Option` of a collection; `None` binds `null`.
    OptionalList,
}

/// Parsed single field.
#[derive(Debug)]
pub struct EntityFieldDef {
    /// The field name.
    pub ident: Ident,
    /// Whether the field is declared with any `pub` visibility.
    pub public: bool,
    /// Naming tag.
    pub tag: FieldTagDef,
    /// Value conversion.
    pub shape: ValueShape,
}

impl EntityFieldDef {
    /// Field name without the `r#` prefix.
    fn name(&self) -> String {
        self.ident.unraw().to_string()
    }

    fn is_exported(&self) -> bool {
        self.public && self.tag != FieldTagDef::Exclude
    }

    /// Name of the generated handle constant.
    fn const_name(&self) -> String {
        self.name().to_uppercase()
    }
}

/// Last path segment of `ty` and its single generic argument, if any.
fn last_segment(ty: &Type) -> Option<(String, Option<&Type>)> {
    let Type::Path(path) = ty else {
        return None;
    };
    let segment = path.path.segments.last()?;
    let argument = match &segment.arguments {
        PathArguments::AngleBracketed(args) => args.args.iter().find_map(|arg| match arg {
            GenericArgument::Type(inner) => Some(inner),
            _ => None,
        }),
        _ => None,
    };
    Some((segment.ident.to_string(), argument))
}

fn is_list_type(ty: &Type) -> bool {
    match last_segment(ty) {
        Some((name, Some(item))) if LIST_TYPES.contains(&name.as_str()) => {
            !(name == "Vec" && matches!(last_segment(item), Some((elem, None)) if elem == "u8"))
        }
        _ => false,
    }
}

/// Classify a field type by its spelling.
fn value_shape(ty: &Type) -> ValueShape {
    if is_list_type(ty) {
        return ValueShape::List;
    }
    match last_segment(ty) {
        Some((name, Some(inner))) if name == "Option" && is_list_type(inner) => {
            ValueShape::OptionalList
        }
        _ => ValueShape::Scalar,
    }
}

/// Parse a `DeriveInput` into an `EntityDef`.
pub fn parse_entity(input: &DeriveInput) -> Result<EntityDef> {
    if !input.generics.params.is_empty() {
        return Err(Error::new_spanned(
            &input.generics,
            "Entity cannot be derived for generic structs",
        ));
    }

    let fields = match &input.data {
        Data::Struct(data) => parse_entity_fields(&data.fields)?,
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                input,
                "Entity can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                input,
                "Entity can only be derived for structs, not unions",
            ));
        }
    };

    check_handle_names(&fields)?;

    let mut table = None;
    let mut schema = None;
    for attr in &input.attrs {
        if !attr.path().is_ident("cql") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let path = &meta.path;
            if path.is_ident("table") {
                let value: LitStr = meta.value()?.parse()?;
                table = Some(validate_identifier(&value)?);
            } else if path.is_ident("schema") {
                let value: LitStr = meta.value()?.parse()?;
                schema = Some(validate_identifier(&value)?);
            } else {
                let attr_name = path.to_token_stream().to_string();
                return Err(Error::new_spanned(
                    path,
                    format!(
                        "unknown cql struct attribute `{attr_name}`. \
                         Valid attributes are: table, schema"
                    ),
                ));
            }
            Ok(())
        })?;
    }

    Ok(EntityDef {
        name: input.ident.clone(),
        table,
        schema,
        fields,
    })
}

/// Reject fields whose handle constants would collide.
fn check_handle_names(fields: &[EntityFieldDef]) -> Result<()> {
    for (index, field) in fields.iter().enumerate() {
        let const_name = field.const_name();
        if RESERVED_CONSTS.contains(&const_name.as_str()) {
            return Err(Error::new_spanned(
                &field.ident,
                format!(
                    "field `{}` would generate the handle `{const_name}`, \
                     which is reserved by the Entity trait",
                    field.name()
                ),
            ));
        }
        if let Some(earlier) = fields[..index]
            .iter()
            .find(|other| other.const_name() == const_name)
        {
            return Err(Error::new_spanned(
                &field.ident,
                format!(
                    "fields `{}` and `{}` would both generate the handle `{const_name}`",
                    earlier.name(),
                    field.name()
                ),
            ));
        }
    }
    Ok(())
}

/// Parse all fields of the struct.
fn parse_entity_fields(fields: &Fields) -> Result<Vec<EntityFieldDef>> {
    match fields {
        Fields::Named(named) => named.named.iter().map(parse_entity_field).collect(),
        Fields::Unnamed(_) => Err(Error::new_spanned(
            fields,
            "Entity requires a struct with named fields",
        )),
        Fields::Unit => Ok(Vec::new()),
    }
}

/// Parse a single field and its `#[cql(...)]` attributes.
fn parse_entity_field(field: &Field) -> Result<EntityFieldDef> {
    let ident = field
        .ident
        .clone()
        .ok_or_else(|| Error::new_spanned(field, "expected named field"))?;

    let mut tag = FieldTagDef::Default;
    for attr in &field.attrs {
        if !attr.path().is_ident("cql") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let path = &meta.path;
            if path.is_ident("name") {
                let value: LitStr = meta.value()?.parse()?;
                tag = parse_tag(&value)?;
            } else if path.is_ident("skip") {
                tag = FieldTagDef::Exclude;
            } else {
                let attr_name = path.to_token_stream().to_string();
                return Err(Error::new_spanned(
                    path,
                    format!(
                        "unknown cql field attribute `{attr_name}`. \
                         Valid attributes are: name, skip"
                    ),
                ));
            }
            Ok(())
        })?;
    }

    Ok(EntityFieldDef {
        ident,
        public: !matches!(field.vis, Visibility::Inherited),
        tag,
        shape: value_shape(&field.ty),
    })
}

/// Interpret the value of a `name = "..."` attribute.
fn parse_tag(value: &LitStr) -> Result<FieldTagDef> {
    let raw = value.value();
    if raw.is_empty() {
        Ok(FieldTagDef::Default)
    } else if raw == EXCLUDE_SENTINEL {
        Ok(FieldTagDef::Exclude)
    } else {
        validate_identifier(value).map(FieldTagDef::Rename)
    }
}

/// Check that a table, schema or column name is a plain CQL identifier.
fn validate_identifier(value: &LitStr) -> Result<String> {
    let raw = value.value();
    let pattern = Regex::new(IDENTIFIER_PATTERN)
        .map_err(|e| Error::new_spanned(value, format!("invalid identifier pattern: {e}")))?;
    if pattern.is_match(&raw) {
        Ok(raw)
    } else {
        Err(Error::new_spanned(
            value,
            format!("`{raw}` is not a valid CQL identifier (expected {IDENTIFIER_PATTERN})"),
        ))
    }
}

/// Generate the `Entity` implementation and the field handle constants.
pub fn generate_entity_impl(def: &EntityDef) -> TokenStream {
    let name = &def.name;
    let name_str = name.unraw().to_string();

    let field_infos: Vec<TokenStream> = def.fields.iter().map(generate_field_info).collect();

    let row_entries: Vec<TokenStream> = def
        .fields
        .iter()
        .filter(|f| f.is_exported())
        .map(|f| {
            let ident = &f.ident;
            let field_name = f.name();
            let value = match f.shape {
                ValueShape::Scalar => quote! {
                    ::cqlmodel_core::Value::from(::std::clone::Clone::clone(&self.#ident))
                },
                ValueShape::List => quote! {
                    ::cqlmodel_core::Value::list(::std::clone::Clone::clone(&self.#ident))
                },
                ValueShape::OptionalList => quote! {
                    match &self.#ident {
                        ::std::option::Option::Some(items) => {
                            ::cqlmodel_core::Value::list(::std::clone::Clone::clone(items))
                        }
                        ::std::option::Option::None => ::cqlmodel_core::Value::Null,
                    }
                },
            };
            quote! { (#field_name, #value) }
        })
        .collect();

    let table_override = def.table.as_ref().map(|table| {
        quote! {
            fn table_name_override() -> ::std::option::Option<&'static str> {
                ::std::option::Option::Some(#table)
            }
        }
    });

    let schema_override = def.schema.as_ref().map(|schema| {
        quote! {
            fn schema_name_override() -> ::std::option::Option<&'static str> {
                ::std::option::Option::Some(#schema)
            }
        }
    });

    let handles: Vec<TokenStream> = def
        .fields
        .iter()
        .enumerate()
        .map(|(index, f)| {
            let const_name = format_ident!("{}", f.const_name());
            let doc = format!("Handle of the `{}` field.", f.name());
            quote! {
                #[doc = #doc]
                pub const #const_name: ::cqlmodel_core::FieldHandle = ::cqlmodel_core::FieldHandle::new(
                    <Self as ::cqlmodel_core::Entity>::TYPE_PATH,
                    #index,
                );
            }
        })
        .collect();

    quote! {
        impl ::cqlmodel_core::Entity for #name {
            const TYPE_NAME: &'static str = #name_str;
            const TYPE_PATH: &'static str = ::std::concat!(::std::module_path!(), "::", #name_str);

            fn fields() -> &'static [::cqlmodel_core::FieldInfo] {
                static FIELDS: &[::cqlmodel_core::FieldInfo] = &[
                    #(#field_infos),*
                ];
                FIELDS
            }

            #table_override
            #schema_override

            fn to_row(&self) -> ::std::vec::Vec<(&'static str, ::cqlmodel_core::Value)> {
                ::std::vec![
                    #(#row_entries),*
                ]
            }
        }

        impl #name {
            #(#handles)*
        }
    }
}

/// Generate the `FieldInfo` constructor expression of one field.
fn generate_field_info(field: &EntityFieldDef) -> TokenStream {
    let field_name = field.name();
    let tag = match &field.tag {
        FieldTagDef::Default => quote! { ::cqlmodel_core::FieldTag::Default },
        FieldTagDef::Rename(column) => quote! { ::cqlmodel_core::FieldTag::Rename(#column) },
        FieldTagDef::Exclude => quote! { ::cqlmodel_core::FieldTag::Exclude },
    };
    let private = (!field.public).then(|| quote! { .private() });

    quote! {
        ::cqlmodel_core::FieldInfo::new(#field_name).tag(#tag) #private
    }
}
