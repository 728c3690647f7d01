//! Field metadata and field identity.

use std::fmt;

/// Tag value that excludes a field from every generated statement.
pub const EXCLUDE_SENTINEL: &str = "-";

/// Result of looking up the `cql` tag of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FieldTag {
    /// No tag: the column is named after the field.
    #[default]
    Default,
    /// Explicit column name.
    Rename(&'static str),
    /// The exclusion sentinel was given.
    Exclude,
}

impl FieldTag {
    /// Interpret a raw tag string.
    ///
    /// An empty string means "no tag", [`EXCLUDE_SENTINEL`] means excluded and
    /// anything else is a column name override.
    #[must_use]
    pub const fn parse(tag: &'static str) -> Self {
        if tag.is_empty() {
            FieldTag::Default
        } else if tag.len() == 1 && tag.as_bytes()[0] == b'-' {
            FieldTag::Exclude
        } else {
            FieldTag::Rename(tag)
        }
    }
}

/// Metadata about one declared field of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldInfo {
    /// Rust field name
    pub name: &'static str,
    /// Naming/exclusion tag
    pub tag: FieldTag,
    /// Whether the field is reachable for compilation (declared `pub`)
    pub public: bool,
}

impl FieldInfo {
    /// Create a public, untagged field.
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            tag: FieldTag::Default,
            public: true,
        }
    }

    /// Set the tag.
    pub const fn tag(mut self, tag: FieldTag) -> Self {
        self.tag = tag;
        self
    }

    /// Override the column name (same as a rename tag).
    pub const fn column(mut self, name: &'static str) -> Self {
        self.tag = FieldTag::parse(name);
        self
    }

    /// Exclude the field from generated statements.
    pub const fn exclude(mut self) -> Self {
        self.tag = FieldTag::Exclude;
        self
    }

    /// Mark the field as private (unreachable for compilation).
    pub const fn private(mut self) -> Self {
        self.public = false;
        self
    }

    /// Resolve the column name and the export status of this field.
    ///
    /// Private fields keep their Rust name but are never exported. Excluded fields
    /// report the sentinel as their name.
    #[must_use]
    pub const fn column_name(&self) -> (&'static str, bool) {
        if !self.public {
            return (self.name, false);
        }
        match self.tag {
            FieldTag::Default => (self.name, true),
            FieldTag::Rename(column) => (column, true),
            FieldTag::Exclude => (EXCLUDE_SENTINEL, false),
        }
    }

    /// Whether this field takes part in generated statements.
    #[must_use]
    pub const fn is_exported(&self) -> bool {
        self.column_name().1
    }
}

/// Stable identity of one field of one entity type.
///
/// Handles are compared by value: the owning type path plus the declaration index.
/// `#[derive(Entity)]` emits one associated constant per field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FieldHandle {
    owner: &'static str,
    index: usize,
}

impl FieldHandle {
    /// Create a handle for the field at `index` of the type identified by `owner`.
    pub const fn new(owner: &'static str, index: usize) -> Self {
        Self { owner, index }
    }

    /// Type path of the entity owning the field.
    pub const fn owner(&self) -> &'static str {
        self.owner
    }

    /// Declaration index of the field.
    pub const fn index(&self) -> usize {
        self.index
    }
}

impl fmt::Display for FieldHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.owner, self.index)
    }
}
