//! Error types for statement compilation and session calls.

use crate::field::FieldHandle;
use std::error::Error as StdError;
use std::fmt;

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while compiling an expression tree or executing a statement.
///
/// Compile errors are detected synchronously and are fatal to the single compile
/// call that raised them; no partial output is ever returned alongside one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A `FROM` clause or a field reference needs an entity, but the tree binds none.
    MissingEntity,
    /// A field reference does not belong to the located entity.
    FieldNotFound {
        /// The handle that could not be matched.
        field: FieldHandle,
        /// Type name of the located entity.
        entity: &'static str,
    },
    /// A field reference matches a private or excluded field.
    FieldNotExported {
        /// The handle that was matched.
        field: FieldHandle,
        /// Type name of the located entity.
        entity: &'static str,
        /// Rust name of the matched field.
        name: &'static str,
    },
    /// A SELECT or UPDATE was compiled against an entity without exported fields.
    EmptyColumnList {
        /// Type name of the entity.
        entity: &'static str,
    },
    /// An entity's row does not report the value of one of its exported fields.
    MissingFieldValue {
        /// Type name of the entity.
        entity: &'static str,
        /// Rust name of the field.
        field: &'static str,
    },
    /// Error reported by the underlying driver session.
    Session(String),
    /// Any other error.
    Custom(String),
}

impl Error {
    /// Create a session error from any displayable driver error.
    pub fn session(err: impl fmt::Display) -> Self {
        Error::Session(err.to_string())
    }

    /// Whether this error was raised while compiling (before any I/O).
    pub const fn is_compile_error(&self) -> bool {
        matches!(
            self,
            Error::MissingEntity
                | Error::FieldNotFound { .. }
                | Error::FieldNotExported { .. }
                | Error::EmptyColumnList { .. }
                | Error::MissingFieldValue { .. }
        )
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::MissingEntity => write!(f, "no entity bound to the expression"),
            Error::FieldNotFound { field, entity } => {
                write!(f, "field {} not found in entity {}", field, entity)
            }
            Error::FieldNotExported {
                field,
                entity,
                name,
            } => write!(
                f,
                "field {} ({}) of entity {} is not exported",
                name, field, entity
            ),
            Error::EmptyColumnList { entity } => {
                write!(f, "entity {} has no exported fields", entity)
            }
            Error::MissingFieldValue { entity, field } => {
                write!(f, "entity {} did not report a value for field {}", entity, field)
            }
            Error::Session(msg) => write!(f, "session error: {}", msg),
            Error::Custom(msg) => write!(f, "{}", msg),
        }
    }
}

impl StdError for Error {}
