//! Renderer pass: expression tree to CQL text and ordered bindings.
//!
//! Single walk down the chain, then back up through the open clauses to emit their
//! suffixes. No recursion, so chain length is bounded by memory only. Every token is preceded by one space, so the text of a
//! rendered tree always starts with a space; callers trim it before concatenation.
//!
//! Bindings follow placeholder order. A clause's values whose `?` appear in its
//! prefix are appended before its child is rendered; the remaining values are
//! appended after the suffix. `FROM` clauses never contribute bindings.

use crate::expr::{Bound, Expr, FieldReference, PrefixedClause};
use cqlmodel_core::{EntityDescriptor, EntityRef, Error, Result, Value};
use std::sync::Arc;

/// Output of the renderer.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Rendered {
    /// Rendered text, starting with a space unless empty
    pub text: String,
    /// Values for the placeholders of `text`, left to right
    pub bindings: Vec<Value>,
}

impl Rendered {
    /// Text without the leading separator.
    pub fn trimmed(&self) -> &str {
        self.text.trim_start()
    }
}

/// Render `root`, resolving `FROM` and field references against `entity`.
///
/// The first error aborts the walk; nothing rendered so far is returned.
pub fn render(root: &Expr, entity: Option<&EntityRef>) -> Result<Rendered> {
    let mut renderer = Renderer {
        descriptor: entity.map(EntityRef::descriptor),
        out: Rendered::default(),
    };
    renderer.walk(root)?;
    Ok(renderer.out)
}

struct Renderer {
    descriptor: Option<Arc<EntityDescriptor>>,
    out: Rendered,
}

impl Renderer {
    fn walk<'a>(&mut self, root: &'a Expr) -> Result<()> {
        let mut open: Vec<&'a PrefixedClause> = Vec::new();
        let mut node = Some(root);
        while let Some(current) = node {
            node = match current {
                Expr::Prefixed(clause) => {
                    self.open_prefixed(clause)?;
                    open.push(clause);
                    clause.after_prefix.as_deref()
                }
                Expr::Field(field) => {
                    self.visit_field(field)?;
                    field.after_field.as_deref()
                }
            };
        }
        while let Some(clause) = open.pop() {
            self.close_prefixed(clause);
        }
        Ok(())
    }

    fn descriptor(&self) -> Result<&EntityDescriptor> {
        self.descriptor.as_deref().ok_or(Error::MissingEntity)
    }

    /// Prefix, qualified table for `FROM`, and the values of prefix placeholders.
    fn open_prefixed(&mut self, clause: &PrefixedClause) -> Result<()> {
        self.out.text.push(' ');
        self.out.text.push_str(&clause.prefix);

        if clause.is_from() {
            let table = self.descriptor()?.qualified_table_name();
            self.out.text.push(' ');
            self.out.text.push_str(&table);
            return Ok(());
        }

        self.out.bindings.extend(
            clause
                .binding
                .iter()
                .filter_map(Bound::as_value)
                .take(clause.leading_values())
                .cloned(),
        );
        Ok(())
    }

    /// Suffix, then the values not consumed by the prefix.
    fn close_prefixed(&mut self, clause: &PrefixedClause) {
        self.out.text.push_str(&clause.suffix);
        if !clause.is_from() {
            self.out.bindings.extend(
                clause
                    .binding
                    .iter()
                    .filter_map(Bound::as_value)
                    .skip(clause.leading_values())
                    .cloned(),
            );
        }
    }

    fn visit_field(&mut self, reference: &FieldReference) -> Result<()> {
        let descriptor = self.descriptor()?;
        let field = descriptor
            .find(&reference.field)
            .ok_or(Error::FieldNotFound {
                field: reference.field,
                entity: descriptor.type_name,
            })?;
        if !field.exported {
            return Err(Error::FieldNotExported {
                field: reference.field,
                entity: descriptor.type_name,
                name: field.field_name,
            });
        }
        let column = field.column_name;

        self.out.text.push(' ');
        self.out.text.push_str(column);
        Ok(())
    }
}
