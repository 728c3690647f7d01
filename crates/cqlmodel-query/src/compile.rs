//! Compile entry points: expression tree to `(cql, params)`.
//!
//! Each call locates the bound entity, renders the tree against it and, for SELECT
//! and UPDATE, prefixes the assembled field list or SET clause. Compilation is pure:
//! the same tree and entity always produce byte-identical output.

use crate::assemble::{UpdateOptions, select_fields, update_set};
use crate::expr::Expr;
use crate::locate::locate;
use crate::render::render;
use cqlmodel_core::{EntityRef, Error, Result, Value};

/// A compiled statement ready for a prepared execution call.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledQuery {
    /// Statement text with `?` placeholders
    pub cql: String,
    /// One value per placeholder, left to right
    pub params: Vec<Value>,
}

impl CompiledQuery {
    /// Split into the statement text and its parameters.
    pub fn into_parts(self) -> (String, Vec<Value>) {
        (self.cql, self.params)
    }
}

/// Compile any expression (for example a `DELETE`) as it stands.
pub fn compile(expr: &Expr) -> Result<CompiledQuery> {
    let entity = locate(expr);
    let rendered = render(expr, entity.as_ref())
        .inspect_err(|e| tracing::debug!(error = %e, "Failed to compile expression"))?;

    let query = CompiledQuery {
        cql: rendered.trimmed().to_string(),
        params: rendered.bindings,
    };
    trace_compiled(&query);
    Ok(query)
}

/// Compile `SELECT <exported columns> FROM <table> ...`.
///
/// The tree must bind an entity through its `FROM` clause.
pub fn compile_select(expr: &Expr) -> Result<CompiledQuery> {
    let entity = locate(expr).ok_or(Error::MissingEntity).inspect_err(|_| {
        tracing::debug!("SELECT expression does not bind an entity");
    })?;
    let descriptor = entity.descriptor();
    let fields = select_fields(&descriptor);
    if fields.is_empty() {
        return Err(Error::EmptyColumnList {
            entity: descriptor.type_name,
        });
    }

    let rendered = render(expr, Some(&entity))
        .inspect_err(|e| tracing::debug!(error = %e, "Failed to compile SELECT"))?;

    let query = CompiledQuery {
        cql: format!("SELECT {}{}", fields, rendered.text),
        params: rendered.bindings,
    };
    trace_compiled(&query);
    Ok(query)
}

/// Compile `UPDATE <table> SET ... WHERE <where_expr>` for `entity`.
///
/// `where_expr` holds the condition only (no `WHERE` keyword) and is resolved against
/// `entity`. Parameters are the entity's exported values in declaration order,
/// followed by the bindings of the condition.
pub fn compile_update(
    where_expr: &Expr,
    entity: &EntityRef,
    options: &UpdateOptions,
) -> Result<CompiledQuery> {
    let descriptor = entity.descriptor();
    let (statement, columns) = update_set(&descriptor.qualified_table_name(), &descriptor, options);
    if columns.is_empty() {
        return Err(Error::EmptyColumnList {
            entity: descriptor.type_name,
        });
    }

    let rendered = render(where_expr, Some(entity))
        .inspect_err(|e| tracing::debug!(error = %e, "Failed to compile UPDATE"))?;

    let mut params = entity
        .field_values()
        .inspect_err(|e| tracing::debug!(error = %e, "Failed to compile UPDATE"))?;
    params.extend(rendered.bindings);

    let query = CompiledQuery {
        cql: format!("{} WHERE{}", statement, rendered.text)
            .trim()
            .to_string(),
        params,
    };
    trace_compiled(&query);
    Ok(query)
}

fn trace_compiled(query: &CompiledQuery) {
    tracing::trace!(cql = %query.cql, params = query.params.len(), "Compiled statement");
}
