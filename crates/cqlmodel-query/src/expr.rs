//! Expression tree for CQL statements.
//!
//! A query is a chain of nodes. A [`PrefixedClause`] is a keyword-led clause
//! (`FROM`, `WHERE`, `AND`, `= ?`, ...) that may carry bound values; a
//! [`FieldReference`] names one field of the bound entity by handle. Each node has
//! at most one child, rendered after the node's own prefix.
//!
//! Chains may be arbitrarily long: appending, cloning, dropping and rendering walk
//! them iteratively. `Debug` output is the one recursive traversal.
//!
//! # Example
//!
//! ```ignore
//! use cqlmodel_query::expr::*;
//!
//! // FROM User WHERE last_name = ? AND age > ?
//! let query = from(
//!     user,
//!     where_(field_eq(User::LAST_NAME, "Bond").and_then(field(User::AGE, gt(30)))),
//! );
//! ```

use cqlmodel_core::{EntityRef, FieldHandle, Value};

/// The distinguished prefix that binds the entity of a query.
pub const FROM: &str = "FROM";

/// A value carried by a clause.
#[derive(Debug, Clone)]
pub enum Bound {
    /// A query parameter, bound to a `?` placeholder.
    Value(Value),
    /// An entity reference. Only meaningful on a `FROM` clause.
    Entity(EntityRef),
}

impl Bound {
    /// The parameter value, if this is one.
    pub fn as_value(&self) -> Option<&Value> {
        match self {
            Bound::Value(v) => Some(v),
            Bound::Entity(_) => None,
        }
    }

    /// The entity reference, if this is one.
    pub fn as_entity(&self) -> Option<&EntityRef> {
        match self {
            Bound::Entity(e) => Some(e),
            Bound::Value(_) => None,
        }
    }
}

impl From<Value> for Bound {
    fn from(value: Value) -> Self {
        Bound::Value(value)
    }
}

impl From<EntityRef> for Bound {
    fn from(entity: EntityRef) -> Self {
        Bound::Entity(entity)
    }
}

/// A keyword-led clause.
#[derive(Debug, Clone)]
pub struct PrefixedClause {
    /// Literal text emitted first
    pub prefix: String,
    /// Child rendered after the prefix
    pub after_prefix: Option<Box<Expr>>,
    /// Literal text emitted after the child
    pub suffix: String,
    /// Values carried by this clause
    pub binding: Vec<Bound>,
}

impl PrefixedClause {
    /// Create a clause.
    pub fn new(
        prefix: impl Into<String>,
        after_prefix: Option<Expr>,
        suffix: impl Into<String>,
        binding: Vec<Bound>,
    ) -> Self {
        Self {
            prefix: prefix.into(),
            after_prefix: after_prefix.map(Box::new),
            suffix: suffix.into(),
            binding,
        }
    }

    /// Whether this is the distinguished `FROM` clause.
    pub fn is_from(&self) -> bool {
        self.prefix == FROM
    }

    /// Number of values bound by placeholders in the prefix.
    pub(crate) fn leading_values(&self) -> usize {
        if self.is_from() {
            0
        } else {
            self.prefix.matches('?').count()
        }
    }

    /// Move the suffix into a standalone clause, so that nodes can be appended
    /// after it. Suffix values travel with it.
    fn detach_suffix(&mut self) -> Option<Expr> {
        if self.suffix.is_empty() {
            return None;
        }
        let suffix = std::mem::take(&mut self.suffix);
        let mut binding = Vec::new();
        if !self.is_from() {
            let mut leading = self.leading_values();
            let (kept, moved): (Vec<Bound>, Vec<Bound>) = std::mem::take(&mut self.binding)
                .into_iter()
                .partition(|bound| match bound {
                    Bound::Value(_) if leading > 0 => {
                        leading -= 1;
                        true
                    }
                    Bound::Value(_) => false,
                    Bound::Entity(_) => true,
                });
            self.binding = kept;
            binding = moved;
        }
        Some(PrefixedClause::new(suffix.trim_start(), None, "", binding).into())
    }
}

impl Drop for PrefixedClause {
    fn drop(&mut self) {
        drop_chain(self.after_prefix.take());
    }
}

/// Reference to one field of the bound entity.
#[derive(Debug, Clone)]
pub struct FieldReference {
    /// Identity of the referenced field
    pub field: FieldHandle,
    /// Child rendered after the column name
    pub after_field: Option<Box<Expr>>,
}

impl Drop for FieldReference {
    fn drop(&mut self) {
        drop_chain(self.after_field.take());
    }
}

/// Drop a chain node by node instead of recursively.
fn drop_chain(mut next: Option<Box<Expr>>) {
    while let Some(mut node) = next {
        next = node.child_slot().take();
    }
}

/// A node of the expression tree.
#[derive(Debug)]
pub enum Expr {
    /// Keyword-led clause
    Prefixed(PrefixedClause),
    /// Field reference
    Field(FieldReference),
}

impl Expr {
    /// The single child of this node.
    pub fn child(&self) -> Option<&Expr> {
        match self {
            Expr::Prefixed(clause) => clause.after_prefix.as_deref(),
            Expr::Field(field) => field.after_field.as_deref(),
        }
    }

    fn child_slot(&mut self) -> &mut Option<Box<Expr>> {
        match self {
            Expr::Prefixed(clause) => &mut clause.after_prefix,
            Expr::Field(field) => &mut field.after_field,
        }
    }

    /// Child slot of this node, after moving any suffix to `closing`.
    fn open_slot(&mut self, closing: &mut Vec<Expr>) -> &mut Option<Box<Expr>> {
        if let Expr::Prefixed(clause) = self {
            closing.extend(clause.detach_suffix());
        }
        self.child_slot()
    }

    /// Copy of this node with `child` in place of its own child.
    fn with_child(&self, child: Option<Box<Expr>>) -> Expr {
        match self {
            Expr::Prefixed(clause) => Expr::Prefixed(PrefixedClause {
                prefix: clause.prefix.clone(),
                after_prefix: child,
                suffix: clause.suffix.clone(),
                binding: clause.binding.clone(),
            }),
            Expr::Field(field) => Expr::Field(FieldReference {
                field: field.field,
                after_field: child,
            }),
        }
    }

    /// Append `next` after everything this chain renders.
    ///
    /// Suffixes along the chain are turned into standalone clauses first, so `next`
    /// renders after them: a clause `token(` / `)` followed by `> ?` renders
    /// `token( id ) > ?`.
    pub fn then(mut self, next: Expr) -> Expr {
        let mut closing = Vec::new();
        let mut slot = self.open_slot(&mut closing);
        while let Some(node) = slot {
            slot = node.open_slot(&mut closing);
        }

        // Innermost suffix first, the appended node last
        let mut tail = next;
        for mut token in closing {
            *token.child_slot() = Some(Box::new(tail));
            tail = token;
        }
        *slot = Some(Box::new(tail));
        self
    }

    /// `self AND rhs`
    pub fn and_then(self, rhs: Expr) -> Expr {
        self.then(and(rhs))
    }

    /// `self OR rhs`
    pub fn or_then(self, rhs: Expr) -> Expr {
        self.then(or(rhs))
    }
}

impl Clone for Expr {
    fn clone(&self) -> Self {
        let mut chain = Vec::new();
        let mut node = self.child();
        while let Some(current) = node {
            chain.push(current);
            node = current.child();
        }

        let mut tail = None;
        for current in chain.into_iter().rev() {
            tail = Some(Box::new(current.with_child(tail)));
        }
        self.with_child(tail)
    }
}

impl From<PrefixedClause> for Expr {
    fn from(clause: PrefixedClause) -> Self {
        Expr::Prefixed(clause)
    }
}

impl From<FieldReference> for Expr {
    fn from(field: FieldReference) -> Self {
        Expr::Field(field)
    }
}

// ============================================================================
// Constructors
// ============================================================================

/// `FROM <table of entity> <after>`. Binds the entity of the query.
pub fn from(entity: impl Into<EntityRef>, after: Expr) -> Expr {
    from_clause(entity.into(), Some(after))
}

/// `FROM <table of entity>` with nothing after it.
pub fn from_only(entity: impl Into<EntityRef>) -> Expr {
    from_clause(entity.into(), None)
}

fn from_clause(entity: EntityRef, after: Option<Expr>) -> Expr {
    PrefixedClause::new(FROM, after, "", vec![Bound::Entity(entity)]).into()
}

/// `WHERE <condition>`
pub fn where_(condition: Expr) -> Expr {
    PrefixedClause::new("WHERE", Some(condition), "", Vec::new()).into()
}

/// `DELETE FROM <table of entity> <after>`
pub fn delete(entity: impl Into<EntityRef>, after: Expr) -> Expr {
    PrefixedClause::new("DELETE", Some(from(entity, after)), "", Vec::new()).into()
}

/// The column of `handle`, followed by `after`.
pub fn field(handle: FieldHandle, after: Expr) -> Expr {
    FieldReference {
        field: handle,
        after_field: Some(Box::new(after)),
    }
    .into()
}

/// The column of `handle` alone.
pub fn field_only(handle: FieldHandle) -> Expr {
    FieldReference {
        field: handle,
        after_field: None,
    }
    .into()
}

/// `<column> = ?`
pub fn field_eq(handle: FieldHandle, value: impl Into<Value>) -> Expr {
    field(handle, eq(value))
}

fn comparison(operator: &str, value: Value) -> Expr {
    PrefixedClause::new(
        format!("{} ?", operator),
        None,
        "",
        vec![Bound::Value(value)],
    )
    .into()
}

/// `= ?`
pub fn eq(value: impl Into<Value>) -> Expr {
    comparison("=", value.into())
}

/// `!= ?`
pub fn ne(value: impl Into<Value>) -> Expr {
    comparison("!=", value.into())
}

/// `> ?`
pub fn gt(value: impl Into<Value>) -> Expr {
    comparison(">", value.into())
}

/// `>= ?`
pub fn gte(value: impl Into<Value>) -> Expr {
    comparison(">=", value.into())
}

/// `< ?`
pub fn lt(value: impl Into<Value>) -> Expr {
    comparison("<", value.into())
}

/// `<= ?`
pub fn lte(value: impl Into<Value>) -> Expr {
    comparison("<=", value.into())
}

/// `CONTAINS ?` (collection columns)
pub fn contains(value: impl Into<Value>) -> Expr {
    comparison("CONTAINS", value.into())
}

/// `IN (?, ?, ...)`, one placeholder per value.
pub fn in_list<T: Into<Value>>(values: impl IntoIterator<Item = T>) -> Expr {
    let binding: Vec<Bound> = values
        .into_iter()
        .map(|v| Bound::Value(v.into()))
        .collect();
    let placeholders = vec!["?"; binding.len()].join(", ");
    PrefixedClause::new(format!("IN ({})", placeholders), None, "", binding).into()
}

/// `AND <rhs>`
pub fn and(rhs: Expr) -> Expr {
    PrefixedClause::new("AND", Some(rhs), "", Vec::new()).into()
}

/// `OR <rhs>`
pub fn or(rhs: Expr) -> Expr {
    PrefixedClause::new("OR", Some(rhs), "", Vec::new()).into()
}

/// `( <inner> )`
pub fn paren(inner: Expr) -> Expr {
    let close = PrefixedClause::new(")", None, "", Vec::new());
    PrefixedClause::new("(", Some(inner.then(close.into())), "", Vec::new()).into()
}

/// Literal statement text with its own bindings.
pub fn raw<T: Into<Value>>(text: impl Into<String>, values: impl IntoIterator<Item = T>) -> Expr {
    let binding = values.into_iter().map(|v| Bound::Value(v.into())).collect();
    PrefixedClause::new(text, None, "", binding).into()
}
