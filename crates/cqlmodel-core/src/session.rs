//! Driver boundary.
//!
//! The compiler never executes anything. A `Session` is whatever the application
//! uses to run prepared statements; it receives the compiled text and the ordered
//! bindings unchanged.

use crate::error::Error;
use crate::value::Value;
use asupersync::{Cx, Outcome};
use serde::{Deserialize, Serialize};
use std::future::Future;

/// One result row as returned by a driver.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Column names, in result order
    pub columns: Vec<String>,
    /// Column values, parallel to `columns`
    pub values: Vec<Value>,
}

impl Row {
    /// Create a row from parallel column and value lists.
    pub fn new(columns: Vec<String>, values: Vec<Value>) -> Self {
        Self { columns, values }
    }

    /// Get a value by column name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .position(|c| c == column)
            .and_then(|i| self.values.get(i))
    }

    /// Number of columns.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Whether the row has no columns.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// A driver session able to run prepared statements with positional `?` bindings.
pub trait Session: Send + Sync {
    /// Run a statement that returns rows.
    fn query(
        &self,
        cx: &Cx,
        cql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<Vec<Row>, Error>> + Send;

    /// Run a statement and return the number of affected rows, if the driver reports it.
    fn execute(
        &self,
        cx: &Cx,
        cql: &str,
        params: &[Value],
    ) -> impl Future<Output = Outcome<u64, Error>> + Send;
}
