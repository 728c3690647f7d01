//! Statement assemblers for SELECT field lists and UPDATE ... SET clauses.
//!
//! Every exported field of the entity takes part, in declaration order, so no tree
//! walk is needed here.

use cqlmodel_core::{EntityDescriptor, EntityRef, Result, Value};
use std::time::Duration;

/// Options applied to generated UPDATE statements.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateOptions {
    /// Time to live of the written cells (`USING TTL`), in whole seconds
    pub ttl: Option<Duration>,
}

impl UpdateOptions {
    /// Create options with no TTL.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the TTL.
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = Some(ttl);
        self
    }

    /// Set the TTL from optional.
    pub fn with_ttl_opt(mut self, ttl: Option<Duration>) -> Self {
        self.ttl = ttl;
        self
    }

    /// TTL in whole seconds, rounded to the nearest second.
    ///
    /// `USING TTL 0` means "never expire", so a non-zero TTL never rounds below one
    /// second. An explicit zero TTL stays zero.
    pub fn ttl_seconds(&self) -> Option<u64> {
        self.ttl.map(|ttl| {
            let rounded = ttl.as_secs() + u64::from(ttl.subsec_millis() >= 500);
            if ttl.is_zero() { 0 } else { rounded.max(1) }
        })
    }
}

/// Comma separated list of the exported column names.
///
/// An entity without exported fields yields an empty string.
pub fn select_fields(descriptor: &EntityDescriptor) -> String {
    descriptor.column_names().join(", ")
}

/// `UPDATE <table> [USING TTL n] SET c1 = ?, c2 = ?, ...`
///
/// Returns the statement and the column names in placeholder order.
pub fn update_set(
    table: &str,
    descriptor: &EntityDescriptor,
    options: &UpdateOptions,
) -> (String, Vec<&'static str>) {
    let columns = descriptor.column_names();

    let mut sql = format!("UPDATE {} ", table);
    if let Some(seconds) = options.ttl_seconds() {
        sql.push_str(&format!("USING TTL {} ", seconds));
    }
    sql.push_str("SET ");
    let assignments: Vec<String> = columns.iter().map(|c| format!("{} = ?", c)).collect();
    sql.push_str(&assignments.join(", "));

    (sql, columns)
}

/// Exported column names of an entity together with its current values.
pub fn columns_with_values(entity: &EntityRef) -> Result<(Vec<&'static str>, Vec<Value>)> {
    Ok((entity.descriptor().column_names(), entity.field_values()?))
}
