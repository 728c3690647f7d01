//! Statement broker: compile expression trees and hand them to a session.
//!
//! The broker owns no connection logic. It compiles each tree, then passes the text
//! and the ordered bindings unchanged to the wrapped [`Session`]. A tree that fails to
//! compile never reaches the session.

use crate::config::BrokerConfig;
use cqlmodel_core::{Cx, EntityRef, Error, Outcome, Row, Session};
use cqlmodel_query::{CompiledQuery, Expr, UpdateOptions, compile, compile_select, compile_update};

/// Compiles expression trees and runs them through a [`Session`].
#[derive(Debug)]
pub struct Broker<S: Session> {
    session: S,
    config: BrokerConfig,
}

impl<S: Session> Broker<S> {
    /// Create a broker with the default configuration.
    pub fn new(session: S) -> Self {
        Self::with_config(session, BrokerConfig::default())
    }

    /// Create a broker with an explicit configuration.
    pub fn with_config(session: S, config: BrokerConfig) -> Self {
        Self { session, config }
    }

    /// Get a reference to the underlying session.
    #[must_use]
    pub fn session(&self) -> &S {
        &self.session
    }

    /// Get the configuration.
    #[must_use]
    pub fn config(&self) -> &BrokerConfig {
        &self.config
    }

    /// Consume the broker and return the underlying session.
    pub fn into_session(self) -> S {
        self.session
    }

    /// Run `SELECT <exported columns> ...` for the entity bound by the tree's `FROM`.
    #[tracing::instrument(level = "debug", skip(self, cx, expr))]
    pub async fn list_values(&self, cx: &Cx, expr: &Expr) -> Outcome<Vec<Row>, Error> {
        let query = match compile_select(expr) {
            Ok(query) => query,
            Err(e) => return Outcome::Err(e),
        };
        self.log_statement(&query);

        match self.session.query(cx, &query.cql, &query.params).await {
            Outcome::Ok(rows) => {
                tracing::debug!(rows = rows.len(), "Query returned rows");
                Outcome::Ok(rows)
            }
            Outcome::Err(e) => Outcome::Err(e),
            Outcome::Cancelled(r) => Outcome::Cancelled(r),
            Outcome::Panicked(p) => Outcome::Panicked(p),
        }
    }

    /// Write every exported field of `entity` where `where_expr` holds.
    ///
    /// Uses the configured default TTL.
    pub async fn put(&self, cx: &Cx, where_expr: &Expr, entity: &EntityRef) -> Outcome<u64, Error> {
        let options = UpdateOptions::new().with_ttl_opt(self.config.default_ttl);
        self.put_with(cx, where_expr, entity, &options).await
    }

    /// Write every exported field of `entity` where `where_expr` holds, with explicit options.
    #[tracing::instrument(
        level = "debug",
        skip(self, cx, where_expr, entity),
        fields(entity = entity.type_name())
    )]
    pub async fn put_with(
        &self,
        cx: &Cx,
        where_expr: &Expr,
        entity: &EntityRef,
        options: &UpdateOptions,
    ) -> Outcome<u64, Error> {
        let query = match compile_update(where_expr, entity, options) {
            Ok(query) => query,
            Err(e) => return Outcome::Err(e),
        };
        self.run(cx, query).await
    }

    /// Run a `DELETE` tree.
    #[tracing::instrument(level = "debug", skip(self, cx, expr))]
    pub async fn delete(&self, cx: &Cx, expr: &Expr) -> Outcome<u64, Error> {
        self.exec(cx, expr).await
    }

    /// Compile any tree as it stands and execute it.
    pub async fn exec(&self, cx: &Cx, expr: &Expr) -> Outcome<u64, Error> {
        let query = match compile(expr) {
            Ok(query) => query,
            Err(e) => return Outcome::Err(e),
        };
        self.run(cx, query).await
    }

    async fn run(&self, cx: &Cx, query: CompiledQuery) -> Outcome<u64, Error> {
        self.log_statement(&query);
        self.session.execute(cx, &query.cql, &query.params).await
    }

    fn log_statement(&self, query: &CompiledQuery) {
        if self.config.log_statements {
            let params = serde_json::to_string(&query.params).unwrap_or_default();
            tracing::info!(cql = %query.cql, params = %params, "Executing statement");
        } else {
            tracing::debug!(cql = %query.cql, params = query.params.len(), "Executing statement");
        }
    }
}
