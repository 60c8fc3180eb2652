use tokio_postgres::Statement;
use tokio_postgres::types::ToSql;
use tracing::debug;

use crate::error::PlaceStoreError;
use crate::model::Place;
use crate::session::Session;

use super::{PlaceStore, execution_error};

/// A query compiled once on the session's connection and executed with fresh
/// bindings on each call.
///
/// The server-side statement belongs to one backend connection, so the
/// handle borrows the session it was prepared on and cannot outlive it.
pub struct PreparedPlaceQuery<'s> {
    session: &'s Session,
    stmt: Statement,
    sql: String,
}

impl std::fmt::Debug for PreparedPlaceQuery<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreparedPlaceQuery")
            .field("sql", &self.sql)
            .field("params", &self.stmt.params().len())
            .field("columns", &self.stmt.columns().len())
            .finish()
    }
}

impl<'s> PlaceStore<'s> {
    /// Compile `sql` for repeated execution. The query must select the
    /// `country`, `city`, and `telecode` columns (or `*`).
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ExecutionError` if the server rejects the SQL.
    pub async fn prepare(&self, sql: &str) -> Result<PreparedPlaceQuery<'s>, PlaceStoreError> {
        debug!(sql, "prepare");
        let stmt = self
            .client()
            .prepare(sql)
            .await
            .map_err(execution_error("prepare place query"))?;

        Ok(PreparedPlaceQuery {
            session: self.session(),
            stmt,
            sql: sql.to_string(),
        })
    }
}

impl PreparedPlaceQuery<'_> {
    #[must_use]
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Number of `$n` placeholders the statement expects.
    #[must_use]
    pub fn param_count(&self) -> usize {
        self.stmt.params().len()
    }

    /// Execute with `params` and decode the first returned row, if any.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ExecutionError` if execution fails (including
    /// a wrong number of parameters), or `PlaceStoreError::DecodeError`.
    pub async fn query_one(
        &self,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Option<Place>, PlaceStoreError> {
        let rows = self.run(params).await?;
        rows.first().map(Place::try_from).transpose()
    }

    /// Execute with `params` and decode every returned row.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ExecutionError` or `PlaceStoreError::DecodeError`.
    pub async fn query_all(
        &self,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<Place>, PlaceStoreError> {
        let rows = self.run(params).await?;
        rows.iter().map(Place::try_from).collect()
    }

    async fn run(
        &self,
        params: &[&(dyn ToSql + Sync)],
    ) -> Result<Vec<tokio_postgres::Row>, PlaceStoreError> {
        debug!(sql = %self.sql, params = params.len(), "execute prepared");
        self.session
            .client()
            .query(&self.stmt, params)
            .await
            .map_err(execution_error("execute prepared place query"))
    }
}
