use futures_util::{Stream, StreamExt, TryStreamExt};
use tokio_postgres::error::SqlState;
use tokio_postgres::types::ToSql;
use tracing::{debug, warn};

use crate::error::PlaceStoreError;
use crate::model::{Place, decode};

use super::{PlaceStore, execution_error};

const SELECT_ALL: &str = "SELECT country, city, telecode FROM place";
const SELECT_TELECODE: &str = "SELECT telecode FROM place WHERE telecode = $1 LIMIT 1";
const SELECT_FIRST: &str = "SELECT * FROM place LIMIT 1";
const SELECT_TELECODE_ABOVE: &str = "SELECT * FROM place WHERE telecode > $1";
const COUNT_ALL: &str = "SELECT count(*) FROM place";
// `name` is not part of the place schema; see `select_names_limit`.
const SELECT_NAMES: &str = "SELECT name FROM place LIMIT $1";

impl PlaceStore<'_> {
    /// Stream every place as rows arrive from the server.
    ///
    /// The stream is single-pass. Row order is whatever the server returns.
    /// A row that fails to decode yields an error; callers using
    /// `try_next`/`try_collect` stop there.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ExecutionError` if the query cannot be started.
    pub async fn stream_all(
        &self,
    ) -> Result<impl Stream<Item = Result<Place, PlaceStoreError>>, PlaceStoreError> {
        debug!(sql = SELECT_ALL, "stream");
        let rows = self
            .client()
            .query_raw(SELECT_ALL, std::iter::empty::<&(dyn ToSql + Sync)>())
            .await
            .map_err(execution_error("select all places"))?;

        Ok(rows.map(|row| {
            row.map_err(execution_error("read place row"))
                .and_then(|row| Place::try_from(&row))
        }))
    }

    /// Read every place. Ordering is unspecified.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ExecutionError` if the query fails, or
    /// `PlaceStoreError::DecodeError` on the first row that cannot be decoded.
    pub async fn query_all(&self) -> Result<Vec<Place>, PlaceStoreError> {
        self.stream_all().await?.try_collect().await
    }

    /// Look up one row by telecode and decode only its `telecode` column.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::NotFound` if no row has this telecode.
    pub async fn query_single_by_telecode(&self, code: i32) -> Result<i32, PlaceStoreError> {
        debug!(sql = SELECT_TELECODE, code, "query row");
        let row = self
            .client()
            .query_opt(SELECT_TELECODE, &[&code])
            .await
            .map_err(execution_error("select telecode"))?
            .ok_or_else(|| PlaceStoreError::NotFound(format!("place with telecode {code}")))?;

        decode(&row, "telecode")
    }

    /// Return one place from an unordered scan. Which row is returned is up
    /// to the server.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::NotFound` if the table is empty.
    pub async fn get_first(&self) -> Result<Place, PlaceStoreError> {
        debug!(sql = SELECT_FIRST, "get");
        let row = self
            .client()
            .query_opt(SELECT_FIRST, &[])
            .await
            .map_err(execution_error("select first place"))?
            .ok_or_else(|| PlaceStoreError::NotFound("place table is empty".to_string()))?;

        Place::try_from(&row)
    }

    /// All places whose telecode is strictly greater than `threshold`.
    /// No match is an empty vector, not an error.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ExecutionError` or `PlaceStoreError::DecodeError`.
    pub async fn select_where_telecode_greater_than(
        &self,
        threshold: i32,
    ) -> Result<Vec<Place>, PlaceStoreError> {
        debug!(sql = SELECT_TELECODE_ABOVE, threshold, "select");
        let rows = self
            .client()
            .query(SELECT_TELECODE_ABOVE, &[&threshold])
            .await
            .map_err(execution_error("select places by telecode"))?;

        rows.iter().map(Place::try_from).collect()
    }

    /// Total number of rows in the table.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ExecutionError` if the aggregate fails.
    pub async fn count_all(&self) -> Result<i64, PlaceStoreError> {
        debug!(sql = COUNT_ALL, "get scalar");
        let row = self
            .client()
            .query_one(COUNT_ALL, &[])
            .await
            .map_err(execution_error("count places"))?;

        decode(&row, "count")
    }

    /// Read at most `limit` values of the `name` column.
    ///
    /// The place table has no `name` column, so against the schema created by
    /// [`crate::schema::ensure_schema`] this returns an empty vector. An
    /// undefined column or table degrades to empty with a warning; any other
    /// failure is returned.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ExecutionError` or `PlaceStoreError::DecodeError`.
    pub async fn select_names_limit(&self, limit: i64) -> Result<Vec<String>, PlaceStoreError> {
        debug!(sql = SELECT_NAMES, limit, "select scalars");
        match self.client().query(SELECT_NAMES, &[&limit]).await {
            Ok(rows) => rows.iter().map(|row| decode(row, "name")).collect(),
            Err(e)
                if e.code() == Some(&SqlState::UNDEFINED_COLUMN)
                    || e.code() == Some(&SqlState::UNDEFINED_TABLE) =>
            {
                warn!(error = %e, "name query references a missing column; returning no rows");
                Ok(Vec::new())
            }
            Err(e) => Err(execution_error("select names")(e)),
        }
    }
}
