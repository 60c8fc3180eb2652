use deadpool_postgres::{Object, Pool, Runtime};
use tokio_postgres::NoTls;
use tracing::{debug, info};

use crate::config::DbSettings;
use crate::error::PlaceStoreError;

/// An open, authenticated connection to the place database.
///
/// The pool behind it is capped at one connection and the client is checked
/// out for the whole lifetime of the session, so every statement runs on the
/// same backend process.
pub struct Session {
    client: Object,
    // Keeps the pool alive for as long as the checked-out client.
    _pool: Pool,
}

impl Session {
    /// Validate `settings`, open the connection, and run a connectivity check.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ConfigError` if settings are incomplete, or
    /// `PlaceStoreError::ConnectionError` if the server cannot be reached or
    /// rejects the login.
    pub async fn connect(settings: &DbSettings) -> Result<Self, PlaceStoreError> {
        let pg_config = settings.to_pg_config()?;

        info!(
            host = pg_config.host.as_deref().unwrap_or_default(),
            port = pg_config.port.unwrap_or_default(),
            dbname = pg_config.dbname.as_deref().unwrap_or_default(),
            "connecting to postgres"
        );

        let pool = pg_config
            .create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| {
                PlaceStoreError::ConnectionError(format!("Failed to create Postgres pool: {e}"))
            })?;

        // deadpool connects lazily; checking out forces the login.
        let client = pool.get().await.map_err(|e| {
            PlaceStoreError::ConnectionError(format!("Failed to open Postgres session: {e}"))
        })?;

        let session = Session {
            client,
            _pool: pool,
        };
        session.ping().await?;
        info!("postgres session established");

        Ok(session)
    }

    /// Round-trip a `SELECT 1` to confirm the session is usable.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ConnectionError` if the query fails.
    pub async fn ping(&self) -> Result<(), PlaceStoreError> {
        debug!("ping");
        self.client
            .simple_query("SELECT 1")
            .await
            .map(|_| ())
            .map_err(|e| PlaceStoreError::ConnectionError(format!("postgres ping failed: {e}")))
    }

    /// Run one or more semicolon-separated statements, each autocommitted.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::PostgresError` if any statement fails.
    pub async fn execute_batch(&self, sql: &str) -> Result<(), PlaceStoreError> {
        debug!(sql, "batch");
        self.client.batch_execute(sql).await?;
        Ok(())
    }

    pub(crate) fn client(&self) -> &tokio_postgres::Client {
        &self.client
    }
}
