use thiserror::Error;

#[derive(Debug, Error)]
pub enum PlaceStoreError {
    #[error(transparent)]
    PostgresError(#[from] tokio_postgres::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Schema error: {0}")]
    SchemaError(String),

    #[error("Write error: {0}")]
    WriteError(String),

    #[error("SQL execution error: {0}")]
    ExecutionError(String),

    #[error("Decode error: {0}")]
    DecodeError(String),

    #[error("No rows returned: {0}")]
    NotFound(String),
}

impl PlaceStoreError {
    /// Setup and write failures leave the program in an undefined state; reads do not.
    #[must_use]
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::ConfigError(_)
                | Self::ConnectionError(_)
                | Self::SchemaError(_)
                | Self::WriteError(_)
        )
    }
}
