use tracing::info;

use crate::error::PlaceStoreError;
use crate::session::Session;

/// DDL for the only table the program uses. `country` and `telecode` carry no
/// NOT NULL constraint; the decoder enforces `country` instead.
pub const PLACE_TABLE_DDL: &str = "CREATE TABLE IF NOT EXISTS place (
    country text,
    city text NULL,
    telecode integer
);";

/// Create the `place` table unless it already exists.
///
/// # Errors
/// Returns `PlaceStoreError::SchemaError` if the DDL fails (bad SQL,
/// missing privileges, lost connection).
pub async fn ensure_schema(session: &Session) -> Result<(), PlaceStoreError> {
    session
        .execute_batch(PLACE_TABLE_DDL)
        .await
        .map_err(|e| PlaceStoreError::SchemaError(format!("create table place: {e}")))?;
    info!("schema ready");
    Ok(())
}
