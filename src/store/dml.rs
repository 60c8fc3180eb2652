use tracing::{debug, info};

use crate::error::PlaceStoreError;

use super::{PlaceStore, SEED_PLACES};

const INSERT_WITHOUT_CITY: &str = "INSERT INTO place (country, telecode) VALUES ($1, $2);";
const INSERT_WITH_CITY: &str = "INSERT INTO place (country, city, telecode) VALUES ($1, $2, $3);";

impl PlaceStore<'_> {
    /// Insert one place. Without a city the column is left out of the
    /// statement entirely and stays NULL.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::WriteError` if the insert fails.
    pub async fn insert_place(
        &self,
        country: &str,
        city: Option<&str>,
        telecode: i32,
    ) -> Result<u64, PlaceStoreError> {
        debug!(country, city, telecode, "insert place");
        let result = match city {
            None => {
                self.client()
                    .execute(INSERT_WITHOUT_CITY, &[&country, &telecode])
                    .await
            }
            Some(city) => {
                self.client()
                    .execute(INSERT_WITH_CITY, &[&country, &city, &telecode])
                    .await
            }
        };

        result.map_err(|e| PlaceStoreError::WriteError(format!("insert place {country}: {e}")))
    }

    /// Insert the three fixed seed rows.
    ///
    /// There is no existence check and no unique constraint, so every call
    /// appends another copy of the rows.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::WriteError` from the first insert that fails;
    /// rows inserted before it stay committed.
    pub async fn seed(&self) -> Result<u64, PlaceStoreError> {
        let mut written = 0;
        for (country, city, telecode) in SEED_PLACES {
            written += self.insert_place(country, city, telecode).await?;
        }
        info!(rows = written, "seeded place table");
        Ok(written)
    }
}
