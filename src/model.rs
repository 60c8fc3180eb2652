use serde::{Deserialize, Serialize};
use tokio_postgres::Row;

use crate::error::PlaceStoreError;

/// One row of the `place` table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Place {
    pub country: String,
    /// NULL for most seed rows
    pub city: Option<String>,
    /// International dialing code; neither unique nor a key
    pub telecode: i32,
}

impl Place {
    #[must_use]
    pub fn new(country: impl Into<String>, city: Option<&str>, telecode: i32) -> Self {
        Self {
            country: country.into(),
            city: city.map(str::to_string),
            telecode,
        }
    }
}

impl std::fmt::Display for Place {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} | {} | {}",
            self.country,
            self.city.as_deref().unwrap_or("NULL"),
            self.telecode
        )
    }
}

/// Columns are looked up by name, so `SELECT *` and explicit column lists
/// decode the same way.
impl TryFrom<&Row> for Place {
    type Error = PlaceStoreError;

    fn try_from(row: &Row) -> Result<Self, Self::Error> {
        Ok(Self {
            country: decode(row, "country")?,
            city: decode(row, "city")?,
            telecode: decode(row, "telecode")?,
        })
    }
}

/// Decode a single named column, mapping driver failures (missing column,
/// NULL into a non-optional type, type mismatch) to `DecodeError`.
pub(crate) fn decode<'a, T>(row: &'a Row, column: &str) -> Result<T, PlaceStoreError>
where
    T: tokio_postgres::types::FromSql<'a>,
{
    row.try_get(column)
        .map_err(|e| PlaceStoreError::DecodeError(format!("column `{column}`: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_marks_null_city() {
        let place = Place::new("Hong Kong", None, 852);
        assert_eq!(place.to_string(), "Hong Kong | NULL | 852");
    }

    #[test]
    fn display_includes_city() {
        let place = Place::new("South Africa", Some("Johannesburg"), 27);
        assert_eq!(place.to_string(), "South Africa | Johannesburg | 27");
    }

    #[test]
    fn serializes_null_city_as_json_null() {
        let place = Place::new("Singapore", None, 65);
        let json = serde_json::to_value(&place).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"country": "Singapore", "city": null, "telecode": 65})
        );
    }
}
