//! Convenient imports for common functionality.

pub use crate::config::{DatabaseDialect, DbSettings};
pub use crate::error::PlaceStoreError;
pub use crate::model::Place;
pub use crate::schema::ensure_schema;
pub use crate::session::Session;
pub use crate::store::{PlaceStore, PreparedPlaceQuery, SEED_PLACES, seed_places};
