//! Demonstration data-access layer over a single `PostgreSQL` table.
//!
//! A [`Session`] is opened from [`DbSettings`] (normally read from the
//! environment), [`schema::ensure_schema`] creates the `place` table, and
//! [`PlaceStore`] runs the writes and reads against it. Every operation
//! returns its own `Result`; deciding which failures abort is left to the
//! caller (see [`PlaceStoreError::is_fatal`]).

pub mod config;
pub mod error;
pub mod model;
pub mod prelude;
pub mod schema;
pub mod session;
pub mod store;

#[cfg(feature = "test-utils")]
pub mod test_utils;

pub use config::{DatabaseDialect, DbSettings};
pub use error::PlaceStoreError;
pub use model::Place;
pub use session::Session;
pub use store::{PlaceStore, PreparedPlaceQuery};
