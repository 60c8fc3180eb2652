//! Data-access operations on the `place` table.
//!
//! Split by statement kind:
//! - dml: inserts and the fixed seed rows
//! - select: row, struct, scalar, and slice reads
//! - prepared: statements compiled once and bound many times
//!
//! Every statement autocommits on its own; nothing here opens a transaction.

pub mod dml;
pub mod prepared;
pub mod select;

use crate::error::PlaceStoreError;
use crate::model::Place;
use crate::session::Session;

pub use prepared::PreparedPlaceQuery;

/// Rows written by [`PlaceStore::seed`], in insertion order.
pub const SEED_PLACES: [(&str, Option<&str>, i32); 3] = [
    ("Hong Kong", None, 852),
    ("Singapore", None, 65),
    ("South Africa", Some("Johannesburg"), 27),
];

/// The seed rows as [`Place`] values.
#[must_use]
pub fn seed_places() -> Vec<Place> {
    SEED_PLACES
        .iter()
        .map(|(country, city, telecode)| Place::new(*country, *city, *telecode))
        .collect()
}

/// Operations against the `place` table, bound to one session.
pub struct PlaceStore<'s> {
    session: &'s Session,
}

impl<'s> PlaceStore<'s> {
    #[must_use]
    pub fn new(session: &'s Session) -> Self {
        Self { session }
    }

    #[must_use]
    pub fn session(&self) -> &'s Session {
        self.session
    }

    pub(crate) fn client(&self) -> &'s tokio_postgres::Client {
        self.session.client()
    }
}

fn execution_error(label: &'static str) -> impl Fn(tokio_postgres::Error) -> PlaceStoreError {
    move |e| PlaceStoreError::ExecutionError(format!("{label}: {e}"))
}
