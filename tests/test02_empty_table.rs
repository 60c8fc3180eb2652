#![cfg(feature = "test-utils")]

use std::pin::pin;

use futures_util::TryStreamExt;
use place_store::prelude::*;
use place_store::test_utils::{setup_postgres_embedded, stop_postgres_embedded};

#[test]
fn test02_reads_on_empty_table() -> Result<(), Box<dyn std::error::Error>> {
    let pg = setup_postgres_embedded("places_empty")?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let session = Session::connect(&pg.settings).await?;
        ensure_schema(&session).await?;
        let store = PlaceStore::new(&session);

        assert_eq!(store.count_all().await?, 0);
        assert!(store.query_all().await?.is_empty());
        assert!(store.select_where_telecode_greater_than(0).await?.is_empty());

        let first = store.get_first().await;
        assert!(matches!(first, Err(PlaceStoreError::NotFound(_))));
        assert!(!first.unwrap_err().is_fatal());

        let mut rows = pin!(store.stream_all().await?);
        assert!(rows.try_next().await?.is_none());

        Ok::<(), PlaceStoreError>(())
    })?;

    stop_postgres_embedded(pg);
    Ok(())
}

#[test]
fn test02_insert_shapes_control_city() -> Result<(), Box<dyn std::error::Error>> {
    let pg = setup_postgres_embedded("places_insert")?;

    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(async {
        let session = Session::connect(&pg.settings).await?;
        ensure_schema(&session).await?;
        let store = PlaceStore::new(&session);

        assert_eq!(store.insert_place("Japan", None, 81).await?, 1);
        assert_eq!(store.get_first().await?, Place::new("Japan", None, 81));

        session.execute_batch("DELETE FROM place;").await?;
        store.insert_place("Japan", Some("Tokyo"), 81).await?;
        assert_eq!(
            store.get_first().await?,
            Place::new("Japan", Some("Tokyo"), 81)
        );

        Ok::<(), PlaceStoreError>(())
    })?;

    stop_postgres_embedded(pg);
    Ok(())
}
