use std::pin::pin;
use std::process::ExitCode;

use clap::Parser;
use futures_util::TryStreamExt;
use place_store::prelude::*;
use tracing::{Level, error, info, warn};

const LOOKUP_TELECODE: i32 = 852;
const TELECODE_THRESHOLD: i32 = 50;
const NAMES_LIMIT: i64 = 10;
const PREPARED_SQL: &str = "SELECT * FROM place WHERE telecode = $1";
const PREPARED_TELECODE: i32 = 65;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Create the place table, seed it, and run each read pattern once"
)]
struct Args {
    #[command(flatten)]
    db: DbSettings,

    /// Maximum tracing level written to stderr
    #[arg(long, default_value = "info")]
    log_level: Level,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_max_level(args.log_level)
        .init();

    let settings_json =
        serde_json::to_string_pretty(&args.db.redacted()).unwrap_or_else(|_| "{}".to_string());
    info!("settings: {}", settings_json);

    match run(&args.db).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %err, "aborting");
            eprintln!("fatal: {err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(settings: &DbSettings) -> Result<(), PlaceStoreError> {
    let session = Session::connect(settings).await?;

    ensure_schema(&session).await?;
    println!("**************");
    println!("table place is ready");
    println!("**************");

    let store = PlaceStore::new(&session);
    let written = store.seed().await?;
    println!("inserted {written} places");

    println!("All places:");
    if let Some(count) = non_fatal("all places", print_all(&store).await)? {
        println!("({count} rows)");
    }

    if let Some(code) = non_fatal(
        "single row",
        store.query_single_by_telecode(LOOKUP_TELECODE).await,
    )? {
        println!("Telecode : {code}");
    }

    if let Some(place) = non_fatal("limit 1", store.get_first().await)? {
        println!("Limit 1: {place}");
    }

    if let Some(places) = non_fatal(
        "telecode filter",
        store
            .select_where_telecode_greater_than(TELECODE_THRESHOLD)
            .await,
    )? {
        println!("Places with telecode > {TELECODE_THRESHOLD}");
        for place in &places {
            println!("{place}");
        }
    }

    if let Some(count) = non_fatal("count", store.count_all().await)? {
        println!("Count : {count}");
    }

    if let Some(names) = non_fatal("names", store.select_names_limit(NAMES_LIMIT).await)? {
        println!("Names (at most {NAMES_LIMIT}): {names:?}");
    }

    if let Some(prepared) = non_fatal("prepare", store.prepare(PREPARED_SQL).await)? {
        if let Some(row) = non_fatal(
            "prepared row",
            prepared.query_one(&[&PREPARED_TELECODE]).await,
        )? {
            match row {
                Some(place) => println!("prepared row : {place}"),
                None => println!("prepared row : no place with telecode {PREPARED_TELECODE}"),
            }
        }
    }

    Ok(())
}

/// Stream the whole table to stdout, returning how many rows were printed.
async fn print_all(store: &PlaceStore<'_>) -> Result<usize, PlaceStoreError> {
    let mut rows = pin!(store.stream_all().await?);
    let mut printed = 0;
    while let Some(place) = rows.try_next().await? {
        println!("{place}");
        printed += 1;
    }
    Ok(printed)
}

/// Report a read failure and keep going; setup and write failures still abort.
fn non_fatal<T>(
    what: &str,
    result: Result<T, PlaceStoreError>,
) -> Result<Option<T>, PlaceStoreError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_fatal() => Err(err),
        Err(err) => {
            warn!(error = %err, "{what} failed");
            println!("{what}: error: {err}");
            Ok(None)
        }
    }
}
