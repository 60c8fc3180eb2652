use postgresql_embedded::PostgreSQL;

use super::SHARED_RUNTIME;
use crate::config::{DatabaseDialect, DbSettings};
use crate::session::Session;

/// Represents a running embedded `PostgreSQL` instance.
pub struct EmbeddedPostgres {
    pub postgresql: PostgreSQL,
    pub port: u16,
    /// Settings that reach the freshly created database
    pub settings: DbSettings,
}

/// Start an embedded `PostgreSQL` server and create an empty database named `dbname`.
///
/// # Errors
/// Returns an error if the server cannot be set up or started, if the database
/// cannot be created, or if the post-start connectivity check fails.
pub fn setup_postgres_embedded(
    dbname: &str,
) -> Result<EmbeddedPostgres, Box<dyn std::error::Error>> {
    SHARED_RUNTIME.block_on(async {
        let mut postgresql = PostgreSQL::default();

        // Setup PostgreSQL binaries (bundled, so no download conflicts)
        postgresql.setup().await?;
        postgresql.start().await?;
        postgresql.create_database(dbname).await?;

        let server = postgresql.settings();
        let port = server.port;
        let settings = DbSettings {
            dialect: Some(DatabaseDialect::Postgres),
            host: Some(server.host.clone()),
            port: Some(port),
            user: Some(server.username.clone()),
            dbname: Some(dbname.to_string()),
            password: Some(server.password.clone()),
        };

        // Quick connection test
        let session = Session::connect(&settings).await?;
        session.ping().await?;
        drop(session);

        println!("PostgreSQL started on port {port} with database {dbname}");

        Ok(EmbeddedPostgres {
            postgresql,
            port,
            settings,
        })
    })
}

/// Stop a previously started embedded `PostgreSQL` instance.
pub fn stop_postgres_embedded(postgres: EmbeddedPostgres) {
    let EmbeddedPostgres { postgresql, .. } = postgres;
    SHARED_RUNTIME.block_on(async move {
        let _ = postgresql.stop().await;
    });
}
