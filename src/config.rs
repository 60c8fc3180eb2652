use clap::{Args, ValueEnum};
use deadpool_postgres::{Config as PgConfig, PoolConfig, SslMode};
use serde::Serialize;

use crate::error::PlaceStoreError;

/// SQL driver selected by the `DIALECT` setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseDialect {
    /// `PostgreSQL` over the native wire protocol (tokio-postgres)
    #[value(alias = "postgresql")]
    Postgres,
}

/// Connection settings for the place database.
///
/// Every value is read from the environment first; the long flags exist for
/// ad-hoc runs. Fields stay optional here so that a missing value is reported
/// by [`DbSettings::validate`] with the name of the setting, instead of
/// failing somewhere inside the driver.
#[derive(Clone, Default, Args)]
pub struct DbSettings {
    /// Database driver/dialect identifier
    #[arg(long, env = "DIALECT", value_enum, ignore_case = true)]
    pub dialect: Option<DatabaseDialect>,

    /// Database host
    #[arg(long, env = "HOST")]
    pub host: Option<String>,

    /// Database port
    #[arg(long, env = "DBPORT")]
    pub port: Option<u16>,

    /// Database user
    #[arg(long, env = "USER")]
    pub user: Option<String>,

    /// Database name
    #[arg(long = "dbname", env = "NAME")]
    pub dbname: Option<String>,

    /// Database password
    #[arg(long, env = "PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

impl std::fmt::Debug for DbSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DbSettings")
            .field("dialect", &self.dialect)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("dbname", &self.dbname)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Loggable view of [`DbSettings`] with the password masked.
#[derive(Debug, Serialize)]
pub struct RedactedSettings<'a> {
    pub dialect: Option<DatabaseDialect>,
    pub host: Option<&'a str>,
    pub port: Option<u16>,
    pub user: Option<&'a str>,
    pub dbname: Option<&'a str>,
    pub password: Option<&'static str>,
}

/// Validated connection parameters, borrowed from [`DbSettings`].
struct Resolved<'a> {
    host: &'a str,
    port: u16,
    user: &'a str,
    dbname: &'a str,
    password: &'a str,
}

impl DbSettings {
    /// Check that a dialect was chosen and that every connection value is present.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ConfigError` naming the first missing setting.
    pub fn validate(&self) -> Result<(), PlaceStoreError> {
        self.resolve().map(|_| ())
    }

    /// Render the libpq-style connection descriptor for these settings.
    ///
    /// The descriptor contains the password; do not log it.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ConfigError` if a setting is missing.
    pub fn connection_string(&self) -> Result<String, PlaceStoreError> {
        let r = self.resolve()?;
        Ok(format!(
            "host={} user={} dbname={} sslmode=disable password={} port={}",
            r.host, r.user, r.dbname, r.password, r.port
        ))
    }

    /// Build the deadpool-postgres configuration for a single-connection session.
    ///
    /// # Errors
    /// Returns `PlaceStoreError::ConfigError` if a setting is missing.
    pub fn to_pg_config(&self) -> Result<PgConfig, PlaceStoreError> {
        let r = self.resolve()?;
        let mut cfg = PgConfig::new();
        cfg.host = Some(r.host.to_string());
        cfg.port = Some(r.port);
        cfg.user = Some(r.user.to_string());
        cfg.dbname = Some(r.dbname.to_string());
        cfg.password = Some(r.password.to_string());
        cfg.ssl_mode = Some(SslMode::Disable);
        cfg.pool = Some(PoolConfig::new(1));
        Ok(cfg)
    }

    #[must_use]
    pub fn redacted(&self) -> RedactedSettings<'_> {
        RedactedSettings {
            dialect: self.dialect,
            host: self.host.as_deref(),
            port: self.port,
            user: self.user.as_deref(),
            dbname: self.dbname.as_deref(),
            password: self.password.as_ref().map(|_| "<redacted>"),
        }
    }

    fn resolve(&self) -> Result<Resolved<'_>, PlaceStoreError> {
        let Some(DatabaseDialect::Postgres) = self.dialect else {
            return Err(PlaceStoreError::ConfigError(
                "dialect is required (DIALECT)".to_string(),
            ));
        };

        let host = required("host (HOST)", self.host.as_deref())?;
        let port = self.port.ok_or_else(|| {
            PlaceStoreError::ConfigError("port is required (DBPORT)".to_string())
        })?;
        let user = required("user (USER)", self.user.as_deref())?;
        let dbname = required("dbname (NAME)", self.dbname.as_deref())?;
        // An empty password is valid for trust auth, but the value must be set.
        let password = self.password.as_deref().ok_or_else(|| {
            PlaceStoreError::ConfigError("password is required (PASSWORD)".to_string())
        })?;

        Ok(Resolved {
            host,
            port,
            user,
            dbname,
            password,
        })
    }
}

fn required<'a>(label: &str, value: Option<&'a str>) -> Result<&'a str, PlaceStoreError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PlaceStoreError::ConfigError(format!("{label} is required"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        db: DbSettings,
    }

    fn complete() -> DbSettings {
        DbSettings {
            dialect: Some(DatabaseDialect::Postgres),
            host: Some("localhost".into()),
            port: Some(5432),
            user: Some("places".into()),
            dbname: Some("atlas".into()),
            password: Some("s3cret".into()),
        }
    }

    #[test]
    fn connection_string_matches_libpq_layout() {
        assert_eq!(
            complete().connection_string().unwrap(),
            "host=localhost user=places dbname=atlas sslmode=disable password=s3cret port=5432"
        );
    }

    #[test]
    fn missing_host_is_a_config_error() {
        let mut settings = complete();
        settings.host = None;
        let err = settings.validate().unwrap_err();
        assert!(matches!(err, PlaceStoreError::ConfigError(ref m) if m.contains("HOST")));
    }

    #[test]
    fn blank_dbname_is_a_config_error() {
        let mut settings = complete();
        settings.dbname = Some("   ".into());
        assert!(matches!(
            settings.validate(),
            Err(PlaceStoreError::ConfigError(_))
        ));
    }

    #[test]
    fn missing_dialect_is_a_config_error() {
        let mut settings = complete();
        settings.dialect = None;
        let err = settings.to_pg_config().unwrap_err();
        assert!(err.is_fatal());
        assert!(err.to_string().contains("DIALECT"));
    }

    #[test]
    fn empty_password_is_accepted() {
        let mut settings = complete();
        settings.password = Some(String::new());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn pg_config_is_single_connection_without_tls() {
        let cfg = complete().to_pg_config().unwrap();
        assert_eq!(cfg.host.as_deref(), Some("localhost"));
        assert_eq!(cfg.port, Some(5432));
        assert_eq!(cfg.dbname.as_deref(), Some("atlas"));
        assert_eq!(cfg.pool.as_ref().map(|p| p.max_size), Some(1));
        assert!(matches!(cfg.ssl_mode, Some(SslMode::Disable)));
    }

    #[test]
    fn password_never_shows_in_debug_or_json() {
        let settings = complete();
        let debug = format!("{settings:?}");
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("<redacted>"));

        let json = serde_json::to_string(&settings.redacted()).unwrap();
        assert!(!json.contains("s3cret"));
        assert!(json.contains("\"dialect\":\"postgres\""));
    }

    #[test]
    fn flags_parse_into_settings() {
        let cli = TestCli::try_parse_from([
            "place-store",
            "--dialect",
            "postgresql",
            "--host",
            "db.internal",
            "--port",
            "6543",
            "--user",
            "u",
            "--dbname",
            "d",
            "--password",
            "p",
        ])
        .unwrap();
        assert_eq!(cli.db.dialect, Some(DatabaseDialect::Postgres));
        assert_eq!(cli.db.port, Some(6543));
        assert_eq!(cli.db.host.as_deref(), Some("db.internal"));
    }

    #[test]
    fn unknown_dialect_is_rejected() {
        let parsed = TestCli::try_parse_from(["place-store", "--dialect", "mysql"]);
        assert!(parsed.is_err());
    }
}
