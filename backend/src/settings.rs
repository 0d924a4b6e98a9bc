//! Application settings loaded via OrthoConfig.
//!
//! Every value can be supplied as a `RECIPE_*` environment variable or as a
//! command-line flag, for example `RECIPE_DATABASE_URL` or `--bind-address`.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::Deserialize;

use crate::domain::RetryPolicy;

const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8080";
const DEFAULT_MEDIA_ROOT: &str = "media";
const DEFAULT_POOL_MAX_SIZE: u32 = 10;
const DEFAULT_DB_WAIT_INTERVAL_MS: u64 = 1000;
const DEFAULT_RUN_MIGRATIONS: bool = true;

/// Errors raised when settings are present but unusable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No database URL was configured.
    #[error("RECIPE_DATABASE_URL must be set")]
    MissingDatabaseUrl,
    /// The bind address is not a socket address.
    #[error("invalid bind address {value:?}")]
    InvalidBindAddress {
        /// The rejected address.
        value: String,
    },
}

/// Runtime configuration shared by the server and the helper binaries.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "RECIPE")]
pub struct AppSettings {
    /// Postgres connection URL.
    pub database_url: Option<String>,
    /// Socket address the HTTP server listens on.
    pub bind_address: Option<String>,
    /// Directory uploaded images are written under.
    pub media_root: Option<PathBuf>,
    /// Maximum connections held by the pool.
    pub pool_max_size: Option<u32>,
    /// Pause between database readiness pings, in milliseconds.
    pub db_wait_interval_ms: Option<u64>,
    /// Give up waiting for the database after this many pings.
    pub db_wait_max_attempts: Option<u32>,
    /// Apply pending migrations at startup. Defaults to `true`.
    pub run_migrations: Option<bool>,
}

impl AppSettings {
    /// The configured database URL.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::MissingDatabaseUrl`] when unset or blank.
    pub fn database_url(&self) -> Result<&str, SettingsError> {
        self.database_url
            .as_deref()
            .filter(|url| !url.trim().is_empty())
            .ok_or(SettingsError::MissingDatabaseUrl)
    }

    /// The listen address, defaulting to `0.0.0.0:8080`.
    ///
    /// # Errors
    ///
    /// Returns [`SettingsError::InvalidBindAddress`] when it does not parse.
    pub fn bind_address(&self) -> Result<SocketAddr, SettingsError> {
        let raw = self.bind_address.as_deref().unwrap_or(DEFAULT_BIND_ADDRESS);
        raw.parse().map_err(|_| SettingsError::InvalidBindAddress {
            value: raw.to_owned(),
        })
    }

    /// Media directory, defaulting to `media`.
    #[must_use]
    pub fn media_root(&self) -> PathBuf {
        self.media_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(DEFAULT_MEDIA_ROOT))
    }

    /// Pool size, defaulting to 10.
    #[must_use]
    pub fn pool_max_size(&self) -> u32 {
        self.pool_max_size.unwrap_or(DEFAULT_POOL_MAX_SIZE)
    }

    /// Whether startup applies pending migrations before serving.
    #[must_use]
    pub fn run_migrations(&self) -> bool {
        self.run_migrations.unwrap_or(DEFAULT_RUN_MIGRATIONS)
    }

    /// Polling schedule used while waiting for the database.
    #[must_use]
    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy {
            interval: Duration::from_millis(
                self.db_wait_interval_ms
                    .unwrap_or(DEFAULT_DB_WAIT_INTERVAL_MS),
            ),
            max_attempts: self.db_wait_max_attempts,
        }
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for settings parsing.

    use super::*;
    use std::ffi::OsString;

    use env_lock::lock_env;
    use rstest::rstest;

    const VARS: [&str; 7] = [
        "RECIPE_DATABASE_URL",
        "RECIPE_BIND_ADDRESS",
        "RECIPE_MEDIA_ROOT",
        "RECIPE_POOL_MAX_SIZE",
        "RECIPE_DB_WAIT_INTERVAL_MS",
        "RECIPE_DB_WAIT_MAX_ATTEMPTS",
        "RECIPE_RUN_MIGRATIONS",
    ];

    fn load_from_empty_args() -> AppSettings {
        AppSettings::load_from_iter([OsString::from("recipe-backend")])
            .expect("config should load")
    }

    #[rstest]
    fn defaults_apply_when_nothing_is_set() {
        let _guard = lock_env(VARS.map(|name| (name, None::<String>)));

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url(), Err(SettingsError::MissingDatabaseUrl));
        assert_eq!(
            settings.bind_address(),
            Ok("0.0.0.0:8080".parse().expect("valid address"))
        );
        assert_eq!(settings.media_root(), PathBuf::from("media"));
        assert_eq!(settings.pool_max_size(), 10);
        assert_eq!(
            settings.retry_policy(),
            RetryPolicy {
                interval: Duration::from_secs(1),
                max_attempts: None,
            }
        );
        assert!(settings.run_migrations());
    }

    #[rstest]
    fn environment_overrides_are_respected() {
        let _guard = lock_env([
            (
                "RECIPE_DATABASE_URL",
                Some("postgres://app:secret@db/app".to_owned()),
            ),
            ("RECIPE_BIND_ADDRESS", Some("127.0.0.1:9000".to_owned())),
            ("RECIPE_MEDIA_ROOT", Some("/vol/web/media".to_owned())),
            ("RECIPE_POOL_MAX_SIZE", Some("4".to_owned())),
            ("RECIPE_DB_WAIT_INTERVAL_MS", Some("250".to_owned())),
            ("RECIPE_DB_WAIT_MAX_ATTEMPTS", Some("12".to_owned())),
            ("RECIPE_RUN_MIGRATIONS", Some("false".to_owned())),
        ]);

        let settings = load_from_empty_args();
        assert_eq!(settings.database_url(), Ok("postgres://app:secret@db/app"));
        assert_eq!(
            settings.bind_address(),
            Ok("127.0.0.1:9000".parse().expect("valid address"))
        );
        assert_eq!(settings.media_root(), PathBuf::from("/vol/web/media"));
        assert_eq!(settings.pool_max_size(), 4);
        assert_eq!(settings.retry_policy().interval, Duration::from_millis(250));
        assert_eq!(settings.retry_policy().max_attempts, Some(12));
        assert!(!settings.run_migrations());
    }

    #[rstest]
    #[case(None, true)]
    #[case(Some("true"), true)]
    #[case(Some("false"), false)]
    fn migrations_run_unless_disabled(#[case] raw: Option<&str>, #[case] expected: bool) {
        let _guard = lock_env([("RECIPE_RUN_MIGRATIONS", raw.map(str::to_owned))]);

        assert_eq!(load_from_empty_args().run_migrations(), expected);
    }

    #[rstest]
    fn malformed_bind_address_is_reported() {
        let _guard = lock_env([("RECIPE_BIND_ADDRESS", Some("not-an-address".to_owned()))]);

        let settings = load_from_empty_args();
        assert_eq!(
            settings.bind_address(),
            Err(SettingsError::InvalidBindAddress {
                value: "not-an-address".to_owned(),
            })
        );
    }
}
