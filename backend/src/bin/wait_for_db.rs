//! Block until Postgres accepts connections.
//!
//! Exits successfully once `SELECT 1` answers, or with an error once
//! `RECIPE_DB_WAIT_MAX_ATTEMPTS` pings have failed.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use color_eyre::eyre::{Result, eyre};
use ortho_config::OrthoConfig;
use recipe_backend::domain::wait_for_database;
use recipe_backend::outbound::persistence::DieselDatabasePing;
use recipe_backend::settings::AppSettings;
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
#[expect(clippy::print_stdout, reason = "reports the attempt count to the caller")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).try_init().map_err(|err| eyre!(err))?;

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let database = DieselDatabasePing::new(settings.database_url()?);
    let attempts = wait_for_database(&database, settings.retry_policy())
        .await
        .map_err(|err| eyre!("{}", err.message()))?;
    println!("database available after {attempts} attempt(s)");
    Ok(())
}
