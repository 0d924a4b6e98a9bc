//! Backend entry-point: waits for Postgres, applies migrations and serves the
//! REST API with its OpenAPI docs.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use actix_web::web;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use recipe_backend::domain::wait_for_database;
use recipe_backend::inbound::http::health::HealthState;
use recipe_backend::outbound::persistence::{
    DbPool, DieselDatabasePing, PoolConfig, run_migrations,
};
use recipe_backend::settings::AppSettings;

use server::{ServerConfig, create_server};

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }
}

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing();

    let settings = AppSettings::load().map_err(|err| eyre!("failed to load settings: {err}"))?;
    let database_url = settings.database_url()?.to_owned();
    let bind_addr = settings.bind_address()?;

    let database = DieselDatabasePing::new(database_url.clone());
    wait_for_database(&database, settings.retry_policy())
        .await
        .map_err(|err| eyre!("{}", err.message()))?;

    if settings.run_migrations() {
        let applied = run_migrations(&database_url)
            .await
            .wrap_err("failed to apply migrations")?;
        info!(applied, "migrations up to date");
    }

    let pool = DbPool::new(PoolConfig::new(database_url).with_max_size(settings.pool_max_size()))
        .await
        .wrap_err("failed to build database pool")?;

    let health_state = web::Data::new(HealthState::new());
    let config = ServerConfig::new(bind_addr, pool, settings.media_root());
    let server = create_server(health_state.clone(), config).wrap_err("failed to start server")?;
    info!(%bind_addr, "listening");

    server.await.wrap_err("server terminated with an error")?;
    health_state.mark_unhealthy();
    Ok(())
}
