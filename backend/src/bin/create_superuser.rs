//! Create a privileged account from the command line.
//!
//! ```text
//! RECIPE_DATABASE_URL=postgres://... create-superuser --email admin@example.com --password s3cret
//! ```
//!
//! Connection settings come from the `RECIPE_*` environment; the command
//! line only carries the account.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::sync::Arc;

use clap::Parser;
use color_eyre::eyre::{Context, Result, eyre};
use ortho_config::OrthoConfig;
use recipe_backend::domain::AccountsService;
use recipe_backend::domain::ports::UserAccounts;
use recipe_backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselUserRepository, PoolConfig,
};
use recipe_backend::settings::AppSettings;
use zeroize::Zeroizing;

/// `create-superuser` command arguments.
#[derive(Debug, Parser)]
#[command(
    name = "create-superuser",
    about = "Create an active staff account with every permission",
    version
)]
struct CliArgs {
    /// Email address of the new account.
    #[arg(long, value_name = "email")]
    email: String,
    /// Password of the new account.
    #[arg(long, value_name = "password", env = "RECIPE_SUPERUSER_PASSWORD")]
    password: String,
}

#[tokio::main]
#[expect(clippy::print_stdout, reason = "confirms the new account to the operator")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let args = CliArgs::parse();
    let password = Zeroizing::new(args.password);

    let settings = AppSettings::load_from_iter([OsString::from("create-superuser")])
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let pool = DbPool::new(PoolConfig::new(settings.database_url()?).with_max_size(1))
        .await
        .wrap_err("failed to build database pool")?;

    let accounts = AccountsService::new(
        Arc::new(DieselUserRepository::new(pool.clone())),
        Arc::new(DieselAuthTokenRepository::new(pool)),
    );
    let user = accounts
        .create_superuser(&args.email, &password)
        .await
        .map_err(|err| eyre!("{}", err.message()))?;
    println!("created superuser {}", user.email());
    Ok(())
}
