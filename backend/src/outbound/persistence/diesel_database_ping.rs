//! `DatabasePing` adapter opening a dedicated connection per ping.
//!
//! The ping runs before the pool exists, so it establishes its own
//! connection instead of checking one out.

use async_trait::async_trait;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{DatabasePing, PingError};

/// Ping issuing `SELECT 1` against the configured database.
#[derive(Debug, Clone)]
pub struct DieselDatabasePing {
    database_url: String,
}

impl DieselDatabasePing {
    /// Ping the database at `database_url`.
    #[must_use]
    pub fn new(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
        }
    }
}

#[async_trait]
impl DatabasePing for DieselDatabasePing {
    async fn ping(&self) -> Result<(), PingError> {
        let mut conn = AsyncPgConnection::establish(&self.database_url)
            .await
            .map_err(|err| PingError::unreachable(err.to_string()))?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(|err| PingError::unreachable(err.to_string()))?;
        Ok(())
    }
}
