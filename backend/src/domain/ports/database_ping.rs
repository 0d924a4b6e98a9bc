//! Port used by the startup readiness loop.
use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Failure to reach the database.
    pub enum PingError {
        /// The database refused or dropped the connection.
        Unreachable {
            /// Adapter-supplied description of the failure.
            message: String,
        } => "database unreachable: {message}",
    }
}

/// Cheap connectivity check against the database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DatabasePing: Send + Sync {
    /// Succeed once the database accepts a trivial query.
    async fn ping(&self) -> Result<(), PingError>;
}
