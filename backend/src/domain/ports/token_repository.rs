//! Port for API token storage.
use async_trait::async_trait;

use crate::domain::{TokenDigest, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by token repository adapters.
    pub enum TokenRepositoryError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-supplied description of the failure.
            message: String,
        } => "token repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-supplied description of the failure.
            message: String,
        } => "token repository query failed: {message}",
    }
}

/// Storage of token digests, at most one per user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AuthTokenRepository: Send + Sync {
    /// Store `digest` as the user's only token, discarding any previous one.
    async fn replace_for_user(
        &self,
        user_id: UserId,
        digest: &TokenDigest,
    ) -> Result<(), TokenRepositoryError>;

    /// Resolve a digest to the user it was issued to.
    async fn find_user_id(
        &self,
        digest: &TokenDigest,
    ) -> Result<Option<UserId>, TokenRepositoryError>;
}
