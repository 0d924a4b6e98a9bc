//! Driving port for token login and request authentication.
//!
//! In hexagonal terms this is a *driving* port: inbound adapters exchange
//! credentials for a token and resolve presented tokens without knowing the
//! backing infrastructure.

use async_trait::async_trait;

use crate::domain::{AuthToken, DomainError, LoginCredentials, UserId};

/// Token issuance and resolution.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoginService: Send + Sync {
    /// Validate credentials and issue a fresh token, revoking the previous one.
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthToken, DomainError>;

    /// Resolve a presented token to an active user.
    async fn resolve(&self, token: &AuthToken) -> Result<UserId, DomainError>;
}
