//! Driving port for account management.
//!
//! Inbound adapters (HTTP handlers, the `create-superuser` binary) call this
//! port instead of touching repositories directly.

use async_trait::async_trait;

use crate::domain::{DomainError, LoginCredentials, ProfileUpdate, User, UserId, UserRegistration};

/// Account use-cases.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserAccounts: Send + Sync {
    /// Create a regular account.
    ///
    /// # Errors
    ///
    /// - `invalid_request` when the email is missing or malformed.
    /// - `conflict` when the email is already registered.
    async fn create_user(&self, registration: UserRegistration) -> Result<User, DomainError>;

    /// Create an account with the staff and superuser flags raised.
    async fn create_superuser(&self, email: &str, password: &str) -> Result<User, DomainError>;

    /// Return the active user matching the credentials.
    ///
    /// # Errors
    ///
    /// `unauthorized` for unknown emails, wrong passwords, unusable passwords
    /// and inactive accounts alike.
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, DomainError>;

    /// Load the caller's own account.
    async fn profile(&self, user_id: UserId) -> Result<User, DomainError>;

    /// Apply a merge update to the caller's own account.
    async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, DomainError>;
}
