//! Port abstraction for user persistence adapters and their errors.
use async_trait::async_trait;

use crate::domain::{Email, NewUser, User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-supplied description of the failure.
            message: String,
        } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-supplied description of the failure.
            message: String,
        } => "user repository query failed: {message}",
        /// The unique constraint on the email column rejected the write.
        DuplicateEmail {
            /// The rejected address.
            email: String,
        } => "a user with email {email} already exists",
    }
}

/// Storage of user accounts.
///
/// Email uniqueness is enforced by the store itself; adapters report a
/// violated constraint as [`UserPersistenceError::DuplicateEmail`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new account and return it with its assigned identifier.
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError>;

    /// Fetch a user by identifier.
    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Fetch a user by normalised email.
    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError>;

    /// Overwrite the mutable columns of an existing account.
    ///
    /// Returns `false` when no row has the user's identifier.
    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError>;
}
