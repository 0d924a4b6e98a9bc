//! Account and token services.
//!
//! [`AccountsService`] implements both the [`UserAccounts`] and
//! [`LoginService`] driving ports on top of the user and token repositories.
//! Password hashing and verification run on Tokio's blocking pool.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};
use zeroize::Zeroizing;

use crate::domain::ports::{
    AuthTokenRepository, LoginService, TokenRepositoryError, UserAccounts, UserPersistenceError,
    UserRepository,
};
use crate::domain::{
    AuthToken, Credentials, DisplayName, DomainError, Email, HashingPolicy, LoginCredentials,
    NewUser, Permissions, ProfileUpdate, User, UserId, UserRegistration,
};

/// Account management and token login.
#[derive(Clone)]
pub struct AccountsService<U, T> {
    users: Arc<U>,
    tokens: Arc<T>,
    hashing: HashingPolicy,
}

impl<U, T> AccountsService<U, T> {
    /// Create a service hashing new passwords with the default argon2 cost.
    #[must_use]
    pub fn new(users: Arc<U>, tokens: Arc<T>) -> Self {
        Self {
            users,
            tokens,
            hashing: HashingPolicy::default(),
        }
    }

    /// Replace the hashing policy used for new passwords.
    #[must_use]
    pub const fn with_hashing_policy(mut self, hashing: HashingPolicy) -> Self {
        self.hashing = hashing;
        self
    }
}

fn invalid_credentials() -> DomainError {
    DomainError::unauthorized("invalid credentials")
}

impl<U, T> AccountsService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    fn map_user_error(error: UserPersistenceError) -> DomainError {
        match error {
            UserPersistenceError::Connection { message } => {
                DomainError::service_unavailable(format!("user repository unavailable: {message}"))
            }
            UserPersistenceError::Query { message } => {
                DomainError::internal(format!("user repository error: {message}"))
            }
            UserPersistenceError::DuplicateEmail { .. } => {
                DomainError::conflict("a user with this email already exists")
                    .with_details(json!({ "field": "email", "code": "duplicate_email" }))
            }
        }
    }

    fn map_token_error(error: TokenRepositoryError) -> DomainError {
        match error {
            TokenRepositoryError::Connection { message } => DomainError::service_unavailable(
                format!("token repository unavailable: {message}"),
            ),
            TokenRepositoryError::Query { message } => {
                DomainError::internal(format!("token repository error: {message}"))
            }
        }
    }

    async fn hash_password(
        &self,
        password: Option<Zeroizing<String>>,
    ) -> Result<Credentials, DomainError> {
        let policy = self.hashing.clone();
        tokio::task::spawn_blocking(move || {
            Credentials::from_plaintext(password.as_deref().map(String::as_str), &policy)
        })
        .await
        .map_err(|err| DomainError::internal(format!("password hashing task failed: {err}")))?
        .map_err(|err| DomainError::internal(err.to_string()))
    }

    async fn verify_password(&self, user: &User, candidate: &str) -> Result<bool, DomainError> {
        let credentials = user.credentials().clone();
        let secret = Zeroizing::new(candidate.to_owned());
        tokio::task::spawn_blocking(move || credentials.check_password(&secret))
            .await
            .map_err(|err| {
                DomainError::internal(format!("password verification task failed: {err}"))
            })
    }

    async fn load_user(&self, user_id: UserId) -> Result<Option<User>, DomainError> {
        self.users
            .find_by_id(user_id)
            .await
            .map_err(Self::map_user_error)
    }
}

#[async_trait]
impl<U, T> UserAccounts for AccountsService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn create_user(&self, registration: UserRegistration) -> Result<User, DomainError> {
        let UserRegistration {
            email: raw_email,
            password,
            name: raw_name,
            permissions,
        } = registration;

        let email = Email::parse(raw_email.as_deref().unwrap_or_default())?;
        let name = DisplayName::new(raw_name.as_deref().unwrap_or_default())?;
        let credentials = self.hash_password(password).await?;

        let new_user = NewUser {
            email,
            name,
            credentials,
            permissions,
        };
        let user = self
            .users
            .insert(&new_user)
            .await
            .map_err(Self::map_user_error)?;
        info!(
            user_id = %user.id(),
            staff = permissions.is_staff,
            superuser = permissions.is_superuser,
            "user account created"
        );
        Ok(user)
    }

    async fn create_superuser(&self, email: &str, password: &str) -> Result<User, DomainError> {
        let registration =
            UserRegistration::new(email, password).with_permissions(Permissions::superuser());
        self.create_user(registration).await
    }

    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<User, DomainError> {
        let Ok(email) = Email::parse(credentials.email()) else {
            return Err(invalid_credentials());
        };
        let user = self
            .users
            .find_by_email(&email)
            .await
            .map_err(Self::map_user_error)?
            .ok_or_else(invalid_credentials)?;

        if !self.verify_password(&user, credentials.password()).await? {
            debug!(user_id = %user.id(), "password mismatch");
            return Err(invalid_credentials());
        }
        if !user.is_active() {
            debug!(user_id = %user.id(), "inactive account attempted login");
            return Err(invalid_credentials());
        }
        Ok(user)
    }

    async fn profile(&self, user_id: UserId) -> Result<User, DomainError> {
        self.load_user(user_id)
            .await?
            .ok_or_else(|| DomainError::not_found("user not found"))
    }

    async fn update_profile(
        &self,
        user_id: UserId,
        update: ProfileUpdate,
    ) -> Result<User, DomainError> {
        let ProfileUpdate {
            email,
            name,
            password,
        } = update;

        let mut user = self.profile(user_id).await?;
        if let Some(new_email) = email {
            user = user.with_email(new_email);
        }
        if let Some(new_name) = name {
            user = user.with_name(new_name);
        }
        if password.is_some() {
            let credentials = self.hash_password(password).await?;
            user = user.with_credentials(credentials);
        }

        let updated = self
            .users
            .update(&user)
            .await
            .map_err(Self::map_user_error)?;
        if !updated {
            return Err(DomainError::not_found("user not found"));
        }
        Ok(user)
    }
}

#[async_trait]
impl<U, T> LoginService for AccountsService<U, T>
where
    U: UserRepository,
    T: AuthTokenRepository,
{
    async fn login(&self, credentials: &LoginCredentials) -> Result<AuthToken, DomainError> {
        let user = self.authenticate(credentials).await?;
        let token = AuthToken::generate();
        self.tokens
            .replace_for_user(user.id(), &token.digest())
            .await
            .map_err(Self::map_token_error)?;
        info!(user_id = %user.id(), "auth token issued");
        Ok(token)
    }

    async fn resolve(&self, token: &AuthToken) -> Result<UserId, DomainError> {
        let user_id = self
            .tokens
            .find_user_id(&token.digest())
            .await
            .map_err(Self::map_token_error)?
            .ok_or_else(|| DomainError::unauthorized("invalid token"))?;

        match self.load_user(user_id).await? {
            Some(user) if user.is_active() => Ok(user_id),
            _ => Err(DomainError::unauthorized("user inactive or deleted")),
        }
    }
}

#[cfg(test)]
#[path = "accounts_service_tests.rs"]
mod tests;
