//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{
    Credentials, DisplayName, Email, NewUser, PasswordDigest, Permissions, User, UserId,
};

use super::diesel_error_mapping::{
    map_basic_diesel_error, map_basic_pool_error, unique_violation_constraint,
};
use super::models::{NewUserRow, UserRow, UserUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::users;

const EMAIL_UNIQUE_CONSTRAINT: &str = "users_email_key";

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a repository drawing connections from `pool`.
    #[must_use]
    pub const fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

/// Map a failed write, recognising the email uniqueness constraint.
fn map_write_error(error: diesel::result::Error, email: &Email) -> UserPersistenceError {
    if unique_violation_constraint(&error) == Some(EMAIL_UNIQUE_CONSTRAINT) {
        return UserPersistenceError::duplicate_email(email.as_str());
    }
    map_diesel_error(error)
}

/// Rebuild a domain user from a stored row.
///
/// Stored values were validated on the way in, so a failure here means the
/// table was edited out of band.
fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    let email = Email::parse(&row.email)
        .map_err(|err| UserPersistenceError::query(format!("stored email invalid: {err}")))?;
    let name = DisplayName::new(&row.name)
        .map_err(|err| UserPersistenceError::query(format!("stored name invalid: {err}")))?;
    let credentials = match row.password {
        Some(phc) => PasswordDigest::from_stored(phc)
            .map(Credentials::with_digest)
            .map_err(|err| {
                UserPersistenceError::query(format!("stored password hash invalid: {err}"))
            })?,
        None => Credentials::unusable(),
    };
    Ok(User::from_new(
        UserId::new(row.id),
        NewUser {
            email,
            name,
            credentials,
            permissions: Permissions {
                is_active: row.is_active,
                is_staff: row.is_staff,
                is_superuser: row.is_superuser,
            },
        },
    ))
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn insert(&self, user: &NewUser) -> Result<User, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            email: user.email.as_str(),
            name: user.name.as_str(),
            password: user.credentials.password_digest().map(PasswordDigest::as_phc),
            is_active: user.permissions.is_active,
            is_staff: user.permissions.is_staff,
            is_superuser: user.permissions.is_superuser,
        };

        let id: i64 = diesel::insert_into(users::table)
            .values(&row)
            .returning(users::id)
            .get_result(&mut conn)
            .await
            .map_err(|err| map_write_error(err, &user.email))?;

        Ok(User::from_new(UserId::new(id), user.clone()))
    }

    async fn find_by_id(&self, id: UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::id.eq(id.get()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = users::table
            .filter(users::email.eq(email.as_str()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn update(&self, user: &User) -> Result<bool, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let permissions = user.permissions();
        let changes = UserUpdate {
            email: user.email().as_str(),
            name: user.name().as_str(),
            password: user
                .credentials()
                .password_digest()
                .map(PasswordDigest::as_phc),
            is_active: permissions.is_active,
            is_staff: permissions.is_staff,
            is_superuser: permissions.is_superuser,
        };

        let updated = diesel::update(users::table.filter(users::id.eq(user.id().get())))
            .set((&changes, users::updated_at.eq(diesel::dsl::now)))
            .execute(&mut conn)
            .await
            .map_err(|err| map_write_error(err, user.email()))?;
        Ok(updated > 0)
    }
}
