//! User accounts.
//!
//! A [`User`] composes three independent values: a normalised [`Email`]
//! identity, [`Credentials`] holding the password hash, and [`Permissions`]
//! holding the role flags.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use zeroize::Zeroizing;

use super::DomainError;

mod email;
mod password;

pub use email::{EMAIL_MAX_LENGTH, Email};
pub use password::{HashingPolicy, PASSWORD_MIN_LENGTH, PasswordDigest, PasswordHashError};

/// Maximum length of a display name, in characters.
pub const DISPLAY_NAME_MAX_LENGTH: usize = 255;

/// Validation errors for user input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserValidationError {
    /// No email was supplied.
    MissingEmail,
    /// The email lacks a local part, an `@` or a domain.
    InvalidEmail,
    /// The email exceeded [`EMAIL_MAX_LENGTH`].
    EmailTooLong {
        /// Permitted length in characters.
        max: usize,
    },
    /// The display name exceeded [`DISPLAY_NAME_MAX_LENGTH`].
    DisplayNameTooLong {
        /// Permitted length in characters.
        max: usize,
    },
    /// The password is shorter than [`PASSWORD_MIN_LENGTH`].
    PasswordTooShort {
        /// Required length in characters.
        min: usize,
    },
}

impl UserValidationError {
    /// Payload field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::MissingEmail | Self::InvalidEmail | Self::EmailTooLong { .. } => "email",
            Self::DisplayNameTooLong { .. } => "name",
            Self::PasswordTooShort { .. } => "password",
        }
    }

    /// Stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::MissingEmail => "missing_email",
            Self::InvalidEmail => "invalid_email",
            Self::EmailTooLong { .. } => "email_too_long",
            Self::DisplayNameTooLong { .. } => "name_too_long",
            Self::PasswordTooShort { .. } => "password_too_short",
        }
    }
}

impl fmt::Display for UserValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingEmail => write!(f, "users must have an email address"),
            Self::InvalidEmail => write!(f, "email must look like local@domain"),
            Self::EmailTooLong { max } => write!(f, "email must be at most {max} characters"),
            Self::DisplayNameTooLong { max } => {
                write!(f, "name must be at most {max} characters")
            }
            Self::PasswordTooShort { min } => {
                write!(f, "password must be at least {min} characters")
            }
        }
    }
}

impl std::error::Error for UserValidationError {}

impl From<UserValidationError> for DomainError {
    fn from(err: UserValidationError) -> Self {
        Self::invalid_request(err.to_string())
            .with_details(json!({ "field": err.field(), "code": err.code() }))
    }
}

/// Check a password chosen by an end user against the minimum length.
///
/// # Errors
///
/// [`UserValidationError::PasswordTooShort`] below [`PASSWORD_MIN_LENGTH`]
/// characters.
pub fn validate_new_password(password: &str) -> Result<(), UserValidationError> {
    if password.chars().count() < PASSWORD_MIN_LENGTH {
        return Err(UserValidationError::PasswordTooShort {
            min: PASSWORD_MIN_LENGTH,
        });
    }
    Ok(())
}

/// Database-assigned user identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(i64);

impl UserId {
    /// Wrap a raw identifier.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }

    /// Raw identifier value.
    #[must_use]
    pub const fn get(self) -> i64 {
        self.0
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Free-form name shown for a user. May be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DisplayName(String);

impl DisplayName {
    /// Trim and length-check a display name.
    ///
    /// # Errors
    ///
    /// [`UserValidationError::DisplayNameTooLong`] past
    /// [`DISPLAY_NAME_MAX_LENGTH`] characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, UserValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.chars().count() > DISPLAY_NAME_MAX_LENGTH {
            return Err(UserValidationError::DisplayNameTooLong {
                max: DISPLAY_NAME_MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the trimmed name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl TryFrom<String> for DisplayName {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DisplayName> for String {
    fn from(value: DisplayName) -> Self {
        value.0
    }
}

/// Password material attached to an account.
///
/// An account without a digest has an unusable password: it exists, but
/// password authentication always fails for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    password: Option<PasswordDigest>,
}

impl Credentials {
    /// Credentials that can never authenticate.
    #[must_use]
    pub const fn unusable() -> Self {
        Self { password: None }
    }

    /// Credentials backed by an existing digest.
    #[must_use]
    pub const fn with_digest(digest: PasswordDigest) -> Self {
        Self {
            password: Some(digest),
        }
    }

    /// Hash a plaintext password, or produce unusable credentials for `None`.
    ///
    /// # Errors
    ///
    /// [`PasswordHashError::Hash`] when the hasher rejects the input.
    pub fn from_plaintext(
        password: Option<&str>,
        policy: &HashingPolicy,
    ) -> Result<Self, PasswordHashError> {
        password.map_or_else(
            || Ok(Self::unusable()),
            |plain| PasswordDigest::hash(plain, policy).map(Self::with_digest),
        )
    }

    /// Stored hash, absent for unusable credentials.
    #[must_use]
    pub const fn password_digest(&self) -> Option<&PasswordDigest> {
        self.password.as_ref()
    }

    /// Whether password authentication can ever succeed.
    #[must_use]
    pub const fn has_usable_password(&self) -> bool {
        self.password.is_some()
    }

    /// Verify a candidate password. Always false for unusable credentials.
    #[must_use]
    pub fn check_password(&self, candidate: &str) -> bool {
        self.password
            .as_ref()
            .is_some_and(|digest| digest.verify(candidate))
    }
}

/// Role flags attached to an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Permissions {
    /// Inactive accounts cannot authenticate.
    pub is_active: bool,
    /// Staff may use the administrative tooling.
    pub is_staff: bool,
    /// Superusers hold every permission.
    pub is_superuser: bool,
}

impl Permissions {
    /// Flags for an account created through `create_superuser`.
    #[must_use]
    pub const fn superuser() -> Self {
        Self {
            is_active: true,
            is_staff: true,
            is_superuser: true,
        }
    }
}

impl Default for Permissions {
    fn default() -> Self {
        Self {
            is_active: true,
            is_staff: false,
            is_superuser: false,
        }
    }
}

/// Validated account data awaiting an identifier from the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewUser {
    /// Normalised login address.
    pub email: Email,
    /// Display name, possibly empty.
    pub name: DisplayName,
    /// Password hash, if any.
    pub credentials: Credentials,
    /// Role flags.
    pub permissions: Permissions,
}

/// Persisted user account.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{
///     Credentials, DisplayName, Email, NewUser, Permissions, User, UserId,
/// };
///
/// let user = User::from_new(
///     UserId::new(7),
///     NewUser {
///         email: Email::parse("cook@example.com").expect("valid email"),
///         name: DisplayName::default(),
///         credentials: Credentials::unusable(),
///         permissions: Permissions::default(),
///     },
/// );
/// assert!(user.is_active());
/// assert!(!user.check_password("anything"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    id: UserId,
    email: Email,
    name: DisplayName,
    credentials: Credentials,
    permissions: Permissions,
}

impl User {
    /// Attach a store-assigned identifier to validated account data.
    #[must_use]
    pub fn from_new(id: UserId, new_user: NewUser) -> Self {
        let NewUser {
            email,
            name,
            credentials,
            permissions,
        } = new_user;
        Self {
            id,
            email,
            name,
            credentials,
            permissions,
        }
    }

    /// Store-assigned identifier.
    #[must_use]
    pub const fn id(&self) -> UserId {
        self.id
    }

    /// Login address.
    #[must_use]
    pub const fn email(&self) -> &Email {
        &self.email
    }

    /// Display name.
    #[must_use]
    pub const fn name(&self) -> &DisplayName {
        &self.name
    }

    /// Password material.
    #[must_use]
    pub const fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Role flags.
    #[must_use]
    pub const fn permissions(&self) -> Permissions {
        self.permissions
    }

    /// Whether the account may authenticate at all.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.permissions.is_active
    }

    /// Verify a candidate password against the stored hash.
    #[must_use]
    pub fn check_password(&self, candidate: &str) -> bool {
        self.credentials.check_password(candidate)
    }

    /// Replace the login address.
    #[must_use]
    pub fn with_email(mut self, email: Email) -> Self {
        self.email = email;
        self
    }

    /// Replace the display name.
    #[must_use]
    pub fn with_name(mut self, name: DisplayName) -> Self {
        self.name = name;
        self
    }

    /// Replace the password material.
    #[must_use]
    pub fn with_credentials(mut self, credentials: Credentials) -> Self {
        self.credentials = credentials;
        self
    }
}

impl fmt::Display for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.email.as_str())
    }
}

/// Raw input for account creation.
///
/// The email stays unvalidated here so that account creation itself reports
/// a missing address, whatever the entry point.
#[derive(Clone, Default)]
pub struct UserRegistration {
    /// Address as supplied; validated during creation.
    pub email: Option<String>,
    /// Plaintext password; `None` creates an unusable password.
    pub password: Option<Zeroizing<String>>,
    /// Optional display name.
    pub name: Option<String>,
    /// Role flags for the new account.
    pub permissions: Permissions,
}

impl UserRegistration {
    /// Registration with an email and password and default extra fields.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: Some(email.into()),
            password: Some(Zeroizing::new(password.into())),
            ..Self::default()
        }
    }

    /// Set the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the role flags.
    #[must_use]
    pub const fn with_permissions(mut self, permissions: Permissions) -> Self {
        self.permissions = permissions;
        self
    }
}

impl fmt::Debug for UserRegistration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserRegistration")
            .field("email", &self.email)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .field("name", &self.name)
            .field("permissions", &self.permissions)
            .finish()
    }
}

/// Changes a user may make to their own profile. `None` leaves a field as is.
#[derive(Clone, Default)]
pub struct ProfileUpdate {
    /// New login address.
    pub email: Option<Email>,
    /// New display name.
    pub name: Option<DisplayName>,
    /// New plaintext password, hashed before storage.
    pub password: Option<Zeroizing<String>>,
}

impl ProfileUpdate {
    /// Whether the update changes nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.email.is_none() && self.name.is_none() && self.password.is_none()
    }
}

impl fmt::Debug for ProfileUpdate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProfileUpdate")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("password", &self.password.as_ref().map(|_| "***"))
            .finish()
    }
}

#[cfg(test)]
mod tests;
