//! Normalised email addresses.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::UserValidationError;

/// Maximum stored length of an email address, in characters.
pub const EMAIL_MAX_LENGTH: usize = 255;

/// Email address used as the login identifier.
///
/// ## Invariants
/// - Surrounding whitespace is removed and no whitespace remains inside.
/// - Split at the last `@`, both the local part and the domain are non-empty.
/// - The domain is lowercased; the local part keeps its original casing
///   because mail servers are free to treat it case-sensitively.
/// - At most [`EMAIL_MAX_LENGTH`] characters.
///
/// # Examples
/// ```
/// use recipe_backend::domain::Email;
///
/// let email = Email::parse("Chef.Anna@Example.COM").expect("valid email");
/// assert_eq!(email.as_str(), "Chef.Anna@example.com");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    /// Validate and normalise a raw email address.
    ///
    /// # Errors
    ///
    /// [`UserValidationError`] for blank, malformed or overlong input.
    pub fn parse(raw: &str) -> Result<Self, UserValidationError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(UserValidationError::MissingEmail);
        }
        if trimmed.chars().any(char::is_whitespace) {
            return Err(UserValidationError::InvalidEmail);
        }
        let Some((local, domain)) = trimmed.rsplit_once('@') else {
            return Err(UserValidationError::InvalidEmail);
        };
        if local.is_empty() || domain.is_empty() {
            return Err(UserValidationError::InvalidEmail);
        }

        let normalised = format!("{local}@{}", domain.to_lowercase());
        if normalised.chars().count() > EMAIL_MAX_LENGTH {
            return Err(UserValidationError::EmailTooLong {
                max: EMAIL_MAX_LENGTH,
            });
        }
        Ok(Self(normalised))
    }

    /// Borrow the normalised address.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The part before the final `@`.
    #[must_use]
    pub fn local_part(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(local, _)| local)
    }

    /// The lowercased part after the final `@`.
    #[must_use]
    pub fn domain(&self) -> &str {
        self.0.rsplit_once('@').map_or("", |(_, domain)| domain)
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl TryFrom<String> for Email {
    type Error = UserValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Email> for String {
    fn from(value: Email) -> Self {
        value.0
    }
}
