//! Authentication primitives: login credentials and API tokens.
//!
//! Inbound adapters validate raw strings through these constructors before a
//! handler talks to a port. Token keys are only ever persisted as digests.

use std::fmt;

use rand::RngCore;
use rand::rngs::OsRng;
use sha2::{Digest, Sha256};
use zeroize::Zeroizing;

/// Number of random bytes behind a token key.
const TOKEN_BYTES: usize = 20;

/// Domain error returned when login payload values are invalid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginValidationError {
    /// Email was missing or blank once trimmed.
    EmptyEmail,
    /// Password was blank.
    EmptyPassword,
}

impl fmt::Display for LoginValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyEmail => write!(f, "email must not be empty"),
            Self::EmptyPassword => write!(f, "password must not be empty"),
        }
    }
}

impl std::error::Error for LoginValidationError {}

/// Validated login credentials used by authentication services.
///
/// ## Invariants
/// - `email` is trimmed and must not be empty after trimming.
/// - `password` is required to be non-empty but retains caller-provided
///   whitespace to avoid surprising credential comparisons.
///
/// # Examples
/// ```
/// use recipe_backend::domain::LoginCredentials;
///
/// let creds = LoginCredentials::try_from_parts(" cook@example.com ", "pass123").unwrap();
/// assert_eq!(creds.email(), "cook@example.com");
/// assert_eq!(creds.password(), "pass123");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginCredentials {
    email: String,
    password: Zeroizing<String>,
}

impl LoginCredentials {
    /// Construct credentials from raw email/password inputs.
    ///
    /// # Errors
    ///
    /// [`LoginValidationError`] when either value is blank.
    pub fn try_from_parts(email: &str, password: &str) -> Result<Self, LoginValidationError> {
        let normalized = email.trim();
        if normalized.is_empty() {
            return Err(LoginValidationError::EmptyEmail);
        }

        if password.is_empty() {
            return Err(LoginValidationError::EmptyPassword);
        }

        Ok(Self {
            email: normalized.to_owned(),
            password: Zeroizing::new(password.to_owned()),
        })
    }

    /// Email as typed by the caller, trimmed.
    #[must_use]
    pub fn email(&self) -> &str {
        self.email.as_str()
    }

    /// Password string provided by the caller.
    #[must_use]
    pub fn password(&self) -> &str {
        self.password.as_str()
    }
}

/// Reasons a presented token key is rejected before any lookup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenFormatError {
    /// Wrong length or a non-hex character.
    #[error("token must be {expected} hexadecimal characters")]
    Malformed {
        /// Required key length.
        expected: usize,
    },
}

/// Bearer key issued on login and presented as `Authorization: Token <key>`.
///
/// Keys are 40 lowercase hexadecimal characters drawn from the OS random
/// number generator.
#[derive(Clone, PartialEq, Eq)]
pub struct AuthToken(Zeroizing<String>);

impl AuthToken {
    /// Length of an encoded key.
    pub const LENGTH: usize = TOKEN_BYTES * 2;

    /// Draw a fresh random key.
    #[must_use]
    pub fn generate() -> Self {
        let mut bytes = [0_u8; TOKEN_BYTES];
        OsRng.fill_bytes(&mut bytes);
        Self(Zeroizing::new(hex::encode(bytes)))
    }

    /// Validate a key presented by a client.
    ///
    /// # Errors
    ///
    /// [`TokenFormatError::Malformed`] unless the trimmed key is exactly
    /// [`AuthToken::LENGTH`] hex characters.
    pub fn parse(raw: &str) -> Result<Self, TokenFormatError> {
        let candidate = raw.trim();
        if candidate.len() != Self::LENGTH || !candidate.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(TokenFormatError::Malformed {
                expected: Self::LENGTH,
            });
        }
        Ok(Self(Zeroizing::new(candidate.to_ascii_lowercase())))
    }

    /// Key to hand back to the client.
    #[must_use]
    pub fn expose(&self) -> &str {
        self.0.as_str()
    }

    /// Digest under which the key is stored.
    #[must_use]
    pub fn digest(&self) -> TokenDigest {
        TokenDigest(hex::encode(Sha256::digest(self.0.as_bytes())))
    }
}

impl fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("AuthToken(..)")
    }
}

/// SHA-256 digest of a token key, hex encoded.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenDigest(String);

impl TokenDigest {
    /// Wrap a digest read back from storage.
    #[must_use]
    pub fn from_stored(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Hex-encoded digest as persisted.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}
