//! Password hashing with argon2id.
//!
//! Plaintext passwords never leave this module in any other form than a PHC
//! string. Verification reads the cost parameters from the stored hash, so
//! changing [`HashingPolicy`] only affects newly hashed passwords.

use std::fmt;

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};

/// Minimum length accepted for passwords chosen through the API.
pub const PASSWORD_MIN_LENGTH: usize = 5;

/// Errors raised while producing or loading password hashes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PasswordHashError {
    /// The hasher rejected the input or its parameters.
    #[error("failed to hash password: {message}")]
    Hash {
        /// Hasher diagnostic.
        message: String,
    },
    /// A stored hash could not be parsed as a PHC string.
    #[error("stored password hash is malformed")]
    Malformed,
}

/// Cost parameters used when hashing new passwords.
#[derive(Debug, Clone, Default)]
pub struct HashingPolicy {
    params: Params,
}

impl HashingPolicy {
    /// Policy with the smallest parameters argon2 accepts.
    ///
    /// Only suitable for tests, where the default cost makes suites crawl.
    #[must_use]
    pub fn fast() -> Self {
        let params = Params::new(
            Params::MIN_M_COST,
            Params::MIN_T_COST,
            Params::MIN_P_COST,
            None,
        )
        .unwrap_or_default();
        Self { params }
    }

    fn hasher(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }
}

/// Salted argon2id hash in PHC string format.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordDigest(String);

impl PasswordDigest {
    /// Hash `password` with a fresh random salt.
    ///
    /// # Errors
    ///
    /// [`PasswordHashError::Hash`] when argon2 rejects the input.
    pub fn hash(password: &str, policy: &HashingPolicy) -> Result<Self, PasswordHashError> {
        let salt = SaltString::generate(&mut OsRng);
        policy
            .hasher()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| Self(hash.to_string()))
            .map_err(|err| PasswordHashError::Hash {
                message: err.to_string(),
            })
    }

    /// Wrap a hash loaded from storage.
    ///
    /// The string must parse as PHC and carry both a salt and a hash output;
    /// anything else could never verify a password.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashError::Malformed`] when either check fails.
    pub fn from_stored(stored: impl Into<String>) -> Result<Self, PasswordHashError> {
        let phc = stored.into();
        let parsed = PasswordHash::new(&phc).map_err(|_| PasswordHashError::Malformed)?;
        if parsed.salt.is_none() || parsed.hash.is_none() {
            return Err(PasswordHashError::Malformed);
        }
        Ok(Self(phc))
    }

    /// Compare a candidate password against the hash.
    #[must_use]
    pub fn verify(&self, candidate: &str) -> bool {
        let Ok(parsed) = PasswordHash::new(&self.0) else {
            return false;
        };
        Argon2::default()
            .verify_password(candidate.as_bytes(), &parsed)
            .is_ok()
    }

    /// PHC string suitable for persistence.
    #[must_use]
    pub fn as_phc(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Debug for PasswordDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordDigest(..)")
    }
}
