//! Names shared by the user-scoped taxonomies (tags and ingredients).

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;

use super::DomainError;

/// Maximum length of a tag or ingredient name, in characters.
pub const LABEL_NAME_MAX_LENGTH: usize = 255;

/// Validation errors for label names.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LabelValidationError {
    /// The name was blank after trimming.
    #[error("name must not be empty")]
    EmptyName,
    /// The name exceeded [`LABEL_NAME_MAX_LENGTH`].
    #[error("name must be at most {max} characters")]
    NameTooLong {
        /// Permitted length in characters.
        max: usize,
    },
}

impl LabelValidationError {
    /// Stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyName => "empty_name",
            Self::NameTooLong { .. } => "name_too_long",
        }
    }
}

impl From<LabelValidationError> for DomainError {
    fn from(err: LabelValidationError) -> Self {
        Self::invalid_request(err.to_string())
            .with_details(json!({ "field": "name", "code": err.code() }))
    }
}

/// Trimmed, non-empty name of a tag or ingredient.
///
/// # Examples
/// ```
/// use recipe_backend::domain::LabelName;
///
/// let name = LabelName::new("  Vegan ").expect("valid name");
/// assert_eq!(name.as_str(), "Vegan");
/// assert!(LabelName::new("   ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct LabelName(String);

impl LabelName {
    /// Validate and trim a raw name.
    ///
    /// # Errors
    ///
    /// Returns [`LabelValidationError`] when the trimmed name is empty or
    /// longer than [`LABEL_NAME_MAX_LENGTH`] characters.
    pub fn new(raw: impl AsRef<str>) -> Result<Self, LabelValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(LabelValidationError::EmptyName);
        }
        if trimmed.chars().count() > LABEL_NAME_MAX_LENGTH {
            return Err(LabelValidationError::NameTooLong {
                max: LABEL_NAME_MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the validated name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for LabelName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for LabelName {
    type Error = LabelValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<LabelName> for String {
    fn from(value: LabelName) -> Self {
        value.0
    }
}

/// Generate a user-owned label entity together with its identifier newtype.
///
/// Tags and ingredients share one shape: a database id, the owning user and a
/// [`LabelName`]. Entities display as their name.
macro_rules! define_label {
    (
        $(#[$id_meta:meta])*
        pub struct $id:ident;

        $(#[$entity_meta:meta])*
        pub struct $entity:ident;
    ) => {
        $(#[$id_meta])*
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        #[serde(transparent)]
        pub struct $id(i64);

        impl $id {
            /// Wrap a raw database identifier.
            #[must_use]
            pub const fn new(id: i64) -> Self {
                Self(id)
            }

            /// The raw database identifier.
            #[must_use]
            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl ::std::fmt::Display for $id {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        $(#[$entity_meta])*
        #[derive(Debug, Clone, PartialEq, Eq)]
        pub struct $entity {
            id: $id,
            owner: $crate::domain::UserId,
            name: $crate::domain::LabelName,
        }

        impl $entity {
            /// Assemble an entity from stored parts.
            #[must_use]
            pub const fn new(
                id: $id,
                owner: $crate::domain::UserId,
                name: $crate::domain::LabelName,
            ) -> Self {
                Self { id, owner, name }
            }

            /// Database identifier.
            #[must_use]
            pub const fn id(&self) -> $id {
                self.id
            }

            /// The user the entry belongs to.
            #[must_use]
            pub const fn owner(&self) -> $crate::domain::UserId {
                self.owner
            }

            /// Display name.
            #[must_use]
            pub const fn name(&self) -> &$crate::domain::LabelName {
                &self.name
            }
        }

        impl ::std::fmt::Display for $entity {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                ::std::fmt::Display::fmt(&self.name, f)
            }
        }
    };
}

pub(crate) use define_label;
