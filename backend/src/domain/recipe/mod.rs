//! Recipes and their validated fields.
//!
//! A [`Recipe`] belongs to exactly one user and carries the full set of tags
//! and ingredients attached to it. Change requests are modelled explicitly:
//! [`RecipeDraft`] for creation, [`RecipePatch`] for merge updates and
//! [`RecipeReplacement`] for full replacement.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::json;
use url::Url;

use super::{DomainError, Ingredient, Tag, UserId};

mod changes;
mod filter;
mod image;
mod price;

pub use changes::{RecipeDraft, RecipePatch, RecipeReplacement};
pub use filter::RecipeFilter;
pub use image::{ImagePath, RECIPE_IMAGE_DIR, recipe_image_path};
pub use price::{PRICE_MAX_DIGITS, Price};

/// Maximum length of a recipe title, in characters.
pub const TITLE_MAX_LENGTH: usize = 255;
/// Maximum length of an external recipe link, in characters.
pub const LINK_MAX_LENGTH: usize = 255;

/// Validation errors for recipe fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RecipeValidationError {
    /// The title was blank after trimming.
    #[error("title must not be empty")]
    EmptyTitle,
    /// The title exceeded [`TITLE_MAX_LENGTH`].
    #[error("title must be at most {max} characters")]
    TitleTooLong {
        /// Permitted length in characters.
        max: usize,
    },
    /// A negative number of minutes.
    #[error("preparation time must not be negative")]
    NegativeTime,
    /// More minutes than an `INTEGER` column holds.
    #[error("preparation time must be at most {max} minutes")]
    TimeTooLarge {
        /// Largest accepted value.
        max: i64,
    },
    /// A price below zero.
    #[error("price must not be negative")]
    NegativePrice,
    /// A price with a non-zero fractional part.
    #[error("price must be a whole amount")]
    FractionalPrice,
    /// A price wider than the `NUMERIC` column.
    #[error("price must have at most {max_digits} digits")]
    PriceTooLarge {
        /// Column precision.
        max_digits: u32,
    },
    /// Not an absolute http(s) URL with a host.
    #[error("link must be an absolute http or https URL")]
    InvalidLink,
    /// The link exceeded [`LINK_MAX_LENGTH`].
    #[error("link must be at most {max} characters")]
    LinkTooLong {
        /// Permitted length in characters.
        max: usize,
    },
}

impl RecipeValidationError {
    /// Payload field the error refers to.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::EmptyTitle | Self::TitleTooLong { .. } => "title",
            Self::NegativeTime | Self::TimeTooLarge { .. } => "timeMinutes",
            Self::NegativePrice | Self::FractionalPrice | Self::PriceTooLarge { .. } => "price",
            Self::InvalidLink | Self::LinkTooLong { .. } => "link",
        }
    }

    /// Stable machine-readable code for the failure.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong { .. } => "title_too_long",
            Self::NegativeTime => "negative_time",
            Self::TimeTooLarge { .. } => "time_too_large",
            Self::NegativePrice => "negative_price",
            Self::FractionalPrice => "fractional_price",
            Self::PriceTooLarge { .. } => "price_too_large",
            Self::InvalidLink => "invalid_link",
            Self::LinkTooLong { .. } => "link_too_long",
        }
    }
}

impl From<RecipeValidationError> for DomainError {
    fn from(err: RecipeValidationError) -> Self {
        Self::invalid_request(err.to_string())
            .with_details(json!({ "field": err.field(), "code": err.code() }))
    }
}

/// Database-assigned recipe identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipeId(i64);

impl RecipeId {
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

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trimmed, non-empty recipe title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeTitle(String);

impl RecipeTitle {
    /// Trim and validate a title.
    ///
    /// # Errors
    ///
    /// [`RecipeValidationError::EmptyTitle`] or
    /// [`RecipeValidationError::TitleTooLong`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.as_ref().trim();
        if trimmed.is_empty() {
            return Err(RecipeValidationError::EmptyTitle);
        }
        if trimmed.chars().count() > TITLE_MAX_LENGTH {
            return Err(RecipeValidationError::TitleTooLong {
                max: TITLE_MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the title.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl fmt::Display for RecipeTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Preparation time in whole minutes, stored as a Postgres `INTEGER`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CookingTime(i32);

impl CookingTime {
    /// Validate a number of minutes.
    ///
    /// # Errors
    ///
    /// [`RecipeValidationError::NegativeTime`] below zero and
    /// [`RecipeValidationError::TimeTooLarge`] above `i32::MAX`.
    pub fn new(minutes: i64) -> Result<Self, RecipeValidationError> {
        if minutes < 0 {
            return Err(RecipeValidationError::NegativeTime);
        }
        i32::try_from(minutes)
            .map(Self)
            .map_err(|_| RecipeValidationError::TimeTooLarge {
                max: i64::from(i32::MAX),
            })
    }

    /// Whole minutes.
    #[must_use]
    pub const fn minutes(self) -> i32 {
        self.0
    }
}

/// Absolute http(s) link to the recipe's source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeLink(String);

impl RecipeLink {
    /// Validate an absolute http(s) URL.
    ///
    /// # Errors
    ///
    /// [`RecipeValidationError::InvalidLink`] or
    /// [`RecipeValidationError::LinkTooLong`].
    pub fn new(raw: impl AsRef<str>) -> Result<Self, RecipeValidationError> {
        let trimmed = raw.as_ref().trim();
        let url = Url::parse(trimmed).map_err(|_| RecipeValidationError::InvalidLink)?;
        if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
            return Err(RecipeValidationError::InvalidLink);
        }
        if trimmed.chars().count() > LINK_MAX_LENGTH {
            return Err(RecipeValidationError::LinkTooLong {
                max: LINK_MAX_LENGTH,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// Borrow the link as given.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Scalar recipe fields that a user edits directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeFields {
    /// Display title.
    pub title: RecipeTitle,
    /// Preparation time.
    pub time_minutes: CookingTime,
    /// Whole-unit price.
    pub price: Price,
    /// Optional source link.
    pub link: Option<RecipeLink>,
}

/// A persisted recipe with its resolved associations.
///
/// Tags and ingredients are kept sorted by identifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    id: RecipeId,
    owner: UserId,
    fields: RecipeFields,
    image: Option<ImagePath>,
    tags: Vec<Tag>,
    ingredients: Vec<Ingredient>,
}

impl Recipe {
    /// Assemble a recipe, sorting its associations by identifier.
    #[must_use]
    pub fn new(
        id: RecipeId,
        owner: UserId,
        fields: RecipeFields,
        image: Option<ImagePath>,
        mut tags: Vec<Tag>,
        mut ingredients: Vec<Ingredient>,
    ) -> Self {
        tags.sort_by_key(Tag::id);
        ingredients.sort_by_key(Ingredient::id);
        Self {
            id,
            owner,
            fields,
            image,
            tags,
            ingredients,
        }
    }

    /// Database identifier.
    #[must_use]
    pub const fn id(&self) -> RecipeId {
        self.id
    }

    /// The user the recipe belongs to.
    #[must_use]
    pub const fn owner(&self) -> UserId {
        self.owner
    }

    /// Editable scalar fields.
    #[must_use]
    pub const fn fields(&self) -> &RecipeFields {
        &self.fields
    }

    /// Display title.
    #[must_use]
    pub const fn title(&self) -> &RecipeTitle {
        &self.fields.title
    }

    /// Preparation time.
    #[must_use]
    pub const fn time_minutes(&self) -> CookingTime {
        self.fields.time_minutes
    }

    /// Whole-unit price.
    #[must_use]
    pub const fn price(&self) -> &Price {
        &self.fields.price
    }

    /// Source link, if recorded.
    #[must_use]
    pub const fn link(&self) -> Option<&RecipeLink> {
        self.fields.link.as_ref()
    }

    /// Stored image path, if uploaded.
    #[must_use]
    pub const fn image(&self) -> Option<&ImagePath> {
        self.image.as_ref()
    }

    /// Attached tags, by identifier.
    #[must_use]
    pub fn tags(&self) -> &[Tag] {
        &self.tags
    }

    /// Attached ingredients, by identifier.
    #[must_use]
    pub fn ingredients(&self) -> &[Ingredient] {
        &self.ingredients
    }
}

impl fmt::Display for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.fields.title, f)
    }
}
