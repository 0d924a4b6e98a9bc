//! Driving ports for the tag and ingredient registries.

use async_trait::async_trait;

use super::LabelListing;
use crate::domain::{DomainError, Ingredient, LabelName, Tag, UserId};

/// Tag use-cases, scoped to the acting user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagCatalog: Send + Sync {
    /// Create a tag owned by `owner`.
    async fn create_tag(&self, owner: UserId, name: LabelName) -> Result<Tag, DomainError>;

    /// The owner's tags, by name descending.
    async fn list_tags(
        &self,
        owner: UserId,
        listing: LabelListing,
    ) -> Result<Vec<Tag>, DomainError>;
}

/// Ingredient use-cases, scoped to the acting user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientCatalog: Send + Sync {
    /// Create an ingredient owned by `owner`.
    async fn create_ingredient(
        &self,
        owner: UserId,
        name: LabelName,
    ) -> Result<Ingredient, DomainError>;

    /// The owner's ingredients, by name descending.
    async fn list_ingredients(
        &self,
        owner: UserId,
        listing: LabelListing,
    ) -> Result<Vec<Ingredient>, DomainError>;
}
