//! Driving port for recipe mutations.

use async_trait::async_trait;

use crate::domain::{
    DomainError, Recipe, RecipeDraft, RecipeId, RecipePatch, RecipeReplacement, UserId,
};

/// An uploaded image as received from the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageUpload {
    /// Original file name, used only for its extension.
    pub filename: String,
    /// Raw image content.
    pub bytes: Vec<u8>,
}

/// Recipe write use-cases, scoped to the acting user.
///
/// Every method reports `not_found` for recipes owned by someone else, and
/// `invalid_request` when a tag or ingredient id is unknown to the owner.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Create a recipe owned by `owner`.
    async fn create(&self, owner: UserId, draft: RecipeDraft) -> Result<Recipe, DomainError>;

    /// Merge update.
    async fn update_partial(
        &self,
        owner: UserId,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<Recipe, DomainError>;

    /// Replace update. Omitted associations are cleared.
    async fn update_full(
        &self,
        owner: UserId,
        id: RecipeId,
        replacement: RecipeReplacement,
    ) -> Result<Recipe, DomainError>;

    /// Store the image and record its path on the recipe.
    async fn attach_image(
        &self,
        owner: UserId,
        id: RecipeId,
        upload: ImageUpload,
    ) -> Result<Recipe, DomainError>;

    /// Delete the recipe and its associations.
    async fn delete(&self, owner: UserId, id: RecipeId) -> Result<(), DomainError>;
}
