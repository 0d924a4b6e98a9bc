//! Port for recipe persistence.
use async_trait::async_trait;

use crate::domain::{
    ImagePath, IngredientId, Recipe, RecipeFields, RecipeFilter, RecipeId, TagId, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-supplied description of the failure.
            message: String,
        } => "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-supplied description of the failure.
            message: String,
        } => "recipe repository query failed: {message}",
    }
}

/// Field and association values written by [`RecipeRepository::update`].
///
/// `None` association lists leave the stored set untouched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeUpdate {
    /// Scalar values to write.
    pub fields: RecipeFields,
    /// Replacement tag set, if any.
    pub tag_ids: Option<Vec<TagId>>,
    /// Replacement ingredient set, if any.
    pub ingredient_ids: Option<Vec<IngredientId>>,
}

/// Storage of recipes and their tag/ingredient associations.
///
/// Every method is scoped to `owner`. A recipe owned by someone else is
/// indistinguishable from a missing one. Association identifiers are expected
/// to be distinct and already checked for ownership by the caller.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Insert a recipe and its associations atomically.
    async fn insert(
        &self,
        owner: UserId,
        fields: &RecipeFields,
        tag_ids: &[TagId],
        ingredient_ids: &[IngredientId],
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// The owner's recipes matching `filter`, newest first.
    async fn list(
        &self,
        owner: UserId,
        filter: &RecipeFilter,
    ) -> Result<Vec<Recipe>, RecipeRepositoryError>;

    /// A single recipe with its associations.
    async fn find(
        &self,
        owner: UserId,
        id: RecipeId,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Write fields and replace any supplied association sets atomically.
    async fn update(
        &self,
        owner: UserId,
        id: RecipeId,
        update: &RecipeUpdate,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Record the stored image path.
    async fn set_image(
        &self,
        owner: UserId,
        id: RecipeId,
        image: &ImagePath,
    ) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// Delete the recipe and its association rows. Returns whether it existed.
    async fn delete(&self, owner: UserId, id: RecipeId) -> Result<bool, RecipeRepositoryError>;
}
