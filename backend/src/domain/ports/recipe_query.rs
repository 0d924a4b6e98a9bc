//! Driving port for recipe reads.

use async_trait::async_trait;

use crate::domain::{DomainError, Recipe, RecipeFilter, RecipeId, UserId};

/// Recipe read use-cases, scoped to the acting user.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    /// The owner's recipes matching `filter`, newest first.
    async fn list(
        &self,
        owner: UserId,
        filter: RecipeFilter,
    ) -> Result<Vec<Recipe>, DomainError>;

    /// A single recipe; `not_found` when missing or owned by someone else.
    async fn get(&self, owner: UserId, id: RecipeId) -> Result<Recipe, DomainError>;
}
