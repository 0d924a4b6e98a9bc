//! Ports for the user-scoped tag and ingredient tables.
//!
//! Both taxonomies share one error type because they share one shape: a name
//! owned by a user, optionally attached to that user's recipes.
use async_trait::async_trait;

use crate::domain::{Ingredient, IngredientId, LabelName, Tag, TagId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by tag and ingredient repository adapters.
    pub enum LabelRepositoryError {
        /// Repository connection could not be established.
        Connection {
            /// Adapter-supplied description of the failure.
            message: String,
        } => "label repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query {
            /// Adapter-supplied description of the failure.
            message: String,
        } => "label repository query failed: {message}",
    }
}

/// Listing options shared by tags and ingredients.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LabelListing {
    /// Keep only entries attached to at least one recipe.
    pub assigned_only: bool,
}

/// Storage of tags. Every method is scoped to `owner`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagRepository: Send + Sync {
    /// Persist a new tag for `owner`.
    async fn create(&self, owner: UserId, name: &LabelName) -> Result<Tag, LabelRepositoryError>;

    /// The owner's tags ordered by name, descending.
    async fn list(
        &self,
        owner: UserId,
        listing: LabelListing,
    ) -> Result<Vec<Tag>, LabelRepositoryError>;

    /// The subset of `ids` that exists and belongs to `owner`.
    async fn find_owned(
        &self,
        owner: UserId,
        ids: &[TagId],
    ) -> Result<Vec<Tag>, LabelRepositoryError>;
}

/// Storage of ingredients. Every method is scoped to `owner`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientRepository: Send + Sync {
    /// Persist a new ingredient for `owner`.
    async fn create(
        &self,
        owner: UserId,
        name: &LabelName,
    ) -> Result<Ingredient, LabelRepositoryError>;

    /// The owner's ingredients ordered by name, descending.
    async fn list(
        &self,
        owner: UserId,
        listing: LabelListing,
    ) -> Result<Vec<Ingredient>, LabelRepositoryError>;

    /// The subset of `ids` that exists and belongs to `owner`.
    async fn find_owned(
        &self,
        owner: UserId,
        ids: &[IngredientId],
    ) -> Result<Vec<Ingredient>, LabelRepositoryError>;
}
