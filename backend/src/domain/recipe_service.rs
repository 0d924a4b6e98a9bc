//! Recipe services.
//!
//! [`RecipeService`] implements the [`RecipeCommand`] and [`RecipeQuery`]
//! driving ports. Association lists are deduplicated and checked against the
//! owner's tags and ingredients before anything is written, so a recipe can
//! never reference another user's labels.

use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::label_service::map_label_error;
use crate::domain::ports::{
    ImageStore, ImageStoreError, ImageUpload, IngredientRepository, RecipeCommand, RecipeQuery,
    RecipeRepository, RecipeRepositoryError, RecipeUpdate, TagRepository,
};
use crate::domain::{
    DomainError, IngredientId, Recipe, RecipeDraft, RecipeFilter, RecipeId, RecipePatch,
    RecipeReplacement, TagId, UserId, recipe_image_path,
};

fn map_recipe_error(error: RecipeRepositoryError) -> DomainError {
    match error {
        RecipeRepositoryError::Connection { message } => {
            DomainError::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            DomainError::internal(format!("recipe repository error: {message}"))
        }
    }
}

fn map_image_error(error: ImageStoreError) -> DomainError {
    DomainError::internal(error.to_string())
}

fn recipe_not_found(id: RecipeId) -> DomainError {
    DomainError::not_found(format!("recipe {id} not found"))
}

/// Drop repeated identifiers, keeping first-seen order.
fn dedupe<T: Ord + Copy>(ids: Vec<T>) -> Vec<T> {
    let mut seen = BTreeSet::new();
    ids.into_iter().filter(|id| seen.insert(*id)).collect()
}

/// Identifiers in `requested` that are absent from `found`.
fn missing_ids<T: Ord + Copy>(requested: &[T], found: impl IntoIterator<Item = T>) -> Vec<T> {
    let present: BTreeSet<T> = found.into_iter().collect();
    requested
        .iter()
        .copied()
        .filter(|id| !present.contains(id))
        .collect()
}

fn unknown_labels(field: &str, code: &str, ids: Vec<i64>) -> DomainError {
    DomainError::invalid_request(format!("unknown {field} for this user"))
        .with_details(json!({ "field": field, "code": code, "ids": ids }))
}

/// Recipe use-cases over the recipe, label and image ports.
#[derive(Clone)]
pub struct RecipeService<R, T, I, S> {
    recipes: Arc<R>,
    tags: Arc<T>,
    ingredients: Arc<I>,
    images: Arc<S>,
}

impl<R, T, I, S> RecipeService<R, T, I, S> {
    /// Wire the service to its driven ports.
    #[must_use]
    pub const fn new(recipes: Arc<R>, tags: Arc<T>, ingredients: Arc<I>, images: Arc<S>) -> Self {
        Self {
            recipes,
            tags,
            ingredients,
            images,
        }
    }
}

impl<R, T, I, S> RecipeService<R, T, I, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: ImageStore,
{
    async fn owned_tags(
        &self,
        owner: UserId,
        requested: Vec<TagId>,
    ) -> Result<Vec<TagId>, DomainError> {
        let ids = dedupe(requested);
        if ids.is_empty() {
            return Ok(ids);
        }
        let found = self
            .tags
            .find_owned(owner, &ids)
            .await
            .map_err(map_label_error)?;
        let missing = missing_ids(&ids, found.iter().map(|tag| tag.id()));
        if !missing.is_empty() {
            return Err(unknown_labels(
                "tags",
                "unknown_tag",
                missing.into_iter().map(TagId::get).collect(),
            ));
        }
        Ok(ids)
    }

    async fn owned_ingredients(
        &self,
        owner: UserId,
        requested: Vec<IngredientId>,
    ) -> Result<Vec<IngredientId>, DomainError> {
        let ids = dedupe(requested);
        if ids.is_empty() {
            return Ok(ids);
        }
        let found = self
            .ingredients
            .find_owned(owner, &ids)
            .await
            .map_err(map_label_error)?;
        let missing = missing_ids(&ids, found.iter().map(|ingredient| ingredient.id()));
        if !missing.is_empty() {
            return Err(unknown_labels(
                "ingredients",
                "unknown_ingredient",
                missing.into_iter().map(IngredientId::get).collect(),
            ));
        }
        Ok(ids)
    }

    async fn load(&self, owner: UserId, id: RecipeId) -> Result<Recipe, DomainError> {
        self.recipes
            .find(owner, id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| recipe_not_found(id))
    }
}

#[async_trait]
impl<R, T, I, S> RecipeCommand for RecipeService<R, T, I, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: ImageStore,
{
    async fn create(&self, owner: UserId, draft: RecipeDraft) -> Result<Recipe, DomainError> {
        let RecipeDraft {
            fields,
            tag_ids: requested_tags,
            ingredient_ids: requested_ingredients,
        } = draft;
        let tag_ids = self.owned_tags(owner, requested_tags).await?;
        let ingredient_ids = self
            .owned_ingredients(owner, requested_ingredients)
            .await?;

        let recipe = self
            .recipes
            .insert(owner, &fields, &tag_ids, &ingredient_ids)
            .await
            .map_err(map_recipe_error)?;
        info!(
            user_id = %owner,
            recipe_id = %recipe.id(),
            tags = tag_ids.len(),
            ingredients = ingredient_ids.len(),
            "recipe created"
        );
        Ok(recipe)
    }

    async fn update_partial(
        &self,
        owner: UserId,
        id: RecipeId,
        patch: RecipePatch,
    ) -> Result<Recipe, DomainError> {
        let current = self.load(owner, id).await?;
        let fields = patch.apply_to(current.fields());
        let tag_ids = match patch.tag_ids {
            Some(ids) => Some(self.owned_tags(owner, ids).await?),
            None => None,
        };
        let ingredient_ids = match patch.ingredient_ids {
            Some(ids) => Some(self.owned_ingredients(owner, ids).await?),
            None => None,
        };

        let update = RecipeUpdate {
            fields,
            tag_ids,
            ingredient_ids,
        };
        let recipe = self
            .recipes
            .update(owner, id, &update)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| recipe_not_found(id))?;
        debug!(user_id = %owner, recipe_id = %id, "recipe updated");
        Ok(recipe)
    }

    async fn update_full(
        &self,
        owner: UserId,
        id: RecipeId,
        replacement: RecipeReplacement,
    ) -> Result<Recipe, DomainError> {
        self.update_partial(owner, id, RecipePatch::from(replacement))
            .await
    }

    async fn attach_image(
        &self,
        owner: UserId,
        id: RecipeId,
        upload: ImageUpload,
    ) -> Result<Recipe, DomainError> {
        if upload.bytes.is_empty() {
            return Err(DomainError::invalid_request("image upload must not be empty")
                .with_details(json!({ "field": "image", "code": "empty_image" })));
        }
        // Check ownership before touching the media directory.
        self.load(owner, id).await?;

        let path = recipe_image_path(Uuid::new_v4(), &upload.filename);
        self.images
            .store(&path, &upload.bytes)
            .await
            .map_err(map_image_error)?;
        let recipe = self
            .recipes
            .set_image(owner, id, &path)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| recipe_not_found(id))?;
        info!(
            user_id = %owner,
            recipe_id = %id,
            image = %path,
            bytes = upload.bytes.len(),
            "recipe image stored"
        );
        Ok(recipe)
    }

    async fn delete(&self, owner: UserId, id: RecipeId) -> Result<(), DomainError> {
        let existed = self
            .recipes
            .delete(owner, id)
            .await
            .map_err(map_recipe_error)?;
        if !existed {
            return Err(recipe_not_found(id));
        }
        info!(user_id = %owner, recipe_id = %id, "recipe deleted");
        Ok(())
    }
}

#[async_trait]
impl<R, T, I, S> RecipeQuery for RecipeService<R, T, I, S>
where
    R: RecipeRepository,
    T: TagRepository,
    I: IngredientRepository,
    S: ImageStore,
{
    async fn list(
        &self,
        owner: UserId,
        filter: RecipeFilter,
    ) -> Result<Vec<Recipe>, DomainError> {
        self.recipes
            .list(owner, &filter)
            .await
            .map_err(map_recipe_error)
    }

    async fn get(&self, owner: UserId, id: RecipeId) -> Result<Recipe, DomainError> {
        self.load(owner, id).await
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
