//! Change requests for recipes.

use super::{CookingTime, Price, RecipeFields, RecipeLink, RecipeTitle};
use crate::domain::{IngredientId, TagId};

/// Everything needed to create a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    /// Scalar fields.
    pub fields: RecipeFields,
    /// Tags to attach; all must belong to the creator.
    pub tag_ids: Vec<TagId>,
    /// Ingredients to attach; all must belong to the creator.
    pub ingredient_ids: Vec<IngredientId>,
}

/// Merge update: only `Some` fields change.
///
/// For `link`, `Some(None)` clears the link while `None` leaves it alone.
/// Supplied association lists replace the whole set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipePatch {
    /// Replacement title.
    pub title: Option<RecipeTitle>,
    /// Replacement preparation time.
    pub time_minutes: Option<CookingTime>,
    /// Replacement price.
    pub price: Option<Price>,
    /// Replacement link; the inner `None` clears it.
    pub link: Option<Option<RecipeLink>>,
    /// Replacement tag set.
    pub tag_ids: Option<Vec<TagId>>,
    /// Replacement ingredient set.
    pub ingredient_ids: Option<Vec<IngredientId>>,
}

impl RecipePatch {
    /// Scalar fields after applying this patch to `current`.
    #[must_use]
    pub fn apply_to(&self, current: &RecipeFields) -> RecipeFields {
        RecipeFields {
            title: self.title.clone().unwrap_or_else(|| current.title.clone()),
            time_minutes: self.time_minutes.unwrap_or(current.time_minutes),
            price: self.price.unwrap_or(current.price),
            link: self
                .link
                .clone()
                .unwrap_or_else(|| current.link.clone()),
        }
    }
}

/// Full replacement: every mutable field takes the supplied value.
///
/// Omitted association lists mean "no associations", not "keep".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeReplacement {
    /// Scalar fields; an absent link clears the stored one.
    pub fields: RecipeFields,
    /// Tag set, cleared when `None`.
    pub tag_ids: Option<Vec<TagId>>,
    /// Ingredient set, cleared when `None`.
    pub ingredient_ids: Option<Vec<IngredientId>>,
}

impl From<RecipeReplacement> for RecipePatch {
    fn from(value: RecipeReplacement) -> Self {
        let RecipeReplacement {
            fields,
            tag_ids,
            ingredient_ids,
        } = value;
        Self {
            title: Some(fields.title),
            time_minutes: Some(fields.time_minutes),
            price: Some(fields.price),
            link: Some(fields.link),
            tag_ids: Some(tag_ids.unwrap_or_default()),
            ingredient_ids: Some(ingredient_ids.unwrap_or_default()),
        }
    }
}
