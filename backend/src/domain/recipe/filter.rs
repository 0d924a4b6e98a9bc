//! Recipe list filters.

use std::collections::BTreeSet;

use super::Recipe;
use crate::domain::{IngredientId, TagId};

/// Optional constraints applied when listing recipes.
///
/// Within one dimension a recipe matches when it carries ANY of the listed
/// identifiers. When both dimensions are present a recipe must satisfy both.
/// An empty set is treated as "no constraint".
///
/// # Examples
/// ```
/// use recipe_backend::domain::{RecipeFilter, TagId};
///
/// let filter = RecipeFilter::default().with_tags([TagId::new(1), TagId::new(2)]);
/// assert!(filter.tags().is_some());
/// assert!(filter.ingredients().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    tags: Option<BTreeSet<TagId>>,
    ingredients: Option<BTreeSet<IngredientId>>,
}

impl RecipeFilter {
    /// Keep recipes carrying any of `ids`. An empty list removes the constraint.
    #[must_use]
    pub fn with_tags(mut self, ids: impl IntoIterator<Item = TagId>) -> Self {
        let set: BTreeSet<_> = ids.into_iter().collect();
        self.tags = (!set.is_empty()).then_some(set);
        self
    }

    /// Keep recipes containing any of `ids`. An empty list removes the
    /// constraint.
    #[must_use]
    pub fn with_ingredients(mut self, ids: impl IntoIterator<Item = IngredientId>) -> Self {
        let set: BTreeSet<_> = ids.into_iter().collect();
        self.ingredients = (!set.is_empty()).then_some(set);
        self
    }

    /// Requested tag identifiers, if constrained.
    #[must_use]
    pub const fn tags(&self) -> Option<&BTreeSet<TagId>> {
        self.tags.as_ref()
    }

    /// Requested ingredient identifiers, if constrained.
    #[must_use]
    pub const fn ingredients(&self) -> Option<&BTreeSet<IngredientId>> {
        self.ingredients.as_ref()
    }

    /// Whether `recipe` satisfies the filter.
    #[must_use]
    pub fn matches(&self, recipe: &Recipe) -> bool {
        let tags_match = self.tags.as_ref().is_none_or(|wanted| {
            recipe.tags().iter().any(|tag| wanted.contains(&tag.id()))
        });
        let ingredients_match = self.ingredients.as_ref().is_none_or(|wanted| {
            recipe
                .ingredients()
                .iter()
                .any(|ingredient| wanted.contains(&ingredient.id()))
        });
        tags_match && ingredients_match
    }
}
