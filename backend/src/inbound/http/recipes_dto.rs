//! Wire types for the recipe endpoints.
//!
//! Requests carry tag and ingredient ids. List, create and update responses
//! echo ids; the detail response nests `{id, name}` objects instead. Prices
//! are serialised as strings so no precision is lost on the client.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::{
    CookingTime, DomainError, IngredientId, Price, Recipe, RecipeDraft, RecipeFields, RecipeFilter,
    RecipeLink, RecipePatch, RecipeReplacement, RecipeTitle, TagId,
};
use crate::inbound::http::labels::LabelResponse;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_id_list};

/// Distinguish an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn parse_link(raw: Option<String>) -> Result<Option<RecipeLink>, DomainError> {
    raw.filter(|link| !link.trim().is_empty())
        .map(RecipeLink::new)
        .transpose()
        .map_err(DomainError::from)
}

fn tag_ids(ids: Vec<i64>) -> Vec<TagId> {
    ids.into_iter().map(TagId::new).collect()
}

fn ingredient_ids(ids: Vec<i64>) -> Vec<IngredientId> {
    ids.into_iter().map(IngredientId::new).collect()
}

/// Body for `POST /recipe/recipes/` and `PUT /recipe/recipes/{id}/`.
///
/// On `PUT` an omitted `link`, `tags` or `ingredients` clears the stored
/// value.
#[derive(Debug, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    /// Recipe title.
    #[schema(example = "Pancakes", max_length = 255)]
    pub title: Option<String>,
    /// Preparation time in minutes.
    #[schema(example = 20, minimum = 0)]
    pub time_minutes: Option<i64>,
    /// Price with at most two decimal places.
    #[schema(value_type = Option<String>, example = "5")]
    pub price: Option<Decimal>,
    /// External link to the recipe.
    #[schema(example = "https://example.com/pancakes")]
    pub link: Option<String>,
    /// Tag ids owned by the caller.
    #[schema(example = json!([1, 2]))]
    pub tags: Option<Vec<i64>>,
    /// Ingredient ids owned by the caller.
    #[schema(example = json!([3]))]
    pub ingredients: Option<Vec<i64>>,
}

impl RecipeRequest {
    fn into_fields(
        self,
    ) -> Result<(RecipeFields, Option<Vec<i64>>, Option<Vec<i64>>), DomainError> {
        let title = self
            .title
            .ok_or_else(|| missing_field_error(FieldName::new("title")))?;
        let time_minutes = self
            .time_minutes
            .ok_or_else(|| missing_field_error(FieldName::new("timeMinutes")))?;
        let price = self
            .price
            .ok_or_else(|| missing_field_error(FieldName::new("price")))?;
        let fields = RecipeFields {
            title: RecipeTitle::new(title)?,
            time_minutes: CookingTime::new(time_minutes)?,
            price: Price::new(price)?,
            link: parse_link(self.link)?,
        };
        Ok((fields, self.tags, self.ingredients))
    }
}

impl TryFrom<RecipeRequest> for RecipeDraft {
    type Error = DomainError;

    fn try_from(value: RecipeRequest) -> Result<Self, Self::Error> {
        let (fields, tags, ingredients) = value.into_fields()?;
        Ok(Self {
            fields,
            tag_ids: tag_ids(tags.unwrap_or_default()),
            ingredient_ids: ingredient_ids(ingredients.unwrap_or_default()),
        })
    }
}

impl TryFrom<RecipeRequest> for RecipeReplacement {
    type Error = DomainError;

    fn try_from(value: RecipeRequest) -> Result<Self, Self::Error> {
        let (fields, tags, ingredients) = value.into_fields()?;
        Ok(Self {
            fields,
            tag_ids: tags.map(tag_ids),
            ingredient_ids: ingredients.map(ingredient_ids),
        })
    }
}

/// Body for `PATCH /recipe/recipes/{id}/`. Omitted fields are unchanged;
/// `"link": null` clears the link.
#[derive(Debug, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipePatchRequest {
    /// Recipe title.
    pub title: Option<String>,
    /// Preparation time in minutes.
    pub time_minutes: Option<i64>,
    /// Price with at most two decimal places.
    #[schema(value_type = Option<String>)]
    pub price: Option<Decimal>,
    /// External link; `null` clears it.
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub link: Option<Option<String>>,
    /// Tag ids owned by the caller.
    pub tags: Option<Vec<i64>>,
    /// Ingredient ids owned by the caller.
    pub ingredients: Option<Vec<i64>>,
}

impl TryFrom<RecipePatchRequest> for RecipePatch {
    type Error = DomainError;

    fn try_from(value: RecipePatchRequest) -> Result<Self, Self::Error> {
        Ok(Self {
            title: value.title.map(RecipeTitle::new).transpose()?,
            time_minutes: value.time_minutes.map(CookingTime::new).transpose()?,
            price: value.price.map(Price::new).transpose()?,
            link: value.link.map(parse_link).transpose()?,
            tag_ids: value.tags.map(tag_ids),
            ingredient_ids: value.ingredients.map(ingredient_ids),
        })
    }
}

/// Recipe summary returned by list, create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeResponse {
    /// Identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Recipe title.
    #[schema(example = "Pancakes")]
    pub title: String,
    /// Preparation time in minutes.
    #[schema(example = 20)]
    pub time_minutes: i32,
    /// Price with at most two decimal places.
    #[schema(example = "5")]
    pub price: String,
    /// External link to the recipe.
    pub link: Option<String>,
    /// Tag ids owned by the caller.
    #[schema(example = json!([1, 2]))]
    pub tags: Vec<i64>,
    /// Ingredient ids owned by the caller.
    #[schema(example = json!([3]))]
    pub ingredients: Vec<i64>,
}

impl From<&Recipe> for RecipeResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id().get(),
            title: recipe.title().as_str().to_owned(),
            time_minutes: recipe.time_minutes().minutes(),
            price: recipe.price().to_string(),
            link: recipe.link().map(|link| link.as_str().to_owned()),
            tags: recipe.tags().iter().map(|tag| tag.id().get()).collect(),
            ingredients: recipe
                .ingredients()
                .iter()
                .map(|ingredient| ingredient.id().get())
                .collect(),
        }
    }
}

/// Full recipe with nested labels and the image path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeDetailResponse {
    /// Identifier.
    pub id: i64,
    /// Recipe title.
    pub title: String,
    /// Preparation time in minutes.
    pub time_minutes: i32,
    /// Price with at most two decimal places.
    pub price: String,
    /// External link to the recipe.
    pub link: Option<String>,
    /// Stored image path, relative to the media root.
    #[schema(example = "uploads/recipe/0b8a5f0c-8d7e-4c4b-9a55-1f2e3d4c5b6a.jpg")]
    pub image: Option<String>,
    /// Attached tags.
    pub tags: Vec<LabelResponse>,
    /// Attached ingredients.
    pub ingredients: Vec<LabelResponse>,
}

impl From<&Recipe> for RecipeDetailResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id().get(),
            title: recipe.title().as_str().to_owned(),
            time_minutes: recipe.time_minutes().minutes(),
            price: recipe.price().to_string(),
            link: recipe.link().map(|link| link.as_str().to_owned()),
            image: recipe.image().map(ToString::to_string),
            tags: recipe.tags().iter().map(LabelResponse::from).collect(),
            ingredients: recipe
                .ingredients()
                .iter()
                .map(LabelResponse::from)
                .collect(),
        }
    }
}

/// Response for the image upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeImageResponse {
    /// Identifier.
    pub id: i64,
    /// Stored image path, relative to the media root.
    pub image: Option<String>,
}

impl From<&Recipe> for RecipeImageResponse {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id().get(),
            image: recipe.image().map(ToString::to_string),
        }
    }
}

/// Query string for the recipe list.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RecipeListQuery {
    /// Comma-separated tag ids; a recipe matches when it carries any of them.
    #[param(example = "1,2")]
    pub tags: Option<String>,
    /// Comma-separated ingredient ids; combined with `tags` by AND.
    #[param(example = "3")]
    pub ingredients: Option<String>,
}

impl TryFrom<&RecipeListQuery> for RecipeFilter {
    type Error = DomainError;

    fn try_from(query: &RecipeListQuery) -> Result<Self, Self::Error> {
        let mut filter = Self::default();
        if let Some(raw) = query.tags.as_deref() {
            filter = filter.with_tags(tag_ids(parse_id_list(raw, FieldName::new("tags"))?));
        }
        if let Some(raw) = query.ingredients.as_deref() {
            filter = filter.with_ingredients(ingredient_ids(parse_id_list(
                raw,
                FieldName::new("ingredients"),
            )?));
        }
        Ok(filter)
    }
}

/// Query string for the image upload.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ImageUploadQuery {
    /// Original file name; only its extension is kept.
    #[param(example = "photo.jpg")]
    pub filename: Option<String>,
}
