//! Tag and ingredient handlers.
//!
//! ```text
//! GET  /api/v1/recipe/tags/?assignedOnly=1
//! POST /api/v1/recipe/tags/        {"name":"Vegan"}
//! GET  /api/v1/recipe/ingredients/?assignedOnly=1
//! POST /api/v1/recipe/ingredients/ {"name":"Salt"}
//! ```
//!
//! Both registries share one wire shape: `{id, name}`.

use actix_web::{HttpRequest, HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::domain::ports::LabelListing;
use crate::domain::{DomainError, Ingredient, LabelName, Tag};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::body::read_json;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error, parse_flag};

/// Request body for creating a tag or ingredient.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabelRequest {
    /// Label text, unique per owner.
    #[schema(example = "Vegan", max_length = 255)]
    pub name: Option<String>,
}

impl TryFrom<LabelRequest> for LabelName {
    type Error = DomainError;

    fn try_from(value: LabelRequest) -> Result<Self, Self::Error> {
        let raw = value
            .name
            .ok_or_else(|| missing_field_error(FieldName::new("name")))?;
        Ok(Self::new(raw)?)
    }
}

/// A tag or ingredient as returned to its owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct LabelResponse {
    /// Identifier.
    #[schema(example = 1)]
    pub id: i64,
    /// Label text.
    #[schema(example = "Vegan")]
    pub name: String,
}

impl From<&Tag> for LabelResponse {
    fn from(tag: &Tag) -> Self {
        Self {
            id: tag.id().get(),
            name: tag.name().as_str().to_owned(),
        }
    }
}

impl From<&Ingredient> for LabelResponse {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            id: ingredient.id().get(),
            name: ingredient.name().as_str().to_owned(),
        }
    }
}

/// Query string accepted by the list endpoints.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct LabelListQuery {
    /// `1` keeps only entries attached to at least one recipe.
    #[param(example = "1")]
    pub assigned_only: Option<String>,
}

impl LabelListQuery {
    fn listing(&self) -> Result<LabelListing, DomainError> {
        let assigned_only = parse_flag(
            self.assigned_only.as_deref(),
            FieldName::new("assignedOnly"),
        )?;
        Ok(LabelListing { assigned_only })
    }
}

/// The caller's tags, by name descending.
#[utoipa::path(
    get,
    path = "/api/v1/recipe/tags/",
    params(LabelListQuery),
    responses(
        (status = 200, description = "Tags", body = [LabelResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "listTags"
)]
#[get("/recipe/tags/")]
pub async fn list_tags(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<LabelListQuery>,
) -> ApiResult<web::Json<Vec<LabelResponse>>> {
    let listing = query.listing()?;
    let tags = state.tags.list_tags(user.id(), listing).await?;
    Ok(web::Json(tags.iter().map(LabelResponse::from).collect()))
}

/// Create a tag owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipe/tags/",
    request_body = LabelRequest,
    responses(
        (status = 201, description = "Tag created", body = LabelResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["tags"],
    operation_id = "createTag"
)]
#[post("/recipe/tags/")]
pub async fn create_tag(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let body: LabelRequest = read_json(&req, payload).await?;
    let name = LabelName::try_from(body)?;
    let tag = state.tags.create_tag(user.id(), name).await?;
    Ok(HttpResponse::Created().json(LabelResponse::from(&tag)))
}

/// The caller's ingredients, by name descending.
#[utoipa::path(
    get,
    path = "/api/v1/recipe/ingredients/",
    params(LabelListQuery),
    responses(
        (status = 200, description = "Ingredients", body = [LabelResponse]),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "listIngredients"
)]
#[get("/recipe/ingredients/")]
pub async fn list_ingredients(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<LabelListQuery>,
) -> ApiResult<web::Json<Vec<LabelResponse>>> {
    let listing = query.listing()?;
    let ingredients = state.ingredients.list_ingredients(user.id(), listing).await?;
    Ok(web::Json(ingredients.iter().map(LabelResponse::from).collect()))
}

/// Create an ingredient owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipe/ingredients/",
    request_body = LabelRequest,
    responses(
        (status = 201, description = "Ingredient created", body = LabelResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "createIngredient"
)]
#[post("/recipe/ingredients/")]
pub async fn create_ingredient(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let body: LabelRequest = read_json(&req, payload).await?;
    let name = LabelName::try_from(body)?;
    let ingredient = state.ingredients.create_ingredient(user.id(), name).await?;
    Ok(HttpResponse::Created().json(LabelResponse::from(&ingredient)))
}
