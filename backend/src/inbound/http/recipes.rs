//! Recipe handlers.
//!
//! ```text
//! GET    /api/v1/recipe/recipes/?tags=1,2&ingredients=3
//! POST   /api/v1/recipe/recipes/
//! GET    /api/v1/recipe/recipes/{id}/
//! PATCH  /api/v1/recipe/recipes/{id}/
//! PUT    /api/v1/recipe/recipes/{id}/
//! DELETE /api/v1/recipe/recipes/{id}/
//! POST   /api/v1/recipe/recipes/{id}/upload-image/?filename=photo.jpg
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, put, web};
use tracing::debug;

use crate::domain::ports::ImageUpload;
use crate::domain::{RecipeDraft, RecipeFilter, RecipeId, RecipePatch, RecipeReplacement};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::body::{read_json, read_limited};
use crate::inbound::http::recipes_dto::{
    ImageUploadQuery, RecipeDetailResponse, RecipeImageResponse, RecipeListQuery,
    RecipePatchRequest, RecipeRequest, RecipeResponse,
};
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;

/// Largest accepted image body.
pub const MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// The caller's recipes, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipe/recipes/",
    params(RecipeListQuery),
    responses(
        (status = 200, description = "Recipes", body = [RecipeResponse]),
        (status = 400, description = "Invalid filter", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes"
)]
#[get("/recipe/recipes/")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    query: web::Query<RecipeListQuery>,
) -> ApiResult<web::Json<Vec<RecipeResponse>>> {
    let filter = RecipeFilter::try_from(&query.into_inner())?;
    let recipes = state.recipes_query.list(user.id(), filter).await?;
    Ok(web::Json(recipes.iter().map(RecipeResponse::from).collect()))
}

/// Create a recipe owned by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipe/recipes/",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipe/recipes/")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<HttpResponse> {
    let body: RecipeRequest = read_json(&req, payload).await?;
    let draft = RecipeDraft::try_from(body)?;
    let recipe = state.recipes.create(user.id(), draft).await?;
    Ok(HttpResponse::Created().json(RecipeResponse::from(&recipe)))
}

/// One recipe with its tags and ingredients expanded.
#[utoipa::path(
    get,
    path = "/api/v1/recipe/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 200, description = "Recipe", body = RecipeDetailResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe"
)]
#[get("/recipe/recipes/{id}/")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<RecipeDetailResponse>> {
    let id = RecipeId::new(path.into_inner());
    let recipe = state.recipes_query.get(user.id(), id).await?;
    Ok(web::Json(RecipeDetailResponse::from(&recipe)))
}

/// Merge update: only supplied fields change.
#[utoipa::path(
    patch,
    path = "/api/v1/recipe/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe identifier")),
    request_body = RecipePatchRequest,
    responses(
        (status = 200, description = "Recipe updated", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "patchRecipe"
)]
#[patch("/recipe/recipes/{id}/")]
pub async fn patch_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<web::Json<RecipeResponse>> {
    let id = RecipeId::new(path.into_inner());
    let body: RecipePatchRequest = read_json(&req, payload).await?;
    let patch = RecipePatch::try_from(body)?;
    let recipe = state.recipes.update_partial(user.id(), id, patch).await?;
    Ok(web::Json(RecipeResponse::from(&recipe)))
}

/// Replace update: omitted link, tags and ingredients are cleared.
#[utoipa::path(
    put,
    path = "/api/v1/recipe/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe identifier")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Recipe replaced", body = RecipeResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "replaceRecipe"
)]
#[put("/recipe/recipes/{id}/")]
pub async fn replace_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<web::Json<RecipeResponse>> {
    let id = RecipeId::new(path.into_inner());
    let body: RecipeRequest = read_json(&req, payload).await?;
    let replacement = RecipeReplacement::try_from(body)?;
    let recipe = state.recipes.update_full(user.id(), id, replacement).await?;
    Ok(web::Json(RecipeResponse::from(&recipe)))
}

/// Delete a recipe and its associations.
#[utoipa::path(
    delete,
    path = "/api/v1/recipe/recipes/{id}/",
    params(("id" = i64, Path, description = "Recipe identifier")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipe/recipes/{id}/")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = RecipeId::new(path.into_inner());
    state.recipes.delete(user.id(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Store the raw request body as the recipe's image.
#[utoipa::path(
    post,
    path = "/api/v1/recipe/recipes/{id}/upload-image/",
    params(("id" = i64, Path, description = "Recipe identifier"), ImageUploadQuery),
    request_body(content = Vec<u8>, content_type = "application/octet-stream"),
    responses(
        (status = 200, description = "Image stored", body = RecipeImageResponse),
        (status = 400, description = "Empty or oversized body", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "uploadRecipeImage"
)]
#[post("/recipe/recipes/{id}/upload-image/")]
pub async fn upload_image(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<i64>,
    query: web::Query<ImageUploadQuery>,
    payload: web::Payload,
) -> ApiResult<web::Json<RecipeImageResponse>> {
    let id = RecipeId::new(path.into_inner());
    let bytes = read_limited(payload, MAX_IMAGE_BYTES).await?;
    debug!(recipe_id = %id, size = bytes.len(), "received recipe image");
    let upload = ImageUpload {
        filename: query.into_inner().filename.unwrap_or_default(),
        bytes,
    };
    let recipe = state.recipes.attach_image(user.id(), id, upload).await?;
    Ok(web::Json(RecipeImageResponse::from(&recipe)))
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
