//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers:
//!
//! - **Paths**: every handler in the inbound HTTP layer plus the health checks.
//! - **Schemas**: request and response DTOs, and the domain error wrappers
//!   ([`ErrorSchema`], [`ErrorCodeSchema`]) that keep utoipa out of the domain.
//! - **Security**: the `Authorization: Token <key>` scheme.
//!
//! Swagger UI serves the document in debug builds and `openapi-dump` prints it
//! for external tooling.

use crate::inbound::http::labels::{LabelRequest, LabelResponse};
use crate::inbound::http::recipes_dto::{
    RecipeDetailResponse, RecipeImageResponse, RecipePatchRequest, RecipeRequest, RecipeResponse,
};
use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema};
use crate::inbound::http::users::{
    CreateUserRequest, TokenRequest, TokenResponse, UpdateProfileRequest, UserResponse,
};
use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

/// Name of the token security scheme in the generated document.
pub const TOKEN_SECURITY_SCHEME: &str = "Token";

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            TOKEN_SECURITY_SCHEME,
            SecurityScheme::ApiKey(ApiKey::Header(ApiKeyValue::with_description(
                "Authorization",
                "`Token <key>` where the key is issued by POST /api/v1/user/token/.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe backend API",
        description = "Token-authenticated management of recipes, tags and ingredients."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("Token" = [])),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::create_token,
        crate::inbound::http::users::get_me,
        crate::inbound::http::users::update_me,
        crate::inbound::http::labels::list_tags,
        crate::inbound::http::labels::create_tag,
        crate::inbound::http::labels::list_ingredients,
        crate::inbound::http::labels::create_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::patch_recipe,
        crate::inbound::http::recipes::replace_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::upload_image,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        CreateUserRequest,
        UserResponse,
        TokenRequest,
        TokenResponse,
        UpdateProfileRequest,
        LabelRequest,
        LabelResponse,
        RecipeRequest,
        RecipePatchRequest,
        RecipeResponse,
        RecipeDetailResponse,
        RecipeImageResponse,
    )),
    tags(
        (name = "users", description = "Account registration, tokens and profile"),
        (name = "tags", description = "User-owned recipe tags"),
        (name = "ingredients", description = "User-owned ingredients"),
        (name = "recipes", description = "Recipes and their images"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Structural checks on the generated document.

    use super::*;
    use crate::test_support::openapi::unwrap_object_schema;
    use rstest::rstest;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const ERROR_SCHEMA_NAME: &str = "domain.Error";

    fn assert_object_schema_has_field(schema: &RefOr<Schema>, field: &str) {
        let object = unwrap_object_schema(schema, field);
        assert!(
            object.properties.contains_key(field),
            "schema should have field '{field}'"
        );
    }

    #[rstest]
    fn error_schema_has_envelope_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let error_schema = schemas.get(ERROR_SCHEMA_NAME).expect("error schema");

        for field in ["code", "message", "traceId", "details"] {
            assert_object_schema_has_field(error_schema, field);
        }
    }

    #[rstest]
    #[case("/api/v1/user/create/")]
    #[case("/api/v1/user/token/")]
    #[case("/api/v1/user/me/")]
    #[case("/api/v1/recipe/tags/")]
    #[case("/api/v1/recipe/ingredients/")]
    #[case("/api/v1/recipe/recipes/")]
    #[case("/api/v1/recipe/recipes/{id}/")]
    #[case("/api/v1/recipe/recipes/{id}/upload-image/")]
    #[case("/health/ready")]
    fn every_route_is_documented(#[case] path: &str) {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key(path), "missing path {path}");
    }

    #[rstest]
    fn token_scheme_is_registered() {
        let doc = ApiDoc::openapi();
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key(TOKEN_SECURITY_SCHEME));
    }

    #[rstest]
    fn recipe_response_uses_camel_case() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let recipe = schemas.get("RecipeResponse").expect("RecipeResponse schema");
        assert_object_schema_has_field(recipe, "timeMinutes");
    }

    #[rstest]
    fn recipe_detail_requires_nested_labels() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let detail = schemas
            .get("RecipeDetailResponse")
            .expect("RecipeDetailResponse schema");
        let object = unwrap_object_schema(detail, "RecipeDetailResponse");
        for field in ["id", "title", "timeMinutes", "price", "tags", "ingredients"] {
            assert!(
                object.required.iter().any(|name| name == field),
                "{field} should be required"
            );
        }
    }
}
