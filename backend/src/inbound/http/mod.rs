//! HTTP inbound adapter exposing REST endpoints.

pub mod auth;
pub mod body;
pub mod error;
pub mod health;
pub mod labels;
pub mod recipes;
pub mod recipes_dto;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod users;
pub mod validation;

use actix_web::web;

pub use error::ApiResult;

/// Register every `/api/v1` route plus the extractor configuration that
/// renders malformed input as the standard error envelope.
///
/// Mount it under the version prefix:
///
/// ```no_run
/// use actix_web::{App, web};
/// use recipe_backend::inbound::http::configure_api;
///
/// let app = App::new().service(web::scope("/api/v1").configure(configure_api));
/// # let _ = app;
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(error::json_error_handler))
        .app_data(web::QueryConfig::default().error_handler(error::query_error_handler))
        .app_data(web::PathConfig::default().error_handler(error::path_error_handler))
        .service(users::create_user)
        .service(users::create_token)
        .service(users::get_me)
        .service(users::update_me)
        .service(labels::list_tags)
        .service(labels::create_tag)
        .service(labels::list_ingredients)
        .service(labels::create_ingredient)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::upload_image)
        .service(recipes::get_recipe)
        .service(recipes::patch_recipe)
        .service(recipes::replace_recipe)
        .service(recipes::delete_recipe);
}
