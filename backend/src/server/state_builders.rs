//! Builders wiring Diesel adapters and domain services into [`HttpState`].

use std::io;
use std::sync::Arc;

use actix_web::web;
use tracing::info;

use recipe_backend::domain::{AccountsService, IngredientService, RecipeService, TagService};
use recipe_backend::inbound::http::state::{HttpState, HttpStatePorts};
use recipe_backend::outbound::media::LocalImageStore;
use recipe_backend::outbound::persistence::{
    DbPool, DieselAuthTokenRepository, DieselIngredientRepository, DieselRecipeRepository,
    DieselTagRepository, DieselUserRepository,
};

use super::ServerConfig;

/// Repository adapters sharing one pool.
struct Repositories {
    users: Arc<DieselUserRepository>,
    tokens: Arc<DieselAuthTokenRepository>,
    tags: Arc<DieselTagRepository>,
    ingredients: Arc<DieselIngredientRepository>,
    recipes: Arc<DieselRecipeRepository>,
}

impl Repositories {
    fn new(pool: &DbPool) -> Self {
        Self {
            users: Arc::new(DieselUserRepository::new(pool.clone())),
            tokens: Arc::new(DieselAuthTokenRepository::new(pool.clone())),
            tags: Arc::new(DieselTagRepository::new(pool.clone())),
            ingredients: Arc::new(DieselIngredientRepository::new(pool.clone())),
            recipes: Arc::new(DieselRecipeRepository::new(pool.clone())),
        }
    }
}

/// Build the shared handler state.
///
/// # Errors
/// Returns [`io::Error`] when the media root cannot be created or opened.
pub(crate) fn build_http_state(config: &ServerConfig) -> io::Result<web::Data<HttpState>> {
    let images = Arc::new(LocalImageStore::open(config.media_root())?);
    info!(media_root = %images.root_path().display(), "image store ready");

    let repos = Repositories::new(&config.db_pool);
    let accounts = Arc::new(AccountsService::new(repos.users, repos.tokens));
    let recipes = Arc::new(RecipeService::new(
        repos.recipes,
        repos.tags.clone(),
        repos.ingredients.clone(),
        images,
    ));

    Ok(web::Data::new(HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        login: accounts,
        tags: Arc::new(TagService::new(repos.tags)),
        ingredients: Arc::new(IngredientService::new(repos.ingredients)),
        recipes: recipes.clone(),
        recipes_query: recipes,
    })))
}
