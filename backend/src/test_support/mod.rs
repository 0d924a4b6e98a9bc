//! Test utilities for the backend crate.
//!
//! Shared by unit tests in `src/` and integration tests in `tests/`. Only
//! compiled for tests or with the `test-support` feature.

mod in_memory;

use std::sync::Arc;

use crate::domain::{
    AccountsService, HashingPolicy, IngredientService, RecipeService, TagService,
};
use crate::inbound::http::state::{HttpState, HttpStatePorts};

pub use in_memory::InMemoryStore;

/// Handler state wired to real services over `store`.
///
/// Password hashing uses [`HashingPolicy::fast`] so suites stay quick.
///
/// # Examples
/// ```
/// use recipe_backend::test_support::{InMemoryStore, in_memory_http_state};
///
/// let store = InMemoryStore::default();
/// let _state = in_memory_http_state(&store);
/// assert_eq!(store.recipe_count(), 0);
/// ```
#[must_use]
pub fn in_memory_http_state(store: &InMemoryStore) -> HttpState {
    let shared = Arc::new(store.clone());
    let accounts = Arc::new(
        AccountsService::new(shared.clone(), shared.clone())
            .with_hashing_policy(HashingPolicy::fast()),
    );
    let recipes = Arc::new(RecipeService::new(
        shared.clone(),
        shared.clone(),
        shared.clone(),
        shared.clone(),
    ));
    HttpState::new(HttpStatePorts {
        accounts: accounts.clone(),
        login: accounts,
        tags: Arc::new(TagService::new(shared.clone())),
        ingredients: Arc::new(IngredientService::new(shared)),
        recipes: recipes.clone(),
        recipes_query: recipes,
    })
}

pub mod openapi {
    //! Helpers for inspecting generated OpenAPI schemas.

    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::{Object, Schema};

    /// Unwrap an inline object schema.
    ///
    /// # Panics
    ///
    /// Panics, naming `name`, when the schema is a reference or not an object.
    #[must_use]
    pub fn unwrap_object_schema<'a>(schema: &'a RefOr<Schema>, name: &str) -> &'a Object {
        match schema {
            RefOr::T(Schema::Object(object)) => object,
            _ => panic!("{name} should be an inline object schema"),
        }
    }
}
