//! Shared HTTP adapter state.
//!
//! HTTP handlers accept this state via `actix_web::web::Data` so they only
//! depend on domain ports (use-cases) and remain testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{
    IngredientCatalog, LoginService, RecipeCommand, RecipeQuery, TagCatalog, UserAccounts,
};

/// Parameter object bundling all port implementations for HTTP handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    /// Account registration and profiles.
    pub accounts: Arc<dyn UserAccounts>,
    /// Token issue and resolution.
    pub login: Arc<dyn LoginService>,
    /// Tag catalogue.
    pub tags: Arc<dyn TagCatalog>,
    /// Ingredient catalogue.
    pub ingredients: Arc<dyn IngredientCatalog>,
    /// Recipe writes.
    pub recipes: Arc<dyn RecipeCommand>,
    /// Recipe reads.
    pub recipes_query: Arc<dyn RecipeQuery>,
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    /// Account registration and profiles.
    pub accounts: Arc<dyn UserAccounts>,
    /// Token issue and resolution.
    pub login: Arc<dyn LoginService>,
    /// Tag catalogue.
    pub tags: Arc<dyn TagCatalog>,
    /// Ingredient catalogue.
    pub ingredients: Arc<dyn IngredientCatalog>,
    /// Recipe writes.
    pub recipes: Arc<dyn RecipeCommand>,
    /// Recipe reads.
    pub recipes_query: Arc<dyn RecipeQuery>,
}

impl HttpState {
    /// Construct state from a ports bundle.
    #[must_use]
    pub fn new(ports: HttpStatePorts) -> Self {
        let HttpStatePorts {
            accounts,
            login,
            tags,
            ingredients,
            recipes,
            recipes_query,
        } = ports;
        Self {
            accounts,
            login,
            tags,
            ingredients,
            recipes,
            recipes_query,
        }
    }
}

impl From<HttpStatePorts> for HttpState {
    fn from(ports: HttpStatePorts) -> Self {
        Self::new(ports)
    }
}
