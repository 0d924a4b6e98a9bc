//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (repositories, the image store, the database ping) describe
//! what the domain needs from infrastructure; driving ports (accounts, login,
//! catalogues, recipe commands and queries) describe what inbound adapters
//! may ask of the domain.

mod macros;
pub(crate) use macros::define_port_error;

mod database_ping;
mod image_store;
mod label_catalog;
mod label_repository;
mod login_service;
mod recipe_command;
mod recipe_query;
mod recipe_repository;
mod token_repository;
mod user_accounts;
mod user_repository;

#[cfg(test)]
pub use database_ping::MockDatabasePing;
pub use database_ping::{DatabasePing, PingError};
#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use label_catalog::{MockIngredientCatalog, MockTagCatalog};
pub use label_catalog::{IngredientCatalog, TagCatalog};
#[cfg(test)]
pub use label_repository::{MockIngredientRepository, MockTagRepository};
pub use label_repository::{
    IngredientRepository, LabelListing, LabelRepositoryError, TagRepository,
};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::LoginService;
#[cfg(test)]
pub use recipe_command::MockRecipeCommand;
pub use recipe_command::{ImageUpload, RecipeCommand};
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_query::RecipeQuery;
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError, RecipeUpdate};
#[cfg(test)]
pub use token_repository::MockAuthTokenRepository;
pub use token_repository::{AuthTokenRepository, TokenRepositoryError};
#[cfg(test)]
pub use user_accounts::MockUserAccounts;
pub use user_accounts::UserAccounts;
#[cfg(test)]
pub use user_repository::MockUserRepository;
pub use user_repository::{UserPersistenceError, UserRepository};
