//! Domain primitives, aggregates and services.
//!
//! Purpose: define the strongly typed entities shared by the HTTP and
//! persistence adapters, the ports those adapters plug into, and the services
//! that implement the driving ports. Nothing here depends on Actix or Diesel.
//!
//! Public surface:
//! - DomainError / ErrorCode: API error payload and its stable identifier.
//! - User, Email, Credentials, Permissions: account identity and roles.
//! - AuthToken, LoginCredentials: token authentication.
//! - Tag, Ingredient, LabelName: user-owned labels.
//! - Recipe and its change requests (RecipeDraft, RecipePatch,
//!   RecipeReplacement) plus RecipeFilter.
//! - AccountsService, TagService, IngredientService, RecipeService.

pub mod accounts_service;
pub mod auth;
pub mod error;
pub mod ingredient;
pub mod label;
pub mod label_service;
pub mod ports;
pub mod readiness;
pub mod recipe;
pub mod recipe_service;
pub mod tag;
pub mod trace_id;
pub mod user;

pub use self::accounts_service::AccountsService;
pub use self::auth::{
    AuthToken, LoginCredentials, LoginValidationError, TokenDigest, TokenFormatError,
};
pub use self::error::{DomainError, DomainErrorValidationError, ErrorCode, TRACE_ID_HEADER};
pub use self::ingredient::{Ingredient, IngredientId};
pub use self::label::{LABEL_NAME_MAX_LENGTH, LabelName, LabelValidationError};
pub use self::label_service::{IngredientService, TagService};
pub use self::readiness::{RetryPolicy, wait_for_database};
pub use self::recipe::{
    CookingTime, ImagePath, LINK_MAX_LENGTH, PRICE_MAX_DIGITS, Price, RECIPE_IMAGE_DIR, Recipe,
    RecipeDraft, RecipeFields, RecipeFilter, RecipeId, RecipeLink, RecipePatch,
    RecipeReplacement, RecipeTitle, RecipeValidationError, TITLE_MAX_LENGTH, recipe_image_path,
};
pub use self::recipe_service::RecipeService;
pub use self::tag::{Tag, TagId};
pub use self::trace_id::TraceId;
pub use self::user::{
    Credentials, DISPLAY_NAME_MAX_LENGTH, DisplayName, EMAIL_MAX_LENGTH, Email, HashingPolicy,
    NewUser, PASSWORD_MIN_LENGTH, PasswordDigest, PasswordHashError, Permissions, ProfileUpdate,
    User, UserId, UserRegistration, UserValidationError, validate_new_password,
};
