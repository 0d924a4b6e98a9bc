//! Test helpers for inbound HTTP components.
//!
//! Handler tests build an [`HttpState`] from mockall port doubles and mount
//! the real route table, so routing, extractors and error mapping are all
//! exercised.

use std::sync::Arc;

use actix_web::App;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::web;

use crate::domain::ports::{
    MockIngredientCatalog, MockLoginService, MockRecipeCommand, MockRecipeQuery, MockTagCatalog,
    MockUserAccounts,
};
use crate::domain::{DomainError, UserId};

use super::configure_api;
use super::state::{HttpState, HttpStatePorts};

/// Key accepted by [`TestPorts::authenticating`].
pub const TEST_TOKEN: &str = "0123456789abcdef0123456789abcdef01234567";

/// `Authorization` header carrying [`TEST_TOKEN`].
pub fn auth_header() -> (&'static str, String) {
    ("Authorization", format!("Token {TEST_TOKEN}"))
}

/// Mock doubles for every driving port.
#[derive(Default)]
pub struct TestPorts {
    /// Account double.
    pub accounts: MockUserAccounts,
    /// Login double.
    pub login: MockLoginService,
    /// Tag catalogue double.
    pub tags: MockTagCatalog,
    /// Ingredient catalogue double.
    pub ingredients: MockIngredientCatalog,
    /// Recipe command double.
    pub recipes: MockRecipeCommand,
    /// Recipe query double.
    pub recipes_query: MockRecipeQuery,
}

impl TestPorts {
    /// Resolve [`TEST_TOKEN`] to `user` and reject every other key.
    pub fn authenticating(mut self, user: UserId) -> Self {
        self.login.expect_resolve().returning(move |token| {
            if token.expose() == TEST_TOKEN {
                Ok(user)
            } else {
                Err(DomainError::unauthorized("invalid token"))
            }
        });
        self
    }

    /// Wrap the doubles into handler state.
    pub fn into_state(self) -> HttpState {
        HttpState::new(HttpStatePorts {
            accounts: Arc::new(self.accounts),
            login: Arc::new(self.login),
            tags: Arc::new(self.tags),
            ingredients: Arc::new(self.ingredients),
            recipes: Arc::new(self.recipes),
            recipes_query: Arc::new(self.recipes_query),
        })
    }
}

/// The `/api/v1` routes backed by `ports`.
pub fn test_app(
    ports: TestPorts,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(ports.into_state()))
        .service(web::scope("/api/v1").configure(configure_api))
}
