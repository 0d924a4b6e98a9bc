//! Account handlers.
//!
//! ```text
//! POST  /api/v1/user/create/ {"email":"cook@example.com","password":"pass123","name":"Cook"}
//! POST  /api/v1/user/token/  {"email":"cook@example.com","password":"pass123"}
//! GET   /api/v1/user/me/
//! PATCH /api/v1/user/me/     {"name":"Head cook"}
//! ```

use actix_web::{HttpRequest, HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use serde_json::json;
use zeroize::Zeroizing;

use crate::domain::{
    DisplayName, DomainError, Email, LoginCredentials, LoginValidationError, ProfileUpdate, User,
    UserRegistration, validate_new_password,
};
use crate::inbound::http::ApiResult;
use crate::inbound::http::auth::AuthenticatedUser;
use crate::inbound::http::body::read_json;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, missing_field_error};

/// Request body for `POST /api/v1/user/create/`.
#[derive(Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    /// Login address; must be unique.
    #[schema(example = "cook@example.com")]
    pub email: Option<String>,
    /// Plaintext password, at least five characters.
    #[schema(example = "pass123", min_length = 5)]
    pub password: Option<String>,
    /// Display name.
    #[schema(example = "Cook")]
    pub name: Option<String>,
}

/// Public view of an account. The password never leaves the server.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    /// Login address.
    #[schema(example = "cook@example.com")]
    pub email: String,
    /// Display name.
    #[schema(example = "Cook")]
    pub name: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email().to_string(),
            name: user.name().as_str().to_owned(),
        }
    }
}

/// Request body for `POST /api/v1/user/token/`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenRequest {
    /// Login address.
    pub email: String,
    /// Account password.
    pub password: String,
}

impl TryFrom<TokenRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: TokenRequest) -> Result<Self, Self::Error> {
        Self::try_from_parts(&value.email, &value.password)
    }
}

/// Freshly issued API token.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TokenResponse {
    /// Key for the `Authorization: Token <key>` header.
    #[schema(example = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b")]
    pub token: String,
}

/// Request body for `PATCH /api/v1/user/me/`. Omitted fields are unchanged.
#[derive(Deserialize, Default, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    /// New login address.
    pub email: Option<String>,
    /// New display name.
    pub name: Option<String>,
    /// New password, at least five characters.
    #[schema(min_length = 5)]
    pub password: Option<String>,
}

impl TryFrom<UpdateProfileRequest> for ProfileUpdate {
    type Error = DomainError;

    fn try_from(value: UpdateProfileRequest) -> Result<Self, Self::Error> {
        let email = value.email.as_deref().map(Email::parse).transpose()?;
        let name = value.name.map(DisplayName::new).transpose()?;
        if let Some(password) = value.password.as_deref() {
            validate_new_password(password)?;
        }
        Ok(Self {
            email,
            name,
            password: value.password.map(Zeroizing::new),
        })
    }
}

fn map_login_validation_error(err: LoginValidationError) -> DomainError {
    match err {
        LoginValidationError::EmptyEmail => {
            DomainError::invalid_request("email must not be empty")
                .with_details(json!({ "field": "email", "code": "empty_email" }))
        }
        LoginValidationError::EmptyPassword => {
            DomainError::invalid_request("password must not be empty")
                .with_details(json!({ "field": "password", "code": "empty_password" }))
        }
    }
}

/// Register a new account.
#[utoipa::path(
    post,
    path = "/api/v1/user/create/",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "Account created", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema),
        (status = 503, description = "Database unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser",
    security([])
)]
#[post("/user/create/")]
pub async fn create_user(
    state: web::Data<HttpState>,
    payload: web::Json<CreateUserRequest>,
) -> ApiResult<HttpResponse> {
    let CreateUserRequest {
        email,
        password: raw_password,
        name,
    } = payload.into_inner();
    let password =
        raw_password.ok_or_else(|| missing_field_error(FieldName::new("password")))?;
    validate_new_password(&password)?;

    let mut registration = UserRegistration::new(email.unwrap_or_default(), password);
    if let Some(display_name) = name {
        registration = registration.with_name(display_name);
    }
    let user = state.accounts.create_user(registration).await?;
    Ok(HttpResponse::Created().json(UserResponse::from(&user)))
}

/// Exchange credentials for an API token, revoking any previous token.
#[utoipa::path(
    post,
    path = "/api/v1/user/token/",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createToken",
    security([])
)]
#[post("/user/token/")]
pub async fn create_token(
    state: web::Data<HttpState>,
    payload: web::Json<TokenRequest>,
) -> ApiResult<web::Json<TokenResponse>> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(map_login_validation_error)?;
    let token = state.login.login(&credentials).await?;
    Ok(web::Json(TokenResponse {
        token: token.expose().to_owned(),
    }))
}

/// The caller's own account.
#[utoipa::path(
    get,
    path = "/api/v1/user/me/",
    responses(
        (status = 200, description = "Current account", body = UserResponse),
        (status = 401, description = "Unauthorised", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getMe"
)]
#[get("/user/me/")]
pub async fn get_me(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<UserResponse>> {
    let account = state.accounts.profile(user.id()).await?;
    Ok(web::Json(UserResponse::from(&account)))
}

/// Update the caller's email, name or password.
#[utoipa::path(
    patch,
    path = "/api/v1/user/me/",
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Account updated", body = UserResponse),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 409, description = "Email already registered", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateMe"
)]
#[patch("/user/me/")]
pub async fn update_me(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    req: HttpRequest,
    payload: web::Payload,
) -> ApiResult<web::Json<UserResponse>> {
    let body: UpdateProfileRequest = read_json(&req, payload).await?;
    let update = ProfileUpdate::try_from(body)?;
    let account = state.accounts.update_profile(user.id(), update).await?;
    Ok(web::Json(UserResponse::from(&account)))
}
