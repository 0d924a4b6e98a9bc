//! Token authentication for HTTP handlers.
//!
//! Handlers that need an acting user take [`AuthenticatedUser`] as an
//! argument; extraction resolves `Authorization: Token <key>` through the
//! [`LoginService`](crate::domain::ports::LoginService) port before the
//! handler body runs.

use actix_web::http::header::AUTHORIZATION;
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use futures_util::future::LocalBoxFuture;

use crate::domain::{AuthToken, DomainError, UserId};

use super::state::HttpState;

/// Authorization scheme expected before the key.
pub const TOKEN_SCHEME: &str = "Token";

/// The user on whose behalf a request runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser(pub UserId);

impl AuthenticatedUser {
    /// The acting user's identifier.
    #[must_use]
    pub const fn id(self) -> UserId {
        self.0
    }
}

/// Pull the token key out of an `Authorization` header value.
pub(crate) fn parse_authorization(value: &str) -> Result<AuthToken, DomainError> {
    let (scheme, key) = value
        .trim()
        .split_once(' ')
        .ok_or_else(|| DomainError::unauthorized("authorization header must be `Token <key>`"))?;
    if !scheme.eq_ignore_ascii_case(TOKEN_SCHEME) {
        return Err(DomainError::unauthorized("unsupported authorization scheme"));
    }
    AuthToken::parse(key).map_err(|_| DomainError::unauthorized("invalid token"))
}

fn token_from_request(req: &HttpRequest) -> Result<AuthToken, DomainError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or_else(|| DomainError::unauthorized("authentication credentials were not provided"))?;
    let value = header
        .to_str()
        .map_err(|_| DomainError::unauthorized("authorization header must be ASCII"))?;
    parse_authorization(value)
}

impl FromRequest for AuthenticatedUser {
    type Error = DomainError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let parsed = token_from_request(req);
        let app_state = req.app_data::<web::Data<HttpState>>().cloned();
        Box::pin(async move {
            let token = parsed?;
            let state = app_state
                .ok_or_else(|| DomainError::internal("HTTP state missing from application"))?;
            state.login.resolve(&token).await.map(Self)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;
    use rstest_bdd_macros::{given, then, when};

    const KEY: &str = "0123456789abcdef0123456789abcdef01234567";

    #[given("a bearer authorization header")]
    fn a_bearer_authorization_header() -> String {
        format!("Bearer {KEY}")
    }

    #[when("the header is parsed")]
    fn the_header_is_parsed(value: String) -> Result<AuthToken, DomainError> {
        parse_authorization(&value)
    }

    #[then("the request is rejected as unauthorised")]
    fn the_request_is_rejected(result: Result<AuthToken, DomainError>) {
        let error = result.expect_err("header should be rejected");
        assert_eq!(error.code(), ErrorCode::Unauthorized);
    }

    #[rstest]
    #[case("Token 0123456789abcdef0123456789abcdef01234567")]
    #[case("token 0123456789ABCDEF0123456789ABCDEF01234567")]
    fn token_scheme_is_accepted(#[case] header: &str) {
        let token = the_header_is_parsed(header.to_owned()).expect("valid header");
        assert_eq!(token.expose(), KEY);
    }

    #[rstest]
    fn bearer_scheme_is_unauthorised() {
        let header = a_bearer_authorization_header();
        let result = the_header_is_parsed(header);
        the_request_is_rejected(result);
    }

    #[rstest]
    #[case("Token")]
    #[case("Token short")]
    #[case("")]
    fn malformed_headers_are_unauthorised(#[case] header: &str) {
        let result = the_header_is_parsed(header.to_owned());
        the_request_is_rejected(result);
    }
}
