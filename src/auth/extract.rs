//! The extractor that turns a bearer access token into the authenticated
//! [User].

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{AppState, Error, models::User, stores::UserStore};

use super::{TokenError, decode_token};

/// The user that owns the access token on the request.
///
/// Use as a handler argument to restrict the route to logged-in users:
/// the extractor rejects requests without a valid, unexpired access token for
/// an active account.
pub struct AuthUser(pub User);

impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);

        let header_value = parts.headers.get(AUTHORIZATION).ok_or_else(|| {
            Error::AuthenticationFailed(
                "Authentication credentials were not provided.".to_owned(),
            )
        })?;

        let header_text = header_value
            .to_str()
            .map_err(|_| Error::AuthenticationFailed("Invalid token".to_owned()))?;

        // The header reads "Bearer <token>"; the scheme itself is not checked.
        let token = header_text
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| Error::AuthenticationFailed("Token prefix missing".to_owned()))?;

        let user_id =
            decode_token(token, &state.jwt_keys.decoding_key).map_err(|error| match error {
                TokenError::Expired => {
                    Error::AuthenticationFailed("access_token expired".to_owned())
                }
                TokenError::Malformed | TokenError::MissingClaim => {
                    Error::AuthenticationFailed("Invalid token".to_owned())
                }
            })?;

        let user = state.user_store.get(user_id).map_err(|error| match error {
            Error::NotFound => Error::AuthenticationFailed("User not found".to_owned()),
            error => error,
        })?;

        if !user.is_active() {
            return Err(Error::AuthenticationFailed("User is not active".to_owned()));
        }

        Ok(AuthUser(user))
    }
}

#[cfg(test)]
mod auth_user_tests {
    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use email_address::EmailAddress;
    use rusqlite::Connection;
    use serde_json::{Value, json};
    use std::str::FromStr;

    use crate::{
        AppState, PaginationConfig,
        auth::{TokenKind, encode_token},
        models::{PasswordHash, User, ValidatedPassword},
        stores::UserStore,
    };

    use super::AuthUser;

    const SECRET: &str = "hunter2hunter2";

    async fn whoami(AuthUser(user): AuthUser) -> String {
        user.email().to_string()
    }

    fn get_state() -> AppState {
        let connection = Connection::open_in_memory().unwrap();

        AppState::new(connection, SECRET, PaginationConfig::default()).unwrap()
    }

    fn get_server(state: &AppState) -> TestServer {
        let router = Router::new()
            .route("/protected", get(whoami))
            .with_state(state.clone());

        TestServer::new(router)
    }

    fn create_user(state: &AppState, activate: bool) -> User {
        let email = EmailAddress::from_str("auth@test.dev").unwrap();
        let password_hash =
            PasswordHash::new(ValidatedPassword::new_unchecked("averystrongpassword"), 4).unwrap();

        let user = state.user_store.create(email.clone(), password_hash).unwrap();

        if activate {
            state.user_store.activate(email.as_str()).unwrap()
        } else {
            user
        }
    }

    fn assert_auth_failure(response: &axum_test::TestResponse, detail: &str) {
        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>(), json!({ "detail": detail }));
    }

    #[tokio::test]
    async fn valid_token_authenticates_the_user() {
        let state = get_state();
        let user = create_user(&state, true);
        let token =
            encode_token(TokenKind::Access, user.id(), &state.jwt_keys.encoding_key).unwrap();

        let response = get_server(&state)
            .get("/protected")
            .authorization_bearer(token)
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(response.text(), "auth@test.dev");
    }

    #[tokio::test]
    async fn missing_header_is_rejected() {
        let state = get_state();

        let response = get_server(&state).get("/protected").await;

        assert_auth_failure(&response, "Authentication credentials were not provided.");
    }

    #[tokio::test]
    async fn header_without_token_is_rejected() {
        let state = get_state();

        let response = get_server(&state)
            .get("/protected")
            .add_header("authorization", "Bearer")
            .await;

        assert_auth_failure(&response, "Token prefix missing");
    }

    #[tokio::test]
    async fn garbage_token_is_rejected() {
        let state = get_state();

        let response = get_server(&state)
            .get("/protected")
            .authorization_bearer("not-a-token")
            .await;

        assert_auth_failure(&response, "Invalid token");
    }

    #[tokio::test]
    async fn token_for_deleted_user_is_rejected() {
        let state = get_state();
        let token = encode_token(
            TokenKind::Access,
            crate::models::UserID::new(999),
            &state.jwt_keys.encoding_key,
        )
        .unwrap();

        let response = get_server(&state)
            .get("/protected")
            .authorization_bearer(token)
            .await;

        assert_auth_failure(&response, "User not found");
    }

    #[tokio::test]
    async fn inactive_user_is_rejected() {
        let state = get_state();
        let user = create_user(&state, false);
        let token =
            encode_token(TokenKind::Access, user.id(), &state.jwt_keys.encoding_key).unwrap();

        let response = get_server(&state)
            .get("/protected")
            .authorization_bearer(token)
            .await;

        assert_auth_failure(&response, "User is not active");
    }
}
