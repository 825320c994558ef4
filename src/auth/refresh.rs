//! The token refresh endpoint, which mints a fresh access token from the
//! refresh token cookie.

use axum::{Json, extract::State};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, stores::UserStore};

use super::{
    log_in::REFRESH_COOKIE_NAME,
    token::{TokenError, TokenKind, decode_token, encode_token},
};

/// The body of a successful refresh response.
#[derive(Debug, Serialize, Deserialize)]
pub struct RefreshResponse {
    /// The newly minted access token.
    pub access_token: String,
}

/// Handler for refreshing an access token.
///
/// The refresh token itself is not rotated; the cookie stays valid until it
/// expires and the user must log in again.
///
/// # Errors
/// Returns [Error::AuthenticationFailed] when the cookie is missing, expired,
/// malformed, or names a user that no longer exists or is inactive.
pub async fn refresh_token(
    State(state): State<AppState>,
    jar: CookieJar,
) -> Result<Json<RefreshResponse>, Error> {
    let cookie = jar.get(REFRESH_COOKIE_NAME).ok_or_else(|| {
        Error::AuthenticationFailed("Authentication credentials were not provided.".to_owned())
    })?;

    let user_id =
        decode_token(cookie.value(), &state.jwt_keys.decoding_key).map_err(|error| match error {
            TokenError::Expired => Error::AuthenticationFailed(
                "Expired refresh token, please login again.".to_owned(),
            ),
            TokenError::Malformed | TokenError::MissingClaim => {
                Error::AuthenticationFailed("Invalid token".to_owned())
            }
        })?;

    let user = state.user_store.get(user_id).map_err(|error| match error {
        Error::NotFound => Error::AuthenticationFailed("User is not active".to_owned()),
        error => error,
    })?;

    if !user.is_active() {
        return Err(Error::AuthenticationFailed("User is not active".to_owned()));
    }

    let access_token = encode_token(TokenKind::Access, user.id(), &state.jwt_keys.encoding_key)?;

    Ok(Json(RefreshResponse { access_token }))
}

#[cfg(test)]
mod refresh_tests {
    use std::str::FromStr;

    use axum::{Router, http::StatusCode, routing::post};
    use axum_extra::extract::cookie::Cookie;
    use axum_test::TestServer;
    use email_address::EmailAddress;
    use jsonwebtoken::{Header, encode};
    use rusqlite::Connection;
    use serde_json::{Value, json};
    use time::{Duration, OffsetDateTime};

    use crate::{
        AppState, PaginationConfig,
        auth::{Claims, TokenKind, decode_token, encode_token},
        models::{PasswordHash, User, UserID, ValidatedPassword},
        stores::UserStore,
    };

    use super::{REFRESH_COOKIE_NAME, RefreshResponse, refresh_token};

    fn get_state() -> AppState {
        let connection = Connection::open_in_memory().unwrap();

        AppState::new(connection, "a test secret", PaginationConfig::default()).unwrap()
    }

    fn get_server(state: &AppState) -> TestServer {
        let router = Router::new()
            .route("/refresh-token", post(refresh_token))
            .with_state(state.clone());

        TestServer::new(router)
    }

    fn create_active_user(state: &AppState) -> User {
        let email = EmailAddress::from_str("refresh@test.dev").unwrap();
        let password_hash =
            PasswordHash::new(ValidatedPassword::new_unchecked("averystrongpassword"), 4).unwrap();
        state.user_store.create(email, password_hash).unwrap();

        state.user_store.activate("refresh@test.dev").unwrap()
    }

    #[tokio::test]
    async fn refresh_returns_new_access_token() {
        let state = get_state();
        let user = create_active_user(&state);
        let refresh =
            encode_token(TokenKind::Refresh, user.id(), &state.jwt_keys.encoding_key).unwrap();

        let response = get_server(&state)
            .post("/refresh-token")
            .add_cookie(Cookie::new(REFRESH_COOKIE_NAME, refresh))
            .await;

        assert_eq!(response.status_code(), StatusCode::OK);

        let body: RefreshResponse = response.json();
        assert_eq!(
            decode_token(&body.access_token, &state.jwt_keys.decoding_key),
            Ok(user.id())
        );
    }

    #[tokio::test]
    async fn refresh_fails_without_cookie() {
        let state = get_state();

        let response = get_server(&state).post("/refresh-token").await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>(),
            json!({ "detail": "Authentication credentials were not provided." })
        );
    }

    #[tokio::test]
    async fn refresh_fails_with_expired_token() {
        let state = get_state();
        let user = create_active_user(&state);
        let issued_at = OffsetDateTime::now_utc() - Duration::days(2);
        let claims = Claims {
            exp: (issued_at + Duration::days(1)).unix_timestamp() as usize,
            iat: issued_at.unix_timestamp() as usize,
            user_id: Some(user.id().as_i64()),
        };
        let expired = encode(&Header::default(), &claims, &state.jwt_keys.encoding_key).unwrap();

        let response = get_server(&state)
            .post("/refresh-token")
            .add_cookie(Cookie::new(REFRESH_COOKIE_NAME, expired))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>(),
            json!({ "detail": "Expired refresh token, please login again." })
        );
    }

    #[tokio::test]
    async fn refresh_fails_with_garbage_token() {
        let state = get_state();

        let response = get_server(&state)
            .post("/refresh-token")
            .add_cookie(Cookie::new(REFRESH_COOKIE_NAME, "garbage"))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(response.json::<Value>(), json!({ "detail": "Invalid token" }));
    }

    #[tokio::test]
    async fn refresh_fails_for_unknown_user() {
        let state = get_state();
        let refresh = encode_token(
            TokenKind::Refresh,
            UserID::new(999),
            &state.jwt_keys.encoding_key,
        )
        .unwrap();

        let response = get_server(&state)
            .post("/refresh-token")
            .add_cookie(Cookie::new(REFRESH_COOKIE_NAME, refresh))
            .await;

        assert_eq!(response.status_code(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            response.json::<Value>(),
            json!({ "detail": "User is not active" })
        );
    }
}
