//! The log-in endpoint, which trades an email and password for a token pair.

use axum::{Json, extract::State};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use serde::{Deserialize, Serialize};

use crate::{AppState, Error, models::UserProfile, stores::UserStore};

use super::{
    csrf::{CSRF_COOKIE_NAME, generate_csrf_token},
    token::{TokenKind, encode_token},
};

/// The name of the cookie holding the refresh token.
pub const REFRESH_COOKIE_NAME: &str = "refreshtoken";

/// The credentials a client logs in with.
#[derive(Debug, Clone, Deserialize)]
pub struct Credentials {
    /// The email address the account was registered with.
    #[serde(default)]
    pub email: Option<String>,
    /// The account's password, in plain text.
    #[serde(default)]
    pub password: Option<String>,
}

/// The body of a successful log-in response.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogInResponse {
    /// The access token to send as a bearer token on protected requests.
    pub access_token: String,
    /// The profile of the user that logged in.
    pub user: UserProfile,
}

/// Handler for logging in.
///
/// Checks the credentials against the user store and, on success, returns an
/// access token and the user's profile, and sets the refresh and CSRF token
/// cookies.
///
/// # Errors
/// Returns [Error::AuthenticationFailed] when a credential field is missing,
/// the email is unknown, the password does not match, or the account has not
/// been activated. Unknown email and wrong password produce the same message
/// so the endpoint does not leak which accounts exist.
pub async fn get_tokens(
    State(state): State<AppState>,
    jar: CookieJar,
    Json(credentials): Json<Credentials>,
) -> Result<(CookieJar, Json<LogInResponse>), Error> {
    let (Some(email), Some(password)) = (credentials.email, credentials.password) else {
        return Err(Error::AuthenticationFailed(
            "Email/password required".to_owned(),
        ));
    };

    let user = state
        .user_store
        .get_by_email(&email)
        .map_err(|error| match error {
            Error::NotFound => {
                Error::AuthenticationFailed("Invalid email or password".to_owned())
            }
            error => error,
        })?;

    let password_matches = user
        .password_hash()
        .verify(&password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !password_matches {
        return Err(Error::AuthenticationFailed(
            "Invalid email or password".to_owned(),
        ));
    }

    if !user.is_active() {
        return Err(Error::AuthenticationFailed("User is not active".to_owned()));
    }

    let access_token = encode_token(TokenKind::Access, user.id(), &state.jwt_keys.encoding_key)?;
    let refresh_token = encode_token(TokenKind::Refresh, user.id(), &state.jwt_keys.encoding_key)?;

    // SameSite=None keeps the cookie usable from a frontend on another
    // origin. TODO: add Secure and HttpOnly once all clients are on HTTPS.
    let refresh_cookie = Cookie::build((REFRESH_COOKIE_NAME, refresh_token))
        .path("/")
        .same_site(SameSite::None)
        .build();

    let csrf_cookie = Cookie::build((CSRF_COOKIE_NAME, generate_csrf_token()))
        .path("/")
        .same_site(SameSite::Lax)
        .build();

    let jar = jar.add(refresh_cookie).add(csrf_cookie);

    Ok((
        jar,
        Json(LogInResponse {
            access_token,
            user: UserProfile::from(&user),
        }),
    ))
}
