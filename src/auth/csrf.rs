//! Double-submit CSRF protection.
//!
//! The log-in endpoint hands out a random token in the `csrftoken` cookie.
//! Every state changing request must echo that token back in the
//! `X-CSRFToken` header; the guard compares the two and rejects a mismatch.
//! A cross-site attacker can make the browser send the cookie but cannot read
//! it to fill in the header.

use axum::{
    extract::Request,
    http::Method,
    middleware::Next,
    response::Response,
};
use axum_extra::extract::cookie::CookieJar;
use rand::{Rng, distributions::Alphanumeric};

use crate::Error;

/// The name of the cookie holding the CSRF token.
pub const CSRF_COOKIE_NAME: &str = "csrftoken";

/// The name of the header that must echo the CSRF cookie.
pub const CSRF_HEADER_NAME: &str = "X-CSRFToken";

const CSRF_TOKEN_LENGTH: usize = 64;

/// Create a new random CSRF token.
pub fn generate_csrf_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(CSRF_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// Middleware that enforces the double-submit check on state changing
/// requests.
///
/// Safe methods (GET, HEAD, OPTIONS, TRACE) pass through untouched.
pub async fn csrf_guard(
    jar: CookieJar,
    request: Request,
    next: Next,
) -> Result<Response, Error> {
    let method = request.method();

    if method == Method::GET
        || method == Method::HEAD
        || method == Method::OPTIONS
        || method == Method::TRACE
    {
        return Ok(next.run(request).await);
    }

    let cookie_token = jar
        .get(CSRF_COOKIE_NAME)
        .map(|cookie| cookie.value().to_owned())
        .ok_or_else(|| {
            Error::PermissionDenied("CSRF Failed: CSRF cookie not set.".to_owned())
        })?;

    let header_token = request
        .headers()
        .get(CSRF_HEADER_NAME)
        .and_then(|value| value.to_str().ok());

    match header_token {
        Some(header_token) if header_token == cookie_token => Ok(next.run(request).await),
        _ => Err(Error::PermissionDenied(
            "CSRF Failed: CSRF token missing or incorrect.".to_owned(),
        )),
    }
}
