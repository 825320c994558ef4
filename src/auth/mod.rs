//! Token based authentication.
//!
//! Clients obtain a short lived access token and a longer lived refresh token
//! by POSTing their credentials to the log-in endpoint. The access token is
//! sent back in the response body and must accompany every request to a
//! protected endpoint as a bearer token; the refresh token travels in a cookie
//! and can mint new access tokens without re-entering the password. State
//! changing requests additionally carry a CSRF token.

mod csrf;
mod extract;
mod log_in;
mod refresh;
mod token;

pub use csrf::{CSRF_COOKIE_NAME, CSRF_HEADER_NAME, csrf_guard, generate_csrf_token};
pub use extract::AuthUser;
pub use log_in::{Credentials, LogInResponse, REFRESH_COOKIE_NAME, get_tokens};
pub use refresh::{RefreshResponse, refresh_token};
pub use token::{
    ACCESS_TOKEN_LIFETIME, Claims, JwtKeys, REFRESH_TOKEN_LIFETIME, TokenError, TokenKind,
    decode_token, encode_token,
};
