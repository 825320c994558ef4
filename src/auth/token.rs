//! Creation and verification of the signed JSON web tokens that authenticate
//! API requests.

use jsonwebtoken::{
    DecodingKey, EncodingKey, Header, Validation, decode, encode, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use time::{Duration, OffsetDateTime};

use crate::{Error, models::UserID};

/// How long an access token stays valid after being issued.
pub const ACCESS_TOKEN_LIFETIME: Duration = Duration::minutes(5);

/// How long a refresh token stays valid after being issued.
pub const REFRESH_TOKEN_LIFETIME: Duration = Duration::days(1);

/// The two roles a token can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A short lived token that authorizes API requests.
    Access,
    /// A longer lived token that can mint new access tokens.
    Refresh,
}

impl TokenKind {
    fn lifetime(&self) -> Duration {
        match self {
            TokenKind::Access => ACCESS_TOKEN_LIFETIME,
            TokenKind::Refresh => REFRESH_TOKEN_LIFETIME,
        }
    }
}

/// The payload carried inside a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// The unix timestamp after which the token is no longer valid.
    pub exp: usize,
    /// The unix timestamp at which the token was issued.
    pub iat: usize,
    /// The ID of the user the token was issued to.
    ///
    /// Optional so that a token without the claim fails with
    /// [TokenError::MissingClaim] instead of a generic decode failure.
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// The pair of keys used to sign and verify tokens, both derived from the
/// server's shared secret.
#[derive(Clone)]
pub struct JwtKeys {
    /// The key tokens are signed with.
    pub encoding_key: EncodingKey,
    /// The key token signatures are checked against.
    pub decoding_key: DecodingKey,
}

impl JwtKeys {
    /// Create the key pair from the shared secret.
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }
}

/// The ways verifying a token can fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TokenError {
    /// The token was valid once but its expiry time has passed.
    #[error("the token has expired")]
    Expired,
    /// The token could not be decoded or its signature did not match.
    #[error("the token is malformed")]
    Malformed,
    /// The token decoded fine but does not name a user.
    #[error("the token does not contain a user ID")]
    MissingClaim,
}

fn build_claims(kind: TokenKind, user_id: UserID, now: OffsetDateTime) -> Claims {
    let expires_at = now + kind.lifetime();

    Claims {
        exp: expires_at.unix_timestamp() as usize,
        iat: now.unix_timestamp() as usize,
        user_id: Some(user_id.as_i64()),
    }
}

/// Create a signed token of `kind` for `user_id`.
///
/// # Errors
/// Returns [Error::TokenCreation] if signing fails.
pub fn encode_token(kind: TokenKind, user_id: UserID, key: &EncodingKey) -> Result<String, Error> {
    let claims = build_claims(kind, user_id, OffsetDateTime::now_utc());

    encode(&Header::default(), &claims, key).map_err(|error| {
        tracing::error!("could not sign a token: {error}");
        Error::TokenCreation(error.to_string())
    })
}

/// Verify a token's signature and expiry and extract the user it was issued
/// to.
pub fn decode_token(token: &str, key: &DecodingKey) -> Result<UserID, TokenError> {
    let mut validation = Validation::default();
    // The default 60 second leeway would keep expired tokens alive.
    validation.leeway = 0;

    let token_data = decode::<Claims>(token, key, &validation).map_err(|error| {
        match error.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Malformed,
        }
    })?;

    match token_data.claims.user_id {
        Some(user_id) => Ok(UserID::new(user_id)),
        None => Err(TokenError::MissingClaim),
    }
}
