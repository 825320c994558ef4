//! Defines the app level error type and its conversion to JSON error responses.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// The request could not be tied to an active user.
    ///
    /// The message is sent to the client verbatim, so it should say what went
    /// wrong (e.g., an expired access token) without leaking server internals.
    #[error("authentication failed: {0}")]
    AuthenticationFailed(String),

    /// The request was authenticated but is not allowed, e.g., it failed the
    /// CSRF check.
    #[error("permission denied: {0}")]
    PermissionDenied(String),

    /// The client sent data that does not pass validation.
    #[error("{0}")]
    Validation(String),

    /// The user provided a password that is too easy to guess.
    #[error("password is too weak: {0}")]
    TooWeak(String),

    /// The email address is already registered.
    #[error("the email is already in use")]
    DuplicateEmail,

    /// The user already has a category or priority with the given name.
    #[error("the name is already in use")]
    DuplicateName,

    /// A category or priority ID did not refer to a row the user may use.
    #[error("invalid category or priority")]
    InvalidForeignKey,

    /// The activation token did not match a pending registration.
    #[error("no account to activate")]
    NoAccountToActivate,

    /// The requested page number is past the end of the result set.
    #[error("the requested page is out of range")]
    InvalidPage,

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unexpected error occurred with the underlying hashing library.
    ///
    /// The error string should only be logged for debugging on the server,
    /// never sent to the client.
    #[error("hashing failed: {0}")]
    HashingError(String),

    /// A JSON Web Token could not be created.
    #[error("could not create token: {0}")]
    TokenCreation(String),

    /// Could not acquire the database lock.
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            // Code 2067 occurs when a UNIQUE constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067 && desc.contains("user.email") =>
            {
                Error::DuplicateEmail
            }
            rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
                if sql_error.extended_code == 2067
                    && (desc.contains("category.name") || desc.contains("priority.name")) =>
            {
                Error::DuplicateName
            }
            // Code 787 occurs when a FOREIGN KEY constraint failed.
            rusqlite::Error::SqliteFailure(sql_error, Some(_))
                if sql_error.extended_code == 787 =>
            {
                Error::InvalidForeignKey
            }
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::SqlError(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (status_code, detail) = match self {
            Error::AuthenticationFailed(message) => (StatusCode::UNAUTHORIZED, message),
            Error::PermissionDenied(message) => (StatusCode::FORBIDDEN, message),
            Error::Validation(message) => (StatusCode::BAD_REQUEST, message),
            Error::TooWeak(feedback) => (
                StatusCode::BAD_REQUEST,
                format!("Password is too weak: {feedback}"),
            ),
            Error::DuplicateEmail => (
                StatusCode::BAD_REQUEST,
                "user with this email address already exists.".to_owned(),
            ),
            Error::DuplicateName => (
                StatusCode::BAD_REQUEST,
                "This name is already in use.".to_owned(),
            ),
            Error::InvalidForeignKey => (
                StatusCode::BAD_REQUEST,
                "Invalid category or priority".to_owned(),
            ),
            Error::NoAccountToActivate => (
                StatusCode::NOT_FOUND,
                "No account to activate".to_owned(),
            ),
            Error::InvalidPage => (StatusCode::NOT_FOUND, "Invalid page.".to_owned()),
            Error::NotFound => (StatusCode::NOT_FOUND, "Not found.".to_owned()),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_owned(),
                )
            }
        };

        (status_code, Json(json!({ "detail": detail }))).into_response()
    }
}

#[cfg(test)]
mod error_tests {
    use axum::{http::StatusCode, response::IntoResponse};

    use crate::Error;

    #[test]
    fn unique_email_constraint_maps_to_duplicate_email() {
        let sql_error = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ffi::ErrorCode::ConstraintViolation,
                extended_code: 2067,
            },
            Some("UNIQUE constraint failed: user.email".to_owned()),
        );

        assert_eq!(Error::from(sql_error), Error::DuplicateEmail);
    }

    #[test]
    fn unique_name_constraint_maps_to_duplicate_name() {
        let sql_error = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error {
                code: rusqlite::ffi::ErrorCode::ConstraintViolation,
                extended_code: 2067,
            },
            Some("UNIQUE constraint failed: category.user_id, category.name".to_owned()),
        );

        assert_eq!(Error::from(sql_error), Error::DuplicateName);
    }

    #[test]
    fn no_rows_maps_to_not_found() {
        assert_eq!(
            Error::from(rusqlite::Error::QueryReturnedNoRows),
            Error::NotFound
        );
    }

    #[test]
    fn authentication_error_produces_401() {
        let response =
            Error::AuthenticationFailed("access_token expired".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn csrf_error_produces_403() {
        let response =
            Error::PermissionDenied("CSRF Failed: CSRF cookie not set.".to_owned()).into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn internal_errors_produce_500() {
        let response = Error::DatabaseLockError.into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
