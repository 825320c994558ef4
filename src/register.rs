//! The registration and account activation endpoints.
//!
//! Registering creates an inactive account and a single-use activation token.
//! The token would normally be emailed to the user; until a mail provider is
//! wired up it is written to the server log so an operator can pass it on.

use std::str::FromStr;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use email_address::EmailAddress;
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    models::{PasswordHash, ValidatedPassword, generate_activation_token},
    stores::{ActivationStore, UserStore},
};

/// The data a client registers with.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterData {
    /// The email address to register.
    pub email: String,
    /// The password for the new account, in plain text.
    pub password: String,
}

/// Handler for creating a new, inactive account.
///
/// # Errors
/// Returns [Error::Validation] for an invalid email address,
/// [Error::TooWeak] for a password that is too easy to guess, and
/// [Error::DuplicateEmail] when the address is already registered.
pub async fn register_user(
    State(state): State<AppState>,
    Json(data): Json<RegisterData>,
) -> Result<(StatusCode, Json<serde_json::Value>), Error> {
    let email = EmailAddress::from_str(&data.email)
        .map_err(|_| Error::Validation("Enter a valid email address.".to_owned()))?;

    let password = ValidatedPassword::new(&data.password)?;
    let password_hash = PasswordHash::new(password, PasswordHash::DEFAULT_COST)?;

    let user = state.user_store.create(email.clone(), password_hash)?;

    let token = generate_activation_token();
    state.activation_store.create(&email, &token)?;

    tracing::info!("activation token for {email}: {token}");

    Ok((
        StatusCode::CREATED,
        Json(json!({ "id": user.id().as_i64(), "email": email.to_string() })),
    ))
}

/// Handler for activating an account with the token from registration.
///
/// The token is consumed on first use, successful or not.
///
/// # Errors
/// Returns [Error::NoAccountToActivate] when the token is unknown, already
/// used, or the account it points at no longer exists.
pub async fn activate_account(
    State(state): State<AppState>,
    Path(token): Path<String>,
) -> Result<Json<serde_json::Value>, Error> {
    let record = state
        .activation_store
        .take(&token)
        .map_err(|error| match error {
            Error::NotFound => Error::NoAccountToActivate,
            error => error,
        })?;

    state
        .user_store
        .activate(record.email.as_str())
        .map_err(|error| match error {
            Error::NotFound => Error::NoAccountToActivate,
            error => error,
        })?;

    Ok(Json(json!({ "detail": "Account successfully activated" })))
}

#[cfg(test)]
mod register_tests {
    use axum::{
        Router,
        http::StatusCode,
        routing::{get, post},
    };
    use axum_test::TestServer;
    use rusqlite::Connection;
    use serde_json::{Value, json};

    use crate::{
        AppState, PaginationConfig,
        stores::{ActivationStore, UserStore},
    };

    use super::{activate_account, register_user};

    const EMAIL: &str = "new@test.dev";
    const PASSWORD: &str = "correcthorsebatterystaple25";

    fn get_state() -> AppState {
        let connection = Connection::open_in_memory().unwrap();

        AppState::new(connection, "a test secret", PaginationConfig::default()).unwrap()
    }

    fn get_server(state: &AppState) -> TestServer {
        let router = Router::new()
            .route("/register", post(register_user))
            .route("/activate/{token}", get(activate_account))
            .with_state(state.clone());

        TestServer::new(router)
    }

    #[tokio::test]
    async fn register_creates_inactive_account() {
        let state = get_state();

        let response = get_server(&state)
            .post("/register")
            .json(&json!({ "email": EMAIL, "password": PASSWORD }))
            .await;

        assert_eq!(response.status_code(), StatusCode::CREATED);

        let body: Value = response.json();
        assert_eq!(body["email"], EMAIL);

        let user = state.user_store.get_by_email(EMAIL).unwrap();
        assert!(!user.is_active());
    }

    #[tokio::test]
    async fn register_rejects_invalid_email() {
        let state = get_state();

        let response = get_server(&state)
            .post("/register")
            .json(&json!({ "email": "not an email", "password": PASSWORD }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "detail": "Enter a valid email address." })
        );
    }

    #[tokio::test]
    async fn register_rejects_weak_password() {
        let state = get_state();

        let response = get_server(&state)
            .post("/register")
            .json(&json!({ "email": EMAIL, "password": "password" }))
            .await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);

        let body: Value = response.json();
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.starts_with("Password is too weak"), "{detail}");
    }

    #[tokio::test]
    async fn register_rejects_duplicate_email() {
        let state = get_state();
        let server = get_server(&state);
        let payload = json!({ "email": EMAIL, "password": PASSWORD });

        server.post("/register").json(&payload).await;
        let response = server.post("/register").json(&payload).await;

        assert_eq!(response.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            response.json::<Value>(),
            json!({ "detail": "user with this email address already exists." })
        );
    }

    #[tokio::test]
    async fn activation_token_activates_the_account_once() {
        let state = get_state();
        let server = get_server(&state);

        server
            .post("/register")
            .json(&json!({ "email": EMAIL, "password": PASSWORD }))
            .await;

        // The handler logs the token instead of emailing it, so the test
        // plants its own.
        let email = EMAIL.parse().unwrap();
        state.activation_store.create(&email, "test-token").unwrap();

        let response = server.get("/activate/test-token").await;

        assert_eq!(response.status_code(), StatusCode::OK);
        assert_eq!(
            response.json::<Value>(),
            json!({ "detail": "Account successfully activated" })
        );
        assert!(state.user_store.get_by_email(EMAIL).unwrap().is_active());

        let reused = server.get("/activate/test-token").await;
        assert_eq!(reused.status_code(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unknown_activation_token_is_rejected() {
        let state = get_state();

        let response = get_server(&state).get("/activate/bogus").await;

        assert_eq!(response.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.json::<Value>(),
            json!({ "detail": "No account to activate" })
        );
    }
}
