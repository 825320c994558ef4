//! Endpoints for viewing and updating the logged-in user's own account.

use axum::{Json, extract::State};
use serde::Deserialize;
use serde_json::json;

use crate::{
    AppState, Error,
    auth::AuthUser,
    models::{PasswordHash, UserProfile, ValidatedPassword},
    stores::UserStore,
};

/// Handler for fetching the logged-in user's profile.
pub async fn get_profile(AuthUser(user): AuthUser) -> Json<serde_json::Value> {
    Json(json!({ "user": UserProfile::from(&user) }))
}

/// The editable parts of a profile.
#[derive(Debug, Clone, Deserialize)]
pub struct ProfileUpdate {
    /// The user's given name.
    #[serde(default)]
    pub first_name: String,
    /// The user's family name.
    #[serde(default)]
    pub last_name: String,
}

/// Handler for updating the logged-in user's name.
pub async fn update_profile(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(update): Json<ProfileUpdate>,
) -> Result<Json<serde_json::Value>, Error> {
    let user = state
        .user_store
        .update_profile(user.id(), &update.first_name, &update.last_name)?;

    Ok(Json(json!({
        "first_name": user.first_name(),
        "last_name": user.last_name(),
    })))
}

/// The payload for changing a password.
#[derive(Debug, Clone, Deserialize)]
pub struct PasswordChange {
    /// The current password, to prove the request comes from the owner.
    #[serde(default)]
    pub password: Option<String>,
    /// The password to change to.
    #[serde(default)]
    pub new_password: Option<String>,
    /// The new password again, to catch typos.
    #[serde(default)]
    pub retyped_new_password: Option<String>,
}

/// Handler for changing the logged-in user's password.
///
/// # Errors
/// Returns [Error::AuthenticationFailed] when a field is missing, the
/// current password is wrong, or the two copies of the new password differ,
/// and [Error::TooWeak] when the new password is too easy to guess.
pub async fn change_password(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(change): Json<PasswordChange>,
) -> Result<Json<serde_json::Value>, Error> {
    let (Some(password), Some(new_password), Some(retyped_new_password)) = (
        change.password,
        change.new_password,
        change.retyped_new_password,
    ) else {
        return Err(Error::AuthenticationFailed(
            "All fields are required".to_owned(),
        ));
    };

    let password_matches = user
        .password_hash()
        .verify(&password)
        .map_err(|error| Error::HashingError(error.to_string()))?;

    if !password_matches {
        return Err(Error::AuthenticationFailed(
            "Invalid email or password".to_owned(),
        ));
    }

    if new_password != retyped_new_password {
        return Err(Error::AuthenticationFailed(
            "The new password and retyped password must be the same".to_owned(),
        ));
    }

    let validated = ValidatedPassword::new(&new_password)?;
    let password_hash = PasswordHash::new(validated, PasswordHash::DEFAULT_COST)?;

    state.user_store.update_password(user.id(), password_hash)?;

    Ok(Json(json!({ "detail": "New password has been set" })))
}
