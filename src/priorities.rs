//! Endpoints for managing a user's priority ranks.
//!
//! These mirror the category endpoints: priorities belong to their creator
//! and another user's priorities answer 404.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::AuthUser,
    models::{DatabaseID, Priority, PriorityName, User},
    stores::PriorityStore,
};

/// The payload for creating or renaming a priority.
#[derive(Debug, Clone, Deserialize)]
pub struct PriorityData {
    /// The priority's display name.
    #[serde(default)]
    pub name: String,
}

/// Handler for listing the logged-in user's priorities.
pub async fn get_priorities(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Priority>>, Error> {
    state.priority_store.get_by_user(user.id()).map(Json)
}

/// Handler for creating a priority.
pub async fn create_priority(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(data): Json<PriorityData>,
) -> Result<(StatusCode, Json<Priority>), Error> {
    let name = PriorityName::new(&data.name)?;
    let priority = state.priority_store.create(name, user.id())?;

    Ok((StatusCode::CREATED, Json(priority)))
}

/// Handler for fetching a single priority.
pub async fn get_priority(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(priority_id): Path<DatabaseID>,
) -> Result<Json<Priority>, Error> {
    get_owned_priority(&state, &user, priority_id).map(Json)
}

/// Handler for renaming a priority.
pub async fn update_priority(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(priority_id): Path<DatabaseID>,
    Json(data): Json<PriorityData>,
) -> Result<Json<Priority>, Error> {
    get_owned_priority(&state, &user, priority_id)?;

    let name = PriorityName::new(&data.name)?;

    state.priority_store.update(priority_id, name).map(Json)
}

/// Handler for deleting a priority.
///
/// Expenses carrying the priority are deleted along with it.
pub async fn delete_priority(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(priority_id): Path<DatabaseID>,
) -> Result<StatusCode, Error> {
    get_owned_priority(&state, &user, priority_id)?;

    state.priority_store.delete(priority_id)?;

    Ok(StatusCode::NO_CONTENT)
}

fn get_owned_priority(
    state: &AppState,
    user: &User,
    priority_id: DatabaseID,
) -> Result<Priority, Error> {
    let priority = state.priority_store.get(priority_id)?;

    if priority.user_id != user.id() {
        return Err(Error::NotFound);
    }

    Ok(priority)
}
