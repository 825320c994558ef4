//! Endpoints for managing a user's expense categories.
//!
//! Category objects belong to the user that created them. Requests for a
//! category owned by someone else answer 404 rather than 403, so the endpoint
//! does not reveal which IDs exist.

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;

use crate::{
    AppState, Error,
    auth::AuthUser,
    models::{Category, CategoryName, DatabaseID, User},
    stores::CategoryStore,
};

/// The payload for creating or renaming a category.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryData {
    /// The category's display name.
    #[serde(default)]
    pub name: String,
}

/// Handler for listing the logged-in user's categories.
pub async fn get_categories(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Category>>, Error> {
    state.category_store.get_by_user(user.id()).map(Json)
}

/// Handler for creating a category.
pub async fn create_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Json(data): Json<CategoryData>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let name = CategoryName::new(&data.name)?;
    let category = state.category_store.create(name, user.id())?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// Handler for fetching a single category.
pub async fn get_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(category_id): Path<DatabaseID>,
) -> Result<Json<Category>, Error> {
    get_owned_category(&state, &user, category_id).map(Json)
}

/// Handler for renaming a category.
pub async fn update_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(category_id): Path<DatabaseID>,
    Json(data): Json<CategoryData>,
) -> Result<Json<Category>, Error> {
    get_owned_category(&state, &user, category_id)?;

    let name = CategoryName::new(&data.name)?;

    state.category_store.update(category_id, name).map(Json)
}

/// Handler for deleting a category.
///
/// Expenses filed under the category are deleted along with it.
pub async fn delete_category(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(category_id): Path<DatabaseID>,
) -> Result<StatusCode, Error> {
    get_owned_category(&state, &user, category_id)?;

    state.category_store.delete(category_id)?;

    Ok(StatusCode::NO_CONTENT)
}

fn get_owned_category(
    state: &AppState,
    user: &User,
    category_id: DatabaseID,
) -> Result<Category, Error> {
    let category = state.category_store.get(category_id)?;

    if category.user_id != user.id() {
        return Err(Error::NotFound);
    }

    Ok(category)
}
