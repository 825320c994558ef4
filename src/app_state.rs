//! The state shared between route handlers.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    Error,
    auth::JwtKeys,
    db::initialize,
    pagination::PaginationConfig,
    stores::{
        SQLiteActivationStore, SQLiteCategoryStore, SQLiteExpenseStore, SQLitePriorityStore,
        SQLiteUserStore,
    },
};

/// The state shared between the route handlers.
#[derive(Clone)]
pub struct AppState {
    /// The keys for signing and verifying auth tokens.
    pub jwt_keys: JwtKeys,
    /// How the expense list endpoint pages its results.
    pub pagination_config: PaginationConfig,
    /// The store for user accounts.
    pub user_store: SQLiteUserStore,
    /// The store for expense categories.
    pub category_store: SQLiteCategoryStore,
    /// The store for priority ranks.
    pub priority_store: SQLitePriorityStore,
    /// The store for expenses.
    pub expense_store: SQLiteExpenseStore,
    /// The store for pending account activations.
    pub activation_store: SQLiteActivationStore,
}

impl AppState {
    /// Create the application state, initializing the database schema if
    /// needed.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if the schema could not be created.
    pub fn new(
        connection: Connection,
        jwt_secret: &str,
        pagination_config: PaginationConfig,
    ) -> Result<Self, Error> {
        initialize(&connection)?;

        let connection = Arc::new(Mutex::new(connection));

        Ok(Self {
            jwt_keys: JwtKeys::new(jwt_secret),
            pagination_config,
            user_store: SQLiteUserStore::new(connection.clone()),
            category_store: SQLiteCategoryStore::new(connection.clone()),
            priority_store: SQLitePriorityStore::new(connection.clone()),
            expense_store: SQLiteExpenseStore::new(connection.clone()),
            activation_store: SQLiteActivationStore::new(connection),
        })
    }
}
