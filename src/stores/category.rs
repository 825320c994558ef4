//! Defines the interface for creating and retrieving expense categories.

use crate::{
    Error,
    models::{Category, CategoryName, DatabaseID, UserID},
};

/// Handles the creation and retrieval of [Category] objects.
pub trait CategoryStore {
    /// Create a new category owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::DuplicateName] if the user already has a category with
    /// this name, or [Error::SqlError] if an SQL related error occurred.
    fn create(&self, name: CategoryName, user_id: UserID) -> Result<Category, Error>;

    /// Get the category with the specified `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such category.
    fn get(&self, id: DatabaseID) -> Result<Category, Error>;

    /// Get all categories owned by `user_id`, in insertion order.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Category>, Error>;

    /// Rename the category with the specified `id` and return the updated row.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such category, or
    /// [Error::DuplicateName] if the owner already has a category called
    /// `name`.
    fn update(&self, id: DatabaseID, name: CategoryName) -> Result<Category, Error>;

    /// Delete the category with the specified `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such category.
    fn delete(&self, id: DatabaseID) -> Result<(), Error>;
}
