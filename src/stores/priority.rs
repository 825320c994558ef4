//! Defines the interface for creating and retrieving expense priorities.

use crate::{
    Error,
    models::{DatabaseID, Priority, PriorityName, UserID},
};

/// Handles the creation and retrieval of [Priority] objects.
pub trait PriorityStore {
    /// Create a new priority owned by `user_id`.
    ///
    /// # Errors
    /// Returns [Error::DuplicateName] if the user already has a priority with
    /// this name, or [Error::SqlError] if an SQL related error occurred.
    fn create(&self, name: PriorityName, user_id: UserID) -> Result<Priority, Error>;

    /// Get the priority with the specified `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such priority.
    fn get(&self, id: DatabaseID) -> Result<Priority, Error>;

    /// Get all priorities owned by `user_id`, in insertion order.
    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Priority>, Error>;

    /// Rename the priority with the specified `id` and return the updated row.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such priority, or
    /// [Error::DuplicateName] if the owner already has a priority called
    /// `name`.
    fn update(&self, id: DatabaseID, name: PriorityName) -> Result<Priority, Error>;

    /// Delete the priority with the specified `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such priority.
    fn delete(&self, id: DatabaseID) -> Result<(), Error>;
}
