//! Defines the interface for creating and retrieving users.

use email_address::EmailAddress;

use crate::{
    Error,
    models::{PasswordHash, User, UserID},
};

/// Handles the creation and retrieval of [User] objects.
pub trait UserStore {
    /// Create a new, inactive user.
    ///
    /// The user's names start out empty and `date_joined` is set to the
    /// current time.
    ///
    /// # Errors
    /// Returns [Error::DuplicateEmail] if `email` is already registered, or
    /// [Error::SqlError] if an SQL related error occurred.
    fn create(&self, email: EmailAddress, password_hash: PasswordHash) -> Result<User, Error>;

    /// Get the user with the specified `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such user.
    fn get(&self, id: UserID) -> Result<User, Error>;

    /// Get the user with the specified `email` address.
    ///
    /// Takes a raw string since this is used to look up whatever the client
    /// typed into the sign-in form.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such user.
    fn get_by_email(&self, email: &str) -> Result<User, Error>;

    /// Mark the user with the specified `email` address as active and return
    /// the updated user.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such user.
    fn activate(&self, email: &str) -> Result<User, Error>;

    /// Set the user's first and last name and return the updated user.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such user.
    fn update_profile(
        &self,
        id: UserID,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, Error>;

    /// Replace the user's password hash.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such user.
    fn update_password(&self, id: UserID, password_hash: PasswordHash) -> Result<(), Error>;
}
