//! Defines the interface for storing pending account activations.

use email_address::EmailAddress;

use crate::{Error, models::ActivationRecord};

/// Handles the creation and consumption of [ActivationRecord] objects.
pub trait ActivationStore {
    /// Store a pending activation for `email` under the opaque `token`.
    ///
    /// # Errors
    /// Returns [Error::SqlError] if an SQL related error occurred.
    fn create(&self, email: &EmailAddress, token: &str) -> Result<ActivationRecord, Error>;

    /// Fetch and delete the activation record for `token`.
    ///
    /// Each token can be redeemed exactly once, a second call with the same
    /// token returns [Error::NotFound].
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no record for `token`.
    fn take(&self, token: &str) -> Result<ActivationRecord, Error>;
}
