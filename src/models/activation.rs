//! This file defines the activation record created at registration time.
//!
//! A registration creates an inactive user plus one of these records. Visiting
//! the activation link consumes the record and flips the user to active.

use email_address::EmailAddress;
use rand::{Rng, distributions::Alphanumeric};
use rusqlite::{Connection, Row};
use time::OffsetDateTime;

use crate::db::{CreateTable, MapRow};

/// The number of characters in an activation token.
pub const ACTIVATION_TOKEN_LENGTH: usize = 30;

/// Generate a random alphanumeric activation token.
pub fn generate_activation_token() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(ACTIVATION_TOKEN_LENGTH)
        .map(char::from)
        .collect()
}

/// A pending account activation.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivationRecord {
    /// The email address of the user waiting to be activated.
    pub email: EmailAddress,
    /// The opaque token sent to the user.
    pub token: String,
    /// When the registration happened.
    pub created_at: OffsetDateTime,
}

impl CreateTable for ActivationRecord {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS activation (
                    id INTEGER PRIMARY KEY,
                    email TEXT NOT NULL,
                    token TEXT UNIQUE NOT NULL,
                    created_at TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for ActivationRecord {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        let raw_email: String = row.get(offset + 1)?;

        Ok(Self {
            email: EmailAddress::new_unchecked(raw_email),
            token: row.get(offset + 2)?,
            created_at: row.get(offset + 3)?,
        })
    }
}
