//! This file defines the `Priority` type, a user defined label for ranking how
//! necessary an expense was (e.g., 'Essential', 'Impulse buy').

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, UserID, category::validate_name},
};

/// The name of a priority.
///
/// Non-empty and at most twenty characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityName(String);

impl PriorityName {
    /// Create a priority name.
    ///
    /// Leading and trailing whitespace is removed.
    ///
    /// # Errors
    ///
    /// Returns [Error::Validation] if `name` is blank or longer than twenty
    /// characters.
    pub fn new(name: &str) -> Result<Self, Error> {
        validate_name(name).map(Self)
    }

    /// Create a priority name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for PriorityName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for PriorityName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A priority rank for expenses, e.g., 'Essential', 'Nice to have'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Priority {
    /// The ID of the priority.
    pub id: DatabaseID,
    /// The name of the priority.
    pub name: PriorityName,
    /// The ID of the user that owns the priority.
    #[serde(rename = "user")]
    pub user_id: UserID,
}

impl CreateTable for Priority {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS priority (
                    id INTEGER PRIMARY KEY,
                    name TEXT NOT NULL,
                    user_id INTEGER NOT NULL,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    UNIQUE(user_id, name)
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Priority {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        let raw_name: String = row.get(offset + 1)?;

        Ok(Self {
            id: row.get(offset)?,
            name: PriorityName::new_unchecked(&raw_name),
            user_id: UserID::new(row.get(offset + 2)?),
        })
    }
}
