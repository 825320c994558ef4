//! This file defines the `Category` type, a user defined label for grouping
//! expenses (e.g., 'Groceries', 'Rent').

use std::fmt::Display;

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::{CreateTable, MapRow},
    models::{DatabaseID, UserID},
};

/// The maximum length of a category or priority name, in characters.
pub(crate) const MAX_NAME_LENGTH: usize = 20;

/// The name of a category.
///
/// Non-empty and at most twenty characters.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryName(String);

impl CategoryName {
    /// Create a category name.
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

    /// Create a category name without validation.
    ///
    /// The caller should ensure that the string is not empty.
    pub fn new_unchecked(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl AsRef<str> for CategoryName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Display for CategoryName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Shared validation for category and priority names.
pub(crate) fn validate_name(name: &str) -> Result<String, Error> {
    let name = name.trim();

    if name.is_empty() {
        return Err(Error::Validation("This field may not be blank.".to_owned()));
    }

    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(Error::Validation(format!(
            "Ensure this field has no more than {MAX_NAME_LENGTH} characters."
        )));
    }

    Ok(name.to_owned())
}

/// A category for expenses, e.g., 'Groceries', 'Eating Out', 'Rent'.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    /// The ID of the category.
    pub id: DatabaseID,
    /// The name of the category.
    pub name: CategoryName,
    /// The ID of the user that owns the category.
    #[serde(rename = "user")]
    pub user_id: UserID,
}

impl CreateTable for Category {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS category (
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

impl MapRow for Category {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        let raw_name: String = row.get(offset + 1)?;

        Ok(Self {
            id: row.get(offset)?,
            name: CategoryName::new_unchecked(&raw_name),
            user_id: UserID::new(row.get(offset + 2)?),
        })
    }
}

#[cfg(test)]
mod category_name_tests {
    use crate::{
        Error,
        models::category::{CategoryName, MAX_NAME_LENGTH},
    };

    #[test]
    fn new_fails_on_empty_string() {
        let category_name = CategoryName::new("");

        assert!(matches!(category_name, Err(Error::Validation(_))));
    }

    #[test]
    fn new_fails_on_whitespace_only_string() {
        let category_name = CategoryName::new("   ");

        assert!(matches!(category_name, Err(Error::Validation(_))));
    }

    #[test]
    fn new_fails_on_too_long_string() {
        let category_name = CategoryName::new(&"a".repeat(MAX_NAME_LENGTH + 1));

        assert!(matches!(category_name, Err(Error::Validation(_))));
    }

    #[test]
    fn new_trims_whitespace() {
        let category_name = CategoryName::new("  Groceries ").unwrap();

        assert_eq!(category_name.as_ref(), "Groceries");
    }

    #[test]
    fn new_succeeds_on_non_empty_string() {
        let category_name = CategoryName::new("🔥");

        assert!(category_name.is_ok())
    }
}
