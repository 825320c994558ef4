/*! This module defines and implements traits for interacting with the application's database. */

use rusqlite::{Connection, Row, Transaction as SqlTransaction};

use crate::{
    Error,
    models::{ActivationRecord, Category, Expense, Priority, User},
};

/// A trait for adding an object schema to a database.
pub trait CreateTable {
    /// Create a table for the model.
    ///
    /// # Errors
    /// Returns an error if there is an SQL error.
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error>;
}

/// A trait for mapping from a `rusqlite::Row` from a SQLite database to a concrete rust type.
pub trait MapRow {
    /// The type the row is mapped to.
    type ReturnType;

    /// Convert a row into a concrete type.
    ///
    /// **Note:** This function expects that the row object contains all the
    /// table columns in the order they were defined.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row(row: &Row) -> Result<Self::ReturnType, rusqlite::Error> {
        Self::map_row_with_offset(row, 0)
    }

    /// Convert a row into a concrete type, reading from the column at `offset`.
    ///
    /// This is useful in cases where tables have been joined and you want to
    /// construct two different types from the one query.
    ///
    /// # Errors
    /// Returns an error if a row item cannot be converted into the
    /// corresponding rust type, or if an invalid column index was used.
    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error>;
}

/// Create the tables for all the application's models.
///
/// Tables that already exist are left untouched, so this is safe to call on an
/// existing database file.
///
/// # Errors
/// Returns an error if a table could not be created.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    User::create_table(&transaction)?;
    Category::create_table(&transaction)?;
    Priority::create_table(&transaction)?;
    Expense::create_table(&transaction)?;
    ActivationRecord::create_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
