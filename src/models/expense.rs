//! This file defines the `Expense` type, a single purchase made by a user.

use std::str::FromStr;

use rusqlite::{
    Connection, Row,
    types::Type,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    db::{CreateTable, MapRow},
    models::{DatabaseID, UserID},
};

/// A single purchase made by a user.
///
/// The `day` is assigned by the server when the expense is created and never
/// changes afterwards, so an expense always stays in the period it was
/// recorded in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    /// The ID of the expense.
    pub id: DatabaseID,
    /// The ID of the user that recorded the expense.
    #[serde(skip)]
    pub user_id: UserID,
    /// The calendar date the expense was recorded on.
    pub day: Date,
    /// The amount of money spent.
    ///
    /// Stored as an exact decimal, serialized as a string (e.g., `"12.50"`)
    /// so clients do not lose precision to floating point.
    pub price: Decimal,
    /// Where the money was spent.
    pub place: String,
    /// The category the expense is filed under, if any.
    #[serde(rename = "category")]
    pub category_id: Option<DatabaseID>,
    /// The priority rank of the expense, if any.
    #[serde(rename = "priority")]
    pub priority_id: Option<DatabaseID>,
}

impl CreateTable for Expense {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS expense (
                    id INTEGER PRIMARY KEY,
                    user_id INTEGER NOT NULL,
                    day TEXT NOT NULL,
                    price TEXT NOT NULL,
                    place TEXT NOT NULL,
                    category_id INTEGER,
                    priority_id INTEGER,
                    FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    FOREIGN KEY(category_id) REFERENCES category(id) ON UPDATE CASCADE ON DELETE CASCADE,
                    FOREIGN KEY(priority_id) REFERENCES priority(id) ON UPDATE CASCADE ON DELETE CASCADE
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for Expense {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self, rusqlite::Error> {
        let raw_price: String = row.get(offset + 3)?;
        let price = Decimal::from_str(&raw_price).map_err(|error| {
            rusqlite::Error::FromSqlConversionFailure(offset + 3, Type::Text, Box::new(error))
        })?;

        Ok(Self {
            id: row.get(offset)?,
            user_id: UserID::new(row.get(offset + 1)?),
            day: row.get(offset + 2)?,
            price,
            place: row.get(offset + 4)?,
            category_id: row.get(offset + 5)?,
            priority_id: row.get(offset + 6)?,
        })
    }
}
