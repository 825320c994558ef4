//! Defines the interface for creating and querying expenses.

use std::ops::RangeInclusive;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::Date;

use crate::{
    Error,
    models::{DatabaseID, Expense, UserID},
};

/// The user supplied fields of an expense.
///
/// Used both when creating an expense and when updating one. The `day` and
/// the owner are deliberately absent: the server assigns them at creation and
/// they never change.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseData {
    /// The amount of money spent.
    pub price: Decimal,
    /// Where the money was spent.
    pub place: String,
    /// The category to file the expense under, if any.
    pub category_id: Option<DatabaseID>,
    /// The priority rank of the expense, if any.
    pub priority_id: Option<DatabaseID>,
}

/// A filter describing which of a user's expenses to fetch.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseQuery {
    /// Whose expenses to fetch.
    pub user_id: UserID,
    /// Only include expenses recorded within this date range (inclusive on
    /// both ends).
    pub date_range: RangeInclusive<Date>,
    /// Only include expenses filed under this category.
    pub category_id: Option<DatabaseID>,
    /// Only include expenses with this priority.
    pub priority_id: Option<DatabaseID>,
}

/// The total amount spent in one month of a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    /// The month number, 1 (January) through 12 (December).
    pub month: u8,
    /// The sum of the prices of the month's expenses.
    pub total: Decimal,
}

/// Handles the creation and retrieval of [Expense] objects.
pub trait ExpenseStore {
    /// Create a new expense owned by `user_id`, recorded on `day`.
    ///
    /// # Errors
    /// Returns [Error::InvalidForeignKey] if the category or priority does not
    /// exist, or [Error::SqlError] if an SQL related error occurred.
    fn create(&self, user_id: UserID, day: Date, data: ExpenseData) -> Result<Expense, Error>;

    /// Get the expense with the specified `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such expense.
    fn get(&self, id: DatabaseID) -> Result<Expense, Error>;

    /// Get all expenses matching `query`, in insertion order.
    fn get_query(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, Error>;

    /// Replace the user supplied fields of the expense with the specified `id`
    /// and return the updated row.
    ///
    /// The expense's `day` and owner are left untouched.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such expense.
    fn update(&self, id: DatabaseID, data: ExpenseData) -> Result<Expense, Error>;

    /// Delete the expense with the specified `id`.
    ///
    /// # Errors
    /// Returns [Error::NotFound] if there is no such expense.
    fn delete(&self, id: DatabaseID) -> Result<(), Error>;

    /// Sum the user's expenses for each month of `year`.
    ///
    /// Months with no expenses are omitted from the result. The result is
    /// sorted by month.
    fn monthly_totals(&self, user_id: UserID, year: i32) -> Result<Vec<MonthlyTotal>, Error>;
}
