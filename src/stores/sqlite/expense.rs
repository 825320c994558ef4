//! Implements a SQLite backed expense store.
use std::{
    collections::BTreeMap,
    str::FromStr,
    sync::{Arc, Mutex},
};

use rusqlite::{Connection, named_params, params_from_iter, types::Value};
use rust_decimal::Decimal;
use time::{Date, Month};

use crate::{
    Error,
    db::MapRow,
    models::{DatabaseID, Expense, UserID},
    stores::{ExpenseData, ExpenseQuery, ExpenseStore, MonthlyTotal},
};

const EXPENSE_COLUMNS: &str = "id, user_id, day, price, place, category_id, priority_id";

/// Handles the creation and retrieval of [Expense] objects in a SQLite database.
#[derive(Clone)]
pub struct SQLiteExpenseStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteExpenseStore {
    /// Create a new expense store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }

    fn get_by_id(connection: &Connection, id: DatabaseID) -> Result<Expense, Error> {
        connection
            .prepare(&format!(
                "SELECT {EXPENSE_COLUMNS} FROM expense WHERE id = :id"
            ))?
            .query_row(named_params! { ":id": id }, Expense::map_row)
            .map_err(|error| error.into())
    }
}

impl ExpenseStore for SQLiteExpenseStore {
    fn create(&self, user_id: UserID, day: Date, data: ExpenseData) -> Result<Expense, Error> {
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO expense (user_id, day, price, place, category_id, priority_id) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            (
                user_id.as_i64(),
                &day,
                &data.price.to_string(),
                &data.place,
                data.category_id,
                data.priority_id,
            ),
        )?;

        Ok(Expense {
            id: connection.last_insert_rowid(),
            user_id,
            day,
            price: data.price,
            place: data.place,
            category_id: data.category_id,
            priority_id: data.priority_id,
        })
    }

    fn get(&self, id: DatabaseID) -> Result<Expense, Error> {
        let connection = self.lock()?;

        Self::get_by_id(&connection, id)
    }

    fn get_query(&self, query: &ExpenseQuery) -> Result<Vec<Expense>, Error> {
        let mut where_clause_parts = vec!["user_id = ?1".to_owned()];
        let mut query_parameters = vec![Value::Integer(query.user_id.as_i64())];

        where_clause_parts.push(format!(
            "day BETWEEN ?{} AND ?{}",
            query_parameters.len() + 1,
            query_parameters.len() + 2
        ));
        query_parameters.push(Value::Text(query.date_range.start().to_string()));
        query_parameters.push(Value::Text(query.date_range.end().to_string()));

        if let Some(category_id) = query.category_id {
            where_clause_parts.push(format!("category_id = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Integer(category_id));
        }

        if let Some(priority_id) = query.priority_id {
            where_clause_parts.push(format!("priority_id = ?{}", query_parameters.len() + 1));
            query_parameters.push(Value::Integer(priority_id));
        }

        let sql = format!(
            "SELECT {EXPENSE_COLUMNS} FROM expense WHERE {} ORDER BY id ASC",
            where_clause_parts.join(" AND ")
        );

        self.lock()?
            .prepare(&sql)?
            .query_map(params_from_iter(query_parameters), Expense::map_row)?
            .map(|maybe_expense| maybe_expense.map_err(Error::SqlError))
            .collect()
    }

    fn update(&self, id: DatabaseID, data: ExpenseData) -> Result<Expense, Error> {
        let connection = self.lock()?;

        let rows_changed = connection.execute(
            "UPDATE expense SET price = ?1, place = ?2, category_id = ?3, priority_id = ?4 \
             WHERE id = ?5",
            (
                &data.price.to_string(),
                &data.place,
                data.category_id,
                data.priority_id,
                id,
            ),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Self::get_by_id(&connection, id)
    }

    fn delete(&self, id: DatabaseID) -> Result<(), Error> {
        let rows_changed = self
            .lock()?
            .execute("DELETE FROM expense WHERE id = ?1", (id,))?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }

    fn monthly_totals(&self, user_id: UserID, year: i32) -> Result<Vec<MonthlyTotal>, Error> {
        let connection = self.lock()?;

        let start = format!("{year:04}-01-01");
        let end = format!("{year:04}-12-31");

        let rows = connection
            .prepare(
                "SELECT day, price FROM expense \
                 WHERE user_id = :user_id AND day BETWEEN :start AND :end",
            )?
            .query_map(
                named_params! {
                    ":user_id": user_id.as_i64(),
                    ":start": start,
                    ":end": end,
                },
                |row| {
                    let day: Date = row.get(0)?;
                    let raw_price: String = row.get(1)?;
                    let price = Decimal::from_str(&raw_price).map_err(|error| {
                        rusqlite::Error::FromSqlConversionFailure(
                            1,
                            rusqlite::types::Type::Text,
                            Box::new(error),
                        )
                    })?;

                    Ok((day.month(), price))
                },
            )?
            .collect::<Result<Vec<(Month, Decimal)>, _>>()?;

        let mut totals: BTreeMap<u8, Decimal> = BTreeMap::new();

        for (month, price) in rows {
            *totals.entry(month as u8).or_insert(Decimal::ZERO) += price;
        }

        Ok(totals
            .into_iter()
            .map(|(month, total)| MonthlyTotal { month, total })
            .collect())
    }
}
