//! Implements a SQLite backed store for pending account activations.
use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, named_params};
use time::OffsetDateTime;

use crate::{Error, db::MapRow, models::ActivationRecord, stores::ActivationStore};

/// Handles the creation and consumption of [ActivationRecord] objects in a
/// SQLite database.
#[derive(Clone)]
pub struct SQLiteActivationStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteActivationStore {
    /// Create a new activation store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }
}

impl ActivationStore for SQLiteActivationStore {
    fn create(&self, email: &EmailAddress, token: &str) -> Result<ActivationRecord, Error> {
        let created_at = OffsetDateTime::now_utc();

        self.lock()?.execute(
            "INSERT INTO activation (email, token, created_at) VALUES (?1, ?2, ?3)",
            (&email.to_string(), token, &created_at),
        )?;

        Ok(ActivationRecord {
            email: email.clone(),
            token: token.to_owned(),
            created_at,
        })
    }

    fn take(&self, token: &str) -> Result<ActivationRecord, Error> {
        let connection = self.lock()?;

        let record = connection
            .prepare(
                "SELECT id, email, token, created_at FROM activation WHERE token = :token",
            )?
            .query_row(named_params! { ":token": token }, ActivationRecord::map_row)
            .map_err(Error::from)?;

        connection.execute("DELETE FROM activation WHERE token = ?1", (token,))?;

        Ok(record)
    }
}
