//! Implements a SQLite backed priority store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, named_params};

use crate::{
    Error,
    db::MapRow,
    models::{DatabaseID, Priority, PriorityName, UserID},
    stores::PriorityStore,
};

/// Handles the creation and retrieval of [Priority] objects in a SQLite database.
#[derive(Clone)]
pub struct SQLitePriorityStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLitePriorityStore {
    /// Create a new priority store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }

    fn get_by_id(connection: &Connection, id: DatabaseID) -> Result<Priority, Error> {
        connection
            .prepare("SELECT id, name, user_id FROM priority WHERE id = :id")?
            .query_row(named_params! { ":id": id }, Priority::map_row)
            .map_err(|error| error.into())
    }
}

impl PriorityStore for SQLitePriorityStore {
    fn create(&self, name: PriorityName, user_id: UserID) -> Result<Priority, Error> {
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO priority (name, user_id) VALUES (?1, ?2)",
            (name.as_ref(), user_id.as_i64()),
        )?;

        Ok(Priority {
            id: connection.last_insert_rowid(),
            name,
            user_id,
        })
    }

    fn get(&self, id: DatabaseID) -> Result<Priority, Error> {
        let connection = self.lock()?;

        Self::get_by_id(&connection, id)
    }

    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Priority>, Error> {
        self.lock()?
            .prepare("SELECT id, name, user_id FROM priority WHERE user_id = :user_id ORDER BY id ASC")?
            .query_map(named_params! { ":user_id": user_id.as_i64() }, Priority::map_row)?
            .map(|maybe_priority| maybe_priority.map_err(Error::SqlError))
            .collect()
    }

    fn update(&self, id: DatabaseID, name: PriorityName) -> Result<Priority, Error> {
        let connection = self.lock()?;

        let rows_changed = connection.execute(
            "UPDATE priority SET name = ?1 WHERE id = ?2",
            (name.as_ref(), id),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Self::get_by_id(&connection, id)
    }

    fn delete(&self, id: DatabaseID) -> Result<(), Error> {
        let rows_changed = self
            .lock()?
            .execute("DELETE FROM priority WHERE id = ?1", (id,))?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}
