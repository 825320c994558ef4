//! Implements a SQLite backed user store.
use std::sync::{Arc, Mutex};

use email_address::EmailAddress;
use rusqlite::{Connection, named_params};
use time::OffsetDateTime;

use crate::{
    Error,
    db::MapRow,
    models::{PasswordHash, User, UserID},
    stores::UserStore,
};

const USER_COLUMNS: &str = "id, email, password, first_name, last_name, is_active, date_joined";

/// Handles the creation and retrieval of [User] objects in a SQLite database.
#[derive(Clone)]
pub struct SQLiteUserStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteUserStore {
    /// Create a new user store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }

    fn get_by_id(connection: &Connection, id: UserID) -> Result<User, Error> {
        connection
            .prepare(&format!("SELECT {USER_COLUMNS} FROM user WHERE id = :id"))?
            .query_row(named_params! { ":id": id.as_i64() }, User::map_row)
            .map_err(|error| error.into())
    }
}

impl UserStore for SQLiteUserStore {
    fn create(&self, email: EmailAddress, password_hash: PasswordHash) -> Result<User, Error> {
        let connection = self.lock()?;
        let date_joined = OffsetDateTime::now_utc();

        connection.execute(
            "INSERT INTO user (email, password, first_name, last_name, is_active, date_joined) \
             VALUES (?1, ?2, '', '', 0, ?3)",
            (&email.to_string(), &password_hash.to_string(), &date_joined),
        )?;

        let id = UserID::new(connection.last_insert_rowid());

        Ok(User::new(
            id,
            email,
            password_hash,
            String::new(),
            String::new(),
            false,
            date_joined,
        ))
    }

    fn get(&self, id: UserID) -> Result<User, Error> {
        let connection = self.lock()?;

        Self::get_by_id(&connection, id)
    }

    fn get_by_email(&self, email: &str) -> Result<User, Error> {
        self.lock()?
            .prepare(&format!(
                "SELECT {USER_COLUMNS} FROM user WHERE email = :email"
            ))?
            .query_row(named_params! { ":email": email }, User::map_row)
            .map_err(|error| error.into())
    }

    fn activate(&self, email: &str) -> Result<User, Error> {
        let connection = self.lock()?;

        let rows_changed = connection.execute(
            "UPDATE user SET is_active = 1 WHERE email = ?1",
            (email,),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        connection
            .prepare(&format!(
                "SELECT {USER_COLUMNS} FROM user WHERE email = :email"
            ))?
            .query_row(named_params! { ":email": email }, User::map_row)
            .map_err(|error| error.into())
    }

    fn update_profile(
        &self,
        id: UserID,
        first_name: &str,
        last_name: &str,
    ) -> Result<User, Error> {
        let connection = self.lock()?;

        let rows_changed = connection.execute(
            "UPDATE user SET first_name = ?1, last_name = ?2 WHERE id = ?3",
            (first_name, last_name, id.as_i64()),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Self::get_by_id(&connection, id)
    }

    fn update_password(&self, id: UserID, password_hash: PasswordHash) -> Result<(), Error> {
        let rows_changed = self.lock()?.execute(
            "UPDATE user SET password = ?1 WHERE id = ?2",
            (&password_hash.to_string(), id.as_i64()),
        )?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod user_store_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        models::{PasswordHash, UserID},
    };

    use super::{Error, SQLiteUserStore, UserStore};

    fn get_store() -> SQLiteUserStore {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();

        SQLiteUserStore::new(Arc::new(Mutex::new(connection)))
    }

    fn test_email() -> EmailAddress {
        EmailAddress::from_str("hello@world.com").unwrap()
    }

    #[test]
    fn create_user_starts_inactive_with_empty_names() {
        let store = get_store();

        let user = store
            .create(test_email(), PasswordHash::new_unchecked("hunter2"))
            .unwrap();

        assert!(user.id().as_i64() > 0);
        assert!(!user.is_active());
        assert_eq!(user.first_name(), "");
        assert_eq!(user.last_name(), "");
    }

    #[test]
    fn create_user_fails_on_duplicate_email() {
        let store = get_store();

        store
            .create(test_email(), PasswordHash::new_unchecked("hunter2"))
            .unwrap();

        assert_eq!(
            store.create(test_email(), PasswordHash::new_unchecked("hunter3")),
            Err(Error::DuplicateEmail)
        );
    }

    #[test]
    fn get_user_fails_with_non_existent_id() {
        let store = get_store();

        assert_eq!(store.get(UserID::new(42)), Err(Error::NotFound));
    }

    #[test]
    fn get_user_by_email_round_trips() {
        let store = get_store();

        let user = store
            .create(test_email(), PasswordHash::new_unchecked("hunter2"))
            .unwrap();

        assert_eq!(store.get(user.id()).unwrap(), user);
        assert_eq!(store.get_by_email("hello@world.com").unwrap(), user);
    }

    #[test]
    fn activate_flips_is_active() {
        let store = get_store();

        store
            .create(test_email(), PasswordHash::new_unchecked("hunter2"))
            .unwrap();

        let activated = store.activate("hello@world.com").unwrap();

        assert!(activated.is_active());
        assert!(store.get(activated.id()).unwrap().is_active());
    }

    #[test]
    fn activate_fails_with_unknown_email() {
        let store = get_store();

        assert_eq!(store.activate("nobody@nowhere.com"), Err(Error::NotFound));
    }

    #[test]
    fn update_profile_sets_names() {
        let store = get_store();

        let user = store
            .create(test_email(), PasswordHash::new_unchecked("hunter2"))
            .unwrap();

        let updated = store.update_profile(user.id(), "Jane", "Doe").unwrap();

        assert_eq!(updated.first_name(), "Jane");
        assert_eq!(updated.last_name(), "Doe");
        assert_eq!(updated.email(), user.email());
    }

    #[test]
    fn update_password_replaces_hash() {
        let store = get_store();

        let user = store
            .create(test_email(), PasswordHash::new_unchecked("hunter2"))
            .unwrap();

        store
            .update_password(user.id(), PasswordHash::new_unchecked("hunter3"))
            .unwrap();

        assert_eq!(
            store.get(user.id()).unwrap().password_hash(),
            &PasswordHash::new_unchecked("hunter3")
        );
    }
}
