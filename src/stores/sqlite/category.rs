//! Implements a SQLite backed category store.
use std::sync::{Arc, Mutex};

use rusqlite::{Connection, named_params};

use crate::{
    Error,
    db::MapRow,
    models::{Category, CategoryName, DatabaseID, UserID},
    stores::CategoryStore,
};

/// Handles the creation and retrieval of [Category] objects in a SQLite database.
#[derive(Clone)]
pub struct SQLiteCategoryStore {
    connection: Arc<Mutex<Connection>>,
}

impl SQLiteCategoryStore {
    /// Create a new category store.
    pub fn new(connection: Arc<Mutex<Connection>>) -> Self {
        Self { connection }
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Connection>, Error> {
        self.connection.lock().map_err(|_| Error::DatabaseLockError)
    }

    fn get_by_id(connection: &Connection, id: DatabaseID) -> Result<Category, Error> {
        connection
            .prepare("SELECT id, name, user_id FROM category WHERE id = :id")?
            .query_row(named_params! { ":id": id }, Category::map_row)
            .map_err(|error| error.into())
    }
}

impl CategoryStore for SQLiteCategoryStore {
    fn create(&self, name: CategoryName, user_id: UserID) -> Result<Category, Error> {
        let connection = self.lock()?;

        connection.execute(
            "INSERT INTO category (name, user_id) VALUES (?1, ?2)",
            (name.as_ref(), user_id.as_i64()),
        )?;

        Ok(Category {
            id: connection.last_insert_rowid(),
            name,
            user_id,
        })
    }

    fn get(&self, id: DatabaseID) -> Result<Category, Error> {
        let connection = self.lock()?;

        Self::get_by_id(&connection, id)
    }

    fn get_by_user(&self, user_id: UserID) -> Result<Vec<Category>, Error> {
        self.lock()?
            .prepare("SELECT id, name, user_id FROM category WHERE user_id = :user_id ORDER BY id ASC")?
            .query_map(named_params! { ":user_id": user_id.as_i64() }, Category::map_row)?
            .map(|maybe_category| maybe_category.map_err(Error::SqlError))
            .collect()
    }

    fn update(&self, id: DatabaseID, name: CategoryName) -> Result<Category, Error> {
        let connection = self.lock()?;

        let rows_changed = connection.execute(
            "UPDATE category SET name = ?1 WHERE id = ?2",
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
            .execute("DELETE FROM category WHERE id = ?1", (id,))?;

        if rows_changed == 0 {
            return Err(Error::NotFound);
        }

        Ok(())
    }
}

#[cfg(test)]
mod category_store_tests {
    use std::{
        str::FromStr,
        sync::{Arc, Mutex},
    };

    use email_address::EmailAddress;
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        models::{CategoryName, PasswordHash, UserID},
        stores::{SQLiteUserStore, UserStore},
    };

    use super::{CategoryStore, Error, SQLiteCategoryStore};

    fn get_stores() -> (SQLiteCategoryStore, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).unwrap();
        let connection = Arc::new(Mutex::new(connection));

        let user = SQLiteUserStore::new(connection.clone())
            .create(
                EmailAddress::from_str("foo@bar.baz").unwrap(),
                PasswordHash::new_unchecked("hunter2"),
            )
            .unwrap();

        (SQLiteCategoryStore::new(connection), user.id())
    }

    #[test]
    fn create_category_succeeds() {
        let (store, user_id) = get_stores();
        let name = CategoryName::new("Groceries").unwrap();

        let category = store.create(name.clone(), user_id).unwrap();

        assert!(category.id > 0);
        assert_eq!(category.name, name);
        assert_eq!(category.user_id, user_id);
    }

    #[test]
    fn create_category_fails_on_duplicate_name_for_same_user() {
        let (store, user_id) = get_stores();
        let name = CategoryName::new("Groceries").unwrap();

        store.create(name.clone(), user_id).unwrap();

        assert_eq!(store.create(name, user_id), Err(Error::DuplicateName));
    }

    #[test]
    fn create_category_fails_with_invalid_user_id() {
        let (store, user_id) = get_stores();

        let result = store.create(
            CategoryName::new("Groceries").unwrap(),
            UserID::new(user_id.as_i64() + 1),
        );

        assert_eq!(result, Err(Error::InvalidForeignKey));
    }

    #[test]
    fn get_category_round_trips() {
        let (store, user_id) = get_stores();

        let category = store
            .create(CategoryName::new("Groceries").unwrap(), user_id)
            .unwrap();

        assert_eq!(store.get(category.id).unwrap(), category);
    }

    #[test]
    fn get_category_fails_with_invalid_id() {
        let (store, _) = get_stores();

        assert_eq!(store.get(1337), Err(Error::NotFound));
    }

    #[test]
    fn get_by_user_returns_categories_in_insertion_order() {
        let (store, user_id) = get_stores();

        let first = store
            .create(CategoryName::new("Groceries").unwrap(), user_id)
            .unwrap();
        let second = store
            .create(CategoryName::new("Rent").unwrap(), user_id)
            .unwrap();

        assert_eq!(store.get_by_user(user_id).unwrap(), vec![first, second]);
    }

    #[test]
    fn update_category_renames() {
        let (store, user_id) = get_stores();

        let category = store
            .create(CategoryName::new("Groceries").unwrap(), user_id)
            .unwrap();

        let renamed = store
            .update(category.id, CategoryName::new("Food").unwrap())
            .unwrap();

        assert_eq!(renamed.id, category.id);
        assert_eq!(renamed.name, CategoryName::new("Food").unwrap());
    }

    #[test]
    fn delete_category_removes_row() {
        let (store, user_id) = get_stores();

        let category = store
            .create(CategoryName::new("Groceries").unwrap(), user_id)
            .unwrap();

        store.delete(category.id).unwrap();

        assert_eq!(store.get(category.id), Err(Error::NotFound));
        assert_eq!(store.delete(category.id), Err(Error::NotFound));
    }
}
