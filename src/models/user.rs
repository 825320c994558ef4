//! This file defines a user of the application and its supporting types.

use std::fmt::Display;

use email_address::EmailAddress;
use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::{
    db::{CreateTable, MapRow},
    models::PasswordHash,
};

/// A newtype wrapper for integer user IDs.
/// This helps disambiguate user IDs from other types of IDs, leading to better
/// compile time errors, and more flexible generics that can have distinct
/// implementations for multiple ID types.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserID(i64);

impl UserID {
    /// Wrap a raw integer ID.
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// The raw integer ID.
    pub fn as_i64(&self) -> i64 {
        self.0
    }
}

impl Display for UserID {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A user of the application.
///
/// Users start out inactive after registration and must be activated through
/// an activation token before they can sign in.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserID,
    email: EmailAddress,
    password_hash: PasswordHash,
    first_name: String,
    last_name: String,
    is_active: bool,
    date_joined: OffsetDateTime,
}

impl User {
    /// Create a user from its parts.
    ///
    /// This does not insert anything into the database, see
    /// [crate::stores::UserStore::create] for that.
    pub fn new(
        id: UserID,
        email: EmailAddress,
        password_hash: PasswordHash,
        first_name: String,
        last_name: String,
        is_active: bool,
        date_joined: OffsetDateTime,
    ) -> Self {
        Self {
            id,
            email,
            password_hash,
            first_name,
            last_name,
            is_active,
            date_joined,
        }
    }

    /// The user's ID in the database.
    pub fn id(&self) -> UserID {
        self.id
    }

    /// The email address associated with the user.
    pub fn email(&self) -> &EmailAddress {
        &self.email
    }

    /// The user's password hash.
    pub fn password_hash(&self) -> &PasswordHash {
        &self.password_hash
    }

    /// The user's first name. May be empty.
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// The user's last name. May be empty.
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Whether the user has activated their account.
    pub fn is_active(&self) -> bool {
        self.is_active
    }

    /// When the user registered.
    pub fn date_joined(&self) -> OffsetDateTime {
        self.date_joined
    }
}

impl CreateTable for User {
    fn create_table(connection: &Connection) -> Result<(), rusqlite::Error> {
        connection.execute(
            "CREATE TABLE IF NOT EXISTS user (
                    id INTEGER PRIMARY KEY,
                    email TEXT UNIQUE NOT NULL,
                    password TEXT NOT NULL,
                    first_name TEXT NOT NULL DEFAULT '',
                    last_name TEXT NOT NULL DEFAULT '',
                    is_active INTEGER NOT NULL DEFAULT 0,
                    date_joined TEXT NOT NULL
                    )",
            (),
        )?;

        Ok(())
    }
}

impl MapRow for User {
    type ReturnType = Self;

    fn map_row_with_offset(row: &Row, offset: usize) -> Result<Self::ReturnType, rusqlite::Error> {
        let raw_email: String = row.get(offset + 1)?;
        let raw_password_hash: String = row.get(offset + 2)?;

        Ok(Self {
            id: UserID::new(row.get(offset)?),
            email: EmailAddress::new_unchecked(raw_email),
            password_hash: PasswordHash::new_unchecked(&raw_password_hash),
            first_name: row.get(offset + 3)?,
            last_name: row.get(offset + 4)?,
            is_active: row.get(offset + 5)?,
            date_joined: row.get(offset + 6)?,
        })
    }
}

/// The publicly visible fields of a [User], as returned by the profile and
/// sign-in endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// The user's ID in the database.
    pub id: i64,
    /// The email address associated with the user.
    pub email: String,
    /// When the user registered, as an RFC 3339 timestamp.
    #[serde(with = "time::serde::rfc3339")]
    pub date_joined: OffsetDateTime,
    /// The user's first name. May be empty.
    pub first_name: String,
    /// The user's last name. May be empty.
    pub last_name: String,
}

impl From<&User> for UserProfile {
    fn from(user: &User) -> Self {
        Self {
            id: user.id().as_i64(),
            email: user.email().to_string(),
            date_joined: user.date_joined(),
            first_name: user.first_name().to_owned(),
            last_name: user.last_name().to_owned(),
        }
    }
}
