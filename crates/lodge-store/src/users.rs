//! CRUD operations for [`User`] records.
//!
//! Accounts are created at registration and never mutated or deleted
//! afterwards, so this module only knows how to insert and look up.

use chrono::{DateTime, Utc};
use rusqlite::params;
use uuid::Uuid;

use lodge_shared::Role;

use crate::database::Database;
use crate::error::{Result, StoreError};
use crate::models::User;

impl Database {
    /// Insert a new user.
    ///
    /// Fails with [`StoreError::EmailTaken`] when the email is already
    /// registered; the existing row is left untouched.
    pub fn create_user(&self, user: &User) -> Result<()> {
        self.conn()
            .execute(
                "INSERT INTO users (id, user_name, email, password_hash, role, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    user.id.to_string(),
                    user.user_name,
                    user.email,
                    user.password_hash,
                    user.role.as_str(),
                    user.created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| match e {
                rusqlite::Error::SqliteFailure(err, _)
                    if err.code == rusqlite::ErrorCode::ConstraintViolation =>
                {
                    StoreError::EmailTaken
                }
                other => StoreError::Sqlite(other),
            })?;
        Ok(())
    }

    /// Look up a user by email.  Returns `Ok(None)` when no account
    /// matches, so callers can distinguish an unknown user from a store
    /// failure.
    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>> {
        let result = self.conn().query_row(
            "SELECT id, user_name, email, password_hash, role, created_at
             FROM users
             WHERE email = ?1",
            params![email],
            row_to_user,
        );

        match result {
            Ok(user) => Ok(Some(user)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(other) => Err(StoreError::Sqlite(other)),
        }
    }

    /// Fetch a single user by UUID.
    pub fn get_user(&self, id: Uuid) -> Result<User> {
        self.conn()
            .query_row(
                "SELECT id, user_name, email, password_hash, role, created_at
                 FROM users
                 WHERE id = ?1",
                params![id.to_string()],
                row_to_user,
            )
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a [`User`].
fn row_to_user(row: &rusqlite::Row<'_>) -> rusqlite::Result<User> {
    let id_str: String = row.get(0)?;
    let user_name: String = row.get(1)?;
    let email: String = row.get(2)?;
    let password_hash: String = row.get(3)?;
    let role_str: String = row.get(4)?;
    let created_str: String = row.get(5)?;

    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    // Unknown role text degrades to the default rather than failing the
    // whole query.
    let role = Role::from_name(&role_str).unwrap_or_default();

    let created_at: DateTime<Utc> = DateTime::parse_from_rfc3339(&created_str)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(5, rusqlite::types::Type::Text, Box::new(e))
        })?;

    Ok(User {
        id,
        user_name,
        email,
        password_hash,
        role,
        created_at,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_db() -> (tempfile::TempDir, Database) {
        let dir = tempfile::tempdir().unwrap();
        let db = Database::open_at(&dir.path().join("test.db")).unwrap();
        (dir, db)
    }

    fn alice() -> User {
        User {
            id: Uuid::new_v4(),
            user_name: "alice".into(),
            email: "a@x.com".into(),
            password_hash: "$2b$12$original".into(),
            role: Role::Member,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn create_and_find_by_email() {
        let (_dir, db) = open_db();
        let user = alice();
        db.create_user(&user).unwrap();

        let found = db.find_user_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(found, user);

        assert!(db.find_user_by_email("nobody@x.com").unwrap().is_none());
    }

    #[test]
    fn duplicate_email_is_a_conflict_and_keeps_the_original_hash() {
        let (_dir, db) = open_db();
        let user = alice();
        db.create_user(&user).unwrap();

        let mut second = alice();
        second.id = Uuid::new_v4();
        second.password_hash = "$2b$12$other".into();

        assert!(matches!(
            db.create_user(&second),
            Err(StoreError::EmailTaken)
        ));

        let stored = db.find_user_by_email("a@x.com").unwrap().unwrap();
        assert_eq!(stored.password_hash, "$2b$12$original");
    }

    #[test]
    fn get_user_by_id() {
        let (_dir, db) = open_db();
        let user = alice();
        db.create_user(&user).unwrap();

        assert_eq!(db.get_user(user.id).unwrap().user_name, "alice");
        assert!(matches!(
            db.get_user(Uuid::new_v4()),
            Err(StoreError::NotFound)
        ));
    }
}
