//! Database migration runner.
//!
//! Every [`Database::open_at`] call walks the migration table below and
//! applies whatever the stored `user_version` pragma says is still
//! outstanding, so an open database always carries the current schema.
//!
//! [`Database::open_at`]: crate::Database::open_at

pub mod v001_initial;

use rusqlite::Connection;

use crate::error::{Result, StoreError};

type Migration = fn(&Connection) -> std::result::Result<(), rusqlite::Error>;

/// Ordered migration table; entry `i` upgrades a database at version `i`
/// to version `i + 1`.  Append here whenever the schema changes.
const MIGRATIONS: &[(&str, Migration)] = &[("v001_initial", v001_initial::up)];

/// Apply every migration the open database has not seen yet.
pub fn run_migrations(conn: &Connection) -> Result<()> {
    let applied: u32 = conn.pragma_query_value(None, "user_version", |row| row.get(0))?;

    tracing::info!(
        applied,
        available = MIGRATIONS.len(),
        "checking database migrations"
    );

    for (index, (name, migrate)) in MIGRATIONS.iter().enumerate().skip(applied as usize) {
        tracing::info!(migration = name, "applying migration");
        migrate(conn).map_err(|e| StoreError::Migration(format!("{name}: {e}")))?;
        conn.pragma_update(None, "user_version", index as u32 + 1)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn migrations_are_applied_once() {
        let conn = Connection::open_in_memory().unwrap();

        run_migrations(&conn).unwrap();
        let version: u32 = conn
            .pragma_query_value(None, "user_version", |row| row.get(0))
            .unwrap();
        assert_eq!(version as usize, MIGRATIONS.len());

        // A second run finds nothing outstanding.
        run_migrations(&conn).unwrap();
        let tables: u32 = conn
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name IN ('users', 'events', 'meetings')",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(tables, 3);
    }
}
