//! Generic CRUD over the content collections.
//!
//! Events and meetings share one implementation of create/list/get/
//! update/delete.  Each entity binds itself to a table through the
//! [`Resource`] descriptor: table name, ordered column list, columns
//! required at creation, and the merge policy its updates follow.  All
//! payload columns are text, so a record travels through this module as
//! an ordered `Vec<Option<String>>`.

use chrono::{DateTime, Utc};
use rusqlite::params_from_iter;
use uuid::Uuid;

use crate::database::Database;
use crate::error::{Result, StoreError};

/// How an update merges incoming fields into the stored record.
///
/// An absent (`None`) field always keeps the prior value under either
/// policy; they differ only on incoming empty strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// An empty incoming value keeps the prior value.
    KeepPriorOnEmpty,
    /// An empty incoming value overwrites the prior value.
    Overwrite,
}

impl MergePolicy {
    /// Merge one incoming field into its prior value.
    pub fn merge(self, prior: Option<String>, incoming: Option<String>) -> Option<String> {
        match (self, incoming) {
            (_, None) => prior,
            (MergePolicy::KeepPriorOnEmpty, Some(value)) if value.is_empty() => prior,
            (_, Some(value)) => Some(value),
        }
    }
}

/// Schema descriptor connecting a wire entity to its table.
pub trait Resource: Sized {
    /// Human-readable singular name, used in messages.
    const NAME: &'static str;
    /// Table name.
    const TABLE: &'static str;
    /// Payload columns in storage order (id and timestamps excluded).
    const FIELDS: &'static [&'static str];
    /// Columns that must be present and non-empty at creation.
    const REQUIRED: &'static [&'static str];
    /// The update merge policy chosen for this resource.
    const MERGE_POLICY: MergePolicy;

    fn id(&self) -> Uuid;
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;

    /// Current values of [`Resource::FIELDS`], in order.
    fn field_values(&self) -> Vec<Option<String>>;

    /// Rebuild the entity from stored parts; `values` matches
    /// [`Resource::FIELDS`].
    fn from_parts(
        id: Uuid,
        values: Vec<Option<String>>,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self;
}

impl Database {
    // ------------------------------------------------------------------
    // Create
    // ------------------------------------------------------------------

    /// Insert a new record.
    pub fn create_record<R: Resource>(&self, record: &R) -> Result<()> {
        let placeholders: Vec<String> = (1..=R::FIELDS.len() + 3).map(|i| format!("?{i}")).collect();
        let sql = format!(
            "INSERT INTO {} (id, {}, created_at, updated_at) VALUES ({})",
            R::TABLE,
            R::FIELDS.join(", "),
            placeholders.join(", "),
        );

        let mut values: Vec<Option<String>> = Vec::with_capacity(R::FIELDS.len() + 3);
        values.push(Some(record.id().to_string()));
        values.extend(record.field_values());
        values.push(Some(record.created_at().to_rfc3339()));
        values.push(Some(record.updated_at().to_rfc3339()));

        self.conn().execute(&sql, params_from_iter(values))?;
        Ok(())
    }

    // ------------------------------------------------------------------
    // Read
    // ------------------------------------------------------------------

    /// Fetch a single record by UUID.
    pub fn get_record<R: Resource>(&self, id: Uuid) -> Result<R> {
        let sql = format!(
            "SELECT id, {}, created_at, updated_at FROM {} WHERE id = ?1",
            R::FIELDS.join(", "),
            R::TABLE,
        );

        self.conn()
            .query_row(&sql, [id.to_string()], row_to_record::<R>)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => StoreError::NotFound,
                other => StoreError::Sqlite(other),
            })
    }

    /// List all records, ordered by ascending date.
    ///
    /// The date column is text, so the ordering is lexicographic; ISO
    /// dates sort correctly, free-text ones sort wherever they land.
    pub fn list_records<R: Resource>(&self) -> Result<Vec<R>> {
        let sql = format!(
            "SELECT id, {}, created_at, updated_at FROM {} ORDER BY date ASC, created_at ASC",
            R::FIELDS.join(", "),
            R::TABLE,
        );

        let mut stmt = self.conn().prepare(&sql)?;
        let rows = stmt.query_map([], row_to_record::<R>)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(StoreError::Sqlite)
    }

    // ------------------------------------------------------------------
    // Update
    // ------------------------------------------------------------------

    /// Apply a partial update to the record with the given id.
    ///
    /// `patch` matches [`Resource::FIELDS`] in order; each entry merges
    /// into the stored value per the resource's [`MergePolicy`].  Fails
    /// with [`StoreError::NotFound`] if the id does not resolve, leaving
    /// the table untouched.
    pub fn update_record<R: Resource>(&self, id: Uuid, patch: &[Option<String>]) -> Result<R> {
        debug_assert_eq!(patch.len(), R::FIELDS.len());

        let existing: R = self.get_record(id)?;

        let merged: Vec<Option<String>> = existing
            .field_values()
            .into_iter()
            .zip(patch.iter().cloned())
            .map(|(prior, incoming)| R::MERGE_POLICY.merge(prior, incoming))
            .collect();

        let now = Utc::now();

        let assignments: Vec<String> = R::FIELDS
            .iter()
            .enumerate()
            .map(|(i, field)| format!("{field} = ?{}", i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {}, updated_at = ?{} WHERE id = ?{}",
            R::TABLE,
            assignments.join(", "),
            R::FIELDS.len() + 1,
            R::FIELDS.len() + 2,
        );

        let mut values = merged.clone();
        values.push(Some(now.to_rfc3339()));
        values.push(Some(id.to_string()));

        self.conn().execute(&sql, params_from_iter(values))?;

        Ok(R::from_parts(id, merged, existing.created_at(), now))
    }

    // ------------------------------------------------------------------
    // Delete
    // ------------------------------------------------------------------

    /// Delete a record by UUID.  Returns `true` if a row was removed.
    pub fn delete_record<R: Resource>(&self, id: Uuid) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?1", R::TABLE);
        let affected = self.conn().execute(&sql, [id.to_string()])?;
        Ok(affected > 0)
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Map a `rusqlite::Row` to a resource record.
fn row_to_record<R: Resource>(row: &rusqlite::Row<'_>) -> rusqlite::Result<R> {
    let id_str: String = row.get(0)?;
    let id = Uuid::parse_str(&id_str).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(0, rusqlite::types::Type::Text, Box::new(e))
    })?;

    let mut values = Vec::with_capacity(R::FIELDS.len());
    for i in 0..R::FIELDS.len() {
        values.push(row.get::<_, Option<String>>(i + 1)?);
    }

    let created_at = parse_timestamp(row, R::FIELDS.len() + 1)?;
    let updated_at = parse_timestamp(row, R::FIELDS.len() + 2)?;

    Ok(R::from_parts(id, values, created_at, updated_at))
}

fn parse_timestamp(row: &rusqlite::Row<'_>, index: usize) -> rusqlite::Result<DateTime<Utc>> {
    let text: String = row.get(index)?;
    DateTime::parse_from_rfc3339(&text)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(index, rusqlite::types::Type::Text, Box::new(e))
        })
}
