//! Tracker entry documents

use std::collections::BTreeMap;

use rusqlite::{params, OptionalExtension, Row};
use serde_json::Value;

use super::{parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::TrackerKind;
use crate::store::{normalize_document, RecordStore, Stored};

fn row_to_stored(row: &Row<'_>) -> rusqlite::Result<(i64, String, String, String)> {
    Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?))
}

fn decode((id, data, created_at, updated_at): (i64, String, String, String)) -> Result<Stored<Value>> {
    Ok(Stored {
        id,
        stored_at: parse_datetime(&created_at),
        updated_at: parse_datetime(&updated_at),
        record: serde_json::from_str(&data)?,
    })
}

impl RecordStore for Database {
    fn insert_document(&self, user: &str, kind: TrackerKind, document: Value) -> Result<i64> {
        let (document, date) = normalize_document(kind, document)?;
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO entries (user_id, kind, entry_date, data) VALUES (?, ?, ?, ?)",
            params![
                user,
                kind.as_str(),
                date.map(|d| d.to_string()),
                serde_json::to_string(&document)?
            ],
        )?;

        let id = conn.last_insert_rowid();
        tracing::debug!(user, kind = %kind, id, "Inserted entry");
        Ok(id)
    }

    fn list_documents(&self, user: &str, kind: TrackerKind) -> Result<Vec<Stored<Value>>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT id, data, created_at, updated_at
            FROM entries
            WHERE user_id = ? AND kind = ?
            ORDER BY entry_date IS NULL, entry_date DESC, id DESC
            "#,
        )?;

        let rows = stmt
            .query_map(params![user, kind.as_str()], row_to_stored)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        rows.into_iter().map(decode).collect()
    }

    fn get_document(&self, user: &str, kind: TrackerKind, id: i64) -> Result<Option<Stored<Value>>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                r#"
                SELECT id, data, created_at, updated_at
                FROM entries
                WHERE user_id = ? AND kind = ? AND id = ?
                "#,
                params![user, kind.as_str(), id],
                row_to_stored,
            )
            .optional()?;

        row.map(decode).transpose()
    }

    fn update_document(
        &self,
        user: &str,
        kind: TrackerKind,
        id: i64,
        document: Value,
    ) -> Result<()> {
        let (document, date) = normalize_document(kind, document)?;
        let conn = self.conn()?;

        let changed = conn.execute(
            r#"
            UPDATE entries
            SET data = ?, entry_date = ?, updated_at = CURRENT_TIMESTAMP
            WHERE user_id = ? AND kind = ? AND id = ?
            "#,
            params![
                serde_json::to_string(&document)?,
                date.map(|d| d.to_string()),
                user,
                kind.as_str(),
                id
            ],
        )?;

        if changed == 0 {
            return Err(Error::NotFound(format!("{} entry {}", kind, id)));
        }
        tracing::debug!(user, kind = %kind, id, "Updated entry");
        Ok(())
    }

    fn delete(&self, user: &str, kind: TrackerKind, id: i64) -> Result<bool> {
        let conn = self.conn()?;
        let removed = conn.execute(
            "DELETE FROM entries WHERE user_id = ? AND kind = ? AND id = ?",
            params![user, kind.as_str(), id],
        )?;
        tracing::debug!(user, kind = %kind, id, removed, "Deleted entry");
        Ok(removed > 0)
    }
}

impl Database {
    /// Number of entries per tracker for a user; trackers without entries are omitted
    pub fn count_entries(&self, user: &str) -> Result<BTreeMap<TrackerKind, usize>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT kind, COUNT(*) FROM entries WHERE user_id = ? GROUP BY kind")?;

        let rows = stmt
            .query_map(params![user], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut counts = BTreeMap::new();
        for (kind, count) in rows {
            match kind.parse::<TrackerKind>() {
                Ok(kind) => {
                    counts.insert(kind, count.max(0) as usize);
                }
                Err(_) => tracing::warn!(kind = %kind, "Unknown tracker kind in entries table"),
            }
        }
        Ok(counts)
    }

    /// Remove every entry of a user, returning how many were deleted
    pub fn clear_entries(&self, user: &str) -> Result<usize> {
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM entries WHERE user_id = ?", params![user])?;
        tracing::info!(user, removed, "Cleared entries");
        Ok(removed)
    }
}
