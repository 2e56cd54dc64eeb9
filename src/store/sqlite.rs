// src/store/sqlite.rs
// SQLite-backed result store.

use rusqlite::{params, Connection, OpenFlags, OptionalExtension, Row};
use std::path::{Path, PathBuf};

use super::{CompletedFields, RecordStatus, RecordTitle, ResultStore, StoreError, SummaryRecord};

const DB_PATH_ENV: &str = "RECAP_DB_PATH";

pub struct SqliteStore {
    db_path: PathBuf,
}

impl SqliteStore {
    /// Open or create the database and ensure the summaries table exists.
    pub fn new(db_path: PathBuf) -> Result<Self, StoreError> {
        let this = Self { db_path };
        this.init()?;
        Ok(this)
    }

    /// Default path: `RECAP_DB_PATH` or `./data/recapify.sqlite`.
    pub fn default_path() -> PathBuf {
        std::env::var(DB_PATH_ENV)
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("./data").join("recapify.sqlite"))
    }

    /// Open the store at the default path.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    fn open(&self) -> Result<Connection, rusqlite::Error> {
        Connection::open_with_flags(
            &self.db_path,
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE,
        )
    }

    fn init(&self) -> Result<(), StoreError> {
        if let Some(parent) = self.db_path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        let conn = self.open()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS summaries (
                id TEXT PRIMARY KEY,
                user_id TEXT NOT NULL,
                title TEXT NOT NULL,
                status TEXT NOT NULL,
                content TEXT NULL,
                final_summary TEXT NULL,
                transcript TEXT NULL,
                error_message TEXT NULL,
                created_at TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_summaries_user_id ON summaries(user_id);
            "#,
        )?;
        Ok(())
    }

    fn row_to_record(row: &Row) -> rusqlite::Result<SummaryRecord> {
        let status: String = row.get(3)?;
        Ok(SummaryRecord {
            id: row.get(0)?,
            user_id: row.get(1)?,
            title: row.get(2)?,
            status: RecordStatus::parse(&status).unwrap_or(RecordStatus::Processing),
            content: row.get(4)?,
            final_summary: row.get(5)?,
            transcript: row.get(6)?,
            error_message: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

const RECORD_COLUMNS: &str =
    "id, user_id, title, status, content, final_summary, transcript, error_message, created_at";

impl ResultStore for SqliteStore {
    fn create_pending(&self, user_id: &str, title: &str) -> Result<SummaryRecord, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        let title = if title.trim().is_empty() {
            "Untitled"
        } else {
            title.trim()
        };
        let conn = self.open()?;
        conn.execute(
            r#"
            INSERT INTO summaries (id, user_id, title, status, content, final_summary, transcript, error_message, created_at)
            VALUES (?1, ?2, ?3, ?4, NULL, NULL, NULL, NULL, ?5)
            "#,
            params![id, user_id, title, RecordStatus::Processing.as_str(), created_at],
        )?;

        tracing::info!("Created pending record {} for user {}", id, user_id);

        Ok(SummaryRecord {
            id,
            user_id: user_id.to_string(),
            title: title.to_string(),
            status: RecordStatus::Processing,
            content: None,
            final_summary: None,
            transcript: None,
            error_message: None,
            created_at,
        })
    }

    fn save_completed(
        &self,
        user_id: &str,
        title: &str,
        fields: &CompletedFields,
    ) -> Result<SummaryRecord, StoreError> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = chrono::Utc::now().to_rfc3339();
        let title = if title.trim().is_empty() {
            "Untitled"
        } else {
            title.trim()
        };
        let conn = self.open()?;
        conn.execute(
            r#"
            INSERT INTO summaries (id, user_id, title, status, content, final_summary, transcript, error_message, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, NULL, ?8)
            "#,
            params![
                id,
                user_id,
                title,
                RecordStatus::Completed.as_str(),
                fields.content,
                fields.final_summary,
                fields.transcript,
                created_at
            ],
        )?;

        tracing::info!("Saved completed record {} for user {}", id, user_id);

        Ok(SummaryRecord {
            id,
            user_id: user_id.to_string(),
            title: title.to_string(),
            status: RecordStatus::Completed,
            content: Some(fields.content.clone()),
            final_summary: Some(fields.final_summary.clone()),
            transcript: Some(fields.transcript.clone()),
            error_message: None,
            created_at,
        })
    }

    fn complete(
        &self,
        id: &str,
        fields: &CompletedFields,
    ) -> Result<Option<SummaryRecord>, StoreError> {
        let conn = self.open()?;
        let updated = conn.execute(
            r#"
            UPDATE summaries
            SET status = ?1, content = ?2, final_summary = ?3, transcript = ?4
            WHERE id = ?5
            "#,
            params![
                RecordStatus::Completed.as_str(),
                fields.content,
                fields.final_summary,
                fields.transcript,
                id
            ],
        )?;
        if updated == 0 {
            tracing::warn!("Completion update matched no record: {}", id);
            return Ok(None);
        }

        tracing::info!("Record {} marked completed", id);
        self.get(id)
    }

    fn mark_failed(&self, id: &str, message: &str) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute(
            "UPDATE summaries SET status = ?1, error_message = ?2 WHERE id = ?3",
            params![RecordStatus::Failed.as_str(), message, id],
        )?;
        tracing::warn!("Record {} marked failed: {}", id, message);
        Ok(())
    }

    fn get(&self, id: &str) -> Result<Option<SummaryRecord>, StoreError> {
        let conn = self.open()?;
        let record = conn
            .query_row(
                &format!("SELECT {} FROM summaries WHERE id = ?1", RECORD_COLUMNS),
                params![id],
                Self::row_to_record,
            )
            .optional()?;
        Ok(record)
    }

    fn list_by_owner(&self, user_id: &str) -> Result<Vec<SummaryRecord>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(&format!(
            "SELECT {} FROM summaries WHERE user_id = ?1 ORDER BY created_at DESC",
            RECORD_COLUMNS
        ))?;
        let records = stmt
            .query_map(params![user_id], Self::row_to_record)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn list_titles(&self, user_id: &str) -> Result<Vec<RecordTitle>, StoreError> {
        let conn = self.open()?;
        let mut stmt = conn.prepare(
            "SELECT id, title, created_at FROM summaries WHERE user_id = ?1 ORDER BY created_at DESC",
        )?;
        let titles = stmt
            .query_map(params![user_id], |row| {
                Ok(RecordTitle {
                    id: row.get(0)?,
                    title: row.get(1)?,
                    created_at: row.get(2)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(titles)
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        let conn = self.open()?;
        conn.execute("DELETE FROM summaries WHERE id = ?1", params![id])?;
        tracing::info!("Deleted record {}", id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, SqliteStore) {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = SqliteStore::new(dir.path().join("test.sqlite")).expect("store");
        (dir, store)
    }

    fn fields() -> CompletedFields {
        CompletedFields {
            content: "[{\"chunk_index\":0}]".to_string(),
            final_summary: "Short recap.".to_string(),
            transcript: "hello world".to_string(),
        }
    }

    #[test]
    fn test_pending_then_complete_lifecycle() {
        let (_dir, store) = temp_store();
        let pending = store.create_pending("user-1", "Weekly sync").unwrap();
        assert_eq!(pending.status, RecordStatus::Processing);
        assert!(pending.content.is_none());

        let completed = store.complete(&pending.id, &fields()).unwrap().unwrap();
        assert_eq!(completed.status, RecordStatus::Completed);
        assert_eq!(completed.final_summary.as_deref(), Some("Short recap."));
        assert_eq!(completed.transcript.as_deref(), Some("hello world"));
        assert!(completed.error_message.is_none());
    }

    #[test]
    fn test_complete_unknown_id_returns_none() {
        let (_dir, store) = temp_store();
        assert!(store.complete("missing", &fields()).unwrap().is_none());
    }

    #[test]
    fn test_mark_failed_sets_message() {
        let (_dir, store) = temp_store();
        let pending = store.create_pending("user-1", "").unwrap();
        assert_eq!(pending.title, "Untitled");

        store.mark_failed(&pending.id, "provider exploded").unwrap();
        let failed = store.get(&pending.id).unwrap().unwrap();
        assert_eq!(failed.status, RecordStatus::Failed);
        assert_eq!(failed.error_message.as_deref(), Some("provider exploded"));
    }

    #[test]
    fn test_save_completed_without_pending() {
        let (_dir, store) = temp_store();
        let record = store.save_completed("user-2", "Direct", &fields()).unwrap();
        assert_eq!(record.status, RecordStatus::Completed);

        let loaded = store.get(&record.id).unwrap().unwrap();
        assert_eq!(loaded.user_id, "user-2");
        assert_eq!(loaded.content.as_deref(), Some("[{\"chunk_index\":0}]"));
    }

    #[test]
    fn test_list_by_owner_and_titles() {
        let (_dir, store) = temp_store();
        store.create_pending("owner", "One").unwrap();
        store.create_pending("owner", "Two").unwrap();
        store.create_pending("other", "Three").unwrap();

        let records = store.list_by_owner("owner").unwrap();
        assert_eq!(records.len(), 2);

        let titles = store.list_titles("owner").unwrap();
        assert_eq!(titles.len(), 2);
        assert!(titles.iter().all(|t| !t.id.is_empty()));
    }

    #[test]
    fn test_delete_removes_record() {
        let (_dir, store) = temp_store();
        let record = store.create_pending("owner", "Gone soon").unwrap();
        store.delete(&record.id).unwrap();
        assert!(store.get(&record.id).unwrap().is_none());
    }
}
