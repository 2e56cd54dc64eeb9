// src/store/mod.rs
// Result store: persisted job records with a processing/completed/failed lifecycle.

mod sqlite;

pub use sqlite::SqliteStore;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lifecycle state of a summary record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordStatus {
    Processing,
    Completed,
    Failed,
}

impl RecordStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RecordStatus::Processing => "processing",
            RecordStatus::Completed => "completed",
            RecordStatus::Failed => "failed",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "processing" => Some(RecordStatus::Processing),
            "completed" => Some(RecordStatus::Completed),
            "failed" => Some(RecordStatus::Failed),
            _ => None,
        }
    }
}

/// One persisted transcription job.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRecord {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub status: RecordStatus,
    /// Serialized chunk summaries.
    pub content: Option<String>,
    /// Executive summary text.
    pub final_summary: Option<String>,
    /// Flat provider transcript.
    pub transcript: Option<String>,
    /// Set only when the run failed.
    pub error_message: Option<String>,
    pub created_at: String,
}

/// Title projection for owner listings.
#[derive(Debug, Clone, Serialize)]
pub struct RecordTitle {
    pub id: String,
    pub title: String,
    pub created_at: String,
}

/// Output fields written when a run completes.
#[derive(Debug, Clone)]
pub struct CompletedFields {
    pub content: String,
    pub final_summary: String,
    pub transcript: String,
}

/// Store errors.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence contract the pipeline writes through.
///
/// A record is written at most twice per run: pending-create, then the
/// completed/failed update. Readers only read.
pub trait ResultStore: Send + Sync {
    /// Create a placeholder record in `processing` state.
    fn create_pending(&self, user_id: &str, title: &str) -> Result<SummaryRecord, StoreError>;

    /// Create a record directly in `completed` state (no prior pending id).
    fn save_completed(
        &self,
        user_id: &str,
        title: &str,
        fields: &CompletedFields,
    ) -> Result<SummaryRecord, StoreError>;

    /// Flip an existing record to `completed`; `None` when the id is unknown.
    fn complete(
        &self,
        id: &str,
        fields: &CompletedFields,
    ) -> Result<Option<SummaryRecord>, StoreError>;

    /// Mark a record `failed` with the error text.
    fn mark_failed(&self, id: &str, message: &str) -> Result<(), StoreError>;

    fn get(&self, id: &str) -> Result<Option<SummaryRecord>, StoreError>;

    fn list_by_owner(&self, user_id: &str) -> Result<Vec<SummaryRecord>, StoreError>;

    fn list_titles(&self, user_id: &str) -> Result<Vec<RecordTitle>, StoreError>;

    fn delete(&self, id: &str) -> Result<(), StoreError>;
}
