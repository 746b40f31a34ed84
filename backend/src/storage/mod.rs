//! # Submission Storage
//!
//! Persistence boundary for accepted submissions. The validation core only
//! knows the [`SubmissionStore`] trait; which backend sits behind it is decided
//! once at startup from [`StorageBackend`].
//!
//! ## Backends:
//! - `sqlite`: a local `contact_submissions` table in a SQLite file.
//! - `supabase`: a hosted table reached through its REST interface.
//! - `memory`: a process-local vector, used by tests and throwaway runs.
//!
//! Stores are append-only. They assign the identifier and the `created_at`
//! timestamp; nothing is ever updated or deleted.

pub mod memory;
pub mod sqlite;
pub mod supabase;

use crate::config::StorageBackend;
use common::model::record::StoredRecord;
use common::model::submission::NormalizedSubmission;
use std::sync::Arc;

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("hosted table returned {status}: {body}")]
    Remote { status: u16, body: String },
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed stored row: {0}")]
    Corrupt(String),
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Calls are synchronous; async callers run them on the blocking pool.
pub trait SubmissionStore: Send + Sync {
    /// Appends one submission and returns its generated identifier.
    fn insert(&self, submission: &NormalizedSubmission) -> Result<i64, StorageError>;

    /// Most recent records first.
    fn list_recent(&self, limit: usize) -> Result<Vec<StoredRecord>, StorageError>;

    fn ping(&self) -> Result<(), StorageError>;

    fn backend_name(&self) -> &'static str;
}

pub fn open_store(backend: &StorageBackend) -> Result<Arc<dyn SubmissionStore>, StorageError> {
    let store: Arc<dyn SubmissionStore> = match backend {
        StorageBackend::Sqlite { path } => Arc::new(sqlite::SqliteStore::open(path)?),
        StorageBackend::Supabase { url, key, table } => Arc::new(supabase::SupabaseStore::new(
            url.clone(),
            key.clone(),
            table.clone(),
        )),
        StorageBackend::Memory => Arc::new(memory::MemoryStore::new()),
    };
    Ok(store)
}
