use crate::storage::{StorageError, SubmissionStore};
use chrono::Utc;
use common::model::record::StoredRecord;
use common::model::submission::NormalizedSubmission;
use std::sync::Mutex;

/// Keeps records in process memory; ids start at 1.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<Vec<StoredRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, Vec<StoredRecord>>, StorageError> {
        self.records
            .lock()
            .map_err(|_| StorageError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl SubmissionStore for MemoryStore {
    fn insert(&self, submission: &NormalizedSubmission) -> Result<i64, StorageError> {
        let mut records = self.lock()?;
        let id = records.len() as i64 + 1;
        records.push(StoredRecord {
            id,
            created_at: Utc::now(),
            submission: submission.clone(),
        });
        Ok(id)
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<StoredRecord>, StorageError> {
        let records = self.lock()?;
        Ok(records.iter().rev().take(limit).cloned().collect())
    }

    fn ping(&self) -> Result<(), StorageError> {
        self.lock().map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "memory"
    }
}
