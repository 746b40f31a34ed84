use crate::model::submission::NormalizedSubmission;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted submission as returned by a store.
///
/// Records are append-only: a store assigns `id` and `created_at` on insert
/// and never changes them afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredRecord {
    pub id: i64,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub submission: NormalizedSubmission,
}
