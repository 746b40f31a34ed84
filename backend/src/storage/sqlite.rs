//! Local SQLite backend.
//!
//! A connection is opened per call against the configured file. The table is
//! created on [`SqliteStore::open`]; `topics` is stored as a JSON array and
//! dates as ISO-8601 text so rows stay readable with the `sqlite3` shell.

use crate::storage::{StorageError, SubmissionStore};
use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use common::model::record::StoredRecord;
use common::model::submission::{NormalizedSubmission, Priority, Topic, UploadedFile};
use log::info;
use rusqlite::{params, Connection};
use std::fs;
use std::path::{Path, PathBuf};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS contact_submissions (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL,
    phone TEXT,
    age INTEGER NOT NULL,
    contact_date TEXT,
    priority TEXT NOT NULL,
    topics TEXT NOT NULL DEFAULT '[]',
    satisfaction INTEGER NOT NULL,
    message TEXT NOT NULL,
    filename TEXT,
    file_size INTEGER,
    file_path TEXT,
    form_version TEXT NOT NULL,
    timestamp TEXT,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS contact_submissions_created_at
    ON contact_submissions (created_at);
";

const SELECT_RECENT: &str = "
SELECT id, name, email, phone, age, contact_date, priority, topics, satisfaction,
       message, filename, file_size, file_path, form_version, timestamp, created_at
FROM contact_submissions
ORDER BY created_at DESC, id DESC
LIMIT ?1";

pub struct SqliteStore {
    path: PathBuf,
}

impl SqliteStore {
    /// Opens (creating if needed) the database file and its table.
    pub fn open(path: &Path) -> Result<Self, StorageError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let store = Self {
            path: path.to_path_buf(),
        };
        store.connect()?.execute_batch(SCHEMA)?;
        info!("SQLite store ready at {}", store.path.display());
        Ok(store)
    }

    fn connect(&self) -> Result<Connection, StorageError> {
        Ok(Connection::open(&self.path)?)
    }
}

impl SubmissionStore for SqliteStore {
    fn insert(&self, submission: &NormalizedSubmission) -> Result<i64, StorageError> {
        let conn = self.connect()?;
        let topics = serde_json::to_string(&submission.topics)?;
        let attachment = submission.attachment.as_ref();
        conn.execute(
            "INSERT INTO contact_submissions (
                name, email, phone, age, contact_date, priority, topics, satisfaction,
                message, filename, file_size, file_path, form_version, timestamp, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            params![
                submission.name,
                submission.email,
                submission.phone,
                submission.age,
                submission.contact_date.map(|d| d.to_string()),
                submission.priority.as_str(),
                topics,
                submission.satisfaction,
                submission.message,
                attachment.map(|a| a.filename.as_str()),
                attachment.map(|a| i64::try_from(a.size).unwrap_or(i64::MAX)),
                attachment.and_then(|a| a.stored_path.as_deref()),
                submission.form_version,
                submission.timestamp,
                Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            ],
        )?;
        Ok(conn.last_insert_rowid())
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<StoredRecord>, StorageError> {
        let conn = self.connect()?;
        let mut stmt = conn.prepare(SELECT_RECENT)?;
        let limit = i64::try_from(limit).unwrap_or(i64::MAX);
        let rows = stmt
            .query_map(params![limit], |row| {
                Ok(SubmissionRow {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    email: row.get(2)?,
                    phone: row.get(3)?,
                    age: row.get(4)?,
                    contact_date: row.get(5)?,
                    priority: row.get(6)?,
                    topics: row.get(7)?,
                    satisfaction: row.get(8)?,
                    message: row.get(9)?,
                    filename: row.get(10)?,
                    file_size: row.get(11)?,
                    file_path: row.get(12)?,
                    form_version: row.get(13)?,
                    timestamp: row.get(14)?,
                    created_at: row.get(15)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;

        rows.into_iter().map(StoredRecord::try_from).collect()
    }

    fn ping(&self) -> Result<(), StorageError> {
        let conn = self.connect()?;
        conn.query_row("SELECT COUNT(*) FROM contact_submissions", [], |row| {
            row.get::<_, i64>(0)
        })?;
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "sqlite"
    }
}

/// A row as it sits in the table, before typed decoding.
struct SubmissionRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    age: i64,
    contact_date: Option<String>,
    priority: String,
    topics: String,
    satisfaction: i64,
    message: String,
    filename: Option<String>,
    file_size: Option<i64>,
    file_path: Option<String>,
    form_version: String,
    timestamp: Option<String>,
    created_at: String,
}

impl TryFrom<SubmissionRow> for StoredRecord {
    type Error = StorageError;

    fn try_from(row: SubmissionRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str| StorageError::Corrupt(format!("row {}: {}", row.id, what));

        let created_at = DateTime::parse_from_rfc3339(&row.created_at)
            .map_err(|_| corrupt("created_at"))?
            .with_timezone(&Utc);
        let contact_date = row
            .contact_date
            .as_deref()
            .map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d"))
            .transpose()
            .map_err(|_| corrupt("contact_date"))?;
        let priority = row
            .priority
            .parse::<Priority>()
            .map_err(|_| corrupt("priority"))?;
        let topics: Vec<Topic> = serde_json::from_str(&row.topics)?;
        let age = u8::try_from(row.age).map_err(|_| corrupt("age"))?;
        let satisfaction = u8::try_from(row.satisfaction).map_err(|_| corrupt("satisfaction"))?;
        let attachment = row.filename.map(|filename| UploadedFile {
            filename,
            size: row
                .file_size
                .and_then(|s| u64::try_from(s).ok())
                .unwrap_or_default(),
            stored_path: row.file_path,
        });

        Ok(StoredRecord {
            id: row.id,
            created_at,
            submission: NormalizedSubmission {
                name: row.name,
                email: row.email,
                phone: row.phone,
                age,
                contact_date,
                message: row.message,
                priority,
                topics,
                satisfaction,
                attachment,
                form_version: row.form_version,
                timestamp: row.timestamp,
            },
        })
    }
}
