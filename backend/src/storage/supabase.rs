//! Hosted table backend (Supabase / PostgREST).
//!
//! Rows go to `POST {url}/rest/v1/{table}` and come back from a `GET` on the
//! same endpoint. The table is expected to look like:
//!
//! ```sql
//! CREATE TABLE contact_submissions (
//!     id BIGSERIAL PRIMARY KEY,
//!     name VARCHAR(50) NOT NULL,
//!     email VARCHAR(255) NOT NULL,
//!     phone VARCHAR(20),
//!     age INTEGER NOT NULL,
//!     contact_date DATE,
//!     priority VARCHAR(10) NOT NULL,
//!     topics TEXT[],
//!     satisfaction INTEGER NOT NULL,
//!     message TEXT NOT NULL,
//!     filename VARCHAR(255),
//!     form_version VARCHAR(10),
//!     timestamp TIMESTAMPTZ,
//!     created_at TIMESTAMPTZ DEFAULT NOW(),
//!     updated_at TIMESTAMPTZ DEFAULT NOW()
//! );
//! ```
//!
//! The blocking client must not be created or dropped on an async worker, so
//! one is built per call; callers already run store calls on the blocking pool.

use crate::storage::{StorageError, SubmissionStore};
use chrono::{DateTime, NaiveDate, Utc};
use common::model::record::StoredRecord;
use common::model::submission::{NormalizedSubmission, Priority, Topic, UploadedFile};
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use serde::{Deserialize, Serialize};
use std::time::Duration;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

pub struct SupabaseStore {
    base_url: String,
    api_key: String,
    table: String,
}

impl SupabaseStore {
    pub fn new(base_url: String, api_key: String, table: String) -> Self {
        Self {
            base_url,
            api_key,
            table,
        }
    }

    pub fn endpoint(&self) -> String {
        format!(
            "{}/rest/v1/{}",
            self.base_url.trim_end_matches('/'),
            self.table
        )
    }

    fn headers(&self) -> Result<HeaderMap, StorageError> {
        let invalid_key =
            |_| StorageError::Unavailable("SUPABASE_KEY is not a valid header value".to_string());
        let mut headers = HeaderMap::new();
        headers.insert("apikey", HeaderValue::from_str(&self.api_key).map_err(invalid_key)?);
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", self.api_key)).map_err(invalid_key)?,
        );
        Ok(headers)
    }

    fn client(&self) -> Result<Client, StorageError> {
        Ok(Client::builder().timeout(REQUEST_TIMEOUT).build()?)
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, StorageError> {
        let response = request.headers(self.headers()?).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(StorageError::Remote {
                status: status.as_u16(),
                body: response.text().unwrap_or_default(),
            });
        }
        Ok(response)
    }
}

impl SubmissionStore for SupabaseStore {
    fn insert(&self, submission: &NormalizedSubmission) -> Result<i64, StorageError> {
        let client = self.client()?;
        let request = client
            .post(self.endpoint())
            .header("Prefer", "return=representation")
            .json(&[InsertRow::from(submission)]);
        let rows: Vec<SupabaseRow> = self.send(request)?.json()?;
        rows.first()
            .map(|row| row.id)
            .ok_or_else(|| StorageError::Corrupt("insert returned no rows".to_string()))
    }

    fn list_recent(&self, limit: usize) -> Result<Vec<StoredRecord>, StorageError> {
        let client = self.client()?;
        let request = client.get(self.endpoint()).query(&recent_query(limit));
        let rows: Vec<SupabaseRow> = self.send(request)?.json()?;
        rows.into_iter().map(StoredRecord::try_from).collect()
    }

    fn ping(&self) -> Result<(), StorageError> {
        let client = self.client()?;
        let request = client
            .get(self.endpoint())
            .query(&[("select", "id"), ("limit", "1")]);
        self.send(request).map(|_| ())
    }

    fn backend_name(&self) -> &'static str {
        "supabase"
    }
}

/// Newest first; rows sharing a `created_at` come back by id, highest first.
fn recent_query(limit: usize) -> [(&'static str, String); 3] {
    [
        ("select", "*".to_string()),
        ("order", "created_at.desc,id.desc".to_string()),
        ("limit", limit.to_string()),
    ]
}

#[derive(Debug, Serialize)]
struct InsertRow<'a> {
    name: &'a str,
    email: &'a str,
    phone: Option<&'a str>,
    age: u8,
    contact_date: Option<NaiveDate>,
    priority: Priority,
    topics: &'a [Topic],
    satisfaction: u8,
    message: &'a str,
    filename: Option<&'a str>,
    form_version: &'a str,
    timestamp: Option<&'a str>,
}

impl<'a> From<&'a NormalizedSubmission> for InsertRow<'a> {
    fn from(s: &'a NormalizedSubmission) -> Self {
        Self {
            name: &s.name,
            email: &s.email,
            phone: s.phone.as_deref(),
            age: s.age,
            contact_date: s.contact_date,
            priority: s.priority,
            topics: &s.topics,
            satisfaction: s.satisfaction,
            message: &s.message,
            filename: s.attachment.as_ref().map(|a| a.filename.as_str()),
            form_version: &s.form_version,
            timestamp: s.timestamp.as_deref(),
        }
    }
}

/// A row as the REST interface returns it.
#[derive(Debug, Deserialize)]
struct SupabaseRow {
    id: i64,
    name: String,
    email: String,
    phone: Option<String>,
    age: i64,
    contact_date: Option<NaiveDate>,
    priority: String,
    #[serde(default)]
    topics: Option<Vec<String>>,
    satisfaction: i64,
    message: String,
    filename: Option<String>,
    form_version: Option<String>,
    timestamp: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<SupabaseRow> for StoredRecord {
    type Error = StorageError;

    fn try_from(row: SupabaseRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str| StorageError::Corrupt(format!("row {}: {}", row.id, what));
        let priority = row
            .priority
            .parse::<Priority>()
            .map_err(|_| corrupt("priority"))?;
        let topics = row
            .topics
            .unwrap_or_default()
            .iter()
            .map(|t| t.parse::<Topic>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| corrupt(&format!("topics: {e}")))?;
        let age = u8::try_from(row.age).map_err(|_| corrupt("age"))?;
        let satisfaction = u8::try_from(row.satisfaction).map_err(|_| corrupt("satisfaction"))?;

        Ok(StoredRecord {
            id: row.id,
            created_at: row.created_at,
            submission: NormalizedSubmission {
                name: row.name,
                email: row.email,
                phone: row.phone,
                age,
                contact_date: row.contact_date,
                message: row.message,
                priority,
                topics,
                satisfaction,
                attachment: row.filename.map(|filename| UploadedFile {
                    filename,
                    size: 0,
                    stored_path: None,
                }),
                form_version: row.form_version.unwrap_or_default(),
                timestamp: row.timestamp,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn endpoint_ignores_trailing_slash() {
        let store = SupabaseStore::new(
            "https://demo.supabase.co/".to_string(),
            "anon".to_string(),
            "contact_submissions".to_string(),
        );
        assert_eq!(
            store.endpoint(),
            "https://demo.supabase.co/rest/v1/contact_submissions"
        );
    }

    #[test]
    fn recent_rows_break_timestamp_ties_by_id() {
        let query = recent_query(25);
        assert_eq!(query[1], ("order", "created_at.desc,id.desc".to_string()));
        assert_eq!(query[2], ("limit", "25".to_string()));
    }

    #[test]
    fn rest_rows_decode_into_records() {
        let row: SupabaseRow = serde_json::from_value(json!({
            "id": 7,
            "name": "Krishna Prasad",
            "email": "krishna@example.com",
            "phone": "9876543210",
            "age": 30,
            "contact_date": "2025-05-20",
            "priority": "medium",
            "topics": ["web-development", "data-science"],
            "satisfaction": 8,
            "message": "Checking that hosted rows decode.",
            "filename": null,
            "form_version": "2.0",
            "timestamp": null,
            "created_at": "2025-05-20T10:11:12.123456+00:00",
            "updated_at": "2025-05-20T10:11:12.123456+00:00"
        }))
        .unwrap();

        let record = StoredRecord::try_from(row).unwrap();
        assert_eq!(record.id, 7);
        assert_eq!(record.submission.priority, Priority::Medium);
        assert_eq!(
            record.submission.topics,
            vec![Topic::WebDevelopment, Topic::DataScience]
        );
        assert_eq!(record.submission.contact_date, NaiveDate::from_ymd_opt(2025, 5, 20));
    }

    #[test]
    fn insert_rows_use_column_names() {
        let submission = NormalizedSubmission {
            name: "Ada".to_string(),
            email: "ada@example.com".to_string(),
            phone: None,
            age: 36,
            contact_date: None,
            message: "Hello from the test suite".to_string(),
            priority: Priority::Low,
            topics: vec![Topic::AiMl],
            satisfaction: 9,
            attachment: None,
            form_version: "2.0".to_string(),
            timestamp: None,
        };
        let value = serde_json::to_value(InsertRow::from(&submission)).unwrap();
        assert_eq!(value["priority"], "low");
        assert_eq!(value["topics"], json!(["ai-ml"]));
        assert_eq!(value["contact_date"], serde_json::Value::Null);
    }
}
