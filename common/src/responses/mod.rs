//! Payloads produced by the contact API.
//!
//! A form submission yields a [`SubmissionOutcome`], tagged by `status`:
//!
//! - `invalid`: a [`Redisplay`] carrying every [`FieldError`] in field order and the
//!   values the form should be re-rendered with.
//! - `accepted`: a [`SubmissionReceipt`]. `submission_id` is `null` and `persisted`
//!   is `false` when the input was accepted but the store could not confirm the write.

use crate::model::field::{Field, FieldError};
use crate::model::submission::NormalizedSubmission;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A value to put back into a form input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FormValue {
    Number(i64),
    Text(String),
    List(Vec<String>),
}

impl From<&str> for FormValue {
    fn from(value: &str) -> Self {
        FormValue::Text(value.to_string())
    }
}

impl From<String> for FormValue {
    fn from(value: String) -> Self {
        FormValue::Text(value)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redisplay {
    pub errors: Vec<FieldError>,
    pub form_data: BTreeMap<String, FormValue>,
}

impl Redisplay {
    pub fn has_error(&self, field: Field) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    pub fn value(&self, key: &str) -> Option<&FormValue> {
        self.form_data.get(key)
    }

    /// Errors rendered as `"<Label>: <message>"`.
    pub fn messages(&self) -> Vec<String> {
        self.errors.iter().map(ToString::to_string).collect()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionReceipt {
    pub submission_id: Option<i64>,
    pub persisted: bool,
    pub message: String,
    pub data: NormalizedSubmission,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Invalid(Redisplay),
    Accepted(SubmissionReceipt),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailCheckResponse {
    pub valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseStatus {
    pub connected: bool,
    pub backend: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn invalid_outcome_is_tagged_and_flattened() {
        let mut form_data = BTreeMap::new();
        form_data.insert("email".to_string(), FormValue::from("not-an-email"));
        form_data.insert("age".to_string(), FormValue::Number(25));
        form_data.insert(
            "topics".to_string(),
            FormValue::List(vec!["ai-ml".to_string()]),
        );
        let outcome = SubmissionOutcome::Invalid(Redisplay {
            errors: vec![FieldError::new(
                Field::Email,
                "Please enter a valid email address",
            )],
            form_data,
        });

        assert_eq!(
            serde_json::to_value(&outcome).unwrap(),
            json!({
                "status": "invalid",
                "errors": [{"field": "email", "message": "Please enter a valid email address"}],
                "form_data": {"age": 25, "email": "not-an-email", "topics": ["ai-ml"]}
            })
        );
    }

    #[test]
    fn redisplay_renders_labelled_messages() {
        let redisplay = Redisplay {
            errors: vec![
                FieldError::new(Field::Name, "Name is required"),
                FieldError::new(Field::File, "File size too large. Maximum size is 16MB"),
            ],
            form_data: BTreeMap::new(),
        };

        assert!(redisplay.has_error(Field::File));
        assert!(!redisplay.has_error(Field::Email));
        assert_eq!(
            redisplay.messages(),
            vec![
                "Name: Name is required".to_string(),
                "File: File size too large. Maximum size is 16MB".to_string(),
            ]
        );
    }

    #[test]
    fn form_values_deserialize_by_shape() {
        let parsed: BTreeMap<String, FormValue> =
            serde_json::from_value(json!({"a": 1, "b": "x", "c": ["y"]})).unwrap();
        assert_eq!(parsed["a"], FormValue::Number(1));
        assert_eq!(parsed["b"], FormValue::from("x"));
        assert_eq!(parsed["c"], FormValue::List(vec!["y".to_string()]));
    }
}
