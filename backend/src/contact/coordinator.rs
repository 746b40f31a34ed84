//! Runs every field validator over one submission and decides its fate.
//!
//! All ten validators run exactly once per submission, whatever the others
//! return. If any field failed, the caller gets a [`Redisplay`] with every
//! error and the input worth keeping. Otherwise the normalized submission goes
//! to the store, and a failed write still counts as an accepted submission:
//! the receipt says the input was received and that saving it was not
//! confirmed.

use crate::contact::raw::RawSubmission;
use crate::contact::redisplay;
use crate::contact::validators::{validator_for, FieldValue};
use crate::storage::{StorageError, SubmissionStore};
use chrono::{Local, NaiveDate};
use common::model::field::{Field, FieldError};
use common::model::submission::NormalizedSubmission;
use common::responses::{Redisplay, SubmissionOutcome, SubmissionReceipt};
use log::{error, info};
use std::collections::BTreeMap;

pub const DEFAULT_FORM_VERSION: &str = "2.0";

/// Request-scoped facts validators may depend on besides their own field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    pub today: NaiveDate,
    /// Size of the whole request body in bytes.
    pub request_size: u64,
    pub max_request_size: u64,
}

impl RequestContext {
    pub fn new(request_size: u64, max_request_size: u64) -> Self {
        Self {
            today: Local::now().date_naive(),
            request_size,
            max_request_size,
        }
    }

    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }
}

/// Hidden inputs carried along with the form but never validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HiddenFields {
    pub form_version: String,
    pub timestamp: Option<String>,
}

impl HiddenFields {
    pub fn from_raw(raw: &RawSubmission) -> Self {
        Self {
            form_version: raw
                .first("form_version")
                .unwrap_or(DEFAULT_FORM_VERSION)
                .to_string(),
            timestamp: raw
                .first("timestamp")
                .filter(|t| !t.is_empty())
                .map(str::to_string),
        }
    }
}

/// The fields that validated so far, keyed by field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PartialSubmission {
    values: BTreeMap<Field, FieldValue>,
}

impl PartialSubmission {
    pub fn insert(&mut self, value: FieldValue) {
        self.values.insert(value.field(), value);
    }

    pub fn contains(&self, field: Field) -> bool {
        self.values.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &FieldValue> {
        self.values.values()
    }

    /// `None` unless all ten fields are present.
    pub fn complete(&self, hidden: &HiddenFields) -> Option<NormalizedSubmission> {
        let (mut name, mut email, mut phone, mut age, mut date) = (None, None, None, None, None);
        let (mut message, mut priority, mut topics, mut satisfaction, mut file) =
            (None, None, None, None, None);
        for value in self.values.values().cloned() {
            match value {
                FieldValue::Name(v) => name = Some(v),
                FieldValue::Email(v) => email = Some(v),
                FieldValue::Phone(v) => phone = Some(v),
                FieldValue::Age(v) => age = Some(v),
                FieldValue::Date(v) => date = Some(v),
                FieldValue::Message(v) => message = Some(v),
                FieldValue::Priority(v) => priority = Some(v),
                FieldValue::Topics(v) => topics = Some(v),
                FieldValue::Satisfaction(v) => satisfaction = Some(v),
                FieldValue::File(v) => file = Some(v),
            }
        }
        Some(NormalizedSubmission {
            name: name?,
            email: email?,
            phone: phone?,
            age: age?,
            contact_date: date?,
            message: message?,
            priority: priority?,
            topics: topics?,
            satisfaction: satisfaction?,
            attachment: file?,
            form_version: hidden.form_version.clone(),
            timestamp: hidden.timestamp.clone(),
        })
    }
}

/// Every validator's result for one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation {
    pub partial: PartialSubmission,
    pub errors: Vec<FieldError>,
}

pub fn validate_all(raw: &RawSubmission, ctx: &RequestContext) -> Validation {
    let mut partial = PartialSubmission::default();
    let mut errors = Vec::new();
    for field in Field::ALL {
        match validator_for(field)(raw, ctx) {
            Ok(value) => partial.insert(value),
            Err(message) => errors.push(FieldError::new(field, message)),
        }
    }
    Validation { partial, errors }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Evaluation {
    Invalid(Redisplay),
    Valid(NormalizedSubmission),
}

/// Validation without any storage interaction.
pub fn evaluate(raw: &RawSubmission, ctx: &RequestContext) -> Evaluation {
    let Validation { partial, errors } = validate_all(raw, ctx);
    let hidden = HiddenFields::from_raw(raw);

    if errors.is_empty() {
        if let Some(submission) = partial.complete(&hidden) {
            return Evaluation::Valid(submission);
        }
    }

    Evaluation::Invalid(Redisplay {
        form_data: redisplay::preserve_input(raw, &partial, &hidden),
        errors,
    })
}

/// Hands a validated submission to the store.
pub fn accept(submission: NormalizedSubmission, store: &dyn SubmissionStore) -> SubmissionReceipt {
    let stored = store.insert(&submission);
    receipt(submission, stored)
}

/// Builds the confirmation for a submission whose validation succeeded.
/// A storage error downgrades the receipt, it never rejects the input.
pub fn receipt(
    submission: NormalizedSubmission,
    stored: Result<i64, StorageError>,
) -> SubmissionReceipt {
    match stored {
        Ok(id) => {
            info!("Contact submission saved with ID: {}", id);
            SubmissionReceipt {
                submission_id: Some(id),
                persisted: true,
                message: format!(
                    "Thank you {}! Your message has been received and saved to the database (ID: {}).",
                    submission.name, id
                ),
                data: submission,
            }
        }
        Err(e) => {
            error!("Failed to save contact submission: {}", e);
            SubmissionReceipt {
                submission_id: None,
                persisted: false,
                message: format!(
                    "Thank you {}! Your message has been received (but there was an issue saving to database).",
                    submission.name
                ),
                data: submission,
            }
        }
    }
}

pub fn submit(
    raw: &RawSubmission,
    ctx: &RequestContext,
    store: &dyn SubmissionStore,
) -> SubmissionOutcome {
    match evaluate(raw, ctx) {
        Evaluation::Invalid(redisplay) => SubmissionOutcome::Invalid(redisplay),
        Evaluation::Valid(submission) => SubmissionOutcome::Accepted(accept(submission, store)),
    }
}
