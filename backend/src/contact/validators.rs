//! One validator per form field.
//!
//! Every validator is a pure function of its own field's raw value(s); the
//! file validator additionally sees the size of the whole request. Errors are
//! plain messages, the coordinator attaches the field.

use crate::contact::coordinator::RequestContext;
use crate::contact::raw::{RawFile, RawSubmission};
use chrono::NaiveDate;
use common::model::field::Field;
use common::model::submission::{Priority, Topic, UploadedFile};
use once_cell::sync::Lazy;
use regex::Regex;
use std::num::IntErrorKind;

static NAME_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z\s\-']+$").expect("name pattern compiles"));

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("email pattern compiles")
});

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Sorted, so the rejection message is stable.
pub const ALLOWED_EXTENSIONS: [&str; 8] =
    ["doc", "docx", "gif", "jpeg", "jpg", "pdf", "png", "txt"];

pub fn validate_name(raw: Option<&str>) -> Result<String, String> {
    let name = match raw {
        Some(v) if !v.is_empty() => v.trim(),
        _ => return Err("Name is required".to_string()),
    };
    let len = name.chars().count();
    if len < 2 {
        return Err("Name must be at least 2 characters long".to_string());
    }
    if len > 50 {
        return Err("Name must be less than 50 characters".to_string());
    }
    if !NAME_REGEX.is_match(name) {
        return Err(
            "Name can only contain letters, spaces, hyphens, and apostrophes".to_string(),
        );
    }
    Ok(name.to_string())
}

pub fn validate_email(raw: Option<&str>) -> Result<String, String> {
    let email = match raw {
        Some(v) if !v.is_empty() => v.trim(),
        _ => return Err("Email is required".to_string()),
    };
    if !EMAIL_REGEX.is_match(email) {
        return Err("Please enter a valid email address".to_string());
    }
    Ok(email.to_lowercase())
}

/// Optional. Keeps only the digits of whatever was typed.
pub fn validate_phone(raw: Option<&str>) -> Result<Option<String>, String> {
    let phone = match raw {
        Some(v) if !v.is_empty() => v,
        _ => return Ok(None),
    };
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() < 10 {
        return Err("Phone number must have at least 10 digits".to_string());
    }
    if digits.len() > 15 {
        return Err("Phone number must have less than 15 digits".to_string());
    }
    Ok(Some(digits))
}

pub fn validate_age(raw: Option<&str>) -> Result<u8, String> {
    let age = match raw {
        Some(v) if !v.is_empty() => v.trim(),
        _ => return Err("Age is required".to_string()),
    };
    let age = match age.parse::<i64>() {
        Ok(n) => n,
        Err(e) if *e.kind() == IntErrorKind::PosOverflow => i64::MAX,
        Err(e) if *e.kind() == IntErrorKind::NegOverflow => i64::MIN,
        Err(_) => return Err("Age must be a valid number".to_string()),
    };
    if age < 13 {
        return Err("You must be at least 13 years old".to_string());
    }
    if age > 120 {
        return Err("Please enter a valid age".to_string());
    }
    u8::try_from(age).map_err(|_| "Please enter a valid age".to_string())
}

/// Optional. `today` is passed in so the future-date rule is testable.
pub fn validate_date(raw: Option<&str>, today: NaiveDate) -> Result<Option<NaiveDate>, String> {
    let date = match raw {
        Some(v) if !v.is_empty() => v,
        _ => return Ok(None),
    };
    let date = NaiveDate::parse_from_str(date, DATE_FORMAT)
        .map_err(|_| "Please enter a valid date".to_string())?;
    if date > today {
        return Err("Date cannot be in the future".to_string());
    }
    Ok(Some(date))
}

pub fn validate_message(raw: Option<&str>) -> Result<String, String> {
    let message = match raw {
        Some(v) if !v.is_empty() => v.trim(),
        _ => return Err("Message is required".to_string()),
    };
    let len = message.chars().count();
    if len < 10 {
        return Err("Message must be at least 10 characters long".to_string());
    }
    if len > 1000 {
        return Err("Message must be less than 1000 characters".to_string());
    }
    Ok(message.to_string())
}

pub fn validate_priority(raw: Option<&str>) -> Result<Priority, String> {
    raw.unwrap_or_default()
        .parse::<Priority>()
        .map_err(|_| "Please select a valid priority level".to_string())
}

/// Optional. Nothing selected is valid; otherwise every value must be known.
pub fn validate_topics(raw: &[&str]) -> Result<Vec<Topic>, String> {
    let mut topics = Vec::with_capacity(raw.len());
    let mut invalid = Vec::new();
    for value in raw {
        match value.parse::<Topic>() {
            Ok(topic) => topics.push(topic),
            Err(_) => invalid.push(*value),
        }
    }
    if !invalid.is_empty() {
        return Err(format!("Invalid topics selected: {}", invalid.join(", ")));
    }
    Ok(topics)
}

/// A missing field counts as 0; a present but non-numeric one is rejected
/// with its own message.
pub fn validate_satisfaction(raw: Option<&str>) -> Result<u8, String> {
    let value = match raw {
        None => 0,
        Some(v) => match v.trim().parse::<i64>() {
            Ok(n) => n,
            Err(e)
                if matches!(
                    e.kind(),
                    IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
                ) =>
            {
                0
            }
            Err(_) => return Err("Invalid satisfaction rating".to_string()),
        },
    };
    match u8::try_from(value) {
        Ok(n @ 1..=10) => Ok(n),
        _ => Err("Please select a value between 1 and 10".to_string()),
    }
}

/// Optional. The size limit applies to the whole request body, not to the
/// file part alone.
pub fn validate_file(
    file: Option<&RawFile>,
    request_size: u64,
    max_request_size: u64,
) -> Result<Option<UploadedFile>, String> {
    let file = match file {
        Some(f) if !f.filename.is_empty() => f,
        _ => return Ok(None),
    };
    if request_size > max_request_size {
        return Err(format!(
            "File size too large. Maximum size is {}MB",
            max_request_size / (1024 * 1024)
        ));
    }
    let not_allowed = || {
        format!(
            "File type not allowed. Allowed types: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )
    };
    let lowered = file.filename.to_lowercase();
    match lowered.rsplit_once('.') {
        Some((_, ext)) if ALLOWED_EXTENSIONS.contains(&ext) => {}
        _ => return Err(not_allowed()),
    }
    let filename = secure_filename(&file.filename);
    if filename.is_empty() {
        return Err(not_allowed());
    }
    Ok(Some(UploadedFile {
        filename,
        size: file.size,
        stored_path: None,
    }))
}

/// Reduces a client-supplied filename to something safe to put on disk:
/// ASCII only, no path separators, whitespace runs joined with `_`.
pub fn secure_filename(filename: &str) -> String {
    let flattened: String = filename
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");
    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    kept.trim_matches(|c| c == '.' || c == '_').to_string()
}

/// The validated value of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Name(String),
    Email(String),
    Phone(Option<String>),
    Age(u8),
    Date(Option<NaiveDate>),
    Message(String),
    Priority(Priority),
    Topics(Vec<Topic>),
    Satisfaction(u8),
    File(Option<UploadedFile>),
}

impl FieldValue {
    pub fn field(&self) -> Field {
        match self {
            FieldValue::Name(_) => Field::Name,
            FieldValue::Email(_) => Field::Email,
            FieldValue::Phone(_) => Field::Phone,
            FieldValue::Age(_) => Field::Age,
            FieldValue::Date(_) => Field::Date,
            FieldValue::Message(_) => Field::Message,
            FieldValue::Priority(_) => Field::Priority,
            FieldValue::Topics(_) => Field::Topics,
            FieldValue::Satisfaction(_) => Field::Satisfaction,
            FieldValue::File(_) => Field::File,
        }
    }
}

/// Uniform validator signature used by the coordinator.
pub type Validator = fn(&RawSubmission, &RequestContext) -> Result<FieldValue, String>;

pub fn validator_for(field: Field) -> Validator {
    match field {
        Field::Name => name_entry,
        Field::Email => email_entry,
        Field::Phone => phone_entry,
        Field::Age => age_entry,
        Field::Date => date_entry,
        Field::Message => message_entry,
        Field::Priority => priority_entry,
        Field::Topics => topics_entry,
        Field::Satisfaction => satisfaction_entry,
        Field::File => file_entry,
    }
}

fn name_entry(raw: &RawSubmission, _: &RequestContext) -> Result<FieldValue, String> {
    validate_name(raw.field(Field::Name)).map(FieldValue::Name)
}

fn email_entry(raw: &RawSubmission, _: &RequestContext) -> Result<FieldValue, String> {
    validate_email(raw.field(Field::Email)).map(FieldValue::Email)
}

fn phone_entry(raw: &RawSubmission, _: &RequestContext) -> Result<FieldValue, String> {
    validate_phone(raw.field(Field::Phone)).map(FieldValue::Phone)
}

fn age_entry(raw: &RawSubmission, _: &RequestContext) -> Result<FieldValue, String> {
    validate_age(raw.field(Field::Age)).map(FieldValue::Age)
}

fn date_entry(raw: &RawSubmission, ctx: &RequestContext) -> Result<FieldValue, String> {
    validate_date(raw.field(Field::Date), ctx.today).map(FieldValue::Date)
}

fn message_entry(raw: &RawSubmission, _: &RequestContext) -> Result<FieldValue, String> {
    validate_message(raw.field(Field::Message)).map(FieldValue::Message)
}

fn priority_entry(raw: &RawSubmission, _: &RequestContext) -> Result<FieldValue, String> {
    validate_priority(raw.field(Field::Priority)).map(FieldValue::Priority)
}

fn topics_entry(raw: &RawSubmission, _: &RequestContext) -> Result<FieldValue, String> {
    validate_topics(&raw.all(Field::Topics.form_key())).map(FieldValue::Topics)
}

fn satisfaction_entry(raw: &RawSubmission, _: &RequestContext) -> Result<FieldValue, String> {
    validate_satisfaction(raw.field(Field::Satisfaction)).map(FieldValue::Satisfaction)
}

fn file_entry(raw: &RawSubmission, ctx: &RequestContext) -> Result<FieldValue, String> {
    validate_file(raw.file(), ctx.request_size, ctx.max_request_size).map(FieldValue::File)
}
