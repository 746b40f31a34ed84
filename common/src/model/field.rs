use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the ten logical fields of the contact form.
///
/// Declaration order is the order in which validators run and in which
/// errors are reported back to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Name,
    Email,
    Phone,
    Age,
    Date,
    Message,
    Priority,
    Topics,
    Satisfaction,
    File,
}

impl Field {
    pub const ALL: [Field; 10] = [
        Field::Name,
        Field::Email,
        Field::Phone,
        Field::Age,
        Field::Date,
        Field::Message,
        Field::Priority,
        Field::Topics,
        Field::Satisfaction,
        Field::File,
    ];

    /// The multipart/form key the browser submits this field under.
    pub fn form_key(self) -> &'static str {
        match self {
            Field::Name => "name",
            Field::Email => "email",
            Field::Phone => "phone",
            Field::Age => "age",
            Field::Date => "date",
            Field::Message => "message",
            Field::Priority => "priority",
            Field::Topics => "topics",
            Field::Satisfaction => "satisfaction",
            Field::File => "attachment",
        }
    }

    /// Human label used as the prefix of rendered error messages.
    pub fn label(self) -> &'static str {
        match self {
            Field::Name => "Name",
            Field::Email => "Email",
            Field::Phone => "Phone",
            Field::Age => "Age",
            Field::Date => "Date",
            Field::Message => "Message",
            Field::Priority => "Priority",
            Field::Topics => "Topics",
            Field::Satisfaction => "Satisfaction",
            Field::File => "File",
        }
    }

    pub fn from_form_key(key: &str) -> Option<Field> {
        Field::ALL.into_iter().find(|f| f.form_key() == key)
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A user-correctable problem with a single field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

impl FieldError {
    pub fn new(field: Field, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}
