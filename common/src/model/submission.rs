use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Returned when a string does not name any variant of a form enum.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value `{0}`")]
pub struct UnknownVariant(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Topics a visitor can tick on the form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Topic {
    WebDevelopment,
    MobileApps,
    DataScience,
    AiMl,
    Cybersecurity,
}

impl Topic {
    pub const ALL: [Topic; 5] = [
        Topic::WebDevelopment,
        Topic::MobileApps,
        Topic::DataScience,
        Topic::AiMl,
        Topic::Cybersecurity,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Topic::WebDevelopment => "web-development",
            Topic::MobileApps => "mobile-apps",
            Topic::DataScience => "data-science",
            Topic::AiMl => "ai-ml",
            Topic::Cybersecurity => "cybersecurity",
        }
    }
}

impl FromStr for Topic {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Topic::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An accepted attachment.
///
/// `stored_path` is only set once the upload has been moved out of its
/// temporary location, which happens after the whole form validated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub filename: String,
    pub size: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stored_path: Option<String>,
}

/// A fully validated contact form submission, ready for storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedSubmission {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub age: u8,
    pub contact_date: Option<NaiveDate>,
    pub message: String,
    pub priority: Priority,
    pub topics: Vec<Topic>,
    pub satisfaction: u8,
    pub attachment: Option<UploadedFile>,
    /// Hidden form field, passed through unvalidated.
    pub form_version: String,
    /// Hidden client-side timestamp, passed through unvalidated.
    pub timestamp: Option<String>,
}
