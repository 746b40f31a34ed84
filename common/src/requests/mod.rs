use serde::Deserialize;

/// Body of `POST /api/contact/validate-email`.
#[derive(Debug, Deserialize)]
pub struct ValidateEmailRequest {
    #[serde(default)]
    pub email: String,
}

/// Query string of `GET /api/submissions`.
#[derive(Debug, Default, Deserialize)]
pub struct RecentSubmissionsQuery {
    pub limit: Option<usize>,
}
