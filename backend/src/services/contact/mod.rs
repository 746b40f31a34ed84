//! # Contact Service Module
//!
//! Endpoints under `/api/contact`.
//!
//! ## Sub-modules:
//! - `intake`: reads the multipart form, staging the attachment on disk.
//! - `submit`: validates a submission and stores it or sends it back for correction.
//! - `validate_email`: lets a client check one email address before submitting.

mod intake;
mod submit;
mod validate_email;

pub use intake::{read_contact_form, ContactIntake, IntakeError, StagedUpload};

use actix_web::web::{post, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/contact";

/// Configures and returns the Actix `Scope` for the contact form.
///
/// # Registered Routes:
///
/// *   **`POST `** (the scope root):
///     - **Handler**: `submit::process`
///     - **Description**: Accepts the `multipart/form-data` form. Answers `200 OK` with an
///       accepted receipt, or `422 Unprocessable Entity` with every field error and the values
///       to re-fill the form with.
///
/// *   **`POST /validate-email`**:
///     - **Handler**: `validate_email::process`
///     - **Description**: Runs the email rule on `{ "email": ... }` and returns
///       `{ "valid": true, "email": <normalized> }` or `{ "valid": false, "error": ... }`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("", post().to(submit::process))
        .route("/validate-email", post().to(validate_email::process))
}
