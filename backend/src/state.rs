//! Shared application state handed to every handler.
//!
//! `AppState` is built once in `main.rs` and registered as `web::Data`. It is
//! cheap to clone: the store sits behind an `Arc`, and the remaining fields are
//! read-only settings the submit handler needs for upload intake.

use crate::config::Settings;
use crate::storage::SubmissionStore;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// The storage collaborator chosen at startup. Handlers only call it from
    /// `web::block`, since every backend is synchronous.
    pub store: Arc<dyn SubmissionStore>,

    /// Where accepted attachments are moved to. Uploads are staged in the
    /// same directory so the final move is a rename.
    pub upload_dir: PathBuf,

    /// Largest request body a submission with an attachment may have.
    pub max_content_length: u64,
}

impl AppState {
    pub fn new(store: Arc<dyn SubmissionStore>, settings: &Settings) -> Self {
        Self {
            store,
            upload_dir: settings.upload_dir.clone(),
            max_content_length: settings.max_content_length,
        }
    }
}
