use crate::contact::raw::{RawFile, RawSubmission};
use actix_multipart::{Multipart, MultipartError};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use common::model::field::Field;
use futures_util::StreamExt;
use md5::Context;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Text inputs larger than this are refused outright.
const MAX_TEXT_FIELD_BYTES: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum IntakeError {
    #[error("malformed multipart body: {0}")]
    Multipart(#[from] MultipartError),
    #[error("form field `{0}` is not valid UTF-8")]
    Encoding(String),
    #[error("form field `{0}` is too large")]
    FieldTooLarge(String),
    #[error("form fields exceed the {0} byte request limit")]
    RequestTooLarge(u64),
    #[error("could not stage upload: {0}")]
    Io(#[from] std::io::Error),
}

impl ResponseError for IntakeError {
    fn status_code(&self) -> StatusCode {
        match self {
            IntakeError::Multipart(_) | IntakeError::Encoding(_) => StatusCode::BAD_REQUEST,
            IntakeError::FieldTooLarge(_) | IntakeError::RequestTooLarge(_) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            IntakeError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .json(serde_json::json!({ "error": self.to_string() }))
    }
}

/// An attachment written to a temporary file next to its final location.
///
/// Dropping it deletes the file, which is what happens to uploads of
/// rejected submissions.
pub struct StagedUpload {
    file: NamedTempFile,
    pub md5: String,
    pub size: u64,
}

impl StagedUpload {
    /// Moves the upload to `<dir>/<md5>_<filename>` and returns that path.
    pub fn persist(self, dir: &Path, filename: &str) -> std::io::Result<PathBuf> {
        let target = dir.join(format!("{}_{}", self.md5, filename));
        self.file.persist(&target).map_err(|e| e.error)?;
        Ok(target)
    }
}

pub struct ContactIntake {
    pub raw: RawSubmission,
    pub upload: Option<StagedUpload>,
    /// Bytes of field content actually received.
    pub bytes_read: u64,
}

/// Reads the whole multipart form.
///
/// Text parts become raw values; once their combined size passes
/// `max_request` reading stops with [`IntakeError::RequestTooLarge`]. The
/// `attachment` part is streamed into a temporary file in `upload_dir` while
/// its MD5 is computed; bytes past `max_request` are counted but not written,
/// so an oversized file is left to the file rule. Other file parts are
/// drained and ignored.
pub async fn read_contact_form(
    mut payload: Multipart,
    upload_dir: &Path,
    max_request: u64,
) -> Result<ContactIntake, IntakeError> {
    let mut raw = RawSubmission::new();
    let mut upload: Option<StagedUpload> = None;
    let mut bytes_read = 0u64;
    let mut text_bytes = 0u64;

    while let Some(item) = payload.next().await {
        let mut field = item?;
        let name = field
            .content_disposition()
            .and_then(|cd| cd.get_name().map(|n| n.to_string()))
            .unwrap_or_default();
        let filename = field
            .content_disposition()
            .and_then(|cd| cd.get_filename().map(|f| f.to_string()));

        match filename {
            Some(filename)
                if name == Field::File.form_key() && !filename.is_empty() && upload.is_none() =>
            {
                let mut staged = tempfile::Builder::new()
                    .prefix(".upload-")
                    .tempfile_in(upload_dir)?;
                let mut hasher = Context::new();
                let mut size = 0u64;

                while let Some(chunk) = field.next().await {
                    let chunk = chunk?;
                    size += chunk.len() as u64;
                    if size <= max_request {
                        hasher.consume(&chunk);
                        staged.write_all(&chunk)?;
                    }
                }
                staged.flush()?;

                bytes_read += size;
                raw.set_file(RawFile { filename, size });
                upload = Some(StagedUpload {
                    file: staged,
                    md5: format!("{:x}", hasher.finalize()),
                    size,
                });
            }
            Some(filename) => {
                while let Some(chunk) = field.next().await {
                    bytes_read += chunk?.len() as u64;
                }
                // Browsers send an empty file part when nothing was chosen.
                if name == Field::File.form_key() && raw.file().is_none() {
                    raw.set_file(RawFile { filename, size: 0 });
                }
            }
            None => {
                let mut bytes = Vec::new();
                while let Some(chunk) = field.next().await {
                    let chunk = chunk?;
                    text_bytes += chunk.len() as u64;
                    if text_bytes > max_request {
                        return Err(IntakeError::RequestTooLarge(max_request));
                    }
                    if bytes.len() + chunk.len() > MAX_TEXT_FIELD_BYTES {
                        return Err(IntakeError::FieldTooLarge(name));
                    }
                    bytes.extend_from_slice(&chunk);
                }
                bytes_read += bytes.len() as u64;
                let value =
                    String::from_utf8(bytes).map_err(|_| IntakeError::Encoding(name.clone()))?;
                raw.push(name, value);
            }
        }
    }

    Ok(ContactIntake {
        raw,
        upload,
        bytes_read,
    })
}
