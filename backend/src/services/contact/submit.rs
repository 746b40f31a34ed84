use crate::contact::{self, Evaluation, RequestContext};
use crate::services::contact::intake::{read_contact_form, IntakeError, StagedUpload};
use crate::state::AppState;
use crate::storage::StorageError;
use actix_multipart::Multipart;
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use common::model::submission::NormalizedSubmission;
use common::responses::SubmissionOutcome;
use log::{debug, info, warn};
use std::path::Path;
use uuid::Uuid;

/// HTTP handler wrapper that converts the outcome to an `HttpResponse`.
///
/// - Accepted (saved or not): `200 OK` with the receipt.
/// - Any field invalid: `422 Unprocessable Entity` with the errors and the form values.
/// - Unreadable multipart body: the `IntakeError` status.
pub(crate) async fn process(
    req: HttpRequest,
    payload: Multipart,
    state: web::Data<AppState>,
) -> impl Responder {
    match submit_contact_form(req, payload, state).await {
        Ok(SubmissionOutcome::Invalid(redisplay)) => {
            HttpResponse::UnprocessableEntity().json(SubmissionOutcome::Invalid(redisplay))
        }
        Ok(outcome) => HttpResponse::Ok().json(outcome),
        Err(e) => {
            warn!("Rejected unreadable contact form: {}", e);
            actix_web::ResponseError::error_response(&e)
        }
    }
}

async fn submit_contact_form(
    req: HttpRequest,
    payload: Multipart,
    state: web::Data<AppState>,
) -> Result<SubmissionOutcome, IntakeError> {
    let reference = Uuid::new_v4();
    let declared = declared_length(&req);

    tokio::fs::create_dir_all(&state.upload_dir).await?;
    let intake = read_contact_form(payload, &state.upload_dir, state.max_content_length).await?;
    let request_size = declared.unwrap_or(intake.bytes_read);
    info!("Contact form {} received ({} bytes)", reference, request_size);
    debug!("Contact form {} fields: {:?}", reference, intake.raw.keys());

    let ctx = RequestContext::new(request_size, state.max_content_length);
    let mut submission = match contact::evaluate(&intake.raw, &ctx) {
        Evaluation::Invalid(redisplay) => {
            info!(
                "Contact form {} has {} invalid field(s)",
                reference,
                redisplay.errors.len()
            );
            return Ok(SubmissionOutcome::Invalid(redisplay));
        }
        Evaluation::Valid(submission) => submission,
    };

    let store = state.store.clone();
    let upload_dir = state.upload_dir.clone();
    let upload = intake.upload;
    let fallback = submission.clone();
    let receipt = match web::block(move || {
        if let Some(upload) = upload {
            store_attachment(&upload_dir, upload, &mut submission);
        }
        contact::accept(submission, store.as_ref())
    })
    .await
    {
        Ok(receipt) => receipt,
        Err(e) => {
            contact::coordinator::receipt(fallback, Err(StorageError::Unavailable(e.to_string())))
        }
    };
    info!(
        "Contact form {} accepted (persisted: {})",
        reference, receipt.persisted
    );
    Ok(SubmissionOutcome::Accepted(receipt))
}

/// Moves the staged attachment next to earlier uploads and records where it
/// went. A failed move keeps the submission; only the path is lost.
fn store_attachment(
    upload_dir: &Path,
    upload: StagedUpload,
    submission: &mut NormalizedSubmission,
) {
    let Some(attachment) = submission.attachment.as_mut() else {
        return;
    };
    let md5 = upload.md5.clone();
    match upload.persist(upload_dir, &attachment.filename) {
        Ok(path) => {
            info!("Stored attachment {} (md5 {})", path.display(), md5);
            attachment.stored_path = Some(path.to_string_lossy().into_owned());
        }
        Err(e) => warn!("Could not store attachment {}: {}", attachment.filename, e),
    }
}

fn declared_length(req: &HttpRequest) -> Option<u64> {
    req.headers()
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.trim().parse::<u64>().ok())
}
