use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use backend::config::{Settings, StorageBackend, DEFAULT_MAX_CONTENT_LENGTH};
use backend::services;
use backend::state::AppState;
use backend::storage::memory::MemoryStore;
use backend::storage::sqlite::SqliteStore;
use backend::storage::SubmissionStore;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;

const BOUNDARY: &str = "----contact-form-boundary";

const ONE_MIB: u64 = 1024 * 1024;

fn settings(upload_dir: &Path, max_content_length: u64) -> Settings {
    Settings {
        host: "127.0.0.1".to_string(),
        port: 0,
        storage: StorageBackend::Memory,
        upload_dir: upload_dir.to_path_buf(),
        max_content_length,
    }
}

fn valid_fields() -> Vec<(&'static str, &'static str)> {
    vec![
        ("name", "Jo"),
        ("email", "Jo@Example.com"),
        ("phone", "(987) 654-3210"),
        ("age", "25"),
        ("message", "This is a valid message."),
        ("priority", "high"),
        ("topics", "web-development"),
        ("topics", "ai-ml"),
        ("satisfaction", "7"),
        ("form_version", "2.0"),
    ]
}

fn multipart_body(fields: &[(&str, &str)], file: Option<(&str, &[u8])>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some((filename, content)) = file {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\n\
                 Content-Disposition: form-data; name=\"attachment\"; filename=\"{filename}\"\r\n\
                 Content-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(content);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn contact_request(body: Vec<u8>) -> test::TestRequest {
    test::TestRequest::post()
        .uri("/api/contact")
        .insert_header((
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(body)
}

macro_rules! app {
    ($store:expr, $dir:expr) => {
        app!($store, $dir, DEFAULT_MAX_CONTENT_LENGTH)
    };
    ($store:expr, $dir:expr, $limit:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState::new($store, &settings($dir, $limit))))
                .configure(services::configure),
        )
        .await
    };
}

#[actix_web::test]
async fn valid_submission_is_saved_and_listed() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SubmissionStore> = Arc::new(MemoryStore::new());
    let app = app!(store.clone(), dir.path());

    let req = contact_request(multipart_body(&valid_fields(), None)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "accepted");
    assert_eq!(body["submission_id"], 1);
    assert_eq!(body["persisted"], true);
    assert_eq!(body["data"]["email"], "jo@example.com");
    assert_eq!(body["data"]["phone"], "9876543210");
    assert_eq!(body["data"]["topics"], serde_json::json!(["web-development", "ai-ml"]));

    let req = test::TestRequest::get()
        .uri("/api/submissions?limit=5")
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    let listed = listed.as_array().unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0]["id"], 1);
    assert_eq!(listed[0]["name"], "Jo");
}

#[actix_web::test]
async fn invalid_submission_reports_every_error_and_stores_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SubmissionStore> = Arc::new(MemoryStore::new());
    let app = app!(store.clone(), dir.path());

    let fields = [
        ("name", "J"),
        ("email", "nope"),
        ("age", "25"),
        ("message", "short"),
        ("priority", "medium"),
        ("satisfaction", "7"),
    ];
    let req = contact_request(multipart_body(&fields, None)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "invalid");
    let failed: Vec<&str> = body["errors"]
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["field"].as_str().unwrap())
        .collect();
    assert_eq!(failed, vec!["name", "email", "message"]);
    assert_eq!(body["form_data"]["name"], "J");
    assert_eq!(body["form_data"]["age"], 25);

    assert!(store.list_recent(10).unwrap().is_empty());
}

#[actix_web::test]
async fn accepted_attachment_is_moved_into_upload_dir() {
    let dir = tempfile::tempdir().unwrap();
    let db = dir.path().join("contact.sqlite");
    let uploads = dir.path().join("uploads");
    let store: Arc<dyn SubmissionStore> = Arc::new(SqliteStore::open(&db).unwrap());
    let app = app!(store.clone(), &uploads);

    let body = multipart_body(
        &valid_fields(),
        Some(("my notes.txt", &b"hello attachment"[..])),
    );
    let resp = test::call_service(&app, contact_request(body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body: Value = test::read_body_json(resp).await;
    let attachment = &body["data"]["attachment"];
    assert_eq!(attachment["filename"], "my_notes.txt");
    assert_eq!(attachment["size"], 16);

    let stored_path = attachment["stored_path"].as_str().unwrap();
    assert!(stored_path.ends_with("_my_notes.txt"));
    assert_eq!(std::fs::read(stored_path).unwrap(), b"hello attachment");

    let records = store.list_recent(1).unwrap();
    let saved = records[0].submission.attachment.as_ref().unwrap();
    assert_eq!(saved.stored_path.as_deref(), Some(stored_path));
}

#[actix_web::test]
async fn disallowed_attachment_is_rejected_and_discarded() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SubmissionStore> = Arc::new(MemoryStore::new());
    let app = app!(store.clone(), dir.path());

    let body = multipart_body(&valid_fields(), Some(("run.exe", &b"MZ"[..])));
    let resp = test::call_service(&app, contact_request(body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["errors"][0]["field"], "file");
    assert_eq!(
        body["errors"][0]["message"],
        "File type not allowed. Allowed types: doc, docx, gif, jpeg, jpg, pdf, png, txt"
    );
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[actix_web::test]
async fn email_can_be_checked_on_its_own() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(Arc::new(MemoryStore::new()), dir.path());

    let req = test::TestRequest::post()
        .uri("/api/contact/validate-email")
        .set_json(serde_json::json!({ "email": "Ada@Example.com" }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, serde_json::json!({ "valid": true, "email": "ada@example.com" }));

    let req = test::TestRequest::post()
        .uri("/api/contact/validate-email")
        .set_json(serde_json::json!({}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, serde_json::json!({ "valid": false, "error": "Email is required" }));
}

#[actix_web::test]
async fn database_status_reports_backend() {
    let dir = tempfile::tempdir().unwrap();
    let app = app!(Arc::new(MemoryStore::new()), dir.path());

    let req = test::TestRequest::get().uri("/api/database-status").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["connected"], true);
    assert_eq!(body["backend"], "memory");
    assert_eq!(body["message"], "Database connection successful");
}

#[actix_web::test]
async fn oversized_form_without_attachment_is_refused() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SubmissionStore> = Arc::new(MemoryStore::new());
    let app = app!(store.clone(), dir.path(), ONE_MIB);

    let filler_value = "x".repeat(60 * 1024);
    let filler: Vec<(String, &str)> = (0..20)
        .map(|i| (format!("filler_{i}"), filler_value.as_str()))
        .collect();
    let mut fields: Vec<(&str, &str)> = valid_fields();
    fields.extend(filler.iter().map(|(name, value)| (name.as_str(), *value)));

    let req = contact_request(multipart_body(&fields, None)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "form fields exceed the 1048576 byte request limit"
    );
    assert!(store.list_recent(10).unwrap().is_empty());
}

#[actix_web::test]
async fn oversized_request_with_attachment_fails_the_file_rule() {
    let dir = tempfile::tempdir().unwrap();
    let store: Arc<dyn SubmissionStore> = Arc::new(MemoryStore::new());
    let app = app!(store.clone(), dir.path(), ONE_MIB);

    let content = vec![b'a'; 1_200_000];
    let body = multipart_body(&valid_fields(), Some(("report.pdf", &content[..])));
    let resp = test::call_service(&app, contact_request(body).to_request()).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "invalid");
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
    assert_eq!(body["errors"][0]["field"], "file");
    assert_eq!(
        body["errors"][0]["message"],
        "File size too large. Maximum size is 1MB"
    );
    assert_eq!(body["form_data"]["name"], "Jo");
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    assert!(store.list_recent(10).unwrap().is_empty());
}
