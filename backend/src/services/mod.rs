//! HTTP surface of the backend, one module per API area.
//!
//! - `contact`: form submission and the email pre-check.
//! - `submissions`: recently stored submissions.
//! - `status`: storage connectivity probe.

pub mod contact;
pub mod status;
pub mod submissions;

use actix_web::web;

/// Registers every scope; used by `main.rs` and by the integration tests.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(contact::configure_routes())
        .service(submissions::configure_routes())
        .service(status::configure_routes());
}
