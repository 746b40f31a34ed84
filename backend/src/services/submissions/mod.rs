mod list;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/submissions";

/// `GET /api/submissions?limit=N`: most recent stored submissions, newest first.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(list::process))
}
