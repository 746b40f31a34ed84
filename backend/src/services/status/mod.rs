mod database;

use actix_web::web::{get, scope};
use actix_web::Scope;

const API_PATH: &str = "/api/database-status";

/// `GET /api/database-status`: whether the configured store answers.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("", get().to(database::process))
}
