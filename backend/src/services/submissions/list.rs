use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::requests::RecentSubmissionsQuery;
use log::error;

const DEFAULT_LIMIT: usize = 10;
const MAX_LIMIT: usize = 100;

pub(crate) async fn process(
    query: web::Query<RecentSubmissionsQuery>,
    state: web::Data<AppState>,
) -> impl Responder {
    list_recent_submissions(effective_limit(query.limit), state).await
}

fn effective_limit(requested: Option<usize>) -> usize {
    requested.unwrap_or(DEFAULT_LIMIT).min(MAX_LIMIT)
}

async fn list_recent_submissions(limit: usize, state: web::Data<AppState>) -> HttpResponse {
    let store = state.store.clone();
    match web::block(move || store.list_recent(limit)).await {
        Ok(Ok(records)) => HttpResponse::Ok().json(records),
        Ok(Err(e)) => {
            error!("Error retrieving submissions: {}", e);
            HttpResponse::ServiceUnavailable().body(format!("Error retrieving submissions: {}", e))
        }
        Err(e) => HttpResponse::InternalServerError().body(e.to_string()),
    }
}
