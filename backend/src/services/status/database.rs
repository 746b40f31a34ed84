use crate::state::AppState;
use actix_web::{web, HttpResponse, Responder};
use common::responses::DatabaseStatus;
use log::warn;

/// Always `200 OK`; the body says whether the store answered.
pub(crate) async fn process(state: web::Data<AppState>) -> impl Responder {
    HttpResponse::Ok().json(database_status(state).await)
}

async fn database_status(state: web::Data<AppState>) -> DatabaseStatus {
    let store = state.store.clone();
    let backend = store.backend_name().to_string();
    let error = match web::block(move || store.ping()).await {
        Ok(Ok(())) => {
            return DatabaseStatus {
                connected: true,
                backend,
                message: Some("Database connection successful".to_string()),
                error: None,
            }
        }
        Ok(Err(e)) => e.to_string(),
        Err(e) => e.to_string(),
    };
    warn!("Database status check failed: {}", error);
    DatabaseStatus {
        connected: false,
        backend,
        message: None,
        error: Some(error),
    }
}
