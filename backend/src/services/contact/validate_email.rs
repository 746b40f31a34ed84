use crate::contact::validators;
use actix_web::{web, HttpResponse, Responder};
use common::requests::ValidateEmailRequest;
use common::responses::EmailCheckResponse;

pub(crate) async fn process(payload: web::Json<ValidateEmailRequest>) -> impl Responder {
    HttpResponse::Ok().json(check_email(&payload.email))
}

fn check_email(email: &str) -> EmailCheckResponse {
    match validators::validate_email(Some(email)) {
        Ok(email) => EmailCheckResponse {
            valid: true,
            email: Some(email),
            error: None,
        },
        Err(error) => EmailCheckResponse {
            valid: false,
            email: None,
            error: Some(error),
        },
    }
}
