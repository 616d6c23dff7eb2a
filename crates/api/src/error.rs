use actix_web::error::JsonPayloadError;
use actix_web::{
    http::{header, StatusCode},
    HttpRequest, HttpResponse,
};
use nudge_api_structs::ErrorResponse;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum NudgeError {
    #[error("Internal server error")]
    InternalError,
    #[error("Invalid data provided: Error message: `{0}`")]
    BadClientData(String),
    #[error("There was a conflict with the request. Error message: `{0}`")]
    Conflict(String),
    #[error("404 Not found. Error message: `{0}`")]
    NotFound(String),
    #[error("Persistence operation failed. Error message: `{0}`")]
    PersistenceFailure(String),
}

impl NudgeError {
    fn response_body(&self) -> ErrorResponse {
        match self {
            Self::PersistenceFailure(details) => ErrorResponse {
                error: "persistence operation failed".into(),
                details: Some(details.clone()),
            },
            Self::InternalError => ErrorResponse {
                error: "internal server error".into(),
                details: None,
            },
            other => ErrorResponse {
                error: other.to_string(),
                details: None,
            },
        }
    }
}

impl actix_web::error::ResponseError for NudgeError {
    fn status_code(&self) -> StatusCode {
        match *self {
            Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            Self::BadClientData(_) => StatusCode::BAD_REQUEST,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::PersistenceFailure(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code())
            .insert_header((header::CONTENT_TYPE, "application/json"))
            .json(self.response_body())
    }
}

/// Rewrites actix's JSON extractor failures into the service's stable
/// error body shape.
pub(crate) fn json_error_handler(err: JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    NudgeError::BadClientData(err.to_string()).into()
}
