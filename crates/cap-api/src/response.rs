//! Lifecycle error to HTTP response mapping

use axum::http::StatusCode;
use axum::Json;

use cap_core::ZoneError;
use cap_model::{ErrorResponse, MessageId};

/// Error half of every handler result.
pub type ApiError = (StatusCode, Json<ErrorResponse>);

/// Map a lifecycle failure onto its HTTP status, code class and structured
/// arguments.
pub fn error_response(err: &ZoneError) -> ApiError {
    let (status, message_id, args) = match err {
        ZoneError::MalformedRequest { .. } => {
            (StatusCode::BAD_REQUEST, MessageId::MalformedJson, Vec::new())
        }
        ZoneError::PropertyMissing { property } => (
            StatusCode::BAD_REQUEST,
            MessageId::PropertyMissing,
            vec![property.to_string()],
        ),
        ZoneError::NotFound { resource, uri } => (
            StatusCode::NOT_FOUND,
            MessageId::ResourceNotFound,
            vec![resource.to_string(), uri.clone()],
        ),
        ZoneError::AlreadyExists { resource, name } => (
            StatusCode::CONFLICT,
            MessageId::ResourceAlreadyExists,
            vec![resource.to_string(), name.clone()],
        ),
        ZoneError::CannotDelete { uri } => (
            StatusCode::NOT_ACCEPTABLE,
            MessageId::ResourceCannotBeDeleted,
            vec!["Zone".to_string(), uri.clone()],
        ),
        ZoneError::NotImplemented { .. } => (
            StatusCode::NOT_IMPLEMENTED,
            MessageId::GeneralError,
            Vec::new(),
        ),
        ZoneError::Controller(_) => (StatusCode::BAD_REQUEST, MessageId::GeneralError, Vec::new()),
    };

    (
        status,
        Json(ErrorResponse::new(message_id, err.to_string(), args)),
    )
}

/// Envelope for request bodies that failed JSON extraction.
pub fn malformed_json(message: impl Into<String>) -> ApiError {
    (
        StatusCode::BAD_REQUEST,
        Json(ErrorResponse::new(
            MessageId::MalformedJson,
            message,
            Vec::new(),
        )),
    )
}
