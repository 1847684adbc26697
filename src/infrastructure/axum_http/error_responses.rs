use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<&'static str>,
    pub message: String,
}

/// Builds the JSON error envelope for a domain error. Conflict-flavored
/// domain failures (already released, hold not elapsed) surface as 400 with
/// their machine-readable code rather than a bare 409.
pub fn domain_error(status: StatusCode, error_code: &'static str, message: String) -> Response {
    let body = Json(ErrorResponse {
        code: status.as_u16(),
        error: Some(error_code),
        message,
    });
    (status, body).into_response()
}

pub fn plain_error(status: StatusCode, message: String) -> Response {
    let body = Json(ErrorResponse {
        code: status.as_u16(),
        error: None,
        message,
    });
    (status, body).into_response()
}
