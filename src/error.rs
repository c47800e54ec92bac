use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Errors surfaced to the caller of the HTTP API. Each variant has a fixed
/// response body; the detail carried by `Internal` only goes to the log.
#[derive(Debug)]
pub enum AppError {
    InvalidContentType,
    InvalidJson,
    PayloadTooLarge,
    CreationFailed,
    Internal(String),
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::InvalidContentType => write!(f, "Invalid content type"),
            AppError::InvalidJson => write!(f, "Invalid JSON"),
            AppError::PayloadTooLarge => write!(f, "Payload too large"),
            AppError::CreationFailed => write!(f, "Creation failed"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::InvalidContentType => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid content type",
                    "message": "Content-Type must be application/json",
                }),
            ),
            AppError::InvalidJson => (
                StatusCode::BAD_REQUEST,
                json!({
                    "error": "Invalid JSON",
                    "message": "Request body must contain a non-empty JSON object",
                }),
            ),
            AppError::PayloadTooLarge => (
                StatusCode::PAYLOAD_TOO_LARGE,
                json!({
                    "success": false,
                    "error": "Payload too large",
                    "message": "Request body exceeds the configured size limit",
                }),
            ),
            AppError::CreationFailed => (
                StatusCode::BAD_REQUEST,
                json!({
                    "success": false,
                    "error": "Creation failed",
                    "message": "Failed to create audit record",
                }),
            ),
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({
                        "success": false,
                        "error": "Internal server error",
                        "message": "Internal server error",
                    }),
                )
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

/// Responder for `CatchPanicLayer`: a panic anywhere below the router becomes
/// the generic 500 body, with the payload kept in the server log.
pub fn panic_response(err: Box<dyn std::any::Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        s.to_string()
    } else {
        "unknown panic payload".to_string()
    };

    AppError::Internal(format!("handler panicked: {detail}")).into_response()
}
