use std::net::SocketAddr;

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use crate::audit::{metadata, parser};
use crate::error::AppError;
use crate::state::SharedState;

/// `POST /v1/create`
///
/// Example body:
///
/// ```json
/// {
///     "time": "2024-01-15T10:30:00Z",
///     "module_name": "users",
///     "object_id": "123e4567-e89b-12d3-a456-426614174000",
///     "initiator_id": "123e4567-e89b-12d3-a456-426614174001",
///     "message": "User created"
/// }
/// ```
///
/// `time` is optional.
pub async fn create_audit_record(
    State(state): State<SharedState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    headers: HeaderMap,
    body: Result<Bytes, BytesRejection>,
) -> Result<Response, AppError> {
    let caller = metadata::caller_address(&headers, Some(addr.ip()), &state.config.trusted_proxies);
    tracing::info!("Audit record request from {caller}");

    let body = body.map_err(|rejection| {
        tracing::warn!("Failed to read request body: {}", rejection.body_text());
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge
        } else {
            AppError::InvalidJson
        }
    })?;

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok());

    if !parser::is_json_content_type(content_type) {
        tracing::warn!("Rejected non-JSON request (content-type: {content_type:?})");
        return Err(AppError::InvalidContentType);
    }

    let data = parser::parse_object(&body).map_err(|e| {
        tracing::warn!("Rejected request body: {e}");
        AppError::InvalidJson
    })?;

    tracing::info!(
        "Request data: module_name={}, object_id={}",
        display_field(data.get("module_name")),
        display_field(data.get("object_id"))
    );

    match state.audit.create_audit_record(&data).await {
        Ok(message_id) => {
            tracing::info!("Audit record created with id {message_id}");
            Ok((
                StatusCode::CREATED,
                Json(json!({
                    "success": true,
                    "message_id": message_id,
                    "message": "Audit record created",
                })),
            )
                .into_response())
        }
        Err(e) => {
            tracing::error!("Audit record was not created: {e}");
            Err(AppError::CreationFailed)
        }
    }
}

fn display_field(value: Option<&Value>) -> String {
    match value {
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => "<missing>".to_string(),
    }
}
