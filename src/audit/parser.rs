use serde_json::{Map, Value};

/// Whether a `Content-Type` header value declares JSON: `application/json`
/// or any `application/*+json` media type, parameters ignored.
pub fn is_json_content_type(content_type: Option<&str>) -> bool {
    let Some(ct) = content_type else {
        return false;
    };

    let mime = ct
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();

    mime == "application/json" || (mime.starts_with("application/") && mime.ends_with("+json"))
}

/// Parse a request body that must be a non-empty JSON object.
pub fn parse_object(body: &[u8]) -> Result<Map<String, Value>, String> {
    if body.is_empty() {
        return Err("Empty body".to_string());
    }

    match serde_json::from_slice::<Value>(body).map_err(|e| format!("Invalid JSON: {e}"))? {
        Value::Object(map) if !map.is_empty() => Ok(map),
        Value::Object(_) => Err("Empty JSON object".to_string()),
        other => Err(format!("Expected a JSON object, got {}", kind(&other))),
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
