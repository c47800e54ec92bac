use serde_json::{Map, Value};
use uuid::Uuid;

use super::AuditError;
use crate::models::NewAuditRecord;

pub const MODULE_NAME_MAX_CHARS: usize = 45;

/// Checked in this order; the first failure wins.
pub const REQUIRED_FIELDS: [&str; 4] = ["module_name", "object_id", "initiator_id", "message"];

/// Validate an incoming audit event and build the record to insert.
///
/// The returned record has no `created_at`; time resolution is separate and
/// never fails.
pub fn validate(data: &Map<String, Value>) -> Result<NewAuditRecord, AuditError> {
    let [module_name, object_id, initiator_id, message] = present_fields(data)?;

    let object_id = parse_uuid(object_id, "object_id")?;
    let initiator_id = parse_uuid(initiator_id, "initiator_id")?;

    let length = module_name.chars().count();
    if length > MODULE_NAME_MAX_CHARS {
        return Err(AuditError::ModuleNameTooLong {
            module_name: module_name.to_string(),
            length,
        });
    }

    Ok(NewAuditRecord {
        module_name: module_name.to_string(),
        object_id,
        initiator_id,
        created_at: None,
        message: message.to_string(),
    })
}

/// Every required field as a string, in `REQUIRED_FIELDS` order. Presence of
/// all four is settled before any of them is parsed.
fn present_fields(data: &Map<String, Value>) -> Result<[&str; 4], AuditError> {
    let mut values = [""; 4];
    for (slot, field) in values.iter_mut().zip(REQUIRED_FIELDS) {
        *slot = required_str(data, field)?;
    }
    Ok(values)
}

fn required_str<'a>(data: &'a Map<String, Value>, field: &'static str) -> Result<&'a str, AuditError> {
    match data.get(field) {
        None | Some(Value::Null) => Err(AuditError::MissingField(field)),
        Some(Value::String(s)) if s.is_empty() => Err(AuditError::MissingField(field)),
        Some(Value::String(s)) => Ok(s),
        Some(_) => Err(AuditError::InvalidType(field)),
    }
}

/// Accepts hyphenated, simple, braced and `urn:uuid:` forms.
fn parse_uuid(raw: &str, field: &'static str) -> Result<Uuid, AuditError> {
    Uuid::parse_str(raw).map_err(|source| AuditError::InvalidUuid { field, source })
}
