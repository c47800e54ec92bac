pub mod fields;
pub mod metadata;
pub mod parser;
pub mod service;
pub mod time;

pub use service::AuditService;

/// Why an audit record was not created. The caller only ever sees a generic
/// failure; the variant is for the server log.
#[derive(Debug)]
pub enum AuditError {
    /// Field absent, `null` or an empty string.
    MissingField(&'static str),
    /// Field present but not a JSON string.
    InvalidType(&'static str),
    InvalidUuid {
        field: &'static str,
        source: uuid::Error,
    },
    ModuleNameTooLong {
        module_name: String,
        length: usize,
    },
    Database(sqlx::Error),
}

impl std::fmt::Display for AuditError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AuditError::MissingField(field) => write!(f, "Missing required field: {field}"),
            AuditError::InvalidType(field) => write!(f, "Field {field} must be a string"),
            AuditError::InvalidUuid { field, source } => {
                write!(f, "Invalid UUID format in {field}: {source}")
            }
            AuditError::ModuleNameTooLong {
                module_name,
                length,
            } => write!(
                f,
                "module_name exceeds {} characters ({length}): {module_name}",
                fields::MODULE_NAME_MAX_CHARS
            ),
            AuditError::Database(err) => write!(f, "Database error: {err}"),
        }
    }
}

impl std::error::Error for AuditError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AuditError::InvalidUuid { source, .. } => Some(source),
            AuditError::Database(err) => Some(err),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for AuditError {
    fn from(err: sqlx::Error) -> Self {
        AuditError::Database(err)
    }
}
