use thiserror::Error;

use crate::domain::receipt::ReceiptStatus;

/// Engine-level failure taxonomy. The engine is a single pure layer,
/// so every error is reported synchronously to the caller; nothing is
/// retried or swallowed internally.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error("validation failed for `{field}`: {message}")]
    Validation { field: String, message: String },
    #[error("{entity} not found: `{id}`")]
    NotFound { entity: &'static str, id: String },
    #[error("receipt is {status:?}; line items are mutable only while Draft")]
    Conflict { status: ReceiptStatus },
}

impl EngineError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation { field: field.into(), message: message.into() }
    }

    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { entity, id: id.into() }
    }
}

#[cfg(test)]
mod tests {
    use crate::domain::receipt::ReceiptStatus;

    use super::EngineError;

    #[test]
    fn validation_error_carries_field_scope() {
        let error = EngineError::validation("override_amount", "must not be negative");
        assert_eq!(
            error.to_string(),
            "validation failed for `override_amount`: must not be negative"
        );
    }

    #[test]
    fn conflict_error_names_the_offending_status() {
        let error = EngineError::Conflict { status: ReceiptStatus::Finalized };
        assert!(error.to_string().contains("Finalized"));
    }
}
