//! The error normalizer: one canonical envelope for every failed request.
//!
//! Whatever produced the failure (schema validation, a business rule, a
//! missing resource), the transport sees exactly one JSON shape. The mapping
//! lives in [`ErrorEnvelope::from_failure`] and is total over
//! [`RequestFailure`]; a failure kind without a case here cannot be expressed
//! in the type system.

use crate::error::{RequestFailure, Violation};
use serde::{Deserialize, Serialize};

/// Machine-readable error classification, a closed set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// Request malformed per schema or business rule.
    ValidationError,
    /// Referenced resource absent.
    NotFound,
}

/// The uniform JSON shape used for all error responses.
///
/// Invariant: `errors` is empty unless `code` is
/// [`ErrorCode::ValidationError`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub status: u16,
    pub code: ErrorCode,
    pub message: String,
    pub errors: Vec<Violation>,
    pub request_id: String,
}

impl ErrorEnvelope {
    /// Normalize a request failure into the canonical envelope.
    pub fn from_failure(failure: &RequestFailure, request_id: &str) -> Self {
        match failure {
            RequestFailure::Validation {
                status,
                message,
                violations,
            } => Self {
                status: *status,
                code: ErrorCode::ValidationError,
                message: message.clone(),
                errors: violations.clone(),
                request_id: request_id.to_string(),
            },
            RequestFailure::NotFound { resource, .. } => Self {
                status: 404,
                code: ErrorCode::NotFound,
                message: format!("{resource} not found"),
                errors: Vec::new(),
                request_id: request_id.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn validation_failure_keeps_status_and_violations() {
        let failure = RequestFailure::validation(
            "request validation failed",
            vec![Violation::new("/body/email", "expected string, got number")],
        );
        let envelope = ErrorEnvelope::from_failure(&failure, "local");

        assert_eq!(envelope.status, 400);
        assert_eq!(envelope.code, ErrorCode::ValidationError);
        assert_eq!(envelope.errors.len(), 1);
        assert_eq!(envelope.request_id, "local");
    }

    #[test]
    fn not_found_has_empty_errors() {
        let failure = RequestFailure::not_found("User", "99");
        let envelope = ErrorEnvelope::from_failure(&failure, "local");

        assert_eq!(envelope.status, 404);
        assert_eq!(envelope.code, ErrorCode::NotFound);
        assert_eq!(envelope.message, "User not found");
        assert!(envelope.errors.is_empty());
    }

    #[test]
    fn serializes_to_wire_shape() {
        let failure = RequestFailure::business_rule("Missing email or password");
        let envelope = ErrorEnvelope::from_failure(&failure, "local");
        let value = serde_json::to_value(&envelope).expect("envelope serializes");

        assert_eq!(
            value,
            json!({
                "status": 400,
                "code": "validation_error",
                "message": "Missing email or password",
                "errors": [],
                "request_id": "local"
            })
        );
    }

    #[test]
    fn error_codes_use_snake_case_on_the_wire() {
        assert_eq!(
            serde_json::to_value(ErrorCode::NotFound).expect("code serializes"),
            json!("not_found")
        );
    }
}
