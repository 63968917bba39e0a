//! Error types for the request pipeline.
//!
//! Failures are split into two closed enums: [`RequestFailure`] for anything
//! a client can trigger (normalized into the uniform error envelope before it
//! reaches the transport) and [`StartupError`] for problems that make serving
//! impossible (the process must exit rather than recover). Keeping the two
//! apart means the normalizer is total over per-request failures by
//! construction.

use serde::{Deserialize, Serialize};

/// Result alias for per-request operations.
pub type RequestResult<T> = Result<T, RequestFailure>;

/// A single structured description of how a request failed schema validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Which part of the request failed, e.g. `/body/email` or `/query/limit`.
    pub path: String,
    /// Why it failed.
    pub message: String,
}

impl Violation {
    /// Create a new violation.
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

/// Failures a request can produce once the process is serving.
///
/// Every variant here must have a case in
/// [`ErrorEnvelope::from_failure`](crate::envelope::ErrorEnvelope::from_failure);
/// the enum is deliberately small so that stays true.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RequestFailure {
    /// The request is malformed, per the schema document or a business rule.
    #[error("{message}")]
    Validation {
        /// HTTP status to report, 400 unless the validator says otherwise.
        status: u16,
        message: String,
        violations: Vec<Violation>,
    },

    /// The referenced resource does not exist.
    #[error("{resource} not found")]
    NotFound { resource: String, id: String },
}

impl RequestFailure {
    /// Schema-level validation failure with the default 400 status.
    pub fn validation(message: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self::Validation {
            status: 400,
            message: message.into(),
            violations,
        }
    }

    /// Business-rule failure carrying no per-field violations.
    pub fn business_rule(message: impl Into<String>) -> Self {
        Self::Validation {
            status: 400,
            message: message.into(),
            violations: Vec::new(),
        }
    }

    /// Lookup failure for a missing resource.
    pub fn not_found(resource: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource: resource.into(),
            id: id.into(),
        }
    }

    /// The HTTP status this failure maps to.
    pub fn status(&self) -> u16 {
        match self {
            Self::Validation { status, .. } => *status,
            Self::NotFound { .. } => 404,
        }
    }
}

/// Fatal errors raised before the pipeline starts serving.
///
/// None of these are recoverable: serving without a loaded validator is an
/// invalid state, so the embedding process is expected to log the error and
/// exit non-zero.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    /// The schema document could not be read from disk.
    #[error("failed to read schema document '{path}': {source}")]
    SchemaRead {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The schema document is not valid JSON for the expected shape.
    #[error("schema document '{path}' is malformed: {source}")]
    SchemaParse {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    /// The schema document parsed but fails a structural sanity check.
    #[error("schema document is invalid: {message}")]
    SchemaInvalid { message: String },

    /// The schema document declares an operation the pipeline cannot dispatch.
    #[error("operation '{operation_id}' has no registered handler")]
    UnknownOperation { operation_id: String },
}

impl StartupError {
    /// Structural sanity-check failure.
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::SchemaInvalid {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_failure_defaults_to_400() {
        let failure = RequestFailure::validation("bad request", vec![]);
        assert_eq!(failure.status(), 400);
    }

    #[test]
    fn not_found_maps_to_404() {
        let failure = RequestFailure::not_found("User", "42");
        assert_eq!(failure.status(), 404);
        assert_eq!(failure.to_string(), "User not found");
    }

    #[test]
    fn business_rule_carries_no_violations() {
        let failure = RequestFailure::business_rule("Missing email or password");
        match failure {
            RequestFailure::Validation {
                status, violations, ..
            } => {
                assert_eq!(status, 400);
                assert!(violations.is_empty());
            }
            other => panic!("unexpected failure: {other:?}"),
        }
    }

    #[test]
    fn startup_errors_render_context() {
        let err = StartupError::invalid("document declares no operations");
        assert!(err.to_string().contains("no operations"));
    }
}
