//! Transport-agnostic request types.
//!
//! The embedding transport (HTTP framework, test harness, anything else)
//! translates its native request into an [`ApiRequest`] and hands it to the
//! pipeline. Nothing in this crate parses wire bytes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

/// Request methods the schema document can declare.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Patch => "PATCH",
            Self::Delete => "DELETE",
        };
        f.write_str(name)
    }
}

/// A structured inbound request.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Request path, e.g. `/v1/users/1`.
    pub path: String,
    /// Parsed JSON body, if the transport received one.
    pub body: Option<serde_json::Value>,
    /// Query parameters as received, still in string form.
    pub query: HashMap<String, String>,
}

impl ApiRequest {
    /// Create a request with no body and no query parameters.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            query: HashMap::new(),
        }
    }

    /// Attach a JSON body.
    pub fn with_body(mut self, body: serde_json::Value) -> Self {
        self.body = Some(body);
        self
    }

    /// Attach a single query parameter.
    pub fn with_query(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(name.into(), value.into());
        self
    }
}

/// Per-request context used for tracing and error reporting.
#[derive(Debug, Clone)]
pub struct RequestContext {
    /// Identifier echoed back in every error envelope.
    pub request_id: String,
}

impl RequestContext {
    /// Context with a caller-supplied request id.
    pub fn new(request_id: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
        }
    }

    /// Placeholder context for transports without request tracing.
    pub fn local() -> Self {
        Self::new("local")
    }

    /// Context with a freshly generated request id.
    pub fn with_generated_id() -> Self {
        Self::new(Uuid::new_v4().to_string())
    }
}

impl Default for RequestContext {
    fn default() -> Self {
        Self::local()
    }
}
