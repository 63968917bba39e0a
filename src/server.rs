//! Pipeline composition: validate, dispatch, normalize.
//!
//! [`ApiServer`] owns the loaded schema registry and the injected store, and
//! exposes the one entry point a transport needs:
//! [`handle`](ApiServer::handle). Control flow per request is a fixed stage
//! order, not framework registration order:
//!
//! 1. the schema validator checks the request and matches its operation;
//! 2. the matched handler runs against the store;
//! 3. any [`RequestFailure`] from either stage is normalized into the error
//!    envelope exactly once, here, at the boundary.
//!
//! Startup is synchronous: load the schema document, verify every declared
//! operation has a handler, and only then accept requests. Failure at that
//! point is a [`StartupError`] the embedding process must not recover from.

use crate::envelope::ErrorEnvelope;
use crate::error::{RequestFailure, StartupError};
use crate::handlers::UserHandlers;
use crate::request::{ApiRequest, RequestContext};
use crate::schema::SchemaRegistry;
use crate::store::UserStore;
use log::{debug, error, info, warn};
use serde::Serialize;
use serde_json::Value;
use std::path::Path;

/// A structured outbound response for the transport to render.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Response headers in insertion order, e.g. `Location` or `ETag`.
    pub headers: Vec<(String, String)>,
    pub body: Value,
}

impl ApiResponse {
    /// Build a JSON response from any serializable body.
    pub fn json<T: Serialize>(status: u16, body: &T) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: to_json(body),
        }
    }

    /// Attach a response header.
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }
}

/// Serialize a response body.
///
/// Every body type this crate emits serializes infallibly (string keys only,
/// no non-finite numbers); a failure would be a programming error, logged and
/// degraded to `null` rather than panicking in the request path.
fn to_json<T: Serialize>(body: &T) -> Value {
    serde_json::to_value(body).unwrap_or_else(|e| {
        error!("response body failed to serialize: {e}");
        Value::Null
    })
}

// Operation ids the dispatcher understands; checked against the schema
// document at startup so dispatch cannot meet an unknown id later.
const KNOWN_OPERATIONS: &[&str] = &["listUsers", "createUser", "getUserById"];

/// The assembled request pipeline.
#[derive(Debug)]
pub struct ApiServer {
    registry: SchemaRegistry,
    handlers: UserHandlers,
}

impl ApiServer {
    /// One-time blocking startup: load the schema document from disk, then
    /// assemble the pipeline around a fresh store.
    pub fn from_schema_path<P: AsRef<Path>>(path: P) -> Result<Self, StartupError> {
        let registry = SchemaRegistry::from_file(path)?;
        Self::new(registry, UserStore::new())
    }

    /// Assemble the pipeline from a loaded registry and an injected store.
    pub fn new(registry: SchemaRegistry, store: UserStore) -> Result<Self, StartupError> {
        for operation in registry.operations() {
            if !KNOWN_OPERATIONS.contains(&operation.id.as_str()) {
                return Err(StartupError::UnknownOperation {
                    operation_id: operation.id.clone(),
                });
            }
        }
        info!(
            "pipeline ready ({} operations)",
            registry.operations().len()
        );
        Ok(Self {
            registry,
            handlers: UserHandlers::new(store),
        })
    }

    /// The store backing this pipeline, for embedding code and tests.
    pub fn store(&self) -> &UserStore {
        self.handlers.store()
    }

    /// Handle a request with the placeholder request context.
    pub async fn handle(&self, request: ApiRequest) -> ApiResponse {
        self.handle_with_context(request, &RequestContext::local())
            .await
    }

    /// Handle a request, normalizing every failure into the error envelope.
    ///
    /// This never returns an error: the transport always receives a
    /// renderable response, and no failure kind escapes unnormalized.
    pub async fn handle_with_context(
        &self,
        request: ApiRequest,
        context: &RequestContext,
    ) -> ApiResponse {
        debug!(
            "{} {} (request '{}')",
            request.method, request.path, context.request_id
        );
        match self.dispatch(&request).await {
            Ok(response) => response,
            Err(failure) => {
                warn!("request '{}' failed: {}", context.request_id, failure);
                let envelope = ErrorEnvelope::from_failure(&failure, &context.request_id);
                ApiResponse::json(envelope.status, &envelope)
            }
        }
    }

    async fn dispatch(&self, request: &ApiRequest) -> Result<ApiResponse, RequestFailure> {
        let matched = self.registry.validate(request)?;
        match matched.operation.id.as_str() {
            "listUsers" => self.handlers.list_users().await,
            "createUser" => self.handlers.create_user(request.body.as_ref()).await,
            "getUserById" => {
                let id = matched
                    .path_params
                    .get("userId")
                    .map(String::as_str)
                    .unwrap_or_default();
                self.handlers.get_user(id).await
            }
            // Ruled out at startup by the KNOWN_OPERATIONS check.
            other => unreachable!("operation '{other}' passed startup verification"),
        }
    }
}
