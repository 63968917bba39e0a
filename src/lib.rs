//! Schema-validated reference API core for a users resource.
//!
//! Every inbound request passes through a fixed pipeline: structural
//! validation against an externally maintained schema document, then dispatch
//! to a resource handler over an in-memory store, with every failure
//! normalized into one uniform error envelope. The HTTP transport is an
//! external collaborator; this crate deals in structured [`ApiRequest`] /
//! [`ApiResponse`] values.
//!
//! # Core Components
//!
//! - [`ApiServer`] - the assembled validate→dispatch→normalize pipeline
//! - [`SchemaRegistry`] - schema document loaded once at startup
//! - [`UserStore`] - in-memory records behind a monotonic identifier counter
//! - [`ErrorEnvelope`] - the single error shape every failure is mapped to
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use user_api_stub::{ApiRequest, ApiServer, Method};
//! use serde_json::json;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let server = ApiServer::from_schema_path("schemas/users-api.json")?;
//! let request = ApiRequest::new(Method::Post, "/v1/users")
//!     .with_body(json!({"email": "a@b.com", "password": "x"}));
//! let response = server.handle(request).await;
//! assert_eq!(response.status, 201);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod model;
pub mod request;
pub mod schema;
pub mod server;
pub mod store;

// Re-export commonly used types for convenience
pub use config::ServerConfig;
pub use envelope::{ErrorCode, ErrorEnvelope};
pub use error::{RequestFailure, RequestResult, StartupError, Violation};
pub use handlers::UserHandlers;
pub use model::{ListMeta, User, UserListResponse};
pub use request::{ApiRequest, Method, RequestContext};
pub use schema::{SchemaDocument, SchemaRegistry};
pub use server::{ApiResponse, ApiServer};
pub use store::UserStore;
