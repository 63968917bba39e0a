//! Shared helpers for the integration suite.

// Each test binary uses a subset of these helpers.
#![allow(dead_code)]

use std::path::PathBuf;
use user_api_stub::{ApiRequest, ApiResponse, ApiServer, Method};

/// Path to the schema document shipped with the crate.
pub fn schema_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("schemas/users-api.json")
}

/// Pipeline loaded from the shipped schema document with a fresh store.
pub fn test_server() -> ApiServer {
    let _ = env_logger::builder().is_test(true).try_init();
    ApiServer::from_schema_path(schema_path()).expect("shipped schema document loads")
}

/// POST /v1/users with the given JSON body.
pub async fn post_user(server: &ApiServer, body: serde_json::Value) -> ApiResponse {
    server
        .handle(ApiRequest::new(Method::Post, "/v1/users").with_body(body))
        .await
}

/// GET /v1/users/{id}.
pub async fn get_user(server: &ApiServer, id: &str) -> ApiResponse {
    server
        .handle(ApiRequest::new(Method::Get, format!("/v1/users/{id}")))
        .await
}

/// GET /v1/users.
pub async fn list_users(server: &ApiServer) -> ApiResponse {
    server
        .handle(ApiRequest::new(Method::Get, "/v1/users"))
        .await
}
