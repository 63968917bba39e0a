//! Resource handlers for the users endpoints.
//!
//! Handlers run only after schema validation has passed and contain the
//! business logic of each operation: the create-time requiredness check, the
//! `Location` header, the `ETag` computation, and the not-found lookup. They
//! return [`RequestFailure`] for anything the client caused; the pipeline
//! normalizes those into the error envelope.

use crate::error::{RequestFailure, RequestResult};
use crate::model::UserListResponse;
use crate::server::ApiResponse;
use crate::store::UserStore;
use log::{debug, info};
use serde_json::Value;

/// Handlers bound to an injected store.
#[derive(Debug, Clone)]
pub struct UserHandlers {
    store: UserStore,
}

impl UserHandlers {
    /// Bind handlers to a store.
    pub fn new(store: UserStore) -> Self {
        Self { store }
    }

    /// The store the handlers operate on.
    pub fn store(&self) -> &UserStore {
        &self.store
    }

    /// `POST /v1/users`: create a record from a validated body.
    ///
    /// The schema document declares field types but leaves requiredness of
    /// `email` and `password` to this business-level check, so both layers
    /// stay in place. The password authenticates the create call only; it is
    /// dropped here and never stored.
    pub async fn create_user(&self, body: Option<&Value>) -> RequestResult<ApiResponse> {
        let email = non_empty_string(body, "email");
        let password = non_empty_string(body, "password");
        let (Some(email), Some(_password)) = (email, password) else {
            return Err(RequestFailure::business_rule("Missing email or password"));
        };

        let name = non_empty_string(body, "name").unwrap_or_default();
        let user = self.store.create(email, name).await;
        info!("created user '{}'", user.id);

        let location = format!("/v1/users/{}", user.id);
        Ok(ApiResponse::json(201, &user).with_header("Location", location))
    }

    /// `GET /v1/users`: all records with stub pagination metadata.
    pub async fn list_users(&self) -> RequestResult<ApiResponse> {
        let items = self.store.list().await;
        debug!("listing {} users", items.len());
        Ok(ApiResponse::json(200, &UserListResponse::new(items)))
    }

    /// `GET /v1/users/{userId}`: one record with its integrity tag.
    pub async fn get_user(&self, id: &str) -> RequestResult<ApiResponse> {
        let Some(user) = self.store.get(id).await else {
            return Err(RequestFailure::not_found("User", id));
        };
        let tag = user.version_tag();
        Ok(ApiResponse::json(200, &user).with_header("ETag", tag))
    }
}

/// Extract a non-empty string field from an optional JSON body.
fn non_empty_string<'a>(body: Option<&'a Value>, field: &str) -> Option<&'a str> {
    body.and_then(|b| b.get(field))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}
