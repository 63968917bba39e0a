//! Wire-level data model for the users resource.

use base64::{Engine, engine::general_purpose::STANDARD as BASE64};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A stored user record.
///
/// `id` and `created_at` are assigned once by the store and never change.
/// The password supplied at creation is checked and discarded; it is not part
/// of the record and can never appear in a response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Deterministic integrity tag for conditional requests, rendered as a
    /// quoted `ETag` header value.
    ///
    /// Derived from the id and creation timestamp only, so it is stable for
    /// the lifetime of the record.
    pub fn version_tag(&self) -> String {
        let seed = format!(
            "{}{}",
            self.id,
            self.created_at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
        );
        format!("\"{}\"", BASE64.encode(seed))
    }
}

/// Pagination metadata for list responses.
///
/// `limit` reports the number of items returned rather than a true page
/// size, and `next`/`prev` are always absent: real pagination is a known
/// limitation of this stub, not something callers should probe for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListMeta {
    pub limit: usize,
    pub next: Option<String>,
    pub prev: Option<String>,
}

/// Response body for the list operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserListResponse {
    pub items: Vec<User>,
    pub meta: ListMeta,
}

impl UserListResponse {
    /// Wrap the given records with stub pagination metadata.
    pub fn new(items: Vec<User>) -> Self {
        let limit = items.len();
        Self {
            items,
            meta: ListMeta {
                limit,
                next: None,
                prev: None,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_user() -> User {
        User {
            id: "1".to_string(),
            email: "a@b.com".to_string(),
            name: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 30, 0).unwrap(),
        }
    }

    #[test]
    fn version_tag_is_stable_and_quoted() {
        let user = sample_user();
        let tag = user.version_tag();
        assert!(tag.starts_with('"') && tag.ends_with('"'));
        assert_eq!(tag, user.version_tag());
    }

    #[test]
    fn version_tag_differs_per_record() {
        let a = sample_user();
        let mut b = sample_user();
        b.id = "2".to_string();
        assert_ne!(a.version_tag(), b.version_tag());
    }

    #[test]
    fn user_serializes_created_at_as_iso8601() {
        let value = serde_json::to_value(sample_user()).expect("user serializes");
        assert_eq!(value["created_at"], "2024-05-01T12:30:00Z");
        // The record never carries a password field.
        assert!(value.get("password").is_none());
    }

    #[test]
    fn list_response_reports_count_as_limit() {
        let response = UserListResponse::new(vec![sample_user()]);
        assert_eq!(response.meta.limit, 1);
        assert!(response.meta.next.is_none());
        assert!(response.meta.prev.is_none());
    }
}
