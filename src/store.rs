//! In-memory store for user records.
//!
//! Records live in process memory for the lifetime of the run; there is no
//! persistence. The store hands out cheap clones of a shared handle so it can
//! be injected wherever state is needed, and all mutation goes through
//! [`UserStore::create`] so the two store invariants hold:
//!
//! * identifiers are assigned from a monotonic counter, starting at 1,
//!   incremented exactly once per successful create and never reset;
//! * identifier assignment and record insertion happen under a single write
//!   lock, so no two concurrent creates can observe the same next identifier.

use crate::model::User;
use chrono::Utc;
use log::debug;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Shared in-memory collection of user records.
///
/// Cloning the store clones the handle, not the data; all clones observe the
/// same records and the same identifier counter.
#[derive(Debug, Clone)]
pub struct UserStore {
    inner: Arc<RwLock<StoreInner>>,
}

#[derive(Debug)]
struct StoreInner {
    users: HashMap<String, User>,
    // Insertion order for list(); ids are appended exactly once, on create.
    order: Vec<String>,
    next_id: u64,
}

impl UserStore {
    /// Create an empty store with the identifier counter at 1.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(StoreInner {
                users: HashMap::new(),
                order: Vec::new(),
                next_id: 1,
            })),
        }
    }

    /// Create a record from already-validated fields.
    ///
    /// Assigns the next identifier, stamps the creation time, and stores the
    /// record, all as one atomic unit. Infallible: validation happens
    /// upstream and insertion into process memory has no failure mode.
    pub async fn create(&self, email: &str, name: &str) -> User {
        let mut inner = self.inner.write().await;
        let id = inner.next_id.to_string();
        inner.next_id += 1;

        let user = User {
            id: id.clone(),
            email: email.to_string(),
            name: name.to_string(),
            created_at: Utc::now(),
        };
        inner.order.push(id.clone());
        inner.users.insert(id.clone(), user.clone());

        debug!("stored user '{}' ({} total)", id, inner.users.len());
        user
    }

    /// All current records, in insertion order.
    ///
    /// The ordering is stable for a given run; callers should not treat it as
    /// a stronger guarantee than that.
    pub async fn list(&self) -> Vec<User> {
        let inner = self.inner.read().await;
        inner
            .order
            .iter()
            .filter_map(|id| inner.users.get(id).cloned())
            .collect()
    }

    /// Look up a record by identifier.
    pub async fn get(&self, id: &str) -> Option<User> {
        self.inner.read().await.users.get(id).cloned()
    }

    /// Number of live records.
    pub async fn count(&self) -> usize {
        self.inner.read().await.users.len()
    }

    /// Drop all records. The identifier counter is not reset; it is
    /// process-lifetime state.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        inner.users.clear();
        inner.order.clear();
    }
}

impl Default for UserStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn create_assigns_sequential_ids_from_one() {
        tokio_test::block_on(async {
            let store = UserStore::new();
            let first = store.create("a@example.com", "").await;
            let second = store.create("b@example.com", "").await;
            assert_eq!(first.id, "1");
            assert_eq!(second.id, "2");
        });
    }

    #[test]
    fn list_preserves_insertion_order() {
        tokio_test::block_on(async {
            let store = UserStore::new();
            for email in ["a@example.com", "b@example.com", "c@example.com"] {
                store.create(email, "").await;
            }
            let emails: Vec<String> = store.list().await.into_iter().map(|u| u.email).collect();
            assert_eq!(emails, ["a@example.com", "b@example.com", "c@example.com"]);
        });
    }

    #[test]
    fn get_returns_none_for_absent_id() {
        tokio_test::block_on(async {
            let store = UserStore::new();
            assert!(store.get("1").await.is_none());
            store.create("a@example.com", "").await;
            assert!(store.get("1").await.is_some());
            assert!(store.get("999").await.is_none());
        });
    }

    #[test]
    fn clear_keeps_the_counter_monotonic() {
        tokio_test::block_on(async {
            let store = UserStore::new();
            store.create("a@example.com", "").await;
            store.clear().await;
            assert_eq!(store.count().await, 0);
            let next = store.create("b@example.com", "").await;
            assert_eq!(next.id, "2");
        });
    }

    #[test]
    fn concurrent_creates_never_share_an_id() {
        tokio_test::block_on(async {
            let store = UserStore::new();
            let mut handles = Vec::new();
            for i in 0..16 {
                let store = store.clone();
                handles.push(tokio::spawn(async move {
                    store.create(&format!("user{i}@example.com"), "").await.id
                }));
            }
            let mut ids = Vec::new();
            for handle in handles {
                ids.push(handle.await.expect("create task completes"));
            }
            ids.sort_by_key(|id| id.parse::<u64>().expect("numeric id"));
            ids.dedup();
            assert_eq!(ids.len(), 16);
        });
    }

    proptest! {
        // For any run of n creates, ids are pairwise distinct and strictly
        // increasing in assignment order.
        #[test]
        fn ids_strictly_increase(n in 1usize..40) {
            let ids: Vec<u64> = tokio_test::block_on(async move {
                let store = UserStore::new();
                let mut ids = Vec::new();
                for i in 0..n {
                    let user = store.create(&format!("u{i}@example.com"), "").await;
                    ids.push(user.id.parse::<u64>().expect("numeric id"));
                }
                ids
            });
            prop_assert_eq!(ids.len(), n);
            prop_assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
        }
    }
}
