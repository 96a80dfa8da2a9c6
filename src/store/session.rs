//! In-memory session state: issued tokens and the default-uploader flag.
//!
//! Both live behind one mutex. Nothing is persisted; a restart forgets every
//! token and resets the flag. Expiry is checked by readers, records are only
//! removed by revocation or by `evict_expired`.

use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::models::token::TokenRecord;

/// Flag value a fresh store starts with.
pub const DEFAULT_UPLOADER_INITIAL: bool = true;

struct SessionState {
    tokens: HashMap<String, TokenRecord>,
    default_uploader: bool,
}

/// Shared, cheaply-cloneable session store.
#[derive(Clone)]
pub struct SessionStore(Arc<Mutex<SessionState>>);

impl SessionStore {
    pub fn new() -> Self {
        Self(Arc::new(Mutex::new(SessionState {
            tokens: HashMap::new(),
            default_uploader: DEFAULT_UPLOADER_INITIAL,
        })))
    }

    /// Insert or overwrite. Last write wins on token collision.
    pub async fn put(&self, record: TokenRecord) {
        self.0
            .lock()
            .await
            .tokens
            .insert(record.token.clone(), record);
    }

    pub async fn get(&self, token: &str) -> Option<TokenRecord> {
        self.0.lock().await.tokens.get(token).cloned()
    }

    /// Returns whether a record was removed.
    pub async fn delete(&self, token: &str) -> bool {
        self.0.lock().await.tokens.remove(token).is_some()
    }

    pub async fn is_default(&self) -> bool {
        self.0.lock().await.default_uploader
    }

    /// Flip the flag and return the new value.
    pub async fn toggle_default(&self) -> bool {
        let mut state = self.0.lock().await;
        state.default_uploader = !state.default_uploader;
        state.default_uploader
    }

    /// Drop every record already expired at `now`. Returns the number removed.
    pub async fn evict_expired(&self, now: i64) -> usize {
        let mut state = self.0.lock().await;
        let before = state.tokens.len();
        state.tokens.retain(|_, record| !record.is_expired_at(now));
        before - state.tokens.len()
    }

    /// Number of stored records, expired ones included.
    pub async fn len(&self) -> usize {
        self.0.lock().await.tokens.len()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = SessionStore::new();
        store.put(TokenRecord::new("tok_a", 100, "shaky")).await;

        let record = store.get("tok_a").await.unwrap();
        assert_eq!(record.uploader_slug, "shaky");
        assert_eq!(record.expires_at, 100);

        assert!(store.delete("tok_a").await);
        assert!(store.get("tok_a").await.is_none());
        assert!(!store.delete("tok_a").await, "second delete is a no-op");
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = SessionStore::new();
        store.put(TokenRecord::new("tok", 100, "first")).await;
        store.put(TokenRecord::new("tok", 200, "second")).await;

        let record = store.get("tok").await.unwrap();
        assert_eq!(record.expires_at, 200);
        assert_eq!(record.uploader_slug, "second");
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_toggle_default() {
        let store = SessionStore::new();
        assert!(store.is_default().await);
        assert!(!store.toggle_default().await);
        assert!(!store.is_default().await);
        assert!(store.toggle_default().await);
        assert!(store.is_default().await);
    }

    #[tokio::test]
    async fn test_expired_records_linger_until_evicted() {
        let store = SessionStore::new();
        store.put(TokenRecord::new("old", 10, "u")).await;
        store.put(TokenRecord::new("edge", 50, "u")).await;
        store.put(TokenRecord::new("new", 100, "u")).await;

        assert_eq!(store.len().await, 3);
        assert_eq!(store.evict_expired(50).await, 1);
        assert!(store.get("old").await.is_none());
        assert!(store.get("edge").await.is_some());
        assert!(store.get("new").await.is_some());
    }

    #[tokio::test]
    async fn test_stores_are_independent() {
        let a = SessionStore::new();
        let b = SessionStore::new();
        a.toggle_default().await;
        a.put(TokenRecord::new("tok", 100, "u")).await;

        assert!(b.is_default().await);
        assert!(b.get("tok").await.is_none());
    }

    #[tokio::test]
    async fn test_concurrent_toggles_are_serialized() {
        let store = SessionStore::new();
        let mut handles = Vec::new();
        for _ in 0..64 {
            let store = store.clone();
            handles.push(tokio::spawn(async move {
                store.toggle_default().await;
            }));
        }
        for h in handles {
            h.await.unwrap();
        }
        // An even number of flips lands back on the initial value.
        assert_eq!(store.is_default().await, DEFAULT_UPLOADER_INITIAL);
    }
}
