//! Background job: drop expired tokens from the session store.
//!
//! Off by default. Expiry is always enforced at use-time by the auth
//! middleware; this only bounds memory held by stale records.

use std::time::Duration;
use tokio::time;

use crate::models::token::unix_now;
use crate::store::session::SessionStore;

/// Spawn the sweep task. Call this once at startup.
pub fn spawn(sessions: SessionStore, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = time::interval(every);
        // the first tick completes immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            sweep_once(&sessions).await;
        }
    })
}

async fn sweep_once(sessions: &SessionStore) -> usize {
    let removed = sessions.evict_expired(unix_now()).await;
    if removed > 0 {
        tracing::info!(rows = removed, "evicted expired tokens");
    }
    removed
}
