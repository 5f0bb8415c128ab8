use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use super::{SessionError, SessionStore, SessionToken, SessionValue};

#[derive(Debug)]
struct Entry {
    values: HashMap<String, SessionValue>,
    last_seen: Instant,
}

impl Entry {
    fn empty(now: Instant) -> Self {
        Self {
            values: HashMap::new(),
            last_seen: now,
        }
    }

    fn expired(&self, now: Instant, idle_timeout: Duration) -> bool {
        now.duration_since(self.last_seen) >= idle_timeout
    }
}

/// In-process session store with an idle timeout.
///
/// Every access refreshes the idle clock. Expired entries are dropped lazily on
/// access and in bulk by [`MemoryStore::sweep`].
#[derive(Debug)]
pub struct MemoryStore {
    entries: RwLock<HashMap<SessionToken, Entry>>,
    idle_timeout: Duration,
}

impl MemoryStore {
    pub fn new(idle_timeout: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            idle_timeout,
        }
    }

    pub fn idle_timeout(&self) -> Duration {
        self.idle_timeout
    }

    /// Number of sessions that have not yet expired.
    pub async fn live_sessions(&self) -> usize {
        let now = Instant::now();
        self.entries
            .read()
            .await
            .values()
            .filter(|entry| !entry.expired(now, self.idle_timeout))
            .count()
    }

    /// Drop every expired session, returning how many were removed.
    pub async fn sweep(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| !entry.expired(now, self.idle_timeout));
        before - entries.len()
    }
}

#[async_trait]
impl SessionStore for MemoryStore {
    async fn get(&self, token: &SessionToken, key: &str) -> Result<Option<SessionValue>, SessionError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let Some(entry) = entries.get_mut(token) else {
            return Ok(None);
        };
        if entry.expired(now, self.idle_timeout) {
            entries.remove(token);
            return Ok(None);
        }

        entry.last_seen = now;
        Ok(entry.values.get(key).cloned())
    }

    async fn put(&self, token: &SessionToken, key: &str, value: SessionValue) -> Result<(), SessionError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let entry = entries.entry(token.clone()).or_insert_with(|| Entry::empty(now));
        if entry.expired(now, self.idle_timeout) {
            *entry = Entry::empty(now);
        }

        entry.last_seen = now;
        entry.values.insert(key.to_string(), value);
        Ok(())
    }

    async fn regenerate_token(&self, token: &SessionToken) -> Result<SessionToken, SessionError> {
        let now = Instant::now();
        let mut entries = self.entries.write().await;

        let values = match entries.remove(token) {
            Some(entry) if !entry.expired(now, self.idle_timeout) => entry.values,
            _ => HashMap::new(),
        };

        let fresh = SessionToken::generate();
        entries.insert(
            fresh.clone(),
            Entry {
                values,
                last_seen: now,
            },
        );
        Ok(fresh)
    }

    async fn renew(&self, token: &SessionToken) -> Result<SessionToken, SessionError> {
        self.entries.write().await.remove(token);
        Ok(SessionToken::generate())
    }
}

/// Periodically sweep expired sessions until the store is dropped.
pub fn spawn_sweeper(store: Arc<MemoryStore>, every: Duration) -> JoinHandle<()> {
    let store = Arc::downgrade(&store);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        // first tick fires immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            let Some(store) = store.upgrade() else {
                break;
            };
            let removed = store.sweep().await;
            if removed > 0 {
                tracing::debug!(removed, "swept expired sessions");
            }
        }
    })
}
