//! Application state for API handlers

use crate::storage::SessionStore;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use visaflow_engine::SessionEngine;

/// Per-session mutation locks.
///
/// At most one mutation is in flight per session id: mutating handlers
/// acquire the session's lock before loading and hold it through commit,
/// so every event fully applies or is rejected against a settled snapshot.
/// Different sessions proceed independently.
#[derive(Clone, Default)]
pub struct SessionLocks {
    inner: Arc<Mutex<HashMap<String, Arc<Mutex<()>>>>>,
}

impl SessionLocks {
    pub async fn acquire(&self, session_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.inner.lock().await;
            locks
                .entry(session_id.to_string())
                .or_insert_with(|| Arc::new(Mutex::new(())))
                .clone()
        };
        lock.lock_owned().await
    }
}

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Session storage backend
    pub store: Arc<dyn SessionStore>,

    /// The stateless session engine
    pub engine: Arc<SessionEngine>,

    /// Per-session mutation serialization
    pub locks: SessionLocks,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(store: Arc<dyn SessionStore>, engine: Arc<SessionEngine>) -> Self {
        Self {
            store,
            engine,
            locks: SessionLocks::default(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let duration = chrono::Utc::now() - self.started_at;
        let secs = duration.num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        }
    }
}
