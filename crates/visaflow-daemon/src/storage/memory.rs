//! In-memory session storage

use super::traits::{SessionStore, StorageResult};
use crate::error::StorageError;
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;
use visaflow_types::SessionState;

/// In-memory session store for development and testing.
///
/// Handlers work snapshot-style: read a session, run the engine on the
/// copy, commit with `put_session`. Per-session write ordering is the
/// caller's job (the REST layer holds a per-session lock across
/// load-mutate-commit).
#[derive(Debug, Default)]
pub struct InMemorySessionStore {
    sessions: RwLock<HashMap<String, SessionState>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn insert_session(&self, session: SessionState) -> StorageResult<()> {
        let mut sessions = self.sessions.write().await;
        if sessions.contains_key(&session.session_id) {
            return Err(StorageError::Conflict(format!(
                "session {} already exists",
                session.session_id
            )));
        }
        sessions.insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn get_session(&self, session_id: &str) -> StorageResult<Option<SessionState>> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(session_id).cloned())
    }

    async fn put_session(&self, session: SessionState) -> StorageResult<()> {
        let mut sessions = self.sessions.write().await;
        if !sessions.contains_key(&session.session_id) {
            return Err(StorageError::NotFound(format!(
                "session {} does not exist",
                session.session_id
            )));
        }
        sessions.insert(session.session_id.clone(), session);
        Ok(())
    }

    async fn list_session_ids(&self) -> StorageResult<Vec<String>> {
        let sessions = self.sessions.read().await;
        let mut ids: Vec<String> = sessions.keys().cloned().collect();
        ids.sort();
        Ok(ids)
    }

    async fn delete_session(&self, session_id: &str) -> StorageResult<bool> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(session_id).is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visaflow_types::SessionProfile;

    fn session() -> SessionState {
        SessionState::new("cpt internship planning question", SessionProfile::default())
    }

    #[tokio::test]
    async fn insert_get_put_round_trip() {
        let store = InMemorySessionStore::new();
        let mut session = session();
        store.insert_session(session.clone()).await.unwrap();

        let loaded = store.get_session(&session.session_id).await.unwrap().unwrap();
        assert_eq!(loaded.intent, session.intent);

        session.selected_flow_id = "cpt_prep".to_string();
        store.put_session(session.clone()).await.unwrap();
        let loaded = store.get_session(&session.session_id).await.unwrap().unwrap();
        assert_eq!(loaded.selected_flow_id, "cpt_prep");
    }

    #[tokio::test]
    async fn double_insert_conflicts_and_blind_put_fails() {
        let store = InMemorySessionStore::new();
        let session = session();
        store.insert_session(session.clone()).await.unwrap();
        assert!(matches!(
            store.insert_session(session).await,
            Err(StorageError::Conflict(_))
        ));

        let orphan = self::session();
        assert!(matches!(
            store.put_session(orphan).await,
            Err(StorageError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn delete_reports_existence() {
        let store = InMemorySessionStore::new();
        let session = session();
        let id = session.session_id.clone();
        store.insert_session(session).await.unwrap();

        assert!(store.delete_session(&id).await.unwrap());
        assert!(!store.delete_session(&id).await.unwrap());
        assert!(store.get_session(&id).await.unwrap().is_none());
    }
}
