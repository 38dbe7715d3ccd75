//! Storage trait definitions

use crate::error::StorageError;
use async_trait::async_trait;
use visaflow_types::SessionState;

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

/// Storage for session state
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Create a session. Fails if the id already exists.
    async fn insert_session(&self, session: SessionState) -> StorageResult<()>;

    /// Get a session snapshot by id
    async fn get_session(&self, session_id: &str) -> StorageResult<Option<SessionState>>;

    /// Commit an updated session. Fails if the session was never created.
    async fn put_session(&self, session: SessionState) -> StorageResult<()>;

    /// List all session ids
    async fn list_session_ids(&self) -> StorageResult<Vec<String>>;

    /// Delete a session; returns whether it existed
    async fn delete_session(&self, session_id: &str) -> StorageResult<bool>;
}
