//! Storage layer for visaflow-daemon
//!
//! Session state lives behind the [`SessionStore`] trait so the REST
//! handlers never depend on a concrete backend.

mod memory;
mod traits;

pub use memory::InMemorySessionStore;
pub use traits::{SessionStore, StorageResult};
