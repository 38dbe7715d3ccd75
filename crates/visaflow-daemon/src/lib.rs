//! VisaFlow daemon library
//!
//! This crate provides the service components around the session engine:
//! - REST API handlers
//! - Session storage backends
//! - Server lifecycle management

pub mod api;
pub mod config;
pub mod error;
pub mod server;
pub mod storage;

pub use config::DaemonConfig;
pub use error::{ApiError, DaemonError, StorageError};
pub use server::Server;
pub use storage::{InMemorySessionStore, SessionStore};
