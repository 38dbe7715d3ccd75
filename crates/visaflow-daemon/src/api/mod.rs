//! API layer for visaflow-daemon

pub mod rest;

pub use rest::router::create_router;
