//! The VisaFlow Session Engine
//!
//! Owns a case's state and decides, on every event, what flow, workflow
//! graph, scores, and UI mode apply next. The engine is synchronous and
//! side-effect free outside the session it is handed: every component
//! receives a session reference, mutates it, and returns.
//!
//! # Control flow per event
//!
//! validate → mutate fields/steps/flow → refresh derived state (statuses,
//! missing items, completeness, escalation) → mode adaptation → response.
//!
//! Validation happens before any mutation; a rejected event leaves the
//! session untouched.

#![deny(unsafe_code)]

pub mod adaptation;
pub mod checks;
pub mod engine;
pub mod graph;
pub mod knowledge;
pub mod packet;
pub mod router;
pub mod scoring;
pub mod signals;

pub use engine::{SessionEngine, StartOutcome, StartSessionRequest};
