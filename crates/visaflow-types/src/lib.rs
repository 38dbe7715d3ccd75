//! Domain Types for the VisaFlow Session Engine
//!
//! A session is the unit of state: one student case, one selected flow,
//! one workflow graph, four readiness scores. Every type that crosses the
//! engine boundary lives here.
//!
//! # Key Concepts
//!
//! - **FlowPack**: An immutable catalog entry — a named visa-process track
//!   with its step templates and routing signals. Loaded at process start,
//!   never mutated.
//! - **SessionState**: The mutable per-case record. All engine components
//!   receive a session reference, mutate it, and return; no component holds
//!   cross-session state.
//! - **WorkflowStep**: One instantiated node of the selected flow's graph,
//!   with advisory blocked/pending/complete status.
//! - **ScoreCard**: The four 0–100 readiness metrics, clamped after every
//!   mutation.
//! - **AdaptationReason**: A closed reason-code enumeration. The engine never
//!   emits free-text reasons; display strings belong to the presentation
//!   layer.
//!
//! # Design Principles
//!
//! 1. One flow selected at a time; the workflow is always derived from that
//!    flow's template plus the session fields.
//! 2. The adaptation log is append-only. No entry is edited or pruned.
//! 3. Every input either applies atomically or is rejected with an
//!    [`EngineError`] before any state changes.

#![deny(unsafe_code)]

mod adaptation;
mod checks;
mod errors;
mod events;
mod flow;
mod mode;
mod scores;
mod session;
mod workflow;

pub use adaptation::*;
pub use checks::*;
pub use errors::*;
pub use events::*;
pub use flow::*;
pub use mode::*;
pub use scores::*;
pub use session::*;
pub use workflow::*;
