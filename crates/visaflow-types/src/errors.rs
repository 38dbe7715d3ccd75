//! Error types for the session engine

/// Errors that can occur while handling a session operation.
///
/// Every variant is rejected before any session mutation takes effect; the
/// engine never leaves a session half-mutated.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Malformed or missing payload fields
    #[error("validation error: {0}")]
    Validation(String),

    /// Unknown session, step, flow, or check id
    #[error("not found: {0}")]
    NotFound(String),

    /// Unrecognized event type
    #[error("unsupported event type: {0}")]
    UnsupportedEvent(String),
}

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;
