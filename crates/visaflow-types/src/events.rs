//! User events: the engine's only mutation vocabulary

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Recognized event types for `apply_event`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventType {
    FieldUpdate,
    SelectFlow,
    ModeChange,
    MarkStep,
    UnmarkStep,
    StepReopen,
    Inactivity,
    AskHelp,
}

impl EventType {
    /// Parse a wire-format event type. `None` means the event is
    /// unsupported, not malformed.
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "field_update" => Some(Self::FieldUpdate),
            "select_flow" => Some(Self::SelectFlow),
            "mode_change" => Some(Self::ModeChange),
            "mark_step" => Some(Self::MarkStep),
            "unmark_step" => Some(Self::UnmarkStep),
            "step_reopen" => Some(Self::StepReopen),
            "inactivity" => Some(Self::Inactivity),
            "ask_help" => Some(Self::AskHelp),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FieldUpdate => "field_update",
            Self::SelectFlow => "select_flow",
            Self::ModeChange => "mode_change",
            Self::MarkStep => "mark_step",
            Self::UnmarkStep => "unmark_step",
            Self::StepReopen => "step_reopen",
            Self::Inactivity => "inactivity",
            Self::AskHelp => "ask_help",
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One applied event, journaled on the session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UserEvent {
    pub event_type: EventType,
    pub payload: serde_json::Value,
    pub recorded_at: DateTime<Utc>,
}

impl UserEvent {
    pub fn new(event_type: EventType, payload: serde_json::Value) -> Self {
        Self {
            event_type,
            payload,
            recorded_at: Utc::now(),
        }
    }
}
