//! Mode adaptation: reason codes and the append-only transition log
//!
//! Reason codes are a closed enumeration — the contract the view layer
//! depends on. The engine never explains a transition with free text;
//! display strings are owned by the presentation layer.

use crate::InterfaceMode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Why the mode adaptation engine picked the current mode.
///
/// Listed in rule-priority order; the first matching rule wins.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdaptationReason {
    /// Escalation risk crossed the advisor threshold; overrides any manual lock
    EscalationHigh,
    /// Cap-gap flow active with petition status unresolved
    TransitionNeedsPetition,
    /// Understanding dropped past the delta threshold below its watermark
    UnderstandingDropped,
    /// Completeness below the checklist floor
    CompletenessLow,
    /// Manual mode selection honored
    ModeLocked,
    /// No rule fired; current mode kept
    NoChangeNeeded,
}

impl AdaptationReason {
    pub fn code(&self) -> &'static str {
        match self {
            Self::EscalationHigh => "ESCALATION_HIGH",
            Self::TransitionNeedsPetition => "TRANSITION_NEEDS_PETITION",
            Self::UnderstandingDropped => "UNDERSTANDING_DROPPED",
            Self::CompletenessLow => "COMPLETENESS_LOW",
            Self::ModeLocked => "MODE_LOCKED",
            Self::NoChangeNeeded => "NO_CHANGE_NEEDED",
        }
    }
}

/// One append-only record of a mode decision (including no-ops)
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AdaptationLogEntry {
    pub from_mode: InterfaceMode,
    pub to_mode: InterfaceMode,
    pub reason: AdaptationReason,
    pub recorded_at: DateTime<Utc>,
}

impl AdaptationLogEntry {
    pub fn new(from_mode: InterfaceMode, to_mode: InterfaceMode, reason: AdaptationReason) -> Self {
        Self {
            from_mode,
            to_mode,
            reason,
            recorded_at: Utc::now(),
        }
    }
}

/// The `{new_mode, reason}` mutation returned with every event response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UiMutation {
    pub new_mode: InterfaceMode,
    pub reason: AdaptationReason,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reason_codes_serialize_screaming_snake() {
        let json = serde_json::to_string(&AdaptationReason::TransitionNeedsPetition).unwrap();
        assert_eq!(json, "\"TRANSITION_NEEDS_PETITION\"");
        assert_eq!(
            AdaptationReason::EscalationHigh.code(),
            "ESCALATION_HIGH"
        );
    }
}
