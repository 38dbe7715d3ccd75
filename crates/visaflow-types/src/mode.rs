//! Interface modes and workflow step statuses

use serde::{Deserialize, Serialize};
use std::fmt;

/// The adaptive UI presentation state
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InterfaceMode {
    /// Unresolved steps sorted first
    Checklist,
    /// Date-dependent planning view
    Timeline,
    /// Plain-language guidance expanded
    Explain,
    /// Document gathering grouped by dependency
    DocPrep,
    /// Status-bridge view for cap-gap cases
    Transition,
    /// Escalation view with handoff questions pinned
    Advisor,
}

impl InterfaceMode {
    /// Parse a wire-format mode string (`"doc_prep"`, `"checklist"`, ...)
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "checklist" => Some(Self::Checklist),
            "timeline" => Some(Self::Timeline),
            "explain" => Some(Self::Explain),
            "doc_prep" => Some(Self::DocPrep),
            "transition" => Some(Self::Transition),
            "advisor" => Some(Self::Advisor),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Checklist => "checklist",
            Self::Timeline => "timeline",
            Self::Explain => "explain",
            Self::DocPrep => "doc_prep",
            Self::Transition => "transition",
            Self::Advisor => "advisor",
        }
    }
}

impl Default for InterfaceMode {
    fn default() -> Self {
        Self::Checklist
    }
}

impl fmt::Display for InterfaceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Status of one instantiated workflow step
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    /// Not yet completed; dependencies satisfied or absent
    Pending,
    /// Marked complete by the user
    Complete,
    /// At least one dependency is not complete. Advisory only: a blocked
    /// step can still be marked complete directly.
    Blocked,
}

impl Default for StepStatus {
    fn default() -> Self {
        Self::Pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_round_trips_every_mode() {
        for mode in [
            InterfaceMode::Checklist,
            InterfaceMode::Timeline,
            InterfaceMode::Explain,
            InterfaceMode::DocPrep,
            InterfaceMode::Transition,
            InterfaceMode::Advisor,
        ] {
            assert_eq!(InterfaceMode::parse(mode.as_str()), Some(mode));
        }
        assert_eq!(InterfaceMode::parse("dashboard"), None);
    }
}
