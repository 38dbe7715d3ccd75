//! Session state: the engine's unit of ownership
//!
//! The session store exclusively owns every `SessionState`. Engine
//! components mutate a borrowed session and return; invariants re-settle
//! at the end of each event (statuses refreshed, scores clamped, graph
//! projection regenerated).

use crate::{
    AdaptationLogEntry, AmbiguityFlag, CaseGraph, Citation, DisambiguationCard, FlowCandidate,
    InterfaceMode, MicroCheckResult, ScoreCard, UserEvent, WorkflowStep,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// Who is driving the session
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantRole {
    Student,
    Caregiver,
    AdvisorHelper,
}

/// Self-reported familiarity with the process; anchors the score baseline
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FamiliarityLevel {
    New,
    Intermediate,
    Advanced,
}

impl FamiliarityLevel {
    /// Understanding/clarity baseline for this familiarity level
    pub fn score_baseline(&self) -> u8 {
        match self {
            Self::New => 64,
            Self::Intermediate => 70,
            Self::Advanced => 78,
        }
    }
}

/// Per-session user profile supplied at start
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionProfile {
    #[serde(default = "default_familiarity")]
    pub familiarity_level: FamiliarityLevel,
    #[serde(default)]
    pub preferred_mode: InterfaceMode,
    /// 1 (calm) to 5 (urgent)
    #[serde(default = "default_stress")]
    pub stress_level: u8,
    #[serde(default = "default_role")]
    pub role: ParticipantRole,
}

fn default_familiarity() -> FamiliarityLevel {
    FamiliarityLevel::New
}

fn default_stress() -> u8 {
    3
}

fn default_role() -> ParticipantRole {
    ParticipantRole::Student
}

impl Default for SessionProfile {
    fn default() -> Self {
        Self {
            familiarity_level: default_familiarity(),
            preferred_mode: InterfaceMode::default(),
            stress_level: default_stress(),
            role: default_role(),
        }
    }
}

/// The complete state of one guided case
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionState {
    pub session_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,

    pub intent: String,
    pub profile: SessionProfile,

    /// Exactly one flow active at a time; empty until routing settles
    pub selected_flow_id: String,
    pub selected_flow_title: String,
    pub candidate_flows: Vec<FlowCandidate>,
    pub ambiguity_flags: Vec<AmbiguityFlag>,
    pub disambiguation_card: Option<DisambiguationCard>,

    pub current_mode: InterfaceMode,
    /// Set by a `mode_change` event; cleared only when escalation-high
    /// overrides it
    pub manual_mode: Option<InterfaceMode>,

    /// Always derived from the selected flow's template plus the session
    /// fields — never edited independently of it
    pub workflow: Vec<WorkflowStep>,
    pub case_graph: CaseGraph,

    /// Fields the selected flow needs before advisor handoff
    pub required_entities: Vec<String>,
    pub fields: BTreeMap<String, String>,
    pub missing_items: Vec<String>,

    pub scores: ScoreCard,
    /// Understanding watermark the adaptation engine compares against to
    /// detect drops; holds across gradual declines and resets when the
    /// drop rule fires or understanding recovers
    pub previous_understanding: u8,
    /// Consecutive events with completeness below the floor
    pub low_completeness_streak: u32,

    pub citations: Vec<Citation>,

    /// Shared-bank check ids active for the selected flow
    pub active_check_ids: Vec<String>,
    pub micro_checks: BTreeMap<String, MicroCheckResult>,

    pub events: Vec<UserEvent>,
    pub adaptation_log: Vec<AdaptationLogEntry>,

    pub advisor_packet_markdown: Option<String>,
}

impl SessionState {
    /// Create a fresh session; routing and scoring happen afterwards
    pub fn new(intent: impl Into<String>, profile: SessionProfile) -> Self {
        let now = Utc::now();
        let baseline = profile.familiarity_level.score_baseline();
        Self {
            session_id: Uuid::new_v4().to_string(),
            created_at: now,
            updated_at: now,
            intent: intent.into(),
            current_mode: profile.preferred_mode,
            profile,
            selected_flow_id: String::new(),
            selected_flow_title: String::new(),
            candidate_flows: Vec::new(),
            ambiguity_flags: Vec::new(),
            disambiguation_card: None,
            manual_mode: None,
            workflow: Vec::new(),
            case_graph: CaseGraph::default(),
            required_entities: Vec::new(),
            fields: BTreeMap::new(),
            missing_items: Vec::new(),
            scores: ScoreCard::with_baseline(baseline),
            previous_understanding: baseline,
            low_completeness_streak: 0,
            citations: Vec::new(),
            active_check_ids: Vec::new(),
            micro_checks: BTreeMap::new(),
            events: Vec::new(),
            adaptation_log: Vec::new(),
            advisor_packet_markdown: None,
        }
    }

    /// Non-empty field lookup; whitespace counts as empty
    pub fn field(&self, key: &str) -> Option<&str> {
        self.fields
            .get(key)
            .map(String::as_str)
            .map(str::trim)
            .filter(|v| !v.is_empty())
    }

    /// A field is resolved when present, non-empty, and not `"unknown"`
    pub fn field_resolved(&self, key: &str) -> bool {
        self.field(key).is_some_and(|v| v != "unknown")
    }

    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_anchors_baseline_to_familiarity() {
        let profile = SessionProfile {
            familiarity_level: FamiliarityLevel::Advanced,
            ..SessionProfile::default()
        };
        let session = SessionState::new("I want to work on OPT after graduation", profile);
        assert_eq!(session.scores.understanding_score, 78);
        assert_eq!(session.previous_understanding, 78);
        assert!(session.selected_flow_id.is_empty());
    }

    #[test]
    fn field_lookup_treats_unknown_as_unresolved() {
        let mut session =
            SessionState::new("cap gap question", SessionProfile::default());
        session
            .fields
            .insert("petition_status".to_string(), "unknown".to_string());
        assert!(session.field("petition_status").is_some());
        assert!(!session.field_resolved("petition_status"));

        session
            .fields
            .insert("petition_status".to_string(), "  ".to_string());
        assert!(session.field("petition_status").is_none());
    }
}
