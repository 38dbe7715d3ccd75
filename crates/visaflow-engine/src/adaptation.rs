//! Mode adaptation engine
//!
//! A priority-ordered rule list evaluated fresh after every event as a
//! pure function of the current scores, fields, flow, and manual
//! override. The first matching rule wins. Every decision — including a
//! no-op — appends one entry to the session's adaptation log.

use visaflow_types::{
    AdaptationLogEntry, AdaptationReason, InterfaceMode, ScoreCard, SessionState, UiMutation,
};

/// Escalation risk at or above this forces advisor mode
pub const ESCALATION_ADVISOR_THRESHOLD: u8 = 70;

/// Understanding must drop by more than this below its watermark to
/// trigger explain mode
pub const UNDERSTANDING_DROP_DELTA: i32 = 10;

/// Completeness below this floor pulls the session back to the checklist
pub const COMPLETENESS_MODE_FLOOR: u8 = 50;

/// One adaptation decision
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ModeDecision {
    pub mode: InterfaceMode,
    pub reason: AdaptationReason,
}

/// Pure rule evaluation. A manual lock suppresses the automatic rules
/// below escalation; only escalation-high fires over the lock.
pub fn evaluate(
    scores: &ScoreCard,
    previous_understanding: u8,
    selected_flow_id: &str,
    petition_resolved: bool,
    current_mode: InterfaceMode,
    manual_mode: Option<InterfaceMode>,
) -> ModeDecision {
    if scores.escalation_risk >= ESCALATION_ADVISOR_THRESHOLD {
        return ModeDecision {
            mode: InterfaceMode::Advisor,
            reason: AdaptationReason::EscalationHigh,
        };
    }

    if manual_mode.is_none() {
        if selected_flow_id == "cap_gap_transition_prep" && !petition_resolved {
            return ModeDecision {
                mode: InterfaceMode::Transition,
                reason: AdaptationReason::TransitionNeedsPetition,
            };
        }

        let drop = previous_understanding as i32 - scores.understanding_score as i32;
        if drop > UNDERSTANDING_DROP_DELTA {
            return ModeDecision {
                mode: InterfaceMode::Explain,
                reason: AdaptationReason::UnderstandingDropped,
            };
        }

        if !selected_flow_id.is_empty() && scores.completeness_score < COMPLETENESS_MODE_FLOOR {
            return ModeDecision {
                mode: InterfaceMode::Checklist,
                reason: AdaptationReason::CompletenessLow,
            };
        }
    }

    if let Some(mode) = manual_mode {
        return ModeDecision {
            mode,
            reason: AdaptationReason::ModeLocked,
        };
    }

    ModeDecision {
        mode: current_mode,
        reason: AdaptationReason::NoChangeNeeded,
    }
}

/// Evaluate the rules against a session, commit the decision, and append
/// the log entry. Escalation-high clears a manual lock.
pub fn adapt(session: &mut SessionState) -> UiMutation {
    let from_mode = session.current_mode;
    let decision = evaluate(
        &session.scores,
        session.previous_understanding,
        &session.selected_flow_id,
        session.field_resolved("petition_status"),
        session.current_mode,
        session.manual_mode,
    );

    if decision.reason == AdaptationReason::EscalationHigh {
        session.manual_mode = None;
    }

    if decision.mode != from_mode {
        tracing::debug!(
            session_id = %session.session_id,
            from = %from_mode,
            to = %decision.mode,
            reason = decision.reason.code(),
            "mode transition"
        );
    }

    session.current_mode = decision.mode;
    session
        .adaptation_log
        .push(AdaptationLogEntry::new(from_mode, decision.mode, decision.reason));

    UiMutation {
        new_mode: decision.mode,
        reason: decision.reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scores(understanding: u8, completeness: u8, escalation: u8) -> ScoreCard {
        ScoreCard {
            understanding_score: understanding,
            clarity_score: 70,
            completeness_score: completeness,
            escalation_risk: escalation,
        }
    }

    #[test]
    fn escalation_overrides_everything_including_manual_lock() {
        let decision = evaluate(
            &scores(70, 90, 80),
            70,
            "cpt_prep",
            true,
            InterfaceMode::Checklist,
            Some(InterfaceMode::Timeline),
        );
        assert_eq!(decision.mode, InterfaceMode::Advisor);
        assert_eq!(decision.reason, AdaptationReason::EscalationHigh);
    }

    #[test]
    fn unresolved_petition_on_cap_gap_forces_transition() {
        let decision = evaluate(
            &scores(70, 90, 40),
            70,
            "cap_gap_transition_prep",
            false,
            InterfaceMode::Checklist,
            None,
        );
        assert_eq!(decision.mode, InterfaceMode::Transition);
        assert_eq!(decision.reason, AdaptationReason::TransitionNeedsPetition);
    }

    #[test]
    fn understanding_drop_beats_completeness_rule() {
        let decision = evaluate(
            &scores(50, 20, 30),
            70,
            "cpt_prep",
            true,
            InterfaceMode::Checklist,
            None,
        );
        assert_eq!(decision.mode, InterfaceMode::Explain);
        assert_eq!(decision.reason, AdaptationReason::UnderstandingDropped);
    }

    #[test]
    fn low_completeness_pulls_back_to_checklist() {
        let decision = evaluate(
            &scores(70, 30, 30),
            70,
            "cpt_prep",
            true,
            InterfaceMode::Timeline,
            None,
        );
        assert_eq!(decision.mode, InterfaceMode::Checklist);
        assert_eq!(decision.reason, AdaptationReason::CompletenessLow);
    }

    #[test]
    fn manual_lock_suppresses_lower_priority_rules() {
        let decision = evaluate(
            &scores(50, 20, 30),
            70,
            "cpt_prep",
            true,
            InterfaceMode::Checklist,
            Some(InterfaceMode::Timeline),
        );
        assert_eq!(decision.mode, InterfaceMode::Timeline);
        assert_eq!(decision.reason, AdaptationReason::ModeLocked);
    }

    #[test]
    fn quiet_state_keeps_current_mode() {
        let decision = evaluate(
            &scores(70, 90, 20),
            70,
            "cpt_prep",
            true,
            InterfaceMode::Timeline,
            None,
        );
        assert_eq!(decision.mode, InterfaceMode::Timeline);
        assert_eq!(decision.reason, AdaptationReason::NoChangeNeeded);
    }

    #[test]
    fn adapt_appends_a_log_entry_even_for_noops() {
        let mut session = SessionState::new(
            "cpt internship question for planning",
            visaflow_types::SessionProfile::default(),
        );
        session.selected_flow_id = "cpt_prep".to_string();
        session.scores.completeness_score = 90;
        let before = session.adaptation_log.len();

        let mutation = adapt(&mut session);
        assert_eq!(mutation.reason, AdaptationReason::NoChangeNeeded);
        assert_eq!(session.adaptation_log.len(), before + 1);
    }

    #[test]
    fn escalation_clears_the_manual_lock() {
        let mut session = SessionState::new(
            "cap gap escalation lock test intent",
            visaflow_types::SessionProfile::default(),
        );
        session.selected_flow_id = "cpt_prep".to_string();
        session.manual_mode = Some(InterfaceMode::Timeline);
        session.scores.escalation_risk = 90;

        let mutation = adapt(&mut session);
        assert_eq!(mutation.new_mode, InterfaceMode::Advisor);
        assert!(session.manual_mode.is_none());
    }
}
