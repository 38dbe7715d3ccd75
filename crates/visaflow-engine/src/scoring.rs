//! Readiness scorer
//!
//! Completeness is a pure function of the selected flow's steps and the
//! field values — identical inputs give identical scores regardless of
//! event history. Understanding and clarity move incrementally from the
//! profile baseline. Escalation risk is recomputed from the currently
//! unresolved conditions; resolving a condition removes its contribution,
//! and nothing decays with time.

use std::collections::BTreeMap;
use visaflow_types::{clamp_score, SessionState, StepStatus, WorkflowStep, ESCALATION_BASE};

/// Understanding penalty for an `inactivity` event
pub const INACTIVITY_UNDERSTANDING_PENALTY: i32 = -8;
/// Clarity penalty for an `inactivity` event
pub const INACTIVITY_CLARITY_PENALTY: i32 = -5;
/// Understanding penalty for an `ask_help` event
pub const ASK_HELP_UNDERSTANDING_PENALTY: i32 = -6;
/// Clarity penalty for an `ask_help` event
pub const ASK_HELP_CLARITY_PENALTY: i32 = -4;
/// Understanding reward for a correct micro-check
pub const CHECK_CORRECT_UNDERSTANDING_REWARD: i32 = 6;
/// Clarity reward for a correct micro-check
pub const CHECK_CORRECT_CLARITY_REWARD: i32 = 4;
/// Understanding penalty for an incorrect micro-check
pub const CHECK_INCORRECT_UNDERSTANDING_PENALTY: i32 = -4;
/// Clarity penalty for an incorrect micro-check
pub const CHECK_INCORRECT_CLARITY_PENALTY: i32 = -3;

/// Completeness below this counts as "low" for streak and mode purposes
pub const COMPLETENESS_FLOOR: u8 = 50;

const LOW_COMPLETENESS_RISK_STEP: u32 = 4;
const LOW_COMPLETENESS_RISK_CAP: u32 = 20;
const PETITION_UNKNOWN_RISK: i32 = 25;
const MISSING_WORK_END_RISK: i32 = 10;
const MISSING_EMPLOYER_RISK: i32 = 10;
const FAILED_CHECK_RISK: i32 = 8;

/// Proportion of required fields filled across all workflow steps,
/// scaled to 0–100. Pure over `(steps, fields)`.
pub fn completeness_score(workflow: &[WorkflowStep], fields: &BTreeMap<String, String>) -> u8 {
    let mut required = 0usize;
    let mut filled = 0usize;
    for step in workflow {
        for field in &step.required_fields {
            required += 1;
            if field_present(fields, field) {
                filled += 1;
            }
        }
    }
    if required == 0 {
        // A selected flow with no field requirements is trivially ready;
        // no flow at all is not.
        return if workflow.is_empty() { 0 } else { 100 };
    }
    clamp_score(((filled * 100) / required) as i32)
}

/// Required fields of pending steps that are still empty, first unmet
/// requirement per step, in step order, deduplicated.
pub fn missing_items(workflow: &[WorkflowStep], fields: &BTreeMap<String, String>) -> Vec<String> {
    let mut missing: Vec<String> = Vec::new();
    for step in workflow {
        if step.status == StepStatus::Complete {
            continue;
        }
        for field in &step.required_fields {
            if !field_present(fields, field) && !missing.iter().any(|m| m == field) {
                missing.push(field.clone());
            }
        }
    }
    missing
}

/// Advance or reset the consecutive-low-completeness counter. Only ticks
/// once a flow is selected; a routing-pending session cannot escalate on
/// emptiness alone.
pub fn update_low_completeness_streak(session: &mut SessionState) {
    if !session.selected_flow_id.is_empty()
        && session.scores.completeness_score < COMPLETENESS_FLOOR
    {
        session.low_completeness_streak += 1;
    } else {
        session.low_completeness_streak = 0;
    }
}

/// Recompute escalation risk from the currently unresolved conditions
pub fn recompute_escalation(session: &SessionState) -> u8 {
    let mut risk = ESCALATION_BASE as i32;

    if session.selected_flow_id == "cap_gap_transition_prep" {
        if !session.field_resolved("petition_status") {
            risk += PETITION_UNKNOWN_RISK;
        }
        if session.field("work_end_date").is_none() {
            risk += MISSING_WORK_END_RISK;
        }
    }

    if session.selected_flow_id == "cpt_prep" && session.field("employer_name").is_none() {
        risk += MISSING_EMPLOYER_RISK;
    }

    risk += session
        .low_completeness_streak
        .saturating_mul(LOW_COMPLETENESS_RISK_STEP)
        .min(LOW_COMPLETENESS_RISK_CAP) as i32;

    // A standing incorrect answer is an unresolved condition; re-answering
    // correctly clears it.
    if session.micro_checks.values().any(|r| !r.is_correct) {
        risk += FAILED_CHECK_RISK;
    }

    clamp_score(risk)
}

fn field_present(fields: &BTreeMap<String, String>, key: &str) -> bool {
    fields.get(key).is_some_and(|v| !v.trim().is_empty())
}
