//! Micro-check engine
//!
//! Stateless per check: the available set is a function of the current
//! flow and mode, answers are compared against the bank, and results
//! overwrite prior answers for the same check id.

use visaflow_catalog::{CheckBank, FlowCatalog};
use visaflow_types::{
    EngineError, EngineResult, InterfaceMode, MicroCheck, MicroCheckResult, SessionState,
};

/// Synthetic check id for the current top missing item
pub const MISSING_ITEM_CHECK_ID: &str = "missing_item_check";

/// Synthetic check id surfaced while a disambiguation card is open
pub const DISAMBIGUATION_CHECK_ID: &str = "flow_disambiguation_check";

/// Checks available for the session right now: the selected flow's bank
/// checks (explain mode adds the orientation set), the dynamic
/// missing-item check, and the disambiguation check while a card is open.
pub fn available_checks(
    session: &SessionState,
    catalog: &FlowCatalog,
    bank: &CheckBank,
) -> Vec<MicroCheck> {
    let mut checks: Vec<MicroCheck> = Vec::new();

    for check_id in &session.active_check_ids {
        if let Some(check) = bank.get(check_id) {
            checks.push(check.clone());
        }
    }

    // Explain mode surfaces the orientation checks as extra scaffolding
    if session.current_mode == InterfaceMode::Explain {
        for check_id in &catalog.fallback().check_ids {
            if !checks.iter().any(|c| &c.check_id == check_id) {
                if let Some(check) = bank.get(check_id) {
                    checks.push(check.clone());
                }
            }
        }
    }

    checks.push(missing_item_check(session));

    if let Some(card) = &session.disambiguation_card {
        if !card.options.is_empty() {
            checks.push(MicroCheck::new(
                DISAMBIGUATION_CHECK_ID,
                "Which specialized flow should you confirm next?",
                card.options.clone(),
                card.options[0].clone(),
                "Confirm the top matching flow first, then verify with an advisor when uncertain.",
            ));
        }
    }

    checks
}

/// Compare an answer against the currently available checks. Unknown
/// check ids are rejected without recording anything.
pub fn evaluate_answer(
    available: &[MicroCheck],
    check_id: &str,
    selected_option: &str,
) -> EngineResult<MicroCheckResult> {
    let check = available
        .iter()
        .find(|c| c.check_id == check_id)
        .ok_or_else(|| EngineError::NotFound(format!("unknown check id: {check_id}")))?;

    let is_correct = selected_option == check.correct_option;
    let feedback = if is_correct {
        format!("Correct. {}", check.explanation)
    } else {
        format!("Not quite. {}", check.explanation)
    };

    Ok(MicroCheckResult {
        check_id: check.check_id.clone(),
        selected_option: selected_option.to_string(),
        is_correct,
        feedback,
    })
}

fn missing_item_check(session: &SessionState) -> MicroCheck {
    let top_missing = session
        .missing_items
        .first()
        .map(String::as_str)
        .unwrap_or("status_type")
        .to_string();

    MicroCheck::new(
        MISSING_ITEM_CHECK_ID,
        "Which missing item is currently the top blocker to readiness?",
        vec![
            top_missing.clone(),
            "ui_theme_color".to_string(),
            "profile_avatar".to_string(),
            "notification_sound".to_string(),
        ],
        top_missing,
        "The top unresolved required entity should be resolved first.",
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use visaflow_types::{DisambiguationCard, SessionProfile};

    fn session_with_flow(flow_id: &str) -> SessionState {
        let catalog = FlowCatalog::new();
        let mut session = SessionState::new(
            "cpt internship preparation question",
            SessionProfile::default(),
        );
        let pack = catalog.get(flow_id).unwrap();
        session.selected_flow_id = pack.flow_id.clone();
        session.active_check_ids = pack.check_ids.clone();
        session
    }

    #[test]
    fn flow_checks_plus_missing_item_check_are_available() {
        let session = session_with_flow("cpt_prep");
        let checks = available_checks(&session, &FlowCatalog::new(), &CheckBank::new());
        let ids: Vec<_> = checks.iter().map(|c| c.check_id.as_str()).collect();
        assert!(ids.contains(&"cpt_start_rule"));
        assert!(ids.contains(&MISSING_ITEM_CHECK_ID));
        assert!(!ids.contains(&DISAMBIGUATION_CHECK_ID));
    }

    #[test]
    fn explain_mode_surfaces_orientation_checks() {
        let mut session = session_with_flow("cpt_prep");
        let baseline = available_checks(&session, &FlowCatalog::new(), &CheckBank::new()).len();
        session.current_mode = InterfaceMode::Explain;
        let explained = available_checks(&session, &FlowCatalog::new(), &CheckBank::new());
        assert!(explained.len() > baseline);
        assert!(explained.iter().any(|c| c.check_id == "cpt_opt_difference"));
    }

    #[test]
    fn disambiguation_card_adds_its_check() {
        let mut session = session_with_flow("cpt_prep");
        session.disambiguation_card = Some(DisambiguationCard {
            prompt: "pick one".to_string(),
            options: vec!["cpt_prep|CPT".to_string(), "opt_initial_prep|OPT".to_string()],
        });
        let checks = available_checks(&session, &FlowCatalog::new(), &CheckBank::new());
        let card_check = checks
            .iter()
            .find(|c| c.check_id == DISAMBIGUATION_CHECK_ID)
            .unwrap();
        assert_eq!(card_check.correct_option, "cpt_prep|CPT");
    }

    #[test]
    fn answers_are_graded_against_the_bank() {
        let session = session_with_flow("cpt_prep");
        let checks = available_checks(&session, &FlowCatalog::new(), &CheckBank::new());

        let correct = evaluate_answer(
            &checks,
            "cpt_start_rule",
            "After the CPT-endorsed I-20 is issued",
        )
        .unwrap();
        assert!(correct.is_correct);
        assert!(correct.feedback.starts_with("Correct."));

        let wrong =
            evaluate_answer(&checks, "cpt_start_rule", "As soon as the employer signs the offer")
                .unwrap();
        assert!(!wrong.is_correct);
        assert!(wrong.feedback.starts_with("Not quite."));

        let missing = evaluate_answer(&checks, "no_such_check", "anything");
        assert!(matches!(missing, Err(EngineError::NotFound(_))));
    }
}
