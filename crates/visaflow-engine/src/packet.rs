//! Advisor packet generator
//!
//! Pure render of the current session snapshot into markdown. Byte-
//! identical across repeated calls with no intervening event, so the
//! packet carries the session's creation time but never a "generated
//! now" stamp.

use chrono::SecondsFormat;
use visaflow_types::{FlowPack, SessionState, StepStatus, WorkflowStep};

/// Render the advisor packet markdown for the session as it stands. The
/// selected flow's pack contributes its document list and warnings; a
/// session with no selection renders those sections empty.
pub fn build_advisor_packet(session: &SessionState, pack: Option<&FlowPack>) -> String {
    let complete: Vec<&WorkflowStep> = session
        .workflow
        .iter()
        .filter(|s| s.status == StepStatus::Complete)
        .collect();
    let pending: Vec<&WorkflowStep> = session
        .workflow
        .iter()
        .filter(|s| s.status != StepStatus::Complete)
        .collect();

    let candidates = if session.candidate_flows.is_empty() {
        "- None".to_string()
    } else {
        session
            .candidate_flows
            .iter()
            .map(|c| format!("- {} ({}) score={}", c.title, c.flow_id, c.score))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let citations = if session.citations.is_empty() {
        "- No external citations resolved in this session.".to_string()
    } else {
        session
            .citations
            .iter()
            .map(|c| format!("- [{}]({})", c.title, c.url))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let flags = if session.ambiguity_flags.is_empty() {
        "none".to_string()
    } else {
        session
            .ambiguity_flags
            .iter()
            .map(|f| format!("{:?}", f))
            .collect::<Vec<_>>()
            .join(", ")
    };

    let field_summary = if session.fields.is_empty() {
        "- None".to_string()
    } else {
        session
            .fields
            .iter()
            .map(|(key, value)| {
                let value = if value.trim().is_empty() {
                    "(empty)"
                } else {
                    value.trim()
                };
                format!("- {}: {}", key, value)
            })
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "# VisaFlow Advisor Packet\n\n\
         Session ID: `{session_id}`  \n\
         Session opened: {created_at}\n\n\
         ## Disclaimer\n\
         This packet is a workflow-preparation artifact and is **not legal advice**.\n\n\
         ## Selected Flow\n\
         - Flow ID: `{flow_id}`\n\
         - Flow Title: {flow_title}\n\n\
         ## Candidate Flows (Router Output)\n\
         {candidates}\n\n\
         ## Intent Snapshot\n\
         - Intent: {intent}\n\
         - Ambiguity Flags: {flags}\n\n\
         ## Case Fields\n\
         {field_summary}\n\n\
         ## Live Readiness Metrics\n\
         - Understanding Score: {understanding}/100\n\
         - Clarity Score: {clarity}/100\n\
         - Completeness Score: {completeness}/100\n\
         - Escalation Risk: {escalation}/100\n\n\
         ## Completed Steps\n\
         {complete}\n\n\
         ## Remaining Steps\n\
         {pending}\n\n\
         ## Missing Required Items\n\
         {missing}\n\n\
         ## Documents To Gather\n\
         {documents}\n\n\
         ## Watchpoints\n\
         {warnings}\n\n\
         ## Advisor / Attorney Questions\n\
         {questions}\n\n\
         ## Source Context\n\
         {citations}\n",
        session_id = session.session_id,
        created_at = session
            .created_at
            .to_rfc3339_opts(SecondsFormat::Secs, true),
        flow_id = if session.selected_flow_id.is_empty() {
            "(unselected)"
        } else {
            &session.selected_flow_id
        },
        flow_title = if session.selected_flow_title.is_empty() {
            "(pending flow selection)"
        } else {
            &session.selected_flow_title
        },
        candidates = candidates,
        intent = session.intent,
        flags = flags,
        field_summary = field_summary,
        understanding = session.scores.understanding_score,
        clarity = session.scores.clarity_score,
        completeness = session.scores.completeness_score,
        escalation = session.scores.escalation_risk,
        complete = steps_as_markdown(&complete),
        pending = steps_as_markdown(&pending),
        missing = list_as_markdown(&session.missing_items),
        documents = list_as_markdown(pack.map_or(&[][..], |p| p.doc_requirements.as_slice())),
        warnings = list_as_markdown(pack.map_or(&[][..], |p| p.warnings.as_slice())),
        questions = list_as_markdown(&advisor_questions(session)),
        citations = citations,
    )
}

fn steps_as_markdown(steps: &[&WorkflowStep]) -> String {
    if steps.is_empty() {
        return "- None".to_string();
    }
    steps
        .iter()
        .map(|s| format!("- {}: {}", s.title, s.description))
        .collect::<Vec<_>>()
        .join("\n")
}

fn list_as_markdown(items: &[String]) -> String {
    if items.is_empty() {
        return "- None".to_string();
    }
    items
        .iter()
        .map(|i| format!("- {}", i))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Questions synthesized from the missing fields and flow identity
fn advisor_questions(session: &SessionState) -> Vec<String> {
    let mut questions = vec![
        "Which timeline assumptions in this packet need official confirmation?".to_string(),
        "Which unresolved items block next-step readiness?".to_string(),
    ];

    if session.selected_flow_id == "cap_gap_transition_prep" {
        questions
            .push("Can we validate petition-state timing and bridge assumptions?".to_string());
    }
    if session.scores.escalation_risk >= 65 {
        questions.push("Should this case be escalated to licensed legal counsel?".to_string());
    }
    if session.missing_items.iter().any(|m| m == "employer_name") {
        questions
            .push("Which employer details are mandatory before workflow handoff?".to_string());
    }
    if session.missing_items.iter().any(|m| m == "petition_status") {
        questions.push(
            "What petition documentation should be requested from employer or counsel?"
                .to_string(),
        );
    }

    questions
}

#[cfg(test)]
mod tests {
    use super::*;
    use visaflow_catalog::FlowCatalog;
    use visaflow_types::SessionProfile;

    fn cap_gap_session() -> SessionState {
        let mut session = SessionState::new(
            "cap gap planning for my H-1B transition",
            SessionProfile::default(),
        );
        session.selected_flow_id = "cap_gap_transition_prep".to_string();
        session.selected_flow_title = "Cap-Gap Transition Preparation".to_string();
        session.missing_items = vec!["petition_status".to_string()];
        session
    }

    #[test]
    fn packet_is_byte_identical_without_intervening_events() {
        let session = cap_gap_session();
        let catalog = FlowCatalog::new();
        let pack = catalog.get(&session.selected_flow_id);

        let first = build_advisor_packet(&session, pack);
        let second = build_advisor_packet(&session, pack);
        assert_eq!(first, second);
    }

    #[test]
    fn missing_petition_status_yields_the_verification_question() {
        let session = cap_gap_session();
        let catalog = FlowCatalog::new();

        let packet = build_advisor_packet(&session, catalog.get(&session.selected_flow_id));
        assert!(packet.contains("What petition documentation should be requested"));
        assert!(packet.contains("petition-state timing"));
        assert!(packet.contains("not legal advice"));
    }

    #[test]
    fn pack_documents_and_warnings_are_rendered() {
        let session = cap_gap_session();
        let catalog = FlowCatalog::new();

        let packet = build_advisor_packet(&session, catalog.get(&session.selected_flow_id));
        assert!(packet.contains("Petition receipt or approval notice"));
        assert!(packet.contains("Cap-gap coverage depends entirely on the petition state"));

        let bare = build_advisor_packet(&session, None);
        assert!(bare.contains("## Documents To Gather\n- None"));
    }
}
