//! Session engine facade
//!
//! The single entry point the service layer calls. Every operation
//! validates its input before touching the session, applies the
//! mutation, then re-settles the derived state in a fixed order: step
//! statuses, graph projection, missing items, completeness, streak,
//! escalation, mode adaptation.

use crate::{adaptation, checks, graph, knowledge, packet, router, scoring};
use serde_json::Value;
use std::collections::BTreeMap;
use visaflow_catalog::{CheckBank, FlowCatalog};
use visaflow_types::{
    EngineError, EngineResult, EventType, InterfaceMode, MicroCheckResult, MicroCheckView,
    SessionProfile, SessionState, StepStatus, UiMutation, UserEvent,
};

/// Intents shorter than this cannot route meaningfully
pub const MIN_INTENT_CHARS: usize = 10;
/// Hard ceiling on intent length
pub const MAX_INTENT_CHARS: usize = 5000;

/// Citations attached when a flow is selected
const CITATIONS_PER_FLOW: usize = 5;

/// Request to open a new session
#[derive(Clone, Debug, serde::Deserialize)]
pub struct StartSessionRequest {
    pub intent: String,
    #[serde(default)]
    pub profile: SessionProfile,
    #[serde(default)]
    pub initial_fields: BTreeMap<String, String>,
}

/// Everything the caller needs after opening a session
#[derive(Clone, Debug)]
pub struct StartOutcome {
    pub session: SessionState,
    pub micro_checks: Vec<MicroCheckView>,
    pub mutation: UiMutation,
}

/// Stateless engine over the immutable catalog and check bank. Sessions
/// are owned by the caller's store; the engine only borrows them.
pub struct SessionEngine {
    catalog: FlowCatalog,
    bank: CheckBank,
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEngine {
    pub fn new() -> Self {
        Self {
            catalog: FlowCatalog::new(),
            bank: CheckBank::new(),
        }
    }

    pub fn catalog(&self) -> &FlowCatalog {
        &self.catalog
    }

    /// Open a session: validate the intent, route it, and either
    /// auto-select the dominant flow or raise a disambiguation card.
    pub fn start_session(&self, request: StartSessionRequest) -> EngineResult<StartOutcome> {
        let intent = request.intent.trim();
        let chars = intent.chars().count();
        if chars < MIN_INTENT_CHARS {
            return Err(EngineError::Validation(format!(
                "intent must be at least {MIN_INTENT_CHARS} characters"
            )));
        }
        if chars > MAX_INTENT_CHARS {
            return Err(EngineError::Validation(format!(
                "intent must be at most {MAX_INTENT_CHARS} characters"
            )));
        }

        let mut session = SessionState::new(intent, request.profile);
        for (key, value) in request.initial_fields {
            let key = key.trim().to_string();
            let value = value.trim().to_string();
            if !key.is_empty() && !value.is_empty() {
                session.fields.insert(key, value);
            }
        }

        self.route(&mut session)?;
        self.settle_derived_state(&mut session);
        let mutation = self.finish_event(&mut session);

        tracing::info!(
            session_id = %session.session_id,
            flow = %session.selected_flow_id,
            candidates = session.candidate_flows.len(),
            "session opened"
        );

        let micro_checks = self.available_check_views(&session);
        Ok(StartOutcome {
            session,
            micro_checks,
            mutation,
        })
    }

    /// Apply one user event. Validation and existence checks happen
    /// before any session mutation; rejected events leave the session
    /// untouched and unjournaled.
    pub fn apply_event(
        &self,
        session: &mut SessionState,
        event_type: &str,
        payload: &Value,
    ) -> EngineResult<UiMutation> {
        let event = EventType::parse(event_type).ok_or_else(|| {
            EngineError::UnsupportedEvent(format!("unsupported event type: {event_type}"))
        })?;

        match event {
            EventType::FieldUpdate => {
                self.apply_field_update(session, payload)?;
                // Field changes shift the ranking; the selection and any
                // open card stay until the user resolves them
                let outcome = router::rank(&self.catalog, &session.intent, &session.fields);
                session.candidate_flows = outcome.candidates;
                session.ambiguity_flags = outcome.ambiguity_flags;
                match session.disambiguation_card {
                    Some(_) => {
                        session.disambiguation_card =
                            Some(router::disambiguation_card(&session.candidate_flows));
                    }
                    None => {
                        session
                            .ambiguity_flags
                            .retain(|f| *f != visaflow_types::AmbiguityFlag::TopFlowsClose);
                    }
                }
            }
            EventType::SelectFlow => {
                let flow_id = require_string(payload, "flow_id")?;
                if self.catalog.get(&flow_id).is_none() {
                    return Err(EngineError::NotFound(format!("unknown flow id: {flow_id}")));
                }
                // Re-selection is a no-op that still recomputes candidates
                let outcome = router::rank(&self.catalog, &session.intent, &session.fields);
                session.candidate_flows = outcome.candidates;
                session.ambiguity_flags = outcome.ambiguity_flags;
                self.select_flow(session, &flow_id)?;
            }
            EventType::ModeChange => {
                let mode = require_string(payload, "mode")?;
                let mode = InterfaceMode::parse(&mode)
                    .ok_or_else(|| EngineError::Validation(format!("unknown mode: {mode}")))?;
                session.manual_mode = Some(mode);
            }
            EventType::MarkStep => {
                let step_id = require_string(payload, "step_id")?;
                graph::set_step_status(&mut session.workflow, &step_id, StepStatus::Complete)?;
            }
            EventType::UnmarkStep | EventType::StepReopen => {
                let step_id = require_string(payload, "step_id")?;
                graph::set_step_status(&mut session.workflow, &step_id, StepStatus::Pending)?;
            }
            EventType::Inactivity => {
                session
                    .scores
                    .adjust_understanding(scoring::INACTIVITY_UNDERSTANDING_PENALTY);
                session
                    .scores
                    .adjust_clarity(scoring::INACTIVITY_CLARITY_PENALTY);
            }
            EventType::AskHelp => {
                session
                    .scores
                    .adjust_understanding(scoring::ASK_HELP_UNDERSTANDING_PENALTY);
                session
                    .scores
                    .adjust_clarity(scoring::ASK_HELP_CLARITY_PENALTY);
            }
        }

        session.events.push(UserEvent::new(event, payload.clone()));
        self.settle_derived_state(session);
        Ok(self.finish_event(session))
    }

    /// Grade an answer against the currently available checks, record
    /// the result, and feed it back into the scores. Re-answering the
    /// same check overwrites the previous result.
    pub fn answer_micro_check(
        &self,
        session: &mut SessionState,
        check_id: &str,
        selected_option: &str,
    ) -> EngineResult<(MicroCheckResult, UiMutation)> {
        let available = checks::available_checks(session, &self.catalog, &self.bank);
        let result = checks::evaluate_answer(&available, check_id, selected_option)?;

        // Answering the disambiguation check is a flow selection
        if check_id == checks::DISAMBIGUATION_CHECK_ID {
            if let Some((flow_id, _)) = selected_option.split_once('|') {
                self.select_flow(session, flow_id)?;
            }
        }

        if result.is_correct {
            session
                .scores
                .adjust_understanding(scoring::CHECK_CORRECT_UNDERSTANDING_REWARD);
            session
                .scores
                .adjust_clarity(scoring::CHECK_CORRECT_CLARITY_REWARD);
        } else {
            session
                .scores
                .adjust_understanding(scoring::CHECK_INCORRECT_UNDERSTANDING_PENALTY);
            session
                .scores
                .adjust_clarity(scoring::CHECK_INCORRECT_CLARITY_PENALTY);
        }

        session
            .micro_checks
            .insert(result.check_id.clone(), result.clone());

        self.settle_derived_state(session);
        let mutation = self.finish_event(session);
        Ok((result, mutation))
    }

    /// Render and cache the advisor packet. A pure read of the session
    /// snapshot: repeated calls with no intervening event return the
    /// same bytes and do not bump `updated_at`.
    pub fn build_packet(&self, session: &mut SessionState) -> String {
        let pack = self.catalog.get(&session.selected_flow_id);
        let markdown = packet::build_advisor_packet(session, pack);
        session.advisor_packet_markdown = Some(markdown.clone());
        markdown
    }

    /// Client-safe views of the checks available right now
    pub fn available_check_views(&self, session: &SessionState) -> Vec<MicroCheckView> {
        checks::available_checks(session, &self.catalog, &self.bank)
            .iter()
            .map(MicroCheckView::from)
            .collect()
    }

    fn apply_field_update(&self, session: &mut SessionState, payload: &Value) -> EngineResult<()> {
        let field = require_string(payload, "field")?;
        // An empty value is a valid clear; only the key is mandatory
        let value = payload
            .get("value")
            .and_then(Value::as_str)
            .ok_or_else(|| {
                EngineError::Validation("missing required string field `value`".to_string())
            })?;

        session.fields.insert(field, value.trim().to_string());
        Ok(())
    }

    /// Rank the catalog against the fresh session and commit the
    /// routing outcome: either a selected flow or an open card.
    fn route(&self, session: &mut SessionState) -> EngineResult<()> {
        let outcome = router::rank(&self.catalog, &session.intent, &session.fields);

        // Inferred signals back-fill fields; explicit values stay put
        for (key, value) in &outcome.inferred_fields {
            session
                .fields
                .entry(key.clone())
                .or_insert_with(|| value.clone());
        }
        session.candidate_flows = outcome.candidates.clone();
        session.ambiguity_flags = outcome.ambiguity_flags.clone();

        match router::decide(&outcome) {
            router::RouteDecision::AutoSelect(flow_id) => self.select_flow(session, &flow_id),
            router::RouteDecision::Disambiguate(card) => {
                session.disambiguation_card = Some(card);
                Ok(())
            }
        }
    }

    /// Commit a flow selection. Idempotent for the already-selected
    /// flow; switching flows re-instantiates the workflow from the new
    /// template. Resolves any open disambiguation.
    fn select_flow(&self, session: &mut SessionState, flow_id: &str) -> EngineResult<()> {
        let pack = self
            .catalog
            .get(flow_id)
            .ok_or_else(|| EngineError::NotFound(format!("unknown flow id: {flow_id}")))?;

        if session.selected_flow_id != pack.flow_id {
            session.selected_flow_id = pack.flow_id.clone();
            session.selected_flow_title = pack.title.clone();
            session.required_entities = pack.required_entities.clone();
            session.active_check_ids = pack.check_ids.clone();
            session.workflow = graph::instantiate_workflow(pack);
            let query = knowledge::citation_query(&session.intent, pack);
            session.citations = knowledge::retrieve(&query, &pack.flow_id, CITATIONS_PER_FLOW);
        }

        session.disambiguation_card = None;
        session
            .ambiguity_flags
            .retain(|f| *f != visaflow_types::AmbiguityFlag::TopFlowsClose);
        Ok(())
    }

    /// Re-settle everything derived from the workflow and fields
    fn settle_derived_state(&self, session: &mut SessionState) {
        graph::refresh_statuses(&mut session.workflow);
        session.case_graph =
            graph::project_case_graph(&session.selected_flow_id, &session.workflow);
        session.missing_items = scoring::missing_items(&session.workflow, &session.fields);
        session.scores.completeness_score =
            scoring::completeness_score(&session.workflow, &session.fields);
        scoring::update_low_completeness_streak(session);
        session.scores.escalation_risk = scoring::recompute_escalation(session);
    }

    /// Adapt the mode, settle the understanding watermark, and stamp the
    /// session. The watermark holds across gradual declines so repeated
    /// small penalties accumulate toward the drop threshold; it resets
    /// once the drop rule fires or understanding recovers.
    fn finish_event(&self, session: &mut SessionState) -> UiMutation {
        let mutation = adaptation::adapt(session);
        if session.scores.understanding_score >= session.previous_understanding
            || mutation.reason == visaflow_types::AdaptationReason::UnderstandingDropped
        {
            session.previous_understanding = session.scores.understanding_score;
        }
        session.touch();
        mutation
    }
}

fn require_string(payload: &Value, key: &str) -> EngineResult<String> {
    payload
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| EngineError::Validation(format!("missing required string field `{key}`")))
}
