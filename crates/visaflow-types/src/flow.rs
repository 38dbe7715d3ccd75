//! Flow packs: immutable catalog entries
//!
//! A flow pack declares one visa-process track — its workflow step
//! templates, routing signals, document requirements, and the micro-checks
//! that apply to it. Packs are built once at process start and never
//! mutated; catalog declaration order is the stable tie-break for router
//! candidates.

use serde::{Deserialize, Serialize};

/// Routing signals: the evidence that makes a flow applicable
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FlowAppliesIf {
    /// Intent keywords (single tokens matched per-token, phrases matched
    /// as substrings)
    pub keywords_any: Vec<String>,
    /// `status_type` values that imply this flow
    pub status_any: Vec<String>,
    /// `program_stage` values that imply this flow
    pub program_stage_any: Vec<String>,
}

/// Template for one workflow step, instantiated per session
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowStepTemplate {
    pub step_id: String,
    pub title: String,
    pub description: String,
    pub node_type: String,
    pub required_fields: Vec<String>,
    pub dependencies: Vec<String>,
}

impl FlowStepTemplate {
    pub fn new(
        step_id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            step_id: step_id.into(),
            title: title.into(),
            description: description.into(),
            node_type: "structured_form".to_string(),
            required_fields: Vec::new(),
            dependencies: Vec::new(),
        }
    }

    pub fn with_node_type(mut self, node_type: impl Into<String>) -> Self {
        self.node_type = node_type.into();
        self
    }

    pub fn with_required_fields<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required_fields = fields.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_dependencies<I, S>(mut self, deps: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = deps.into_iter().map(Into::into).collect();
        self
    }
}

/// One immutable catalog entry
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowPack {
    pub flow_id: String,
    pub title: String,
    pub description: String,
    pub applies_if: FlowAppliesIf,
    /// Fields the flow needs before it is advisor-ready
    pub required_entities: Vec<String>,
    pub steps: Vec<FlowStepTemplate>,
    pub doc_requirements: Vec<String>,
    /// Confusion labels feeding the scorer's flow-specific weighting
    pub common_confusions: Vec<String>,
    /// Micro-check ids from the shared bank that apply to this flow
    pub check_ids: Vec<String>,
    pub warnings: Vec<String>,
}

/// Summary view exposed by `list_flows`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowSummary {
    pub flow_id: String,
    pub title: String,
    pub description: String,
}

impl From<&FlowPack> for FlowSummary {
    fn from(pack: &FlowPack) -> Self {
        Self {
            flow_id: pack.flow_id.clone(),
            title: pack.title.clone(),
            description: pack.description.clone(),
        }
    }
}

/// A ranked router candidate; recomputed per event, never persisted across
/// flow changes beyond the current response
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FlowCandidate {
    pub flow_id: String,
    pub title: String,
    /// Match confidence, 0–100
    pub score: u8,
    /// Short rationale built from the matched signals
    pub reason: String,
}

/// Raised when intent/field evidence does not clearly favor one flow.
/// Cleared once the user resolves it with a `select_flow` event.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DisambiguationCard {
    pub prompt: String,
    /// Each option is `"flow_id|label"`
    pub options: Vec<String>,
}

/// Router ambiguity signals carried on the session
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AmbiguityFlag {
    /// Top two candidates within the closeness threshold
    TopFlowsClose,
    /// CPT and OPT both plausible with no program stage to split them
    CptOptOverlap,
    /// Nothing scored above the minimum; fallback flow offered
    NoDirectMatch,
    /// Best candidate scored below the confidence bar
    LowConfidenceRoute,
    StatusUnclear,
    ProgramStageUnclear,
}

/// Static citation attached on flow selection. Content sourcing is a
/// deployment concern; the engine only carries the reference.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Citation {
    pub source_id: String,
    pub title: String,
    pub url: String,
    pub snippet: String,
}

/// One demo scenario preset
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Scenario {
    pub scenario_id: String,
    pub label: String,
    pub intent: String,
    #[serde(default)]
    pub initial_fields: std::collections::BTreeMap<String, String>,
}
