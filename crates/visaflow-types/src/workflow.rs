//! Instantiated workflow steps and the case-graph projection

use crate::{FlowStepTemplate, StepStatus};
use serde::{Deserialize, Serialize};

/// One step of the per-session workflow graph.
///
/// Created fresh when a flow is selected; mutated only by
/// mark/unmark/reopen events and the status refresh that follows them.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowStep {
    pub step_id: String,
    pub title: String,
    pub description: String,
    pub node_type: String,
    pub required_fields: Vec<String>,
    pub dependencies: Vec<String>,
    pub status: StepStatus,
}

impl WorkflowStep {
    /// Instantiate a step from its flow template; every step starts pending
    pub fn from_template(template: &FlowStepTemplate) -> Self {
        Self {
            step_id: template.step_id.clone(),
            title: template.title.clone(),
            description: template.description.clone(),
            node_type: template.node_type.clone(),
            required_fields: template.required_fields.clone(),
            dependencies: template.dependencies.clone(),
            status: StepStatus::Pending,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.status == StepStatus::Complete
    }
}

/// Read-only node of the case-graph projection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaseGraphNode {
    pub node_id: String,
    pub node_type: String,
    pub title: String,
    pub status: StepStatus,
}

/// Dependency edge of the case-graph projection
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaseGraphEdge {
    pub edge_id: String,
    pub from_node: String,
    pub to_node: String,
    pub edge_type: String,
}

impl CaseGraphEdge {
    pub fn dependency(from_node: impl Into<String>, to_node: impl Into<String>) -> Self {
        let from_node = from_node.into();
        let to_node = to_node.into();
        Self {
            edge_id: format!("{}->{}", from_node, to_node),
            from_node,
            to_node,
            edge_type: "dependency".to_string(),
        }
    }
}

/// Nodes/edges view of the workflow, regenerated after every step mutation
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct CaseGraph {
    pub flow_id: String,
    pub nodes: Vec<CaseGraphNode>,
    pub edges: Vec<CaseGraphEdge>,
}
