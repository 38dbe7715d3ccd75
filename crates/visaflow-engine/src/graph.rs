//! Workflow graph builder
//!
//! Instantiates the selected flow's step templates into a per-session
//! dependency graph and keeps step statuses settled after every mutation.
//! `blocked` is advisory: it flags unmet dependencies for guidance but
//! never prevents a direct `mark_step`.

use std::collections::HashMap;
use visaflow_types::{
    CaseGraph, CaseGraphEdge, CaseGraphNode, EngineError, EngineResult, FlowPack, StepStatus,
    WorkflowStep,
};

/// Fresh step list from a flow template; every step starts pending
pub fn instantiate_workflow(pack: &FlowPack) -> Vec<WorkflowStep> {
    pack.steps.iter().map(WorkflowStep::from_template).collect()
}

/// Set one step's status directly. Unknown ids are rejected before any
/// mutation.
pub fn set_step_status(
    workflow: &mut [WorkflowStep],
    step_id: &str,
    status: StepStatus,
) -> EngineResult<()> {
    let step = workflow
        .iter_mut()
        .find(|s| s.step_id == step_id)
        .ok_or_else(|| EngineError::NotFound(format!("unknown step id: {step_id}")))?;
    step.status = status;
    Ok(())
}

/// Re-settle every non-complete step: `blocked` iff at least one
/// dependency is not complete, otherwise `pending`. Completed steps are
/// left alone.
pub fn refresh_statuses(workflow: &mut [WorkflowStep]) {
    // id → completion, built once for O(1) dependency lookups
    let completion: HashMap<&str, bool> = workflow
        .iter()
        .map(|s| (s.step_id.as_str(), s.is_complete()))
        .collect();

    let blocked: Vec<bool> = workflow
        .iter()
        .map(|step| {
            !step.is_complete()
                && step
                    .dependencies
                    .iter()
                    .any(|dep| !completion.get(dep.as_str()).copied().unwrap_or(false))
        })
        .collect();

    for (step, is_blocked) in workflow.iter_mut().zip(blocked) {
        if step.is_complete() {
            continue;
        }
        step.status = if is_blocked {
            StepStatus::Blocked
        } else {
            StepStatus::Pending
        };
    }
}

/// Read-only nodes/edges projection of the workflow
pub fn project_case_graph(flow_id: &str, workflow: &[WorkflowStep]) -> CaseGraph {
    let nodes = workflow
        .iter()
        .map(|step| CaseGraphNode {
            node_id: step.step_id.clone(),
            node_type: step.node_type.clone(),
            title: step.title.clone(),
            status: step.status,
        })
        .collect();

    let edges = workflow
        .iter()
        .flat_map(|step| {
            step.dependencies
                .iter()
                .map(|dep| CaseGraphEdge::dependency(dep.clone(), step.step_id.clone()))
        })
        .collect();

    CaseGraph {
        flow_id: flow_id.to_string(),
        nodes,
        edges,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use visaflow_catalog::FlowCatalog;

    fn cpt_workflow() -> Vec<WorkflowStep> {
        instantiate_workflow(FlowCatalog::new().get("cpt_prep").unwrap())
    }

    #[test]
    fn fresh_workflow_marks_dependent_steps_blocked() {
        let mut workflow = cpt_workflow();
        refresh_statuses(&mut workflow);

        let by_id: HashMap<_, _> = workflow
            .iter()
            .map(|s| (s.step_id.as_str(), s.status))
            .collect();
        assert_eq!(by_id["confirm_enrollment"], StepStatus::Pending);
        assert_eq!(by_id["verify_eligibility"], StepStatus::Blocked);
        assert_eq!(by_id["request_authorization"], StepStatus::Blocked);
    }

    #[test]
    fn completing_dependencies_unblocks_downstream_steps() {
        let mut workflow = cpt_workflow();
        set_step_status(&mut workflow, "confirm_enrollment", StepStatus::Complete).unwrap();
        refresh_statuses(&mut workflow);

        let verify = workflow
            .iter()
            .find(|s| s.step_id == "verify_eligibility")
            .unwrap();
        assert_eq!(verify.status, StepStatus::Pending);
    }

    #[test]
    fn blocked_step_can_still_be_marked_complete() {
        let mut workflow = cpt_workflow();
        refresh_statuses(&mut workflow);
        // request_authorization is blocked but marking is advisory-only
        set_step_status(&mut workflow, "request_authorization", StepStatus::Complete).unwrap();
        refresh_statuses(&mut workflow);

        let step = workflow
            .iter()
            .find(|s| s.step_id == "request_authorization")
            .unwrap();
        assert_eq!(step.status, StepStatus::Complete);
    }

    #[test]
    fn mark_then_unmark_round_trips_to_pending() {
        let mut workflow = cpt_workflow();
        set_step_status(&mut workflow, "confirm_enrollment", StepStatus::Complete).unwrap();
        refresh_statuses(&mut workflow);
        set_step_status(&mut workflow, "confirm_enrollment", StepStatus::Pending).unwrap();
        refresh_statuses(&mut workflow);

        let step = workflow
            .iter()
            .find(|s| s.step_id == "confirm_enrollment")
            .unwrap();
        assert_eq!(step.status, StepStatus::Pending);
    }

    #[test]
    fn unknown_step_is_rejected_without_mutation() {
        let mut workflow = cpt_workflow();
        let before: Vec<_> = workflow.iter().map(|s| s.status).collect();
        let err = set_step_status(&mut workflow, "nonexistent", StepStatus::Complete).unwrap_err();
        assert!(matches!(err, EngineError::NotFound(_)));
        let after: Vec<_> = workflow.iter().map(|s| s.status).collect();
        assert_eq!(before, after);
    }

    #[test]
    fn case_graph_projects_every_dependency_edge() {
        let mut workflow = cpt_workflow();
        refresh_statuses(&mut workflow);
        let graph = project_case_graph("cpt_prep", &workflow);

        assert_eq!(graph.nodes.len(), workflow.len());
        let expected_edges: usize = workflow.iter().map(|s| s.dependencies.len()).sum();
        assert_eq!(graph.edges.len(), expected_edges);
        assert!(graph
            .edges
            .iter()
            .any(|e| e.from_node == "verify_eligibility" && e.to_node == "collect_employer_details"));
    }
}
