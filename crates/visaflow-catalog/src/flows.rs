//! The five flow packs
//!
//! Declaration order matters: it is the stable tie-break for router
//! candidates and must not be reordered casually.

use visaflow_types::{FlowAppliesIf, FlowPack, FlowStepTemplate, FlowSummary};

/// Flow id of the orientation fallback offered when nothing matches
pub const FALLBACK_FLOW_ID: &str = "f1_work_basics";

/// Ordered, immutable collection of flow packs
#[derive(Clone, Debug)]
pub struct FlowCatalog {
    packs: Vec<FlowPack>,
}

impl Default for FlowCatalog {
    fn default() -> Self {
        Self::new()
    }
}

impl FlowCatalog {
    pub fn new() -> Self {
        Self {
            packs: vec![
                cpt_prep(),
                opt_initial_prep(),
                opt_stem_prep(),
                cap_gap_transition_prep(),
                f1_work_basics(),
            ],
        }
    }

    pub fn get(&self, flow_id: &str) -> Option<&FlowPack> {
        self.packs.iter().find(|p| p.flow_id == flow_id)
    }

    /// The orientation flow used when routing produces nothing convincing
    pub fn fallback(&self) -> &FlowPack {
        self.get(FALLBACK_FLOW_ID)
            .expect("catalog always declares the fallback flow")
    }

    /// Packs in declaration order
    pub fn list(&self) -> &[FlowPack] {
        &self.packs
    }

    pub fn summaries(&self) -> Vec<FlowSummary> {
        self.packs.iter().map(FlowSummary::from).collect()
    }
}

fn applies_if(keywords: &[&str], statuses: &[&str], stages: &[&str]) -> FlowAppliesIf {
    FlowAppliesIf {
        keywords_any: keywords.iter().map(|s| s.to_string()).collect(),
        status_any: statuses.iter().map(|s| s.to_string()).collect(),
        program_stage_any: stages.iter().map(|s| s.to_string()).collect(),
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn cpt_prep() -> FlowPack {
    FlowPack {
        flow_id: "cpt_prep".to_string(),
        title: "CPT Internship Preparation".to_string(),
        description: "Curricular Practical Training authorization for work while enrolled"
            .to_string(),
        applies_if: applies_if(
            &[
                "cpt",
                "internship",
                "curricular",
                "practical training",
                "co-op",
                "work while studying",
            ],
            &["cpt", "f1"],
            &["enrolled"],
        ),
        required_entities: strings(&[
            "school_name",
            "status_type",
            "program_stage",
            "employer_name",
            "employment_offer",
            "work_start_date",
        ]),
        steps: vec![
            FlowStepTemplate::new(
                "confirm_enrollment",
                "Confirm F-1 enrollment",
                "Verify active F-1 status and full-time enrollment at your school",
            )
            .with_required_fields(["school_name", "status_type"]),
            FlowStepTemplate::new(
                "verify_eligibility",
                "Verify CPT eligibility",
                "Check that you have completed one academic year and the internship is curricular",
            )
            .with_required_fields(["program_stage"])
            .with_dependencies(["confirm_enrollment"]),
            FlowStepTemplate::new(
                "collect_employer_details",
                "Collect employer details",
                "Gather the offer letter with employer name, dates, hours, and location",
            )
            .with_required_fields(["employer_name", "employment_offer"])
            .with_dependencies(["verify_eligibility"]),
            FlowStepTemplate::new(
                "register_qualifying_course",
                "Register the qualifying course",
                "Enroll in the internship course or co-op program that anchors CPT",
            )
            .with_dependencies(["verify_eligibility"]),
            FlowStepTemplate::new(
                "request_authorization",
                "Request CPT authorization",
                "Submit the CPT request to your DSO before the work start date",
            )
            .with_required_fields(["work_start_date"])
            .with_dependencies(["collect_employer_details", "register_qualifying_course"]),
            FlowStepTemplate::new(
                "confirm_i20_endorsement",
                "Confirm I-20 endorsement",
                "Receive the CPT-endorsed I-20 before the first day of work",
            )
            .with_dependencies(["request_authorization"]),
        ],
        doc_requirements: strings(&[
            "Signed offer letter with dates and hours",
            "Current I-20",
            "Enrollment verification",
        ]),
        common_confusions: strings(&["employer_details", "approval_before_work"]),
        check_ids: strings(&["cpt_start_rule", "cpt_scope_rule"]),
        warnings: strings(&["Working before the CPT-endorsed I-20 is issued is a status violation"]),
    }
}

fn opt_initial_prep() -> FlowPack {
    FlowPack {
        flow_id: "opt_initial_prep".to_string(),
        title: "Post-Completion OPT Preparation".to_string(),
        description: "Initial Optional Practical Training around program completion".to_string(),
        applies_if: applies_if(
            &[
                "opt",
                "optional practical training",
                "graduation",
                "graduating",
                "ead",
                "work after graduation",
            ],
            &["f1", "opt"],
            &["graduating", "graduated"],
        ),
        required_entities: strings(&[
            "school_name",
            "status_type",
            "program_stage",
            "graduation_date",
            "employment_offer",
        ]),
        steps: vec![
            FlowStepTemplate::new(
                "confirm_program_end",
                "Confirm program end date",
                "Pin down the official program completion date with your school",
            )
            .with_required_fields(["school_name", "graduation_date"]),
            FlowStepTemplate::new(
                "choose_filing_window",
                "Choose the filing window",
                "Place your application inside the 90-days-before to 60-days-after window",
            )
            .with_required_fields(["program_stage"])
            .with_dependencies(["confirm_program_end"]),
            FlowStepTemplate::new(
                "request_dso_recommendation",
                "Request DSO recommendation",
                "Ask your DSO to recommend OPT and issue the updated I-20",
            )
            .with_dependencies(["choose_filing_window"]),
            FlowStepTemplate::new(
                "prepare_application_packet",
                "Prepare the application packet",
                "Assemble the I-765, fee, photos, and supporting copies",
            )
            .with_required_fields(["status_type"])
            .with_dependencies(["request_dso_recommendation"]),
            FlowStepTemplate::new(
                "track_adjudication",
                "Track adjudication and EAD arrival",
                "Monitor the receipt notice and wait for the EAD before working",
            )
            .with_dependencies(["prepare_application_packet"]),
            FlowStepTemplate::new(
                "plan_employment_start",
                "Plan the employment start",
                "Align the requested start date with your offer and unemployment-day budget",
            )
            .with_required_fields(["employment_offer"])
            .with_dependencies(["track_adjudication"]),
        ],
        doc_requirements: strings(&[
            "OPT-recommended I-20",
            "Completed I-765",
            "Passport-style photos",
        ]),
        common_confusions: strings(&["timing_window", "pathway_confusion"]),
        check_ids: strings(&["opt_window_rule", "opt_unemployment_rule"]),
        warnings: strings(&["Filing outside the window forfeits the OPT opportunity"]),
    }
}

fn opt_stem_prep() -> FlowPack {
    FlowPack {
        flow_id: "opt_stem_prep".to_string(),
        title: "STEM OPT Extension Preparation".to_string(),
        description: "24-month STEM extension for eligible degrees and E-Verify employers"
            .to_string(),
        applies_if: applies_if(
            &["stem", "stem opt", "extension", "e-verify", "i-983", "training plan"],
            &["stem_opt", "opt"],
            &["working", "graduated"],
        ),
        required_entities: strings(&[
            "status_type",
            "employer_name",
            "employment_offer",
            "work_start_date",
        ]),
        steps: vec![
            FlowStepTemplate::new(
                "confirm_degree_eligibility",
                "Confirm degree eligibility",
                "Verify the degree CIP code qualifies for the STEM extension",
            )
            .with_required_fields(["status_type"]),
            FlowStepTemplate::new(
                "verify_everify_employer",
                "Verify E-Verify enrollment",
                "Confirm the employer participates in E-Verify and will supervise training",
            )
            .with_required_fields(["employer_name"])
            .with_dependencies(["confirm_degree_eligibility"]),
            FlowStepTemplate::new(
                "draft_training_plan",
                "Draft the I-983 training plan",
                "Complete the I-983 with your employer before the DSO recommendation",
            )
            .with_required_fields(["employment_offer"])
            .with_dependencies(["verify_everify_employer"]),
            FlowStepTemplate::new(
                "file_extension",
                "File the extension",
                "Submit the I-765 with the STEM-recommended I-20 before current OPT ends",
            )
            .with_required_fields(["work_start_date"])
            .with_dependencies(["draft_training_plan"]),
            FlowStepTemplate::new(
                "set_reporting_schedule",
                "Set the reporting schedule",
                "Calendar the six-month validation and annual self-evaluation reports",
            )
            .with_dependencies(["file_extension"]),
        ],
        doc_requirements: strings(&[
            "Completed I-983 training plan",
            "STEM-recommended I-20",
            "Degree evidence with CIP code",
        ]),
        common_confusions: strings(&["employer_compliance"]),
        check_ids: strings(&["stem_everify_rule"]),
        warnings: strings(&["A lapsed filing ends work authorization when current OPT expires"]),
    }
}

fn cap_gap_transition_prep() -> FlowPack {
    FlowPack {
        flow_id: "cap_gap_transition_prep".to_string(),
        title: "Cap-Gap Transition Preparation".to_string(),
        description: "Status bridge between F-1 work authorization and an H-1B start".to_string(),
        applies_if: applies_if(
            &[
                "h1b",
                "h-1b",
                "cap gap",
                "cap-gap",
                "transition",
                "petition",
                "change of status",
            ],
            &["h1b", "cap_gap", "opt", "stem_opt"],
            &["working"],
        ),
        required_entities: strings(&[
            "status_type",
            "petition_status",
            "employer_name",
            "work_end_date",
        ]),
        steps: vec![
            FlowStepTemplate::new(
                "confirm_current_authorization",
                "Confirm current authorization",
                "Identify the F-1 work authorization you hold today and its end date",
            )
            .with_required_fields(["status_type"]),
            FlowStepTemplate::new(
                "verify_petition_state",
                "Verify petition state",
                "Confirm with the employer whether the H-1B petition is filed, pending, or approved",
            )
            .with_required_fields(["petition_status"])
            .with_dependencies(["confirm_current_authorization"]),
            FlowStepTemplate::new(
                "map_bridge_timeline",
                "Map the bridge timeline",
                "Lay out authorization end, cap-gap coverage, and the October start",
            )
            .with_required_fields(["work_end_date"])
            .with_dependencies(["verify_petition_state"]),
            FlowStepTemplate::new(
                "employer_verification",
                "Verify employer commitments",
                "Document who is tracking the petition and who updates you on RFEs",
            )
            .with_required_fields(["employer_name"])
            .with_dependencies(["confirm_current_authorization"]),
            FlowStepTemplate::new(
                "prepare_advisor_handoff",
                "Prepare the advisor handoff",
                "Package the timeline and open petition questions for your DSO or counsel",
            )
            .with_dependencies(["map_bridge_timeline", "employer_verification"]),
        ],
        doc_requirements: strings(&[
            "Cap-gap I-20 once the petition is filed",
            "Petition receipt or approval notice",
            "Current EAD",
        ]),
        common_confusions: strings(&["status_bridge", "petition_state"]),
        check_ids: strings(&["cap_gap_bridge_rule"]),
        warnings: strings(&[
            "Cap-gap coverage depends entirely on the petition state; verify it before planning",
        ]),
    }
}

fn f1_work_basics() -> FlowPack {
    FlowPack {
        flow_id: FALLBACK_FLOW_ID.to_string(),
        title: "F-1 Work Authorization Basics".to_string(),
        description: "Orientation across on-campus work, CPT, and OPT pathways".to_string(),
        applies_if: applies_if(
            &["f1", "f-1", "work", "job", "employment", "on-campus", "allowed"],
            &["f1"],
            &["enrolled"],
        ),
        required_entities: strings(&["school_name", "status_type", "program_stage"]),
        steps: vec![
            FlowStepTemplate::new(
                "confirm_status",
                "Confirm your status",
                "Establish your current visa status and school",
            )
            .with_required_fields(["status_type", "school_name"]),
            FlowStepTemplate::new(
                "learn_work_categories",
                "Learn the work categories",
                "Understand on-campus work, CPT, and OPT and when each applies",
            )
            .with_dependencies(["confirm_status"]),
            FlowStepTemplate::new(
                "identify_goal",
                "Identify your goal",
                "Clarify whether you want work during the program or after completion",
            )
            .with_required_fields(["program_stage"])
            .with_dependencies(["learn_work_categories"]),
            FlowStepTemplate::new(
                "pick_specialized_flow",
                "Pick the specialized flow",
                "Move into the CPT, OPT, or transition preparation track that fits",
            )
            .with_dependencies(["identify_goal"]),
        ],
        doc_requirements: strings(&["Current I-20", "Passport and visa stamp"]),
        common_confusions: strings(&["pathway_confusion"]),
        check_ids: strings(&["f1_oncampus_rule", "cpt_opt_difference"]),
        warnings: Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_declares_five_flows_with_fallback_last() {
        let catalog = FlowCatalog::new();
        let ids: Vec<_> = catalog.list().iter().map(|p| p.flow_id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "cpt_prep",
                "opt_initial_prep",
                "opt_stem_prep",
                "cap_gap_transition_prep",
                "f1_work_basics",
            ]
        );
        assert_eq!(catalog.fallback().flow_id, FALLBACK_FLOW_ID);
    }

    #[test]
    fn step_dependencies_reference_declared_steps() {
        let catalog = FlowCatalog::new();
        for pack in catalog.list() {
            let ids: Vec<_> = pack.steps.iter().map(|s| s.step_id.as_str()).collect();
            for step in &pack.steps {
                for dep in &step.dependencies {
                    assert!(
                        ids.contains(&dep.as_str()),
                        "{}: step {} depends on undeclared {}",
                        pack.flow_id,
                        step.step_id,
                        dep
                    );
                }
            }
        }
    }

    #[test]
    fn cpt_flow_has_at_least_five_steps() {
        let catalog = FlowCatalog::new();
        assert!(catalog.get("cpt_prep").unwrap().steps.len() >= 5);
    }

}
