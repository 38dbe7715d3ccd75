//! Shared micro-check bank
//!
//! Flow packs reference these by id. Dynamic checks (missing-item,
//! disambiguation) are synthesized by the engine, not stored here.

use visaflow_types::MicroCheck;

/// Immutable lookup over the shared quiz items
#[derive(Clone, Debug)]
pub struct CheckBank {
    checks: Vec<MicroCheck>,
}

impl Default for CheckBank {
    fn default() -> Self {
        Self::new()
    }
}

impl CheckBank {
    pub fn new() -> Self {
        Self {
            checks: bank(),
        }
    }

    pub fn get(&self, check_id: &str) -> Option<&MicroCheck> {
        self.checks.iter().find(|c| c.check_id == check_id)
    }
}

fn opts(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

fn bank() -> Vec<MicroCheck> {
    vec![
        MicroCheck::new(
            "cpt_start_rule",
            "When can you start working on CPT?",
            opts(&[
                "After the CPT-endorsed I-20 is issued",
                "As soon as the employer signs the offer",
                "On the day you submit the DSO request",
            ]),
            "After the CPT-endorsed I-20 is issued",
            "CPT authorization exists only once the endorsed I-20 is in hand.",
        ),
        MicroCheck::new(
            "cpt_scope_rule",
            "What does a CPT authorization cover?",
            opts(&[
                "One specific employer, role, and date range",
                "Any internship during the degree",
                "All part-time work under 20 hours",
            ]),
            "One specific employer, role, and date range",
            "Each CPT grant is employer- and date-specific; a new role needs a new authorization.",
        ),
        MicroCheck::new(
            "opt_window_rule",
            "When can you file the initial OPT application?",
            opts(&[
                "From 90 days before to 60 days after the program end date",
                "Only after graduation",
                "Any time while the I-20 is valid",
            ]),
            "From 90 days before to 60 days after the program end date",
            "The filing window is anchored to the program end date on the I-20.",
        ),
        MicroCheck::new(
            "opt_unemployment_rule",
            "How many unemployment days does initial OPT allow?",
            opts(&["90", "60", "180"]),
            "90",
            "Initial post-completion OPT carries a 90-day aggregate unemployment budget.",
        ),
        MicroCheck::new(
            "stem_everify_rule",
            "What must a STEM OPT employer have?",
            opts(&[
                "E-Verify enrollment and a signed I-983 training plan",
                "At least 50 employees",
                "A government contract",
            ]),
            "E-Verify enrollment and a signed I-983 training plan",
            "The STEM extension requires an E-Verify employer and the I-983 plan.",
        ),
        MicroCheck::new(
            "cap_gap_bridge_rule",
            "What extends work authorization during the cap gap?",
            opts(&[
                "A timely filed H-1B petition with change of status",
                "The job offer by itself",
                "An expired EAD plus employer letter",
            ]),
            "A timely filed H-1B petition with change of status",
            "Cap-gap coverage attaches to the timely filed petition, not the offer.",
        ),
        MicroCheck::new(
            "f1_oncampus_rule",
            "How many hours of on-campus work does F-1 allow during the semester?",
            opts(&["20 per week", "40 per week", "Unlimited"]),
            "20 per week",
            "On-campus work is capped at 20 hours per week while school is in session.",
        ),
        MicroCheck::new(
            "cpt_opt_difference",
            "What is the core difference between CPT and OPT?",
            opts(&[
                "CPT is curricular and happens during the program; OPT is optional and usually after",
                "CPT pays more than OPT",
                "OPT requires a co-op course",
            ]),
            "CPT is curricular and happens during the program; OPT is optional and usually after",
            "CPT ties to the curriculum while enrolled; OPT is independent practical training.",
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::FlowCatalog;

    #[test]
    fn every_flow_check_id_resolves() {
        let bank = CheckBank::new();
        for pack in FlowCatalog::new().list() {
            for id in &pack.check_ids {
                assert!(bank.get(id).is_some(), "unresolved check id {}", id);
            }
        }
    }

    #[test]
    fn correct_option_is_always_listed() {
        let bank = CheckBank::new();
        for check in &bank.checks {
            assert!(check.options.contains(&check.correct_option));
        }
    }
}
