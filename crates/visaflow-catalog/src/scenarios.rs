//! Demo scenario presets served by `list_scenarios`

use std::collections::BTreeMap;
use visaflow_types::Scenario;

fn fields(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

/// Static scenario catalog, no session attached
pub fn demo_scenarios() -> Vec<Scenario> {
    vec![
        Scenario {
            scenario_id: "cpt_internship_soon".to_string(),
            label: "CPT internship starting soon".to_string(),
            intent: "I'm on CPT and start my internship in 3 weeks".to_string(),
            initial_fields: fields(&[("status_type", "cpt"), ("program_stage", "enrolled")]),
        },
        Scenario {
            scenario_id: "opt_before_graduation".to_string(),
            label: "Graduating and planning OPT".to_string(),
            intent: "I graduate in May and want to work afterwards on OPT".to_string(),
            initial_fields: fields(&[("program_stage", "graduating")]),
        },
        Scenario {
            scenario_id: "stem_extension_window".to_string(),
            label: "STEM extension while working".to_string(),
            intent: "My OPT ends in a few months and I want the STEM extension".to_string(),
            initial_fields: fields(&[("status_type", "stem_opt"), ("program_stage", "working")]),
        },
        Scenario {
            scenario_id: "cap_gap_pending_petition".to_string(),
            label: "Cap-gap with petition in flight".to_string(),
            intent: "My employer filed my H-1B and my OPT ends before October".to_string(),
            initial_fields: fields(&[("status_type", "opt"), ("petition_status", "filed")]),
        },
        Scenario {
            scenario_id: "f1_general_question".to_string(),
            label: "General F-1 work question".to_string(),
            intent: "I'm an F-1 student and not sure what work I'm allowed to do".to_string(),
            initial_fields: BTreeMap::new(),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scenario_ids_are_unique() {
        let scenarios = demo_scenarios();
        let mut ids: Vec<_> = scenarios.iter().map(|s| s.scenario_id.clone()).collect();
        let len = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), len);
    }
}
