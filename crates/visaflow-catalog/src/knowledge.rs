//! Built-in citation source index
//!
//! Content sourcing is out of scope for the engine; this index carries the
//! references it attaches on flow selection. Retrieval scoring lives in the
//! engine crate.

/// One indexed source document
#[derive(Clone, Debug)]
pub struct SourceEntry {
    pub source_id: &'static str,
    pub title: &'static str,
    pub url: &'static str,
    /// Flow ids this source is tagged for
    pub flows: &'static [&'static str],
    pub text: &'static str,
}

/// The static source index, in stable order
pub fn source_index() -> &'static [SourceEntry] {
    SOURCES
}

static SOURCES: &[SourceEntry] = &[
    SourceEntry {
        source_id: "uscis_cpt_overview",
        title: "Curricular Practical Training Overview",
        url: "https://www.uscis.gov/working-in-the-united-states/students-and-exchange-visitors/students-and-employment",
        flows: &["cpt_prep", "f1_work_basics"],
        text: "Curricular practical training is employment that is an integral part of an \
               established curriculum. Authorization is employer specific and must be issued \
               on the I-20 by the designated school official before work begins.",
    },
    SourceEntry {
        source_id: "uscis_opt_overview",
        title: "Optional Practical Training for F-1 Students",
        url: "https://www.uscis.gov/opt",
        flows: &["opt_initial_prep", "f1_work_basics"],
        text: "Optional practical training is temporary employment directly related to the \
               student's major area of study. Post-completion applications may be filed up to \
               90 days before and no later than 60 days after the program end date.",
    },
    SourceEntry {
        source_id: "uscis_stem_extension",
        title: "STEM OPT Extension",
        url: "https://www.uscis.gov/working-in-the-united-states/students-and-exchange-visitors/optional-practical-training-extension-for-stem-students-stem-opt",
        flows: &["opt_stem_prep"],
        text: "Eligible students with qualifying STEM degrees may apply for a 24-month \
               extension of post-completion OPT. The employer must be enrolled in E-Verify and \
               the student must submit a completed Form I-983 training plan.",
    },
    SourceEntry {
        source_id: "uscis_cap_gap",
        title: "Cap-Gap Extension of F-1 Status",
        url: "https://www.uscis.gov/working-in-the-united-states/temporary-workers/h-1b-specialty-occupations/extension-of-post-completion-optional-practical-training-opt-and-f-1-status-for-eligible-students",
        flows: &["cap_gap_transition_prep"],
        text: "An H-1B cap-subject petition filed on time with a change of status request \
               extends the F-1 status and any current employment authorization of the \
               beneficiary until the start of the H-1B validity period. The petition state \
               determines whether work authorization continues during the gap.",
    },
    SourceEntry {
        source_id: "ice_sevp_employment",
        title: "SEVP Guidance on F-1 Employment",
        url: "https://www.ice.gov/sevis/employment",
        flows: &["f1_work_basics", "cpt_prep", "opt_initial_prep"],
        text: "F-1 students may work on campus up to 20 hours per week while school is in \
               session. Off-campus employment requires authorization through curricular \
               practical training, optional practical training, or severe economic hardship.",
    },
    SourceEntry {
        source_id: "uscis_i765_instructions",
        title: "Form I-765 Application for Employment Authorization",
        url: "https://www.uscis.gov/i-765",
        flows: &["opt_initial_prep", "opt_stem_prep"],
        text: "Applicants for OPT-based employment authorization file Form I-765 with the \
               OPT-recommended I-20, the filing fee, and supporting identity documents. Work \
               may not begin until the employment authorization document is received.",
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_ids_are_unique() {
        let mut ids: Vec<_> = source_index().iter().map(|s| s.source_id).collect();
        let len = ids.len();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), len);
    }
}
