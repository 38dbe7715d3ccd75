//! Flow router: ranks catalog flows against intent and fields
//!
//! Every catalog flow gets a 0–100 match score from weighted keyword
//! overlap plus field-signal boosts. Ties break by catalog declaration
//! order (the sort is stable and candidates are built in that order).

use crate::signals;
use std::collections::BTreeMap;
use visaflow_catalog::FlowCatalog;
use visaflow_types::{AmbiguityFlag, DisambiguationCard, FlowCandidate, FlowPack};

/// Candidates below this score never appear in the ranking
pub const CANDIDATE_CUTOFF: u8 = 10;

/// Minimum score a candidate needs to be auto-selected
pub const MIN_AUTO_SELECT_SCORE: u8 = 30;

/// Top candidate must beat the runner-up by this much to auto-select
pub const CLEAR_MARGIN: u8 = 12;

/// Runner-up within this distance of the top raises `top_flows_close`
pub const CLOSENESS_THRESHOLD: u8 = 12;

/// Best candidate below this raises `low_confidence_route`
pub const LOW_CONFIDENCE_SCORE: u8 = 40;

/// Maximum candidates shown to the user
pub const MAX_CANDIDATES_SHOWN: usize = 3;

const KEYWORD_WEIGHT: i32 = 14;
const MAX_KEYWORD_HITS: usize = 3;
const STATUS_MATCH_WEIGHT: i32 = 18;
const STATUS_MISMATCH_PENALTY: i32 = -6;
const EXPLICIT_CPT_BONUS: i32 = 9;
const TRANSITION_STATUS_BONUS: i32 = 11;
const STAGE_MATCH_WEIGHT: i32 = 16;
const STAGE_MISMATCH_PENALTY: i32 = -6;
const PETITION_SIGNAL_WEIGHT: i32 = 22;
const CONTEXT_BONUS: i32 = 9;
const AMBIGUITY_FALLBACK_BONUS: i32 = 30;
const AMBIGUITY_SPECIALIZED_PENALTY: i32 = -12;
const FALLBACK_SCORE: u8 = 10;

/// Result of one ranking pass
#[derive(Clone, Debug)]
pub struct RouterOutcome {
    /// Sorted descending by score, truncated to [`MAX_CANDIDATES_SHOWN`]
    pub candidates: Vec<FlowCandidate>,
    pub ambiguity_flags: Vec<AmbiguityFlag>,
    /// Signals extracted from the intent, merged under explicit fields
    pub inferred_fields: BTreeMap<String, String>,
}

/// What routing decided for a session with no flow selected yet
#[derive(Clone, Debug)]
pub enum RouteDecision {
    /// One clearly dominant candidate
    AutoSelect(String),
    /// Evidence does not favor one flow; the user resolves it
    Disambiguate(DisambiguationCard),
}

/// Score every catalog flow against the intent and current fields
pub fn rank(
    catalog: &FlowCatalog,
    intent: &str,
    fields: &BTreeMap<String, String>,
) -> RouterOutcome {
    let inferred = signals::extract_signals(intent, fields);
    let text = intent.to_lowercase();
    let tokens = signals::tokenize(intent);
    let explicit_cpt_opt_ambiguity = text.contains("cpt") && text.contains("opt");

    let mut candidates = Vec::new();
    let mut flags = Vec::new();

    for pack in catalog.list() {
        let (score, reason) = score_pack(
            pack,
            &text,
            &tokens,
            &inferred,
            explicit_cpt_opt_ambiguity,
        );
        if score >= CANDIDATE_CUTOFF as i32 {
            candidates.push(FlowCandidate {
                flow_id: pack.flow_id.clone(),
                title: pack.title.clone(),
                score: score.clamp(0, 100) as u8,
                reason,
            });
        }
    }

    // Stable sort: declaration order survives equal scores
    candidates.sort_by(|a, b| b.score.cmp(&a.score));

    if candidates.is_empty() {
        let fallback = catalog.fallback();
        candidates.push(FlowCandidate {
            flow_id: fallback.flow_id.clone(),
            title: fallback.title.clone(),
            score: FALLBACK_SCORE,
            reason: "fallback orientation flow".to_string(),
        });
        flags.push(AmbiguityFlag::NoDirectMatch);
    }

    if candidates.len() >= 2 && candidates[0].score - candidates[1].score < CLOSENESS_THRESHOLD {
        flags.push(AmbiguityFlag::TopFlowsClose);
    }

    let shown: Vec<_> = candidates
        .iter()
        .take(MAX_CANDIDATES_SHOWN)
        .map(|c| c.flow_id.as_str())
        .collect();
    if shown.contains(&"cpt_prep")
        && shown.contains(&"opt_initial_prep")
        && !inferred.contains_key("program_stage")
    {
        flags.push(AmbiguityFlag::CptOptOverlap);
    }

    if candidates[0].score < LOW_CONFIDENCE_SCORE {
        flags.push(AmbiguityFlag::LowConfidenceRoute);
    }
    if !inferred.contains_key("program_stage") {
        flags.push(AmbiguityFlag::ProgramStageUnclear);
    }
    if !inferred.contains_key("status_type") {
        flags.push(AmbiguityFlag::StatusUnclear);
    }

    flags.sort_unstable();
    flags.dedup();
    candidates.truncate(MAX_CANDIDATES_SHOWN);

    RouterOutcome {
        candidates,
        ambiguity_flags: flags,
        inferred_fields: inferred,
    }
}

/// Auto-select vs. disambiguation per the routing contract: auto-select
/// only when a single candidate clears the minimum or the top candidate
/// leads by a clear margin.
pub fn decide(outcome: &RouterOutcome) -> RouteDecision {
    let above_minimum: Vec<_> = outcome
        .candidates
        .iter()
        .filter(|c| c.score >= MIN_AUTO_SELECT_SCORE)
        .collect();

    let dominant = match above_minimum.as_slice() {
        [single] => Some(single.flow_id.clone()),
        [top, runner_up, ..] if top.score - runner_up.score >= CLEAR_MARGIN => {
            Some(top.flow_id.clone())
        }
        _ => None,
    };

    match dominant {
        Some(flow_id) => RouteDecision::AutoSelect(flow_id),
        None => RouteDecision::Disambiguate(disambiguation_card(&outcome.candidates)),
    }
}

/// Card listing the top candidates as `"flow_id|label"` options
pub fn disambiguation_card(candidates: &[FlowCandidate]) -> DisambiguationCard {
    DisambiguationCard {
        prompt: "Your input maps to multiple flows. Which path matches your case best?"
            .to_string(),
        options: candidates
            .iter()
            .take(MAX_CANDIDATES_SHOWN)
            .map(|c| format!("{}|{}", c.flow_id, c.title))
            .collect(),
    }
}

fn score_pack(
    pack: &FlowPack,
    text: &str,
    tokens: &std::collections::BTreeSet<String>,
    inferred: &BTreeMap<String, String>,
    explicit_cpt_opt_ambiguity: bool,
) -> (i32, String) {
    let mut score = 0i32;
    let mut reasons: Vec<String> = Vec::new();

    let hits = keyword_hits(text, tokens, &pack.applies_if.keywords_any);
    if !hits.is_empty() {
        score += KEYWORD_WEIGHT * hits.len().min(MAX_KEYWORD_HITS) as i32;
        reasons.push(format!("keywords: {}", hits[..hits.len().min(3)].join(", ")));
    }

    if let Some(status) = inferred.get("status_type") {
        if !pack.applies_if.status_any.is_empty() {
            let declared: std::collections::BTreeSet<String> = pack
                .applies_if
                .status_any
                .iter()
                .map(|s| signals::normalize_status(s))
                .collect();
            let equivalents = signals::status_equivalents(status);
            if equivalents.intersection(&declared).next().is_some() {
                score += STATUS_MATCH_WEIGHT;
                reasons.push("status match".to_string());
                if pack.flow_id == "cpt_prep" && equivalents.contains("cpt") {
                    score += EXPLICIT_CPT_BONUS;
                    reasons.push("explicit CPT status".to_string());
                }
                if pack.flow_id == "cap_gap_transition_prep"
                    && (equivalents.contains("h1b") || equivalents.contains("cap_gap"))
                {
                    score += TRANSITION_STATUS_BONUS;
                    reasons.push("transition status signal".to_string());
                }
            } else {
                score += STATUS_MISMATCH_PENALTY;
            }
        }
    }

    let stage = inferred.get("program_stage").map(String::as_str);
    if let Some(stage) = stage {
        if !pack.applies_if.program_stage_any.is_empty() {
            let declared: Vec<String> = pack
                .applies_if
                .program_stage_any
                .iter()
                .map(|s| s.trim().to_lowercase().replace('-', "_"))
                .collect();
            if declared.contains(&stage.to_lowercase().replace('-', "_")) {
                score += STAGE_MATCH_WEIGHT;
                reasons.push("program stage match".to_string());
            } else {
                score += STAGE_MISMATCH_PENALTY;
            }
        }
    }

    if pack.flow_id == "cap_gap_transition_prep"
        && (signals::mentions_petition_context(text) || inferred.contains_key("petition_status"))
    {
        score += PETITION_SIGNAL_WEIGHT;
        reasons.push("transition petition signal".to_string());
    }

    if pack.flow_id == "cpt_prep" && (text.contains("internship") || stage == Some("enrolled")) {
        score += CONTEXT_BONUS;
    }
    if pack.flow_id == "opt_initial_prep"
        && (text.contains("opt") || matches!(stage, Some("graduating") | Some("graduated")))
    {
        score += CONTEXT_BONUS;
    }

    if explicit_cpt_opt_ambiguity {
        if pack.flow_id == "f1_work_basics" {
            score += AMBIGUITY_FALLBACK_BONUS;
            reasons.push("explicit CPT/OPT ambiguity".to_string());
        }
        if pack.flow_id == "cpt_prep" || pack.flow_id == "opt_initial_prep" {
            score += AMBIGUITY_SPECIALIZED_PENALTY;
        }
    }

    let reason = if reasons.is_empty() {
        "general intent fit".to_string()
    } else {
        reasons[..reasons.len().min(2)].join("; ")
    };
    (score, reason)
}

fn keyword_hits(
    text: &str,
    tokens: &std::collections::BTreeSet<String>,
    keywords: &[String],
) -> Vec<String> {
    let mut hits = Vec::new();
    for raw in keywords {
        let keyword = raw.trim().to_lowercase();
        if keyword.is_empty() {
            continue;
        }
        let matched = if keyword.contains(' ') {
            text.contains(&keyword)
        } else {
            tokens.contains(&keyword)
        };
        if matched {
            hits.push(raw.clone());
        }
    }
    hits
}
