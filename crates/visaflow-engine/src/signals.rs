//! Intent signal extraction
//!
//! Flow-matching heuristics only: regex tables lift `status_type`,
//! `program_stage`, `petition_status`, and `employment_offer` out of the
//! free-text intent so the router can score flows against them. Explicit
//! field values always win over extracted ones.

use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::OnceLock;

const CARRIED_FIELDS: &[&str] = &[
    "status_type",
    "program_stage",
    "petition_status",
    "employment_offer",
    "employer_name",
    "work_start_date",
    "work_end_date",
    "graduation_date",
    "school_name",
];

fn status_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"(?i)\bcap[\s\-]?gap\b", "cap_gap"),
            (r"(?i)\bh-?1b\b", "h1b"),
            (r"(?i)\bcpt\b", "cpt"),
            (r"(?i)\bstem opt\b", "stem_opt"),
            (r"(?i)\bopt\b", "opt"),
            (r"(?i)\bf-?1\b", "f1"),
        ]
        .iter()
        .map(|(p, v)| (Regex::new(p).expect("static pattern"), *v))
        .collect()
    })
}

fn stage_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (
                r"(?i)\b(enrolled|current student|this quarter|this semester|while studying)\b",
                "enrolled",
            ),
            (
                r"(?i)\b(graduating|graduation|final quarter|about to graduate)\b",
                "graduating",
            ),
            (r"(?i)\b(graduated|alumni)\b", "graduated"),
            (r"(?i)\b(already working|currently employed|working)\b", "working"),
        ]
        .iter()
        .map(|(p, v)| (Regex::new(p).expect("static pattern"), *v))
        .collect()
    })
}

fn petition_patterns() -> &'static [(Regex, &'static str)] {
    static PATTERNS: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        [
            (r"(?i)\b(filed|submitted|registered)\b", "filed"),
            (r"(?i)\b(pending|waiting|processing)\b", "pending"),
            (r"(?i)\b(approved|selected)\b", "approved"),
            (r"(?i)\b(rejected|denied|not selected)\b", "denied"),
        ]
        .iter()
        .map(|(p, v)| (Regex::new(p).expect("static pattern"), *v))
        .collect()
    })
}

fn token_pattern() -> &'static Regex {
    static TOKEN: OnceLock<Regex> = OnceLock::new();
    TOKEN.get_or_init(|| Regex::new(r"[a-zA-Z0-9\-_/]{2,}").expect("static pattern"))
}

/// Lowercased token set of a text
pub fn tokenize(text: &str) -> BTreeSet<String> {
    token_pattern()
        .find_iter(text)
        .map(|m| m.as_str().to_lowercase())
        .collect()
}

/// Extract routing signals from intent text, seeded by explicit fields
pub fn extract_signals(
    intent: &str,
    fields: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut signals = BTreeMap::new();

    for key in CARRIED_FIELDS {
        if let Some(value) = fields.get(*key) {
            let value = value.trim();
            if !value.is_empty() {
                signals.insert(key.to_string(), value.to_string());
            }
        }
    }

    if !signals.contains_key("status_type") {
        for (pattern, status) in status_patterns() {
            if pattern.is_match(intent) {
                signals.insert("status_type".to_string(), status.to_string());
                break;
            }
        }
    }

    if !signals.contains_key("program_stage") {
        for (pattern, stage) in stage_patterns() {
            if pattern.is_match(intent) {
                signals.insert("program_stage".to_string(), stage.to_string());
                break;
            }
        }
    }

    let status = normalize_status(signals.get("status_type").map_or("", String::as_str));
    if !signals.contains_key("program_stage") && status == "cpt" {
        signals.insert("program_stage".to_string(), "enrolled".to_string());
    }
    if !signals.contains_key("program_stage") && (status == "h1b" || status == "cap_gap") {
        signals.insert("program_stage".to_string(), "working".to_string());
    }

    let mentions_petition = mentions_petition_context(intent);
    if !signals.contains_key("petition_status")
        && (mentions_petition || status == "h1b" || status == "cap_gap")
    {
        let mut value = "unknown";
        if mentions_petition {
            for (pattern, state) in petition_patterns() {
                if pattern.is_match(intent) {
                    value = state;
                    break;
                }
            }
        }
        signals.insert("petition_status".to_string(), value.to_string());
    }

    static OFFER: OnceLock<Regex> = OnceLock::new();
    let offer = OFFER
        .get_or_init(|| Regex::new(r"(?i)\b(internship|offer|job|employment)\b").expect("static"));
    if !signals.contains_key("employment_offer") && offer.is_match(intent) {
        signals.insert("employment_offer".to_string(), "yes".to_string());
    }

    signals
}

/// True when the intent talks about an H-1B petition context at all
pub fn mentions_petition_context(intent: &str) -> bool {
    static PETITION_CONTEXT: OnceLock<Regex> = OnceLock::new();
    PETITION_CONTEXT
        .get_or_init(|| Regex::new(r"(?i)\bh-?1b\b|\bcap[\s\-]?gap\b").expect("static"))
        .is_match(intent)
}

/// Collapse spelling variants into canonical status values
pub fn normalize_status(value: &str) -> String {
    let normalized = value.trim().to_lowercase().replace('-', "_");
    match normalized.as_str() {
        "f_1" | "f1" => "f1".to_string(),
        "stem" | "stemopt" | "stem_opt" => "stem_opt".to_string(),
        "capgap" | "cap_gap" => "cap_gap".to_string(),
        other => other.to_string(),
    }
}

/// Statuses a declared status also satisfies. A CPT student is in F-1
/// status; a cap-gap case spans OPT and H-1B.
pub fn status_equivalents(status: &str) -> BTreeSet<String> {
    let normalized = normalize_status(status);
    let group: &[&str] = match normalized.as_str() {
        "cpt" => &["cpt", "f1"],
        "stem_opt" => &["stem_opt", "opt"],
        "cap_gap" => &["cap_gap", "h1b", "opt", "stem_opt", "f1"],
        "h1b" => &["h1b", "cap_gap", "opt", "stem_opt", "f1"],
        _ => return BTreeSet::from([normalized]),
    };
    group.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_status_and_stage_from_intent() {
        let signals = extract_signals(
            "I'm on CPT and start my internship in 3 weeks",
            &BTreeMap::new(),
        );
        assert_eq!(signals.get("status_type").map(String::as_str), Some("cpt"));
        // CPT implies enrollment when the stage is not stated
        assert_eq!(
            signals.get("program_stage").map(String::as_str),
            Some("enrolled")
        );
        assert_eq!(
            signals.get("employment_offer").map(String::as_str),
            Some("yes")
        );
    }

    #[test]
    fn h1b_mention_seeds_unknown_petition_status() {
        let signals = extract_signals("my employer is doing the h1b thing", &BTreeMap::new());
        assert_eq!(
            signals.get("petition_status").map(String::as_str),
            Some("unknown")
        );

        let signals = extract_signals("my H-1B was filed last week", &BTreeMap::new());
        assert_eq!(
            signals.get("petition_status").map(String::as_str),
            Some("filed")
        );
    }

    #[test]
    fn explicit_fields_win_over_extraction() {
        let mut fields = BTreeMap::new();
        fields.insert("status_type".to_string(), "opt".to_string());
        let signals = extract_signals("I'm on CPT right now", &fields);
        assert_eq!(signals.get("status_type").map(String::as_str), Some("opt"));
    }

    #[test]
    fn status_equivalents_cover_bridging_cases() {
        assert!(status_equivalents("cpt").contains("f1"));
        assert!(status_equivalents("h1b").contains("cap_gap"));
        assert_eq!(status_equivalents("opt").len(), 1);
        assert_eq!(normalize_status("STEM-OPT"), "stem_opt");
    }
}
