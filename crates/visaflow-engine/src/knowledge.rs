//! Citation retrieval over the built-in source index
//!
//! Keyword-overlap scoring with a flow-tag boost; one citation per
//! source, best snippet centered on the strongest query hit.

use crate::signals;
use visaflow_catalog::{source_index, SourceEntry};
use visaflow_types::{Citation, FlowPack};

const FLOW_TAG_BOOST: f32 = 1.3;
const LONG_TERM_BONUS: f32 = 0.5;
const SNIPPET_WIDTH: usize = 260;
const CONFUSIONS_IN_QUERY: usize = 2;

/// Retrieval query for a selected flow: the intent widened with the
/// pack's leading confusion topics, underscores flattened so the terms
/// tokenize like source prose.
pub fn citation_query(intent: &str, pack: &FlowPack) -> String {
    let mut query = intent.to_string();
    for confusion in pack.common_confusions.iter().take(CONFUSIONS_IN_QUERY) {
        query.push(' ');
        query.push_str(&confusion.replace('_', " "));
    }
    query
}

/// Top-k citations for a query, biased toward sources tagged with the
/// given flow. Deterministic for a fixed query and flow.
pub fn retrieve(query: &str, flow_id: &str, top_k: usize) -> Vec<Citation> {
    let query_tokens = signals::tokenize(query);
    if query_tokens.is_empty() {
        return Vec::new();
    }

    let mut scored: Vec<(f32, &SourceEntry)> = Vec::new();
    for entry in source_index() {
        let mut score = overlap_score(&query_tokens, entry.text);
        if !flow_id.is_empty() && entry.flows.contains(&flow_id) {
            score += FLOW_TAG_BOOST;
        }
        if score > 0.0 {
            scored.push((score, entry));
        }
    }

    // Stable by index order on ties
    scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));

    scored
        .into_iter()
        .take(top_k)
        .map(|(_, entry)| Citation {
            source_id: entry.source_id.to_string(),
            title: entry.title.to_string(),
            url: entry.url.to_string(),
            snippet: best_snippet(entry.text, &query_tokens),
        })
        .collect()
}

fn overlap_score(query_tokens: &std::collections::BTreeSet<String>, text: &str) -> f32 {
    let text_tokens = signals::tokenize(text);
    let overlap = query_tokens.intersection(&text_tokens).count();
    if overlap == 0 {
        return 0.0;
    }
    let long_terms = query_tokens
        .iter()
        .filter(|t| t.len() > 7 && text_tokens.contains(*t))
        .count();
    overlap as f32 + LONG_TERM_BONUS * long_terms as f32
}

fn best_snippet(text: &str, query_tokens: &std::collections::BTreeSet<String>) -> String {
    let lowered = text.to_lowercase();

    let mut hit_index = None;
    let mut by_length: Vec<&String> = query_tokens.iter().collect();
    by_length.sort_by_key(|t| std::cmp::Reverse(t.len()));
    for token in by_length {
        if let Some(idx) = lowered.find(token.as_str()) {
            hit_index = Some(idx);
            break;
        }
    }

    let collapsed: String = text.split_whitespace().collect::<Vec<_>>().join(" ");
    match hit_index {
        None => collapsed.chars().take(SNIPPET_WIDTH).collect(),
        Some(idx) => {
            let start = idx.saturating_sub(SNIPPET_WIDTH / 3);
            // Walk to char boundaries so slicing never panics
            let start = floor_char_boundary(text, start);
            let end = floor_char_boundary(text, (start + SNIPPET_WIDTH).min(text.len()));
            text[start..end]
                .split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        }
    }
}

fn floor_char_boundary(text: &str, mut index: usize) -> usize {
    index = index.min(text.len());
    while index > 0 && !text.is_char_boundary(index) {
        index -= 1;
    }
    index
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flow_tagged_sources_rank_first() {
        let citations = retrieve("cap gap petition timing", "cap_gap_transition_prep", 5);
        assert!(!citations.is_empty());
        assert_eq!(citations[0].source_id, "uscis_cap_gap");
        assert!(citations.len() <= 5);
    }

    #[test]
    fn retrieval_is_deterministic() {
        let a = retrieve("opt filing window graduation", "opt_initial_prep", 5);
        let b = retrieve("opt filing window graduation", "opt_initial_prep", 5);
        let ids_a: Vec<_> = a.iter().map(|c| c.source_id.clone()).collect();
        let ids_b: Vec<_> = b.iter().map(|c| c.source_id.clone()).collect();
        assert_eq!(ids_a, ids_b);
    }

    #[test]
    fn empty_query_returns_nothing() {
        assert!(retrieve("", "cpt_prep", 5).is_empty());
    }

    #[test]
    fn citation_query_folds_in_confusion_topics() {
        let catalog = visaflow_catalog::FlowCatalog::new();
        let pack = catalog.get("cpt_prep").unwrap();
        let query = citation_query("when can I start my internship", pack);
        assert!(query.starts_with("when can I start my internship"));
        assert!(query.contains("employer details"));
        assert!(query.contains("approval before work"));
    }
}
