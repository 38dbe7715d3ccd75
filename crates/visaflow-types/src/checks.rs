//! Micro-checks: stateless quiz items keyed to workflow context

use serde::{Deserialize, Serialize};

/// A quiz item with its answer key. Never serialized toward the client
/// before it is answered — handlers expose [`MicroCheckView`] instead.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MicroCheck {
    pub check_id: String,
    pub prompt: String,
    pub options: Vec<String>,
    pub correct_option: String,
    pub explanation: String,
}

impl MicroCheck {
    pub fn new(
        check_id: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_option: impl Into<String>,
        explanation: impl Into<String>,
    ) -> Self {
        Self {
            check_id: check_id.into(),
            prompt: prompt.into(),
            options,
            correct_option: correct_option.into(),
            explanation: explanation.into(),
        }
    }
}

/// Client-safe view of an available check: no answer key, no explanation
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MicroCheckView {
    pub check_id: String,
    pub prompt: String,
    pub options: Vec<String>,
}

impl From<&MicroCheck> for MicroCheckView {
    fn from(check: &MicroCheck) -> Self {
        Self {
            check_id: check.check_id.clone(),
            prompt: check.prompt.clone(),
            options: check.options.clone(),
        }
    }
}

/// Recorded outcome of an answered check. Re-answering overwrites.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MicroCheckResult {
    pub check_id: String,
    pub selected_option: String,
    pub is_correct: bool,
    pub feedback: String,
}
