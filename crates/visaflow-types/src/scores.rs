//! Readiness scores: the four 0–100 metrics
//!
//! Understanding and clarity evolve incrementally from a per-session
//! baseline. Completeness is recomputed from scratch as a pure function of
//! the selected flow and the field values. Escalation risk is recomputed
//! from current conditions — it decreases only when the underlying
//! condition resolves, never by time alone.

use serde::{Deserialize, Serialize};

/// Ceiling shared by all four scores
pub const SCORE_MAX: u8 = 100;

/// Neutral starting point for understanding and clarity
pub const SCORE_BASELINE: u8 = 70;

/// Starting escalation risk for a fresh session
pub const ESCALATION_BASE: u8 = 15;

/// The four readiness metrics, each clamped to `[0, 100]`
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreCard {
    pub understanding_score: u8,
    pub clarity_score: u8,
    pub completeness_score: u8,
    pub escalation_risk: u8,
}

impl Default for ScoreCard {
    fn default() -> Self {
        Self {
            understanding_score: SCORE_BASELINE,
            clarity_score: SCORE_BASELINE,
            completeness_score: 0,
            escalation_risk: ESCALATION_BASE,
        }
    }
}

impl ScoreCard {
    /// Fresh card with understanding/clarity anchored at `baseline`
    pub fn with_baseline(baseline: u8) -> Self {
        Self {
            understanding_score: clamp_score(baseline as i32),
            clarity_score: clamp_score(baseline as i32),
            ..Self::default()
        }
    }

    /// Shift understanding by a signed delta, clamped
    pub fn adjust_understanding(&mut self, delta: i32) {
        self.understanding_score = clamp_score(self.understanding_score as i32 + delta);
    }

    /// Shift clarity by a signed delta, clamped
    pub fn adjust_clarity(&mut self, delta: i32) {
        self.clarity_score = clamp_score(self.clarity_score as i32 + delta);
    }
}

/// Clamp an intermediate score computation into `[0, 100]`
pub fn clamp_score(value: i32) -> u8 {
    value.clamp(0, SCORE_MAX as i32) as u8
}
