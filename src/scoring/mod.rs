//! Scoring engines for process integrity.
//!
//! Four engines measure the discipline behind a trading thesis:
//! - **research**: how deep the research behind a session runs
//! - **time**: how long the thesis has matured, and whether it is rushed
//! - **conviction**: certainty language, trend, and overconfidence
//! - **friction**: the combined gating decision in front of a trade
//!
//! All engines are pure: every reading is computed from explicit inputs
//! plus an optional clock, never from hidden state.

use std::collections::HashSet;

/// Conviction statement analysis: scoring, trend, and overconfidence.
pub mod conviction;
/// Friction gating combining the three scores into a trade gate.
pub mod friction;
/// Research-quality scoring over session depth.
pub mod research;
/// Thesis maturity from timestamps, with rushed-trade detection.
pub mod time;

pub use conviction::{ConvictionAnalysis, ConvictionAnalyzer, ConvictionResult, ConvictionTrend};
pub use friction::{
    FrictionEngine, FrictionLevel, OverrideRequest, OverrideValidation, ProcessIntegrityResult,
};
pub use research::{QualityBreakdown, ResearchQualityScore, ResearchQualityScorer};
pub use time::{MaturityLevel, TimeInThesisAnalyzer, TimeMetrics};

/// Merge recommendation lists, dropping duplicates while preserving
/// first-seen order.
pub(crate) fn dedup_recommendations(recommendations: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    recommendations
        .into_iter()
        .filter(|recommendation| seen.insert(recommendation.clone()))
        .collect()
}
