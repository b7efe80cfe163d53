//! Conviction analysis over thesis statements.
//!
//! Extracts certainty and hedging signals from free text, scores
//! conviction strength, and classifies how conviction moves across an
//! ordered history of readings:
//! - lexical scoring from a neutral midpoint, one adjustment per match
//! - trend classification (increasing, decreasing, stable, volatile)
//! - swing between consecutive readings
//! - overconfidence detection over a configurable window

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ConvictionConfig;
use crate::records::{ConvictionRecord, ConvictionSource};
use crate::taxonomy::{phrase_occurrences, CERTAINTY_PHRASES, HEDGING_PHRASES};

/// Direction of a conviction time series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvictionTrend {
    /// Recent readings average higher than earlier ones.
    Increasing,
    /// Recent readings average lower than earlier ones.
    Decreasing,
    /// No movement beyond tolerance.
    #[default]
    Stable,
    /// Oscillating swings rather than a drift in one direction.
    Volatile,
}

impl ConvictionTrend {
    /// Get the trend as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ConvictionTrend::Increasing => "increasing",
            ConvictionTrend::Decreasing => "decreasing",
            ConvictionTrend::Stable => "stable",
            ConvictionTrend::Volatile => "volatile",
        }
    }
}

impl std::fmt::Display for ConvictionTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ConvictionTrend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "increasing" => Ok(ConvictionTrend::Increasing),
            "decreasing" => Ok(ConvictionTrend::Decreasing),
            "stable" => Ok(ConvictionTrend::Stable),
            "volatile" => Ok(ConvictionTrend::Volatile),
            _ => Err(format!("Unknown conviction trend: {}", s)),
        }
    }
}

/// Lexical analysis of a single statement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvictionAnalysis {
    /// Conviction score in [0, 100].
    pub score: f64,
    /// Certainty phrases matched, one entry per occurrence.
    pub certainty_indicators: Vec<String>,
    /// Hedging phrases matched, one entry per occurrence.
    pub hedging_indicators: Vec<String>,
}

/// Conviction reading in the context of its history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvictionResult {
    /// Conviction score of the current statement, in [0, 100].
    pub score: f64,
    /// Certainty phrases matched in the current statement.
    pub certainty_indicators: Vec<String>,
    /// Hedging phrases matched in the current statement.
    pub hedging_indicators: Vec<String>,
    /// Score of the immediately preceding reading, if any exists.
    pub previous_score: Option<f64>,
    /// Absolute difference against the preceding reading. Zero on the
    /// first reading.
    pub swing: f64,
    /// Direction of the series including the current reading.
    pub trend: ConvictionTrend,
    /// Whether conviction is oscillating or just jumped sharply.
    pub is_volatile: bool,
    /// Whether conviction has stayed high and hedge-free across the
    /// configured window.
    pub is_overconfident: bool,
}

/// Analyzer for conviction statements and their history.
#[derive(Debug, Clone)]
pub struct ConvictionAnalyzer {
    config: ConvictionConfig,
}

impl ConvictionAnalyzer {
    /// Create an analyzer with the given conviction configuration
    pub fn new(config: &ConvictionConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Score a single statement from its certainty and hedging language
    ///
    /// Each matched occurrence is recorded, not just counted, so callers
    /// can show which phrases drove the score. The score starts at the
    /// neutral midpoint, moves per match, and clamps to [0, 100].
    pub fn analyze_conviction(&self, statement: &str) -> ConvictionAnalysis {
        let certainty_indicators = collect_matches(statement, CERTAINTY_PHRASES);
        let hedging_indicators = collect_matches(statement, HEDGING_PHRASES);

        let raw = self.config.base_score
            + certainty_indicators.len() as f64 * self.config.certainty_weight
            - hedging_indicators.len() as f64 * self.config.hedging_weight;
        let score = raw.clamp(0.0, 100.0);

        debug!(
            score,
            certainty_matches = certainty_indicators.len(),
            hedging_matches = hedging_indicators.len(),
            "Analyzed conviction statement"
        );

        ConvictionAnalysis {
            score,
            certainty_indicators,
            hedging_indicators,
        }
    }

    /// Classify the direction of an ordered score history
    ///
    /// Volatility is oscillation: consecutive deltas that flip sign with
    /// both magnitudes at or above the configured swing threshold. A
    /// series that is not oscillating trends by comparing the recent
    /// half's average against the earlier half's, beyond tolerance.
    /// Histories shorter than two readings are stable.
    pub fn analyze_conviction_trend(&self, scores: &[f64]) -> ConvictionTrend {
        if scores.len() < 2 {
            return ConvictionTrend::Stable;
        }

        let deltas: Vec<f64> = scores.windows(2).map(|w| w[1] - w[0]).collect();
        let threshold = self.config.volatility_swing;
        let oscillating = deltas.windows(2).any(|pair| {
            pair[0] * pair[1] < 0.0
                && pair[0].abs() >= threshold
                && pair[1].abs() >= threshold
        });
        if oscillating {
            return ConvictionTrend::Volatile;
        }

        let mid = scores.len() / 2;
        let earlier = average(&scores[..mid]);
        let recent = average(&scores[mid..]);
        let shift = recent - earlier;
        if shift > self.config.trend_tolerance {
            ConvictionTrend::Increasing
        } else if shift < -self.config.trend_tolerance {
            ConvictionTrend::Decreasing
        } else {
            ConvictionTrend::Stable
        }
    }

    /// Absolute difference between two consecutive readings
    pub fn calculate_swing(&self, current: f64, previous: f64) -> f64 {
        (current - previous).abs()
    }

    /// Whether a score history reads as volatile
    ///
    /// True when the series oscillates, or when the most recent swing
    /// alone reaches the threshold regardless of overall direction.
    pub fn is_conviction_volatile(&self, scores: &[f64]) -> bool {
        if self.analyze_conviction_trend(scores) == ConvictionTrend::Volatile {
            return true;
        }
        if scores.len() < 2 {
            return false;
        }
        let previous = scores[scores.len() - 2];
        let current = scores[scores.len() - 1];
        self.calculate_swing(current, previous) >= self.config.volatility_swing
    }

    /// Whether a record history reads as overconfident
    ///
    /// Overconfidence is sustained, not momentary: every record in the
    /// trailing window must score at or above the threshold with no
    /// hedging language at all. Histories shorter than the window never
    /// qualify.
    pub fn is_overconfident(&self, history: &[ConvictionRecord]) -> bool {
        let series: Vec<(f64, bool)> = history
            .iter()
            .map(|r| (r.conviction_score, r.hedging_indicators.is_empty()))
            .collect();
        self.overconfident_series(&series)
    }

    /// Analyze a statement against its history
    pub fn generate_conviction_result(
        &self,
        statement: &str,
        history: &[ConvictionRecord],
    ) -> ConvictionResult {
        let analysis = self.analyze_conviction(statement);

        let previous_score = history.last().map(|r| r.conviction_score);
        let swing = previous_score
            .map(|previous| self.calculate_swing(analysis.score, previous))
            .unwrap_or(0.0);

        let mut scores: Vec<f64> = history.iter().map(|r| r.conviction_score).collect();
        scores.push(analysis.score);
        let trend = self.analyze_conviction_trend(&scores);
        let is_volatile = self.is_conviction_volatile(&scores);

        let mut series: Vec<(f64, bool)> = history
            .iter()
            .map(|r| (r.conviction_score, r.hedging_indicators.is_empty()))
            .collect();
        series.push((analysis.score, analysis.hedging_indicators.is_empty()));
        let is_overconfident = self.overconfident_series(&series);

        debug!(
            score = analysis.score,
            previous_score,
            swing,
            trend = %trend,
            is_volatile,
            is_overconfident,
            "Generated conviction result"
        );

        ConvictionResult {
            score: analysis.score,
            certainty_indicators: analysis.certainty_indicators,
            hedging_indicators: analysis.hedging_indicators,
            previous_score,
            swing,
            trend,
            is_volatile,
            is_overconfident,
        }
    }

    /// Build a persistable record for a statement
    pub fn record_statement(
        &self,
        user_id: impl Into<String>,
        thesis_id: impl Into<String>,
        statement: &str,
        source: ConvictionSource,
    ) -> ConvictionRecord {
        self.record_statement_at(user_id, thesis_id, statement, source, Utc::now())
    }

    /// Build a persistable record with an explicit analysis time
    pub fn record_statement_at(
        &self,
        user_id: impl Into<String>,
        thesis_id: impl Into<String>,
        statement: &str,
        source: ConvictionSource,
        analyzed_at: DateTime<Utc>,
    ) -> ConvictionRecord {
        let analysis = self.analyze_conviction(statement);
        ConvictionRecord::new(user_id, thesis_id, statement)
            .with_source(source)
            .with_score(analysis.score)
            .with_indicators(analysis.certainty_indicators, analysis.hedging_indicators)
            .with_analyzed_at(analyzed_at)
    }

    /// Windowed overconfidence over (score, hedge-free) pairs, with the
    /// current statement included when the caller appends it.
    fn overconfident_series(&self, series: &[(f64, bool)]) -> bool {
        let window = self.config.overconfidence_window;
        if window == 0 || series.len() < window {
            return false;
        }
        series[series.len() - window..]
            .iter()
            .all(|(score, hedge_free)| *score >= self.config.overconfidence_score && *hedge_free)
    }
}

fn collect_matches(statement: &str, phrases: &[&str]) -> Vec<String> {
    let mut matches = Vec::new();
    for phrase in phrases {
        for _ in 0..phrase_occurrences(statement, phrase) {
            matches.push(phrase.to_string());
        }
    }
    matches
}

fn average(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
