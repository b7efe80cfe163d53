//! Time-in-thesis analysis.
//!
//! Computes how long an investment idea has been under development,
//! classifies its maturity, and flags decisions being made before the
//! thesis has had time to develop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MaturityConfig;
use crate::error::RecordResult;
use crate::records::{RawThesisTiming, ThesisTiming};

/// Thesis maturity buckets, ordered by development time.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum MaturityLevel {
    /// Hours old; the idea has barely been examined.
    #[default]
    Nascent,
    /// Past the first day of development.
    Developing,
    /// Several days in, with room left to season.
    Maturing,
    /// A week or more of development.
    Seasoned,
}

impl MaturityLevel {
    /// Get the maturity level as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            MaturityLevel::Nascent => "nascent",
            MaturityLevel::Developing => "developing",
            MaturityLevel::Maturing => "maturing",
            MaturityLevel::Seasoned => "seasoned",
        }
    }
}

impl std::fmt::Display for MaturityLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for MaturityLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "nascent" => Ok(MaturityLevel::Nascent),
            "developing" => Ok(MaturityLevel::Developing),
            "maturing" => Ok(MaturityLevel::Maturing),
            "seasoned" => Ok(MaturityLevel::Seasoned),
            _ => Err(format!("Unknown maturity level: {}", s)),
        }
    }
}

/// Computed snapshot of a thesis's development timeline.
///
/// Derived fresh on every request, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeMetrics {
    /// Hours since the effective start of development. Never negative.
    pub hours_in_development: f64,
    /// Coarse development bucket.
    pub maturity_level: MaturityLevel,
    /// Documented refinements, passed through from the timeline.
    pub evolution_event_count: u32,
    /// Whether the thesis is being acted on with too little development.
    pub is_rushed: bool,
}

/// Analyzer for thesis development timelines.
#[derive(Debug, Clone)]
pub struct TimeInThesisAnalyzer {
    config: MaturityConfig,
}

impl TimeInThesisAnalyzer {
    /// Create an analyzer with the given maturity configuration
    pub fn new(config: &MaturityConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Compute time metrics against the current clock
    pub fn calculate_time_metrics(&self, timing: &ThesisTiming) -> TimeMetrics {
        self.calculate_time_metrics_at(timing, Utc::now())
    }

    /// Compute time metrics against an explicit clock
    ///
    /// The effective start of development is the earliest captured
    /// timeline point: informal mentions and the promotion both count,
    /// so research done before the thesis was formalized is credited.
    /// A thesis is rushed only when it is young and largely unrefined;
    /// documented evolution offsets low elapsed time.
    pub fn calculate_time_metrics_at(
        &self,
        timing: &ThesisTiming,
        now: DateTime<Utc>,
    ) -> TimeMetrics {
        let start = effective_start(timing);
        let hours = (now - start).num_seconds().max(0) as f64 / 3600.0;
        let maturity_level = self.maturity_level(hours);
        let is_rushed = hours < self.config.rushed_below_hours
            && timing.evolution_event_count < self.config.rushed_evolution_floor;

        debug!(
            hours_in_development = hours,
            maturity_level = %maturity_level,
            evolution_event_count = timing.evolution_event_count,
            is_rushed,
            "Calculated time metrics"
        );

        TimeMetrics {
            hours_in_development: hours,
            maturity_level,
            evolution_event_count: timing.evolution_event_count,
            is_rushed,
        }
    }

    /// Compute time metrics from a raw datastore row
    pub fn calculate_time_metrics_from_db(
        &self,
        raw: &RawThesisTiming,
    ) -> RecordResult<TimeMetrics> {
        self.calculate_time_metrics_from_db_at(raw, Utc::now())
    }

    /// Compute time metrics from a raw datastore row, against an
    /// explicit clock
    pub fn calculate_time_metrics_from_db_at(
        &self,
        raw: &RawThesisTiming,
        now: DateTime<Utc>,
    ) -> RecordResult<TimeMetrics> {
        let timing = raw.resolve(now)?;
        Ok(self.calculate_time_metrics_at(&timing, now))
    }

    fn maturity_level(&self, hours: f64) -> MaturityLevel {
        match hours {
            h if h >= self.config.seasoned_after_hours => MaturityLevel::Seasoned,
            h if h >= self.config.maturing_after_hours => MaturityLevel::Maturing,
            h if h >= self.config.developing_after_hours => MaturityLevel::Developing,
            _ => MaturityLevel::Nascent,
        }
    }
}

/// Earliest captured point of the thesis timeline.
fn effective_start(timing: &ThesisTiming) -> DateTime<Utc> {
    let mut start = timing.created_at;
    if let Some(first_mentioned) = timing.first_mentioned_at {
        start = start.min(first_mentioned);
    }
    if let Some(promoted) = timing.promoted_to_explicit_at {
        start = start.min(promoted);
    }
    start
}
