//! Friction gating for trade decisions.
//!
//! Combines the research-quality, thesis-maturity, and conviction
//! readings into a single graduated friction level:
//! - none: all dimensions healthy, trade freely
//! - soft: one weak dimension, advisory only
//! - medium: weaknesses compounding, slow down
//! - hard: rushed near-zero research with unstable conviction, or a
//!   pattern of recent overrides; proceeding needs an explicit waiver
//!
//! Every check is computed fresh from its inputs. The recent-override
//! count is the only cross-call memory and is supplied by the caller.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::{Config, FrictionConfig};
use crate::records::{ConvictionRecord, ResearchSession, ThesisTiming};
use crate::scoring::conviction::{ConvictionAnalyzer, ConvictionResult};
use crate::scoring::dedup_recommendations;
use crate::scoring::research::{ResearchQualityScore, ResearchQualityScorer};
use crate::scoring::time::{TimeInThesisAnalyzer, TimeMetrics};

/// Graduated warning level standing between a thesis and a trade.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum FrictionLevel {
    /// No warnings; trade freely.
    #[default]
    None,
    /// One dimension is weak; advisory only.
    Soft,
    /// Weaknesses are compounding; silently overridable but cautioned.
    Medium,
    /// Gated; proceeding requires an explicit waiver.
    Hard,
}

impl FrictionLevel {
    /// String identifier for the level
    pub fn as_str(&self) -> &'static str {
        match self {
            FrictionLevel::None => "none",
            FrictionLevel::Soft => "soft",
            FrictionLevel::Medium => "medium",
            FrictionLevel::Hard => "hard",
        }
    }
}

impl fmt::Display for FrictionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for FrictionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "none" => Ok(FrictionLevel::None),
            "soft" => Ok(FrictionLevel::Soft),
            "medium" => Ok(FrictionLevel::Medium),
            "hard" => Ok(FrictionLevel::Hard),
            _ => Err(format!("Unknown friction level: {}", s)),
        }
    }
}

/// Full process-integrity decision returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessIntegrityResult {
    /// Friction level gating the trade.
    pub friction_level: FrictionLevel,
    /// Research-quality reading behind the decision.
    pub research_quality_score: ResearchQualityScore,
    /// Thesis-maturity reading behind the decision.
    pub time_metrics: TimeMetrics,
    /// Conviction reading behind the decision.
    pub conviction_result: ConvictionResult,
    /// Consolidated, deduplicated recommendations across all dimensions.
    pub recommendations: Vec<String>,
    /// Whether proceeding requires an override at all.
    pub override_required: bool,
    /// Whether the override additionally needs an explicit waiver.
    pub acknowledgment_required: bool,
}

/// Caller-supplied waiver input accompanying an override attempt.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideRequest {
    /// Whether the user explicitly acknowledged the warnings.
    #[serde(default)]
    pub acknowledged: bool,
    /// Free-form justification for proceeding anyway.
    #[serde(default)]
    pub justification: Option<String>,
}

/// Outcome of validating an override attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OverrideValidation {
    /// Whether the user may proceed.
    pub allowed: bool,
    /// Why the override was denied. Absent when allowed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Engine combining the three scorers into a friction decision.
#[derive(Debug, Clone)]
pub struct FrictionEngine {
    config: FrictionConfig,
    research: ResearchQualityScorer,
    time: TimeInThesisAnalyzer,
    conviction: ConvictionAnalyzer,
}

impl FrictionEngine {
    /// Create an engine from the full configuration
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.friction.clone(),
            research: ResearchQualityScorer::new(&config.research),
            time: TimeInThesisAnalyzer::new(&config.maturity),
            conviction: ConvictionAnalyzer::new(&config.conviction),
        }
    }

    /// Map the three readings and the recent-override count to a level
    ///
    /// Checks escalate in order: compounding red flags or override abuse
    /// gate hard, two weak dimensions (or unsupported overconfidence)
    /// warrant medium, a single weak dimension warrants soft.
    pub fn determine_friction(
        &self,
        research_quality: &ResearchQualityScore,
        time_metrics: &TimeMetrics,
        conviction: &ConvictionResult,
        recent_override_count: u32,
    ) -> FrictionLevel {
        let research_score = research_quality.score as f64;
        let weak_research = research_score < self.config.weak_research_below;
        let weak_dimensions = [weak_research, time_metrics.is_rushed, conviction.is_volatile]
            .iter()
            .filter(|weak| **weak)
            .count();

        let compounding = time_metrics.is_rushed
            && research_score <= self.config.near_zero_research
            && (conviction.is_volatile || conviction.is_overconfident);
        let override_abuse = recent_override_count > self.config.override_escalation_threshold;

        let level = if compounding || override_abuse {
            FrictionLevel::Hard
        } else if weak_dimensions >= 2 || (conviction.is_overconfident && weak_research) {
            FrictionLevel::Medium
        } else if weak_dimensions >= 1 {
            FrictionLevel::Soft
        } else {
            FrictionLevel::None
        };

        debug!(
            level = %level,
            research_score = research_quality.score,
            is_rushed = time_metrics.is_rushed,
            is_volatile = conviction.is_volatile,
            is_overconfident = conviction.is_overconfident,
            recent_override_count,
            "Determined friction level"
        );

        level
    }

    /// Run the full process-integrity check against the current clock
    pub fn check_process_integrity(
        &self,
        sessions: &[ResearchSession],
        timing: &ThesisTiming,
        statement: &str,
        history: &[ConvictionRecord],
        recent_override_count: u32,
    ) -> ProcessIntegrityResult {
        self.check_process_integrity_at(
            sessions,
            timing,
            statement,
            history,
            recent_override_count,
            Utc::now(),
        )
    }

    /// Run the full process-integrity check against an explicit clock
    ///
    /// Scores the sessions in aggregate, reads thesis maturity, analyzes
    /// the statement against its history, and folds everything into one
    /// gating decision with a consolidated recommendation list.
    pub fn check_process_integrity_at(
        &self,
        sessions: &[ResearchSession],
        timing: &ThesisTiming,
        statement: &str,
        history: &[ConvictionRecord],
        recent_override_count: u32,
        now: DateTime<Utc>,
    ) -> ProcessIntegrityResult {
        let research_quality_score = self
            .research
            .calculate_aggregated_research_quality_at(sessions, now);
        let time_metrics = self.time.calculate_time_metrics_at(timing, now);
        let conviction_result = self.conviction.generate_conviction_result(statement, history);

        let friction_level = self.determine_friction(
            &research_quality_score,
            &time_metrics,
            &conviction_result,
            recent_override_count,
        );
        let recommendations = self.consolidated_recommendations(
            friction_level,
            &research_quality_score,
            &time_metrics,
            &conviction_result,
        );

        info!(
            friction_level = %friction_level,
            research_score = research_quality_score.score,
            maturity = %time_metrics.maturity_level,
            conviction_score = conviction_result.score,
            recent_override_count,
            "Checked process integrity"
        );

        ProcessIntegrityResult {
            friction_level,
            research_quality_score,
            time_metrics,
            conviction_result,
            recommendations,
            override_required: friction_level > FrictionLevel::None,
            acknowledgment_required: friction_level == FrictionLevel::Hard,
        }
    }

    /// Decide whether an override attempt may proceed
    ///
    /// Soft and medium friction are silently overridable. Hard friction
    /// requires the attempt to acknowledge the warnings and carry a
    /// non-empty justification. Never fails; denials carry a reason.
    pub fn validate_override(
        &self,
        level: FrictionLevel,
        request: &OverrideRequest,
    ) -> OverrideValidation {
        if level != FrictionLevel::Hard {
            return OverrideValidation {
                allowed: true,
                reason: None,
            };
        }

        if !request.acknowledged {
            warn!(level = %level, "Override rejected without acknowledgment");
            return OverrideValidation {
                allowed: false,
                reason: Some(
                    "Hard friction requires explicit acknowledgment of the warnings".to_string(),
                ),
            };
        }

        let justified = request
            .justification
            .as_deref()
            .map_or(false, |text| !text.trim().is_empty());
        if !justified {
            warn!(level = %level, "Override rejected without justification");
            return OverrideValidation {
                allowed: false,
                reason: Some(
                    "Hard friction requires a written justification to proceed".to_string(),
                ),
            };
        }

        OverrideValidation {
            allowed: true,
            reason: None,
        }
    }

    fn consolidated_recommendations(
        &self,
        level: FrictionLevel,
        research_quality: &ResearchQualityScore,
        time_metrics: &TimeMetrics,
        conviction: &ConvictionResult,
    ) -> Vec<String> {
        let mut recommendations = research_quality.recommendations.clone();

        if time_metrics.is_rushed {
            recommendations.push("Let the thesis mature before trading it".to_string());
        }
        if conviction.is_volatile {
            recommendations.push(
                "Conviction is swinging sharply; let it settle before sizing a position"
                    .to_string(),
            );
        }
        if conviction.is_overconfident {
            recommendations.push(
                "Conviction has stayed high without hedging; actively seek disconfirming evidence"
                    .to_string(),
            );
        }

        match level {
            FrictionLevel::None => {}
            FrictionLevel::Soft => {
                recommendations.push("Review the gaps above before placing this trade".to_string())
            }
            FrictionLevel::Medium => recommendations.push(
                "Multiple process warnings are active; close the gaps before trading".to_string(),
            ),
            FrictionLevel::Hard => recommendations.push(
                "Trading is gated; acknowledge the risks explicitly to proceed".to_string(),
            ),
        }

        dedup_recommendations(recommendations)
    }
}
