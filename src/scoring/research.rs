//! Research-quality scoring for research sessions.
//!
//! Scores a session's depth into a 0-100 quality score from four
//! weighted factors:
//! - tool usage: unique-tool breadth plus category coverage
//! - devil's-advocate engagement: full points or none
//! - documented assumptions: fixed points each, capped
//! - time invested: zero below a floor, then a linear ramp
//!
//! Also scores a set of sessions for the same thesis as one merged
//! session, and suggests what to improve for each weak factor.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::ResearchQualityConfig;
use crate::records::{distinct_tool_count, ResearchSession, ToolUsage};
use crate::taxonomy::{category_for_tool, ToolCategory};

/// Per-factor point breakdown behind a research-quality score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityBreakdown {
    /// Points from tool breadth and category coverage.
    pub tool_usage: f64,
    /// Points from devil's-advocate engagement.
    pub devils_advocate: f64,
    /// Points from documented assumptions.
    pub assumptions: f64,
    /// Points from time invested.
    pub time_spent: f64,
}

impl QualityBreakdown {
    fn zero() -> Self {
        Self {
            tool_usage: 0.0,
            devils_advocate: 0.0,
            assumptions: 0.0,
            time_spent: 0.0,
        }
    }
}

/// Research-quality score for a session or a merged set of sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchQualityScore {
    /// Total score in [0, 100].
    pub score: u32,
    /// Per-factor points behind the total.
    pub breakdown: QualityBreakdown,
    /// Suggestions for the weak factors, in check order.
    pub recommendations: Vec<String>,
}

/// Scorer for research session depth.
#[derive(Debug, Clone)]
pub struct ResearchQualityScorer {
    config: ResearchQualityConfig,
}

impl ResearchQualityScorer {
    /// Create a scorer with the given quality configuration
    pub fn new(config: &ResearchQualityConfig) -> Self {
        Self {
            config: config.clone(),
        }
    }

    /// Score a session against the current clock
    pub fn calculate_research_quality(&self, session: &ResearchSession) -> ResearchQualityScore {
        self.calculate_research_quality_at(session, Utc::now())
    }

    /// Score a session against an explicit clock
    ///
    /// The clock only matters for sessions still open; a closed session
    /// scores from its recorded duration. Incomplete sessions degrade to
    /// low scores rather than failing.
    pub fn calculate_research_quality_at(
        &self,
        session: &ResearchSession,
        now: DateTime<Utc>,
    ) -> ResearchQualityScore {
        let tool_usage = self.tool_usage_points(&session.tool_usage);
        let devils_advocate = if session.devils_advocate_engaged {
            self.config.devils_advocate_points
        } else {
            0.0
        };
        let assumptions = (session.assumptions_documented as f64
            * self.config.points_per_assumption)
            .min(self.config.assumptions_cap);
        let time_spent = self.time_points(session.elapsed_minutes(now));

        let breakdown = QualityBreakdown {
            tool_usage,
            devils_advocate,
            assumptions,
            time_spent,
        };
        let total = tool_usage + devils_advocate + assumptions + time_spent;
        let score = total.round().clamp(0.0, 100.0) as u32;
        let recommendations = self.recommendations(&session.tool_usage, &breakdown);

        debug!(
            score,
            tool_usage,
            devils_advocate,
            assumptions,
            time_spent,
            "Calculated research quality"
        );

        ResearchQualityScore {
            score,
            breakdown,
            recommendations,
        }
    }

    /// Score every session for a thesis as one merged session
    pub fn calculate_aggregated_research_quality(
        &self,
        sessions: &[ResearchSession],
    ) -> ResearchQualityScore {
        self.calculate_aggregated_research_quality_at(sessions, Utc::now())
    }

    /// Score every session for a thesis against an explicit clock
    ///
    /// Tool usage merges across sessions in timestamp order, assumption
    /// counts sum, and devil's-advocate engagement carries over from any
    /// session. Only closed sessions contribute elapsed time; the merged
    /// view is scored as a single session whose start is back-dated by
    /// the summed duration.
    pub fn calculate_aggregated_research_quality_at(
        &self,
        sessions: &[ResearchSession],
        now: DateTime<Utc>,
    ) -> ResearchQualityScore {
        if sessions.is_empty() {
            return ResearchQualityScore {
                score: 0,
                breakdown: QualityBreakdown::zero(),
                recommendations: vec![
                    "Start a research session before acting on this thesis".to_string(),
                ],
            };
        }

        let mut tool_usage: Vec<ToolUsage> = sessions
            .iter()
            .flat_map(|s| s.tool_usage.iter().cloned())
            .collect();
        tool_usage.sort_by_key(|entry| entry.timestamp);

        let total_minutes: f64 = sessions
            .iter()
            .filter(|s| s.ended_at.is_some())
            .map(|s| s.elapsed_minutes(now))
            .sum();

        let tools_used_count = tool_usage.iter().map(|entry| entry.count).sum();
        let unique_tools_used = distinct_tool_count(&tool_usage);
        let combined = ResearchSession {
            id: "aggregated".to_string(),
            user_id: sessions[0].user_id.clone(),
            thesis_id: sessions[0].thesis_id.clone(),
            conversation_id: None,
            started_at: now - Duration::seconds((total_minutes * 60.0).round() as i64),
            ended_at: Some(now),
            tool_usage,
            tools_used_count,
            unique_tools_used,
            devils_advocate_engaged: sessions.iter().any(|s| s.devils_advocate_engaged),
            assumptions_documented: sessions.iter().map(|s| s.assumptions_documented).sum(),
        };

        self.calculate_research_quality_at(&combined, now)
    }

    /// Breadth and coverage points from the relevant tools used
    fn tool_usage_points(&self, usage: &[ToolUsage]) -> f64 {
        let unique_relevant = relevant_unique_tools(usage);
        let covered = covered_categories(usage);

        let breadth = (unique_relevant.len() as f64 / self.config.unique_tool_ceiling as f64)
            .min(1.0)
            * self.config.tool_breadth_points;
        let coverage = covered.len() as f64 / ToolCategory::ALL.len() as f64
            * self.config.category_coverage_points;
        breadth + coverage
    }

    /// Time points: nothing below the floor, then a linear ramp
    fn time_points(&self, minutes: f64) -> f64 {
        if minutes < self.config.minimum_minutes {
            return 0.0;
        }
        let span = self.config.full_credit_minutes - self.config.minimum_minutes;
        ((minutes - self.config.minimum_minutes) / span).min(1.0) * self.config.time_points
    }

    fn recommendations(&self, usage: &[ToolUsage], breakdown: &QualityBreakdown) -> Vec<String> {
        let mut recommendations = Vec::new();

        if breakdown.tool_usage < self.config.tool_advice_below {
            let covered = covered_categories(usage);
            let unused: Vec<&str> = ToolCategory::ALL
                .iter()
                .filter(|category| !covered.contains(category))
                .map(|category| category.as_str())
                .collect();
            if unused.is_empty() {
                recommendations.push("Use more research tools before deciding".to_string());
            } else {
                recommendations.push(format!(
                    "Broaden your research with {} tools",
                    unused.join(", ")
                ));
            }
        }
        if breakdown.devils_advocate == 0.0 {
            recommendations.push(
                "Challenge your thesis with a devil's advocate pass to surface the bear case"
                    .to_string(),
            );
        }
        if breakdown.assumptions < self.config.assumptions_advice_below {
            recommendations
                .push("Document the assumptions your thesis depends on".to_string());
        }
        if breakdown.time_spent < self.config.time_advice_below {
            recommendations
                .push("Spend more time with the data before acting on this thesis".to_string());
        }

        recommendations
    }
}

fn relevant_unique_tools(usage: &[ToolUsage]) -> HashSet<String> {
    usage
        .iter()
        .filter(|entry| category_for_tool(&entry.tool).is_some())
        .map(|entry| entry.tool.to_lowercase())
        .collect()
}

fn covered_categories(usage: &[ToolUsage]) -> HashSet<ToolCategory> {
    usage
        .iter()
        .filter_map(|entry| category_for_tool(&entry.tool))
        .collect()
}
