use std::env;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Default ceiling of distinct relevant tools for full breadth credit
const DEFAULT_UNIQUE_TOOL_CEILING: u32 = 8;

/// Default minutes below which a session earns no time credit
const DEFAULT_MINIMUM_MINUTES: f64 = 10.0;

/// Default minutes at which a session earns full time credit
const DEFAULT_FULL_CREDIT_MINUTES: f64 = 60.0;

/// Default hour boundary between nascent and developing
const DEFAULT_DEVELOPING_AFTER_HOURS: f64 = 24.0;

/// Default hour boundary between developing and maturing
const DEFAULT_MATURING_AFTER_HOURS: f64 = 72.0;

/// Default hour boundary between maturing and seasoned
const DEFAULT_SEASONED_AFTER_HOURS: f64 = 168.0;

/// Default neutral midpoint for conviction scoring
const DEFAULT_CONVICTION_BASE: f64 = 50.0;

/// Default score threshold for the overconfidence predicate
const DEFAULT_OVERCONFIDENCE_SCORE: f64 = 85.0;

/// Scoring configuration, grouped per component
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Research-quality scoring weights and thresholds
    #[serde(default)]
    pub research: ResearchQualityConfig,
    /// Thesis maturity boundaries and rushed thresholds
    #[serde(default)]
    pub maturity: MaturityConfig,
    /// Conviction lexicon weights and trend tolerances
    #[serde(default)]
    pub conviction: ConvictionConfig,
    /// Friction escalation bounds
    #[serde(default)]
    pub friction: FrictionConfig,
}

/// Research-quality scoring configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchQualityConfig {
    /// Distinct relevant tools needed for full breadth credit
    #[serde(default = "default_unique_tool_ceiling")]
    pub unique_tool_ceiling: u32,
    /// Points available for unique-tool breadth
    #[serde(default = "default_tool_breadth_points")]
    pub tool_breadth_points: f64,
    /// Points available for category coverage
    #[serde(default = "default_category_coverage_points")]
    pub category_coverage_points: f64,
    /// Points awarded when the devil's advocate was engaged
    #[serde(default = "default_devils_advocate_points")]
    pub devils_advocate_points: f64,
    /// Points per documented assumption
    #[serde(default = "default_points_per_assumption")]
    pub points_per_assumption: f64,
    /// Cap on assumption points
    #[serde(default = "default_assumptions_cap")]
    pub assumptions_cap: f64,
    /// Minutes below which a session earns no time credit
    #[serde(default = "default_minimum_minutes")]
    pub minimum_minutes: f64,
    /// Minutes at which the time ramp reaches full credit
    #[serde(default = "default_full_credit_minutes")]
    pub full_credit_minutes: f64,
    /// Points available for time invested
    #[serde(default = "default_time_points")]
    pub time_points: f64,
    /// Tool sub-score below which a tool recommendation fires
    #[serde(default = "default_tool_advice_below")]
    pub tool_advice_below: f64,
    /// Assumption sub-score below which an assumption recommendation fires
    #[serde(default = "default_assumptions_advice_below")]
    pub assumptions_advice_below: f64,
    /// Time sub-score below which a time recommendation fires
    #[serde(default = "default_time_advice_below")]
    pub time_advice_below: f64,
}

/// Thesis maturity configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MaturityConfig {
    /// Hours after which a thesis is developing rather than nascent
    #[serde(default = "default_developing_after_hours")]
    pub developing_after_hours: f64,
    /// Hours after which a thesis is maturing
    #[serde(default = "default_maturing_after_hours")]
    pub maturing_after_hours: f64,
    /// Hours after which a thesis is seasoned
    #[serde(default = "default_seasoned_after_hours")]
    pub seasoned_after_hours: f64,
    /// Hours below which a thesis may be flagged rushed
    #[serde(default = "default_rushed_below_hours")]
    pub rushed_below_hours: f64,
    /// Evolution events at or above which a thesis is never rushed
    #[serde(default = "default_rushed_evolution_floor")]
    pub rushed_evolution_floor: u32,
}

/// Conviction analysis configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvictionConfig {
    /// Neutral starting score before lexicon adjustments
    #[serde(default = "default_conviction_base")]
    pub base_score: f64,
    /// Points added per certainty phrase match
    #[serde(default = "default_certainty_weight")]
    pub certainty_weight: f64,
    /// Points removed per hedging phrase match
    #[serde(default = "default_hedging_weight")]
    pub hedging_weight: f64,
    /// Half-average difference below which a trend reads as stable
    #[serde(default = "default_trend_tolerance")]
    pub trend_tolerance: f64,
    /// Swing magnitude at or above which oscillation reads as volatile
    #[serde(default = "default_volatility_swing")]
    pub volatility_swing: f64,
    /// Score at or above which a statement counts toward overconfidence
    #[serde(default = "default_overconfidence_score")]
    pub overconfidence_score: f64,
    /// Consecutive hedge-free high-conviction statements required
    #[serde(default = "default_overconfidence_window")]
    pub overconfidence_window: usize,
}

/// Friction escalation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrictionConfig {
    /// Research-quality score below which the dimension is weak
    #[serde(default = "default_weak_research_below")]
    pub weak_research_below: f64,
    /// Research-quality score at or below which quality is near zero
    #[serde(default = "default_near_zero_research")]
    pub near_zero_research: f64,
    /// Recent confirmed overrides above which friction escalates to hard
    #[serde(default = "default_override_escalation_threshold")]
    pub override_escalation_threshold: u32,
}

fn default_unique_tool_ceiling() -> u32 {
    DEFAULT_UNIQUE_TOOL_CEILING
}

fn default_tool_breadth_points() -> f64 {
    25.0
}

fn default_category_coverage_points() -> f64 {
    15.0
}

fn default_devils_advocate_points() -> f64 {
    25.0
}

fn default_points_per_assumption() -> f64 {
    5.0
}

fn default_assumptions_cap() -> f64 {
    20.0
}

fn default_minimum_minutes() -> f64 {
    DEFAULT_MINIMUM_MINUTES
}

fn default_full_credit_minutes() -> f64 {
    DEFAULT_FULL_CREDIT_MINUTES
}

fn default_time_points() -> f64 {
    15.0
}

fn default_tool_advice_below() -> f64 {
    20.0
}

fn default_assumptions_advice_below() -> f64 {
    10.0
}

fn default_time_advice_below() -> f64 {
    10.0
}

fn default_developing_after_hours() -> f64 {
    DEFAULT_DEVELOPING_AFTER_HOURS
}

fn default_maturing_after_hours() -> f64 {
    DEFAULT_MATURING_AFTER_HOURS
}

fn default_seasoned_after_hours() -> f64 {
    DEFAULT_SEASONED_AFTER_HOURS
}

fn default_rushed_below_hours() -> f64 {
    DEFAULT_DEVELOPING_AFTER_HOURS
}

fn default_rushed_evolution_floor() -> u32 {
    3
}

fn default_conviction_base() -> f64 {
    DEFAULT_CONVICTION_BASE
}

fn default_certainty_weight() -> f64 {
    10.0
}

fn default_hedging_weight() -> f64 {
    10.0
}

fn default_trend_tolerance() -> f64 {
    5.0
}

fn default_volatility_swing() -> f64 {
    15.0
}

fn default_overconfidence_score() -> f64 {
    DEFAULT_OVERCONFIDENCE_SCORE
}

fn default_overconfidence_window() -> usize {
    3
}

fn default_weak_research_below() -> f64 {
    40.0
}

fn default_near_zero_research() -> f64 {
    10.0
}

fn default_override_escalation_threshold() -> u32 {
    3
}

fn env_f64(key: &str, default: f64) -> f64 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_u32(key: &str, default: u32) -> u32 {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

fn env_usize(key: &str, default: usize) -> usize {
    env::var(key)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Every variable is optional; unset or unparsable values fall back to
    /// the defaults. The loaded configuration is validated before return.
    pub fn from_env() -> AppResult<Self> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        let research = ResearchQualityConfig {
            unique_tool_ceiling: env_u32("PI_UNIQUE_TOOL_CEILING", DEFAULT_UNIQUE_TOOL_CEILING),
            tool_breadth_points: env_f64("PI_TOOL_BREADTH_POINTS", default_tool_breadth_points()),
            category_coverage_points: env_f64(
                "PI_CATEGORY_COVERAGE_POINTS",
                default_category_coverage_points(),
            ),
            devils_advocate_points: env_f64(
                "PI_DEVILS_ADVOCATE_POINTS",
                default_devils_advocate_points(),
            ),
            points_per_assumption: env_f64(
                "PI_POINTS_PER_ASSUMPTION",
                default_points_per_assumption(),
            ),
            assumptions_cap: env_f64("PI_ASSUMPTIONS_CAP", default_assumptions_cap()),
            minimum_minutes: env_f64("PI_MINIMUM_MINUTES", DEFAULT_MINIMUM_MINUTES),
            full_credit_minutes: env_f64("PI_FULL_CREDIT_MINUTES", DEFAULT_FULL_CREDIT_MINUTES),
            time_points: env_f64("PI_TIME_POINTS", default_time_points()),
            tool_advice_below: env_f64("PI_TOOL_ADVICE_BELOW", default_tool_advice_below()),
            assumptions_advice_below: env_f64(
                "PI_ASSUMPTIONS_ADVICE_BELOW",
                default_assumptions_advice_below(),
            ),
            time_advice_below: env_f64("PI_TIME_ADVICE_BELOW", default_time_advice_below()),
        };

        let maturity = MaturityConfig {
            developing_after_hours: env_f64(
                "PI_DEVELOPING_AFTER_HOURS",
                DEFAULT_DEVELOPING_AFTER_HOURS,
            ),
            maturing_after_hours: env_f64("PI_MATURING_AFTER_HOURS", DEFAULT_MATURING_AFTER_HOURS),
            seasoned_after_hours: env_f64("PI_SEASONED_AFTER_HOURS", DEFAULT_SEASONED_AFTER_HOURS),
            rushed_below_hours: env_f64("PI_RUSHED_BELOW_HOURS", default_rushed_below_hours()),
            rushed_evolution_floor: env_u32(
                "PI_RUSHED_EVOLUTION_FLOOR",
                default_rushed_evolution_floor(),
            ),
        };

        let conviction = ConvictionConfig {
            base_score: env_f64("PI_CONVICTION_BASE", DEFAULT_CONVICTION_BASE),
            certainty_weight: env_f64("PI_CERTAINTY_WEIGHT", default_certainty_weight()),
            hedging_weight: env_f64("PI_HEDGING_WEIGHT", default_hedging_weight()),
            trend_tolerance: env_f64("PI_TREND_TOLERANCE", default_trend_tolerance()),
            volatility_swing: env_f64("PI_VOLATILITY_SWING", default_volatility_swing()),
            overconfidence_score: env_f64("PI_OVERCONFIDENCE_SCORE", DEFAULT_OVERCONFIDENCE_SCORE),
            overconfidence_window: env_usize(
                "PI_OVERCONFIDENCE_WINDOW",
                default_overconfidence_window(),
            ),
        };

        let friction = FrictionConfig {
            weak_research_below: env_f64("PI_WEAK_RESEARCH_BELOW", default_weak_research_below()),
            near_zero_research: env_f64("PI_NEAR_ZERO_RESEARCH", default_near_zero_research()),
            override_escalation_threshold: env_u32(
                "PI_OVERRIDE_ESCALATION_THRESHOLD",
                default_override_escalation_threshold(),
            ),
        };

        let config = Config {
            research,
            maturity,
            conviction,
            friction,
        };
        config.validate()?;
        Ok(config)
    }

    /// Check cross-field constraints the per-field defaults cannot express
    pub fn validate(&self) -> AppResult<()> {
        if self.research.unique_tool_ceiling == 0 {
            return Err(AppError::Config {
                message: "unique_tool_ceiling must be at least 1".to_string(),
            });
        }
        if self.research.full_credit_minutes <= self.research.minimum_minutes {
            return Err(AppError::Config {
                message: format!(
                    "full_credit_minutes ({}) must exceed minimum_minutes ({})",
                    self.research.full_credit_minutes, self.research.minimum_minutes
                ),
            });
        }
        if !(self.maturity.developing_after_hours < self.maturity.maturing_after_hours
            && self.maturity.maturing_after_hours < self.maturity.seasoned_after_hours)
        {
            return Err(AppError::Config {
                message: format!(
                    "maturity boundaries must increase: {} < {} < {}",
                    self.maturity.developing_after_hours,
                    self.maturity.maturing_after_hours,
                    self.maturity.seasoned_after_hours
                ),
            });
        }
        if self.conviction.overconfidence_window == 0 {
            return Err(AppError::Config {
                message: "overconfidence_window must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for ResearchQualityConfig {
    fn default() -> Self {
        Self {
            unique_tool_ceiling: default_unique_tool_ceiling(),
            tool_breadth_points: default_tool_breadth_points(),
            category_coverage_points: default_category_coverage_points(),
            devils_advocate_points: default_devils_advocate_points(),
            points_per_assumption: default_points_per_assumption(),
            assumptions_cap: default_assumptions_cap(),
            minimum_minutes: default_minimum_minutes(),
            full_credit_minutes: default_full_credit_minutes(),
            time_points: default_time_points(),
            tool_advice_below: default_tool_advice_below(),
            assumptions_advice_below: default_assumptions_advice_below(),
            time_advice_below: default_time_advice_below(),
        }
    }
}

impl Default for MaturityConfig {
    fn default() -> Self {
        Self {
            developing_after_hours: default_developing_after_hours(),
            maturing_after_hours: default_maturing_after_hours(),
            seasoned_after_hours: default_seasoned_after_hours(),
            rushed_below_hours: default_rushed_below_hours(),
            rushed_evolution_floor: default_rushed_evolution_floor(),
        }
    }
}

impl Default for ConvictionConfig {
    fn default() -> Self {
        Self {
            base_score: default_conviction_base(),
            certainty_weight: default_certainty_weight(),
            hedging_weight: default_hedging_weight(),
            trend_tolerance: default_trend_tolerance(),
            volatility_swing: default_volatility_swing(),
            overconfidence_score: default_overconfidence_score(),
            overconfidence_window: default_overconfidence_window(),
        }
    }
}

impl Default for FrictionConfig {
    fn default() -> Self {
        Self {
            weak_research_below: default_weak_research_below(),
            near_zero_research: default_near_zero_research(),
            override_escalation_threshold: default_override_escalation_threshold(),
        }
    }
}
