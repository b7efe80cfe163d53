//! # Process Integrity
//!
//! Scoring engines that measure the discipline behind a trading thesis
//! and place graduated friction in front of impulsive trades.
//!
//! ## Features
//!
//! - **Research Quality**: 0-100 depth score over tool usage, devil's-advocate
//!   engagement, documented assumptions, and time invested
//! - **Time in Thesis**: maturity bucketing from thesis timestamps with
//!   rushed-trade detection
//! - **Conviction Analysis**: lexicon-driven certainty scoring with trend,
//!   volatility, and overconfidence detection over statement history
//! - **Friction Gating**: graduated none/soft/medium/hard trade gate with
//!   consolidated recommendations and override validation
//!
//! ## Architecture
//!
//! ```text
//! API route → FrictionEngine::check_process_integrity
//!                 ├── ResearchQualityScorer (research sessions)
//!                 ├── TimeInThesisAnalyzer  (thesis timestamps)
//!                 └── ConvictionAnalyzer    (statement history)
//! ```
//!
//! The engines are pure and synchronous: no I/O, no shared state, every
//! reading computed from explicit inputs plus an optional clock. Callers
//! own persistence, authentication, and the UI surfacing the results.
//!
//! ## Example
//!
//! ```ignore
//! use process_integrity::{Config, FrictionEngine};
//! use process_integrity::records::{ResearchSession, ThesisTiming};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let engine = FrictionEngine::new(&config);
//!
//!     let mut session = ResearchSession::new("user-1");
//!     session.record_tool_use("market_quote", vec!["ACME".to_string()]);
//!     session.end();
//!     let timing = ThesisTiming::new(chrono::Utc::now());
//!
//!     let result = engine.check_process_integrity(
//!         &[session],
//!         &timing,
//!         "I think this breaks out next week",
//!         &[],
//!         0,
//!     );
//!     println!("friction: {}", result.friction_level);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Configuration management for the scoring engines.
pub mod config;
/// Error types and result aliases for the crate.
pub mod error;
/// Session, conviction, and thesis-timing records.
pub mod records;
/// Scoring engines: research quality, time in thesis, conviction, friction.
pub mod scoring;
/// Tool taxonomy and conviction lexicons.
pub mod taxonomy;

pub use config::Config;
pub use error::{AppError, AppResult};
pub use scoring::{
    ConvictionAnalyzer, ConvictionResult, FrictionEngine, FrictionLevel, MaturityLevel,
    ProcessIntegrityResult, ResearchQualityScore, ResearchQualityScorer, TimeInThesisAnalyzer,
    TimeMetrics,
};
