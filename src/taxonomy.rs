//! Static classification data for scoring.
//!
//! Two kinds of enumerated configuration live here:
//! - The research tool taxonomy: four categories of research tools, each
//!   with a fixed tool-name list. Tools outside the taxonomy contribute
//!   nothing to scoring.
//! - The conviction lexicons: certainty and hedging phrase lists scanned
//!   against free-text statements.
//!
//! All data is immutable and constructed at compile time.

use serde::{Deserialize, Serialize};

/// Research tool categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolCategory {
    /// Chart and price-behavior analysis tools.
    Analysis,
    /// Market and fundamental data tools.
    Data,
    /// Cross-checking tools that test a thesis against outside views.
    Validation,
    /// Tools that deliberately seek disconfirming evidence.
    DevilsAdvocate,
}

impl ToolCategory {
    /// All categories, in scoring order.
    pub const ALL: [ToolCategory; 4] = [
        ToolCategory::Analysis,
        ToolCategory::Data,
        ToolCategory::Validation,
        ToolCategory::DevilsAdvocate,
    ];

    /// Get the category name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolCategory::Analysis => "analysis",
            ToolCategory::Data => "data",
            ToolCategory::Validation => "validation",
            ToolCategory::DevilsAdvocate => "devils_advocate",
        }
    }

    /// Tool names belonging to this category.
    pub fn tools(&self) -> &'static [&'static str] {
        match self {
            ToolCategory::Analysis => ANALYSIS_TOOLS,
            ToolCategory::Data => DATA_TOOLS,
            ToolCategory::Validation => VALIDATION_TOOLS,
            ToolCategory::DevilsAdvocate => DEVILS_ADVOCATE_TOOLS,
        }
    }
}

impl std::fmt::Display for ToolCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ToolCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "analysis" => Ok(ToolCategory::Analysis),
            "data" => Ok(ToolCategory::Data),
            "validation" => Ok(ToolCategory::Validation),
            "devils_advocate" => Ok(ToolCategory::DevilsAdvocate),
            _ => Err(format!("Unknown tool category: {}", s)),
        }
    }
}

const ANALYSIS_TOOLS: &[&str] = &[
    "technical_analysis",
    "chart_patterns",
    "price_history",
    "volatility_metrics",
];

const DATA_TOOLS: &[&str] = &[
    "market_quote",
    "company_fundamentals",
    "earnings_calendar",
    "news_search",
    "sector_performance",
];

const VALIDATION_TOOLS: &[&str] = &[
    "analyst_consensus",
    "peer_comparison",
    "historical_backtest",
];

const DEVILS_ADVOCATE_TOOLS: &[&str] = &["devils_advocate", "bear_case", "risk_scenarios"];

/// Look up the category for a tool name, case-insensitively.
///
/// Returns `None` for tools outside the taxonomy; unknown tools are
/// ignored by scoring rather than penalized.
pub fn category_for_tool(tool: &str) -> Option<ToolCategory> {
    let tool = tool.to_lowercase();
    ToolCategory::ALL
        .into_iter()
        .find(|category| category.tools().contains(&tool.as_str()))
}

/// Whether a tool name belongs to the research taxonomy.
pub fn is_relevant_tool(tool: &str) -> bool {
    category_for_tool(tool).is_some()
}

/// Strong-language phrases that raise a conviction score.
pub const CERTAINTY_PHRASES: &[&str] = &[
    "definitely",
    "certain",
    "certainly",
    "strong conviction",
    "confident",
    "absolutely",
    "guaranteed",
    "no doubt",
    "without a doubt",
    "clearly",
    "obviously",
    "convinced",
    "sure thing",
    "all in",
    "can't lose",
    "slam dunk",
];

/// Hedging phrases that lower a conviction score.
pub const HEDGING_PHRASES: &[&str] = &[
    "maybe",
    "i think",
    "not sure",
    "possibly",
    "perhaps",
    "might",
    "could be",
    "unsure",
    "uncertain",
    "i guess",
    "probably",
    "seems like",
    "hopefully",
    "i feel like",
    "risky",
];

/// Count word-boundary occurrences of `phrase` within `text`.
///
/// Matching is case-insensitive. A candidate only counts when the
/// characters adjacent to the matched span are not alphanumeric, so
/// "certain" does not match inside "uncertain" and "might" does not
/// match inside "mighty".
pub(crate) fn phrase_occurrences(text: &str, phrase: &str) -> usize {
    let haystack = text.to_lowercase();
    let needle = phrase.to_lowercase();
    if needle.is_empty() {
        return 0;
    }

    let bytes = haystack.as_bytes();
    let mut count = 0;
    let mut from = 0;
    while let Some(pos) = haystack[from..].find(&needle) {
        let start = from + pos;
        let end = start + needle.len();
        let open = start == 0 || !bytes[start - 1].is_ascii_alphanumeric();
        let closed = end == bytes.len() || !bytes[end].is_ascii_alphanumeric();
        if open && closed {
            count += 1;
        }
        from = start
            + haystack[start..]
                .chars()
                .next()
                .map_or(1, |c| c.len_utf8());
    }
    count
}
