//! Typed records exchanged with the persistence and API layers.
//!
//! This module defines the entities the scoring engine reads:
//! - [`ResearchSession`]: one research/chat session with its tool usage
//! - [`ConvictionRecord`]: one point-in-time conviction reading
//! - [`ThesisTiming`]: timeline inputs for maturity analysis
//! - [`RawThesisTiming`]: the same timeline as a raw datastore row
//!
//! Field names serialize in camelCase because they are the wire contract
//! the surrounding application binds against. The engine never stores or
//! deletes these records; ownership stays with the caller.

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;

use std::collections::HashSet;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{RecordError, RecordResult};

/// Fallback format for legacy rows that stored naive UTC timestamps
const LEGACY_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One tool invocation entry within a research session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolUsage {
    /// Tool name as invoked.
    pub tool: String,
    /// Number of invocations this entry represents.
    pub count: u32,
    /// Ticker symbols the invocation touched.
    pub symbols: Vec<String>,
    /// When the tool was invoked.
    pub timestamp: DateTime<Utc>,
}

/// A research/chat session, optionally tied to a thesis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResearchSession {
    /// Unique session identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Thesis under research, if the session is tied to one.
    pub thesis_id: Option<String>,
    /// Chat conversation the session grew out of, if any.
    pub conversation_id: Option<String>,
    /// When the session was opened.
    pub started_at: DateTime<Utc>,
    /// When the session was closed. None while the session is open.
    pub ended_at: Option<DateTime<Utc>>,
    /// Ordered tool invocation entries.
    pub tool_usage: Vec<ToolUsage>,
    /// Total tool invocations across all entries.
    pub tools_used_count: u32,
    /// Cardinality of distinct tool names in `tool_usage`.
    pub unique_tools_used: u32,
    /// Whether the user deliberately sought disconfirming evidence.
    pub devils_advocate_engaged: bool,
    /// Number of assumptions the user wrote down.
    pub assumptions_documented: u32,
}

impl ResearchSession {
    /// Open a new session for a user
    pub fn new(user_id: impl Into<String>) -> Self {
        Self::new_at(user_id, Utc::now())
    }

    /// Open a new session with an explicit start time
    pub fn new_at(user_id: impl Into<String>, started_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            thesis_id: None,
            conversation_id: None,
            started_at,
            ended_at: None,
            tool_usage: Vec::new(),
            tools_used_count: 0,
            unique_tools_used: 0,
            devils_advocate_engaged: false,
            assumptions_documented: 0,
        }
    }

    /// Tie the session to a thesis
    pub fn with_thesis(mut self, thesis_id: impl Into<String>) -> Self {
        self.thesis_id = Some(thesis_id.into());
        self
    }

    /// Tie the session to a chat conversation
    pub fn with_conversation(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = Some(conversation_id.into());
        self
    }

    /// Record a tool invocation, keeping the usage counts consistent
    pub fn record_tool_use(&mut self, tool: impl Into<String>, symbols: Vec<String>) {
        self.record_tool_use_at(tool, symbols, Utc::now());
    }

    /// Record a tool invocation with an explicit timestamp
    pub fn record_tool_use_at(
        &mut self,
        tool: impl Into<String>,
        symbols: Vec<String>,
        at: DateTime<Utc>,
    ) {
        self.tool_usage.push(ToolUsage {
            tool: tool.into(),
            count: 1,
            symbols,
            timestamp: at,
        });
        self.tools_used_count += 1;
        self.unique_tools_used = distinct_tool_count(&self.tool_usage);
    }

    /// Count one documented assumption
    pub fn document_assumption(&mut self) {
        self.assumptions_documented += 1;
    }

    /// Mark the devil's advocate as engaged
    pub fn engage_devils_advocate(&mut self) {
        self.devils_advocate_engaged = true;
    }

    /// Close the session
    pub fn end(&mut self) {
        self.end_at(Utc::now());
    }

    /// Close the session at an explicit time
    ///
    /// Idempotent: a closed session keeps its original end. A close time
    /// before the open time is clamped to the open time so the
    /// `ended_at >= started_at` invariant holds.
    pub fn end_at(&mut self, at: DateTime<Utc>) {
        if self.ended_at.is_none() {
            self.ended_at = Some(at.max(self.started_at));
        }
    }

    /// Whether the session is still open
    pub fn is_open(&self) -> bool {
        self.ended_at.is_none()
    }

    /// Elapsed minutes from open to close, or to `now` while still open
    pub fn elapsed_minutes(&self, now: DateTime<Utc>) -> f64 {
        let end = self.ended_at.unwrap_or(now);
        let seconds = (end - self.started_at).num_seconds().max(0);
        seconds as f64 / 60.0
    }
}

/// Distinct tool-name cardinality, compared case-insensitively.
pub(crate) fn distinct_tool_count(usage: &[ToolUsage]) -> u32 {
    let names: HashSet<String> = usage.iter().map(|u| u.tool.to_lowercase()).collect();
    names.len() as u32
}

/// Where a conviction statement came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConvictionSource {
    /// A message in the research chat.
    #[default]
    ChatMessage,
    /// An edit to the thesis itself.
    ThesisRevision,
    /// A note attached to a proposed trade.
    TradeNote,
}

impl std::fmt::Display for ConvictionSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConvictionSource::ChatMessage => write!(f, "chat_message"),
            ConvictionSource::ThesisRevision => write!(f, "thesis_revision"),
            ConvictionSource::TradeNote => write!(f, "trade_note"),
        }
    }
}

impl std::str::FromStr for ConvictionSource {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "chat_message" => Ok(ConvictionSource::ChatMessage),
            "thesis_revision" => Ok(ConvictionSource::ThesisRevision),
            "trade_note" => Ok(ConvictionSource::TradeNote),
            _ => Err(format!("Unknown conviction source: {}", s)),
        }
    }
}

/// One point-in-time conviction reading derived from a statement.
///
/// Records are never mutated after creation; a thesis's records ordered
/// by `analyzed_at` ascending form its conviction time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConvictionRecord {
    /// Unique record identifier.
    pub id: String,
    /// Owning user.
    pub user_id: String,
    /// Thesis the statement is about.
    pub thesis_id: String,
    /// The statement as the user wrote it.
    pub statement_text: String,
    /// Where the statement came from.
    pub source_type: ConvictionSource,
    /// Identifier of the source message/revision/note, if known.
    pub source_id: Option<String>,
    /// Conviction score, clamped to [0, 100].
    pub conviction_score: f64,
    /// Certainty phrases matched in the statement, one per occurrence.
    pub certainty_indicators: Vec<String>,
    /// Hedging phrases matched in the statement, one per occurrence.
    pub hedging_indicators: Vec<String>,
    /// When the statement was analyzed.
    pub analyzed_at: DateTime<Utc>,
}

impl ConvictionRecord {
    /// Create a record for a statement, at the neutral midpoint
    pub fn new(
        user_id: impl Into<String>,
        thesis_id: impl Into<String>,
        statement_text: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.into(),
            thesis_id: thesis_id.into(),
            statement_text: statement_text.into(),
            source_type: ConvictionSource::default(),
            source_id: None,
            conviction_score: 50.0,
            certainty_indicators: Vec::new(),
            hedging_indicators: Vec::new(),
            analyzed_at: Utc::now(),
        }
    }

    /// Set the source type
    pub fn with_source(mut self, source_type: ConvictionSource) -> Self {
        self.source_type = source_type;
        self
    }

    /// Set the source identifier
    pub fn with_source_id(mut self, source_id: impl Into<String>) -> Self {
        self.source_id = Some(source_id.into());
        self
    }

    /// Set the conviction score, clamped to [0, 100]
    pub fn with_score(mut self, score: f64) -> Self {
        self.conviction_score = score.clamp(0.0, 100.0);
        self
    }

    /// Set the matched indicator lists
    pub fn with_indicators(mut self, certainty: Vec<String>, hedging: Vec<String>) -> Self {
        self.certainty_indicators = certainty;
        self.hedging_indicators = hedging;
        self
    }

    /// Set the analysis timestamp
    pub fn with_analyzed_at(mut self, analyzed_at: DateTime<Utc>) -> Self {
        self.analyzed_at = analyzed_at;
        self
    }
}

/// Timeline inputs for thesis maturity analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThesisTiming {
    /// Earliest informal mention of the idea, if one was captured.
    pub first_mentioned_at: Option<DateTime<Utc>>,
    /// When the idea became an explicit thesis, if it was promoted.
    pub promoted_to_explicit_at: Option<DateTime<Utc>>,
    /// When the thesis record was created.
    pub created_at: DateTime<Utc>,
    /// Documented refinements to the thesis.
    pub evolution_event_count: u32,
}

impl ThesisTiming {
    /// Timeline for a thesis created at the given time
    pub fn new(created_at: DateTime<Utc>) -> Self {
        Self {
            first_mentioned_at: None,
            promoted_to_explicit_at: None,
            created_at,
            evolution_event_count: 0,
        }
    }

    /// Set the earliest informal mention
    pub fn with_first_mention(mut self, at: DateTime<Utc>) -> Self {
        self.first_mentioned_at = Some(at);
        self
    }

    /// Set the promotion time
    pub fn with_promotion(mut self, at: DateTime<Utc>) -> Self {
        self.promoted_to_explicit_at = Some(at);
        self
    }

    /// Set the evolution event count
    pub fn with_evolution_events(mut self, count: u32) -> Self {
        self.evolution_event_count = count;
        self
    }
}

/// Thesis timeline fields as a schemaless datastore row supplies them.
///
/// Everything is nullable and timestamps arrive as strings. [`resolve`]
/// turns a row into a [`ThesisTiming`], defaulting what is missing.
///
/// [`resolve`]: RawThesisTiming::resolve
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawThesisTiming {
    /// Earliest informal mention, RFC 3339 or legacy format.
    pub first_mentioned_at: Option<String>,
    /// Promotion time, RFC 3339 or legacy format.
    pub promoted_to_explicit_at: Option<String>,
    /// Creation time, RFC 3339 or legacy format.
    pub created_at: Option<String>,
    /// Documented refinements; may be absent or negative in dirty rows.
    pub evolution_event_count: Option<i64>,
}

impl RawThesisTiming {
    /// Resolve the raw row into a typed timeline
    ///
    /// Empty and whitespace-only strings count as absent. A missing
    /// `created_at` defaults to `now`, so a thesis with no stored
    /// timestamps reads as zero hours old rather than failing. Negative
    /// event counts clamp to zero. The only error left is a timestamp
    /// string that parses under neither accepted format.
    pub fn resolve(&self, now: DateTime<Utc>) -> RecordResult<ThesisTiming> {
        let first_mentioned_at = parse_optional("firstMentionedAt", &self.first_mentioned_at)?;
        let promoted_to_explicit_at =
            parse_optional("promotedToExplicitAt", &self.promoted_to_explicit_at)?;
        let created_at = match non_empty(&self.created_at) {
            Some(value) => parse_timestamp("createdAt", value)?,
            None => now,
        };
        let evolution_event_count = self.evolution_event_count.unwrap_or(0).max(0) as u32;

        Ok(ThesisTiming {
            first_mentioned_at,
            promoted_to_explicit_at,
            created_at,
            evolution_event_count,
        })
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

fn parse_optional(field: &str, value: &Option<String>) -> RecordResult<Option<DateTime<Utc>>> {
    non_empty(value)
        .map(|v| parse_timestamp(field, v))
        .transpose()
}

fn parse_timestamp(field: &str, value: &str) -> RecordResult<DateTime<Utc>> {
    if let Ok(parsed) = DateTime::parse_from_rfc3339(value) {
        return Ok(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, LEGACY_TIMESTAMP_FORMAT)
        .map(|naive| Utc.from_utc_datetime(&naive))
        .map_err(|e| RecordError::InvalidTimestamp {
            field: field.to_string(),
            value: value.to_string(),
            message: e.to_string(),
        })
}
