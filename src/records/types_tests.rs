//! Unit tests for record types, builders, and the raw-row adapter.
//!
//! Tests lifecycle invariants, clamping, serialization field names,
//! and timestamp parsing for ResearchSession, ConvictionRecord,
//! ThesisTiming, and RawThesisTiming.

use super::*;
use chrono::Duration;
use pretty_assertions::assert_eq;

fn fixed_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
}

// ============================================================================
// ResearchSession tests
// ============================================================================

#[test]
fn test_session_new() {
    let session = ResearchSession::new("user-1");
    assert!(!session.id.is_empty());
    assert_eq!(session.user_id, "user-1");
    assert!(session.thesis_id.is_none());
    assert!(session.conversation_id.is_none());
    assert!(session.ended_at.is_none());
    assert!(session.tool_usage.is_empty());
    assert_eq!(session.tools_used_count, 0);
    assert_eq!(session.unique_tools_used, 0);
    assert!(!session.devils_advocate_engaged);
    assert_eq!(session.assumptions_documented, 0);
    assert!(session.is_open());
}

#[test]
fn test_session_builders() {
    let session = ResearchSession::new("user-1")
        .with_thesis("thesis-9")
        .with_conversation("conv-4");
    assert_eq!(session.thesis_id, Some("thesis-9".to_string()));
    assert_eq!(session.conversation_id, Some("conv-4".to_string()));
}

#[test]
fn test_session_record_tool_use_updates_counts() {
    let mut session = ResearchSession::new_at("user-1", fixed_time());
    session.record_tool_use_at("market_quote", vec!["AAPL".to_string()], fixed_time());
    session.record_tool_use_at("market_quote", vec!["MSFT".to_string()], fixed_time());
    session.record_tool_use_at("technical_analysis", vec![], fixed_time());

    assert_eq!(session.tool_usage.len(), 3);
    assert_eq!(session.tools_used_count, 3);
    assert_eq!(session.unique_tools_used, 2);
    assert_eq!(session.tool_usage[0].count, 1);
    assert_eq!(session.tool_usage[0].symbols, vec!["AAPL".to_string()]);
}

#[test]
fn test_session_unique_count_is_case_insensitive() {
    let mut session = ResearchSession::new_at("user-1", fixed_time());
    session.record_tool_use_at("Market_Quote", vec![], fixed_time());
    session.record_tool_use_at("market_quote", vec![], fixed_time());
    assert_eq!(session.tools_used_count, 2);
    assert_eq!(session.unique_tools_used, 1);
}

#[test]
fn test_session_document_assumption_and_devils_advocate() {
    let mut session = ResearchSession::new("user-1");
    session.document_assumption();
    session.document_assumption();
    session.engage_devils_advocate();
    assert_eq!(session.assumptions_documented, 2);
    assert!(session.devils_advocate_engaged);
}

#[test]
fn test_session_end_at_is_idempotent() {
    let start = fixed_time();
    let mut session = ResearchSession::new_at("user-1", start);
    session.end_at(start + Duration::minutes(30));
    let first_end = session.ended_at;
    session.end_at(start + Duration::minutes(90));
    assert_eq!(session.ended_at, first_end);
    assert!(!session.is_open());
}

#[test]
fn test_session_end_before_start_clamps() {
    let start = fixed_time();
    let mut session = ResearchSession::new_at("user-1", start);
    session.end_at(start - Duration::minutes(5));
    assert_eq!(session.ended_at, Some(start));
}

#[test]
fn test_session_elapsed_minutes_closed() {
    let start = fixed_time();
    let mut session = ResearchSession::new_at("user-1", start);
    session.end_at(start + Duration::minutes(45));
    // A later "now" must not change a closed session's duration
    let elapsed = session.elapsed_minutes(start + Duration::hours(10));
    assert_eq!(elapsed, 45.0);
}

#[test]
fn test_session_elapsed_minutes_open_uses_now() {
    let start = fixed_time();
    let session = ResearchSession::new_at("user-1", start);
    let elapsed = session.elapsed_minutes(start + Duration::minutes(12));
    assert_eq!(elapsed, 12.0);
}

#[test]
fn test_session_elapsed_minutes_never_negative() {
    let start = fixed_time();
    let session = ResearchSession::new_at("user-1", start);
    let elapsed = session.elapsed_minutes(start - Duration::minutes(3));
    assert_eq!(elapsed, 0.0);
}

#[test]
fn test_session_wire_field_names() {
    let start = fixed_time();
    let mut session = ResearchSession::new_at("user-1", start);
    session.record_tool_use_at("market_quote", vec!["AAPL".to_string()], start);
    let value = serde_json::to_value(&session).unwrap();

    assert!(value.get("userId").is_some());
    assert!(value.get("startedAt").is_some());
    assert!(value.get("toolUsage").is_some());
    assert!(value.get("toolsUsedCount").is_some());
    assert!(value.get("uniqueToolsUsed").is_some());
    assert!(value.get("devilsAdvocateEngaged").is_some());
    assert!(value.get("assumptionsDocumented").is_some());
    // Open sessions serialize endedAt as an explicit null
    assert!(value.get("endedAt").unwrap().is_null());
    assert_eq!(value["toolUsage"][0]["tool"], "market_quote");
    assert_eq!(value["toolUsage"][0]["count"], 1);
}

// ============================================================================
// ConvictionSource tests
// ============================================================================

#[test]
fn test_conviction_source_display() {
    assert_eq!(format!("{}", ConvictionSource::ChatMessage), "chat_message");
    assert_eq!(
        format!("{}", ConvictionSource::ThesisRevision),
        "thesis_revision"
    );
    assert_eq!(format!("{}", ConvictionSource::TradeNote), "trade_note");
}

#[test]
fn test_conviction_source_from_str() {
    assert_eq!(
        "chat_message".parse::<ConvictionSource>().unwrap(),
        ConvictionSource::ChatMessage
    );
    assert_eq!(
        "Trade_Note".parse::<ConvictionSource>().unwrap(),
        ConvictionSource::TradeNote
    );
    let result = "tweet".parse::<ConvictionSource>();
    assert!(result.is_err());
    assert_eq!(result.unwrap_err(), "Unknown conviction source: tweet");
}

#[test]
fn test_conviction_source_default() {
    assert_eq!(ConvictionSource::default(), ConvictionSource::ChatMessage);
}

// ============================================================================
// ConvictionRecord tests
// ============================================================================

#[test]
fn test_conviction_record_new() {
    let record = ConvictionRecord::new("user-1", "thesis-9", "I am certain");
    assert!(!record.id.is_empty());
    assert_eq!(record.user_id, "user-1");
    assert_eq!(record.thesis_id, "thesis-9");
    assert_eq!(record.statement_text, "I am certain");
    assert_eq!(record.source_type, ConvictionSource::ChatMessage);
    assert!(record.source_id.is_none());
    assert_eq!(record.conviction_score, 50.0);
    assert!(record.certainty_indicators.is_empty());
    assert!(record.hedging_indicators.is_empty());
}

#[test]
fn test_conviction_record_score_clamp() {
    let high = ConvictionRecord::new("u", "t", "s").with_score(140.0);
    assert_eq!(high.conviction_score, 100.0);

    let low = ConvictionRecord::new("u", "t", "s").with_score(-10.0);
    assert_eq!(low.conviction_score, 0.0);
}

#[test]
fn test_conviction_record_builder_chain() {
    let record = ConvictionRecord::new("u", "t", "definitely up")
        .with_source(ConvictionSource::TradeNote)
        .with_source_id("note-3")
        .with_score(70.0)
        .with_indicators(vec!["definitely".to_string()], vec![])
        .with_analyzed_at(fixed_time());

    assert_eq!(record.source_type, ConvictionSource::TradeNote);
    assert_eq!(record.source_id, Some("note-3".to_string()));
    assert_eq!(record.conviction_score, 70.0);
    assert_eq!(record.certainty_indicators, vec!["definitely".to_string()]);
    assert_eq!(record.analyzed_at, fixed_time());
}

#[test]
fn test_conviction_record_wire_field_names() {
    let record = ConvictionRecord::new("user-1", "thesis-9", "maybe up")
        .with_analyzed_at(fixed_time());
    let value = serde_json::to_value(&record).unwrap();

    assert!(value.get("statementText").is_some());
    assert!(value.get("sourceType").is_some());
    assert!(value.get("convictionScore").is_some());
    assert!(value.get("certaintyIndicators").is_some());
    assert!(value.get("hedgingIndicators").is_some());
    assert!(value.get("analyzedAt").is_some());
    assert_eq!(value["sourceType"], "chat_message");
}

// ============================================================================
// ThesisTiming tests
// ============================================================================

#[test]
fn test_thesis_timing_builders() {
    let created = fixed_time();
    let timing = ThesisTiming::new(created)
        .with_first_mention(created - Duration::hours(48))
        .with_promotion(created - Duration::hours(2))
        .with_evolution_events(4);

    assert_eq!(timing.created_at, created);
    assert_eq!(timing.first_mentioned_at, Some(created - Duration::hours(48)));
    assert_eq!(
        timing.promoted_to_explicit_at,
        Some(created - Duration::hours(2))
    );
    assert_eq!(timing.evolution_event_count, 4);
}

// ============================================================================
// RawThesisTiming tests
// ============================================================================

#[test]
fn test_raw_timing_resolve_rfc3339() {
    let raw = RawThesisTiming {
        first_mentioned_at: Some("2024-02-20T08:30:00Z".to_string()),
        promoted_to_explicit_at: None,
        created_at: Some("2024-02-28T10:00:00+02:00".to_string()),
        evolution_event_count: Some(3),
    };
    let timing = raw.resolve(fixed_time()).unwrap();

    assert_eq!(
        timing.first_mentioned_at,
        Some(Utc.with_ymd_and_hms(2024, 2, 20, 8, 30, 0).unwrap())
    );
    assert!(timing.promoted_to_explicit_at.is_none());
    // Offset timestamps normalize to UTC
    assert_eq!(
        timing.created_at,
        Utc.with_ymd_and_hms(2024, 2, 28, 8, 0, 0).unwrap()
    );
    assert_eq!(timing.evolution_event_count, 3);
}

#[test]
fn test_raw_timing_resolve_legacy_format() {
    let raw = RawThesisTiming {
        created_at: Some("2024-02-28 10:00:00".to_string()),
        ..Default::default()
    };
    let timing = raw.resolve(fixed_time()).unwrap();
    assert_eq!(
        timing.created_at,
        Utc.with_ymd_and_hms(2024, 2, 28, 10, 0, 0).unwrap()
    );
}

#[test]
fn test_raw_timing_empty_strings_are_absent() {
    let raw = RawThesisTiming {
        first_mentioned_at: Some("".to_string()),
        promoted_to_explicit_at: Some("   ".to_string()),
        created_at: Some("2024-02-28T10:00:00Z".to_string()),
        evolution_event_count: None,
    };
    let timing = raw.resolve(fixed_time()).unwrap();
    assert!(timing.first_mentioned_at.is_none());
    assert!(timing.promoted_to_explicit_at.is_none());
    assert_eq!(timing.evolution_event_count, 0);
}

#[test]
fn test_raw_timing_missing_created_at_defaults_to_now() {
    let now = fixed_time();
    let raw = RawThesisTiming::default();
    let timing = raw.resolve(now).unwrap();
    assert_eq!(timing.created_at, now);
    assert_eq!(timing.evolution_event_count, 0);
}

#[test]
fn test_raw_timing_negative_count_clamps() {
    let raw = RawThesisTiming {
        created_at: Some("2024-02-28T10:00:00Z".to_string()),
        evolution_event_count: Some(-5),
        ..Default::default()
    };
    let timing = raw.resolve(fixed_time()).unwrap();
    assert_eq!(timing.evolution_event_count, 0);
}

#[test]
fn test_raw_timing_malformed_timestamp_errors() {
    let raw = RawThesisTiming {
        created_at: Some("last tuesday".to_string()),
        ..Default::default()
    };
    let err = raw.resolve(fixed_time()).unwrap_err();
    let message = err.to_string();
    assert!(message.contains("createdAt"));
    assert!(message.contains("last tuesday"));
}

#[test]
fn test_raw_timing_malformed_optional_timestamp_errors() {
    let raw = RawThesisTiming {
        first_mentioned_at: Some("02/20/2024".to_string()),
        created_at: Some("2024-02-28T10:00:00Z".to_string()),
        ..Default::default()
    };
    let err = raw.resolve(fixed_time()).unwrap_err();
    assert!(err.to_string().contains("firstMentionedAt"));
}
