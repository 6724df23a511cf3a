//! Scenario tests for the search session state machine.

use scout_core::{
    AttemptOutcome, CoreError, Effect, FilterMode, Handled, SearchSession, StreamState,
    TransportEvent,
};
use scout_model::Opportunity;

fn msg(text: &str) -> TransportEvent {
    TransportEvent::Message(text.to_string())
}

fn log_texts(session: &SearchSession) -> Vec<&str> {
    session.log().iter().map(|entry| entry.text.as_str()).collect()
}

const TWO_RESULTS: &str = r#"{"type":"step","node":"aggregate","state":{"steps":["Aggregated"],
    "opportunities":[{"title":"A","source":"http://x","score":91.7},{"title":"B","source":"http://y"}]}}"#;

#[test]
fn market_gaps_scenario() {
    let mut session = SearchSession::new();
    assert_eq!(session.state(), StreamState::Idle);

    let id = session.submit("market gaps").unwrap();
    assert_eq!(session.state(), StreamState::Connecting);
    assert!(session.is_loading());

    session.handle(id, msg(r#"{"type":"ack","query":"market gaps"}"#));
    assert_eq!(session.state(), StreamState::Active);
    assert_eq!(log_texts(&session), ["Started: market gaps"]);
    assert!(session.is_loading());

    session.handle(
        id,
        msg(r#"{"type":"step","node":"scout","state":{"steps":["Found 3 leads"],
            "opportunities":[{"title":"A","source":"http://x","score":91.7}]}}"#),
    );
    assert_eq!(log_texts(&session), ["Started: market gaps", "Found 3 leads"]);
    assert_eq!(session.log()[1].source_node, "scout");
    let rows = session.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].opportunity.display_score(), "92");

    let handled = session.handle(
        id,
        msg(r#"{"type":"final","state":{"opportunities":[
            {"title":"A","source":"http://x","score":91.7},{"title":"B","source":"http://y"}]}}"#),
    );
    assert!(handled.effects().contains(&Effect::CloseConnection));
    assert!(handled.effects().contains(&Effect::Loading(false)));
    assert_eq!(session.rows().len(), 2);
    assert!(!session.is_loading());
    assert_eq!(session.state(), StreamState::Terminated);
    assert_eq!(log_texts(&session).last(), Some(&"Completed"));
    assert_eq!(session.attempt().outcome(), Some(&AttemptOutcome::Completed));
}

#[test]
fn error_before_ack_terminates_with_message() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();

    session.handle(id, msg(r#"{"type":"error","message":"rate limited"}"#));

    assert_eq!(log_texts(&session), ["rate limited"]);
    assert_eq!(session.log()[0].source_node, "error");
    assert!(!session.is_loading());
    assert!(session.rows().is_empty());
    assert_eq!(session.state(), StreamState::Terminated);
}

#[test]
fn error_without_text_uses_fallback() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();
    session.handle(id, msg(r#"{"type":"error","message":""}"#));
    assert_eq!(log_texts(&session), ["Unknown error"]);
}

#[test]
fn step_with_empty_steps_logs_placeholder() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();
    session.handle(id, msg(r#"{"type":"step","node":"input","state":{"steps":[]}}"#));
    assert_eq!(log_texts(&session), ["Updated"]);
    assert_eq!(session.state(), StreamState::Active);
}

#[test]
fn selection_survives_snapshot_replacement() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();
    session.handle(id, msg(TWO_RESULTS));
    session.set_selected(Opportunity::new("A", "http://x").identity(), true);

    session.handle(
        id,
        msg(r#"{"type":"step","node":"rescore","state":{"steps":["Rescored"],
            "opportunities":[{"title":" a ","source":"HTTP://X","score":12},{"title":"B","source":"http://y"}]}}"#),
    );

    let rows = session.rows();
    assert_eq!(rows[0].opportunity.score, Some(12.0));
    assert!(rows[0].is_selected);
    assert!(!rows[1].is_selected);
}

#[test]
fn select_all_covers_hidden_rows_under_saved_filter() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();
    session.handle(id, msg(TWO_RESULTS));

    session.set_filter(FilterMode::SavedOnly);
    assert!(session.rows().is_empty());
    session.set_all_selected(true);

    assert!(session.all_selected());
    assert_eq!(session.store().selected_count(), 2);
    assert_eq!(session.summary().to_string(), "2 selected of 2");

    session.set_all_selected(false);
    assert!(!session.all_selected());
    assert_eq!(session.summary().to_string(), "2 results");
}

#[test]
fn filter_toggle_keeps_selection() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();
    session.handle(id, msg(TWO_RESULTS));
    assert_eq!(session.toggle_row(0), Some(true));

    session.set_filter(FilterMode::SavedOnly);
    assert!(session.rows().is_empty());
    assert_eq!(session.store().selected_count(), 1);

    session.set_filter(FilterMode::All);
    let rows = session.rows();
    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_selected);
    assert!(!rows[1].is_selected);
}

#[test]
fn saved_set_outlives_attempts_but_selection_does_not() {
    let mut session = SearchSession::new();
    let first = session.submit("q").unwrap();
    session.handle(first, msg(TWO_RESULTS));
    session.toggle_row(1);
    session.save_selected();

    let second = session.submit("again").unwrap();
    assert!(session.log().is_empty());
    assert!(session.snapshot().is_empty());
    assert!(!session.store().has_selection());

    session.handle(second, msg(TWO_RESULTS));
    session.set_filter(FilterMode::SavedOnly);
    let rows = session.rows();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].opportunity.title(), "B");
    assert!(rows[0].is_saved);
}

#[test]
fn stale_attempt_events_are_discarded() {
    let mut session = SearchSession::new();
    let first = session.submit("old").unwrap();
    session.handle(first, msg(r#"{"type":"ack","query":"old"}"#));
    let second = session.submit("new").unwrap();

    let handled = session.handle(first, msg(TWO_RESULTS));
    assert_eq!(handled, Handled::Stale);
    assert_eq!(session.handle(first, TransportEvent::Closed), Handled::Stale);

    assert!(session.snapshot().is_empty());
    assert!(session.log().is_empty());
    assert!(session.is_loading());
    assert_eq!(session.attempt().id(), second);
    assert_eq!(session.state(), StreamState::Connecting);
}

#[test]
fn malformed_message_stalls_without_state_change() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();
    session.handle(id, msg(r#"{"type":"ack","query":"q"}"#));

    let handled = session.handle(id, msg("{not json"));

    assert!(handled.effects().contains(&Effect::Loading(false)));
    assert_eq!(session.state(), StreamState::Active);
    assert!(!session.is_loading());
    assert_eq!(session.log().last().unwrap().source_node, "parse");
    assert_eq!(
        session.log().last().unwrap().text,
        "Failed to parse message"
    );
}

#[test]
fn unknown_kinds_are_ignored() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();
    let handled = session.handle(id, msg(r#"{"type":"progress","pct":40}"#));
    assert_eq!(handled, Handled::Ignored);
    assert!(session.log().is_empty());
    assert_eq!(session.state(), StreamState::Connecting);
    assert!(session.is_loading());
}

#[test]
fn transport_error_is_logged_and_terminal() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();
    session.handle(id, TransportEvent::Error("connection refused".to_string()));

    assert_eq!(session.state(), StreamState::Terminated);
    assert!(!session.is_loading());
    assert_eq!(session.log()[0].source_node, "socket");
    assert_eq!(
        session.attempt().outcome(),
        Some(&AttemptOutcome::TransportFailed("connection refused".to_string()))
    );
}

#[test]
fn clean_close_is_silent() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();
    session.handle(id, msg(r#"{"type":"ack","query":"q"}"#));
    session.handle(id, TransportEvent::Closed);

    assert_eq!(session.log().len(), 1);
    assert!(!session.is_loading());
    assert_eq!(session.attempt().outcome(), Some(&AttemptOutcome::Disconnected));
}

#[test]
fn terminated_attempt_ignores_late_events() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();
    session.handle(id, msg(r#"{"type":"final","state":{}}"#));
    assert_eq!(session.handle(id, TransportEvent::Closed), Handled::Ignored);
    assert_eq!(session.handle(id, msg(TWO_RESULTS)), Handled::Ignored);
    assert!(session.snapshot().is_empty());
    assert_eq!(session.attempt().outcome(), Some(&AttemptOutcome::Completed));
}

#[test]
fn final_keeps_result_markdown() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();
    session.handle(
        id,
        msg(r##"{"type":"final","state":{"result_markdown":"# Results"}}"##),
    );
    assert_eq!(session.attempt().result_markdown(), Some("# Results"));
}

#[test]
fn empty_query_is_rejected_without_side_effects() {
    let mut session = SearchSession::new();
    let id = session.submit("q").unwrap();
    session.handle(id, msg(TWO_RESULTS));

    assert!(matches!(session.submit("   "), Err(CoreError::EmptyQuery)));
    assert_eq!(session.attempt().id(), id);
    assert_eq!(session.snapshot().len(), 2);
}

#[test]
fn submitted_query_is_trimmed() {
    let mut session = SearchSession::new();
    session.submit("  market gaps \n").unwrap();
    assert_eq!(session.attempt().query(), "market gaps");
}
