//! Tests for inbound stream message decoding.

use scout_model::{ModelError, Opportunity, SearchOutcome, ServerMessage};

#[test]
fn parses_ack() {
    let msg = ServerMessage::parse(r#"{"type":"ack","query":"market gaps"}"#).unwrap();
    assert_eq!(
        msg,
        ServerMessage::Ack {
            query: "market gaps".to_string()
        }
    );
    assert_eq!(msg.kind(), "ack");
}

#[test]
fn parses_step_with_opportunities() {
    let msg = ServerMessage::parse(
        r#"{"type":"step","node":"scout","state":{"steps":["Found 3 leads"],
            "opportunities":[{"title":"A","source":"http://x","score":91.7}]}}"#,
    )
    .unwrap();
    let ServerMessage::Step { node, state } = msg else {
        panic!("expected step");
    };
    assert_eq!(node, "scout");
    assert_eq!(state.last_step(), Some("Found 3 leads"));
    let ops = state.opportunities.unwrap();
    assert_eq!(ops.len(), 1);
    assert_eq!(ops[0], Opportunity::new("A", "http://x").with_score(91.7));
}

#[test]
fn step_without_state_or_steps_is_tolerated() {
    let msg = ServerMessage::parse(r#"{"type":"step","node":"input"}"#).unwrap();
    let ServerMessage::Step { state, .. } = msg else {
        panic!("expected step");
    };
    assert!(state.steps.is_empty());
    assert!(state.opportunities.is_none());

    let msg = ServerMessage::parse(r#"{"type":"step","node":"input","state":{"steps":null}}"#)
        .unwrap();
    assert!(matches!(msg, ServerMessage::Step { .. }));
}

#[test]
fn step_without_node_is_malformed() {
    let err = ServerMessage::parse(r#"{"type":"step","state":{"steps":[]}}"#).unwrap_err();
    assert!(matches!(err, ModelError::Malformed { kind: "step", .. }));
}

#[test]
fn parses_final_with_markdown() {
    let msg = ServerMessage::parse(
        r##"{"type":"final","state":{"query":"q","steps":["a","b"],
            "opportunities":[{"title":"A"},{"title":"B","score":null}],
            "result_markdown":"# Results"}}"##,
    )
    .unwrap();
    let ServerMessage::Final { state } = msg else {
        panic!("expected final");
    };
    assert_eq!(state.opportunities.map(|ops| ops.len()), Some(2));
    assert_eq!(state.result_markdown.as_deref(), Some("# Results"));
}

#[test]
fn final_without_opportunities_keeps_none() {
    let msg = ServerMessage::parse(r#"{"type":"final","state":{}}"#).unwrap();
    let ServerMessage::Final { state } = msg else {
        panic!("expected final");
    };
    assert!(state.opportunities.is_none());
}

#[test]
fn parses_error_with_and_without_message() {
    assert_eq!(
        ServerMessage::parse(r#"{"type":"error","message":"rate limited"}"#).unwrap(),
        ServerMessage::Error {
            message: Some("rate limited".to_string())
        }
    );
    assert_eq!(
        ServerMessage::parse(r#"{"type":"error"}"#).unwrap(),
        ServerMessage::Error { message: None }
    );
}

#[test]
fn unknown_and_missing_kinds_decode_as_unknown() {
    assert_eq!(
        ServerMessage::parse(r#"{"type":"heartbeat","seq":4}"#).unwrap(),
        ServerMessage::Unknown {
            kind: Some("heartbeat".to_string())
        }
    );
    assert_eq!(
        ServerMessage::parse(r#"{"node":"x"}"#).unwrap(),
        ServerMessage::Unknown { kind: None }
    );
}

#[test]
fn invalid_json_and_non_objects_are_errors() {
    assert!(matches!(
        ServerMessage::parse("not json").unwrap_err(),
        ModelError::Json(_)
    ));
    assert!(matches!(
        ServerMessage::parse("[1,2]").unwrap_err(),
        ModelError::NotAnObject
    ));
}

#[test]
fn search_outcome_tolerates_missing_fields() {
    let outcome: SearchOutcome =
        serde_json::from_str(r#"{"query":"q","opportunities":[{"title":"A"}]}"#).unwrap();
    assert_eq!(outcome.query.as_deref(), Some("q"));
    assert!(outcome.steps.is_empty());
    assert_eq!(outcome.opportunities.len(), 1);
    assert_eq!(outcome.result_markdown, "");
}
