//! End-to-end tests of the stream controller against a local WebSocket server.

use futures_util::{SinkExt, StreamExt};
use scout_client::{Endpoint, StreamController};
use scout_core::{AttemptOutcome, Effect, StreamState};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio_tungstenite::accept_hdr_async;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::tungstenite::handshake::server::{ErrorResponse, Request, Response};

/// Serve one connection: send `frames`, then optionally close from the server side.
async fn serve(frames: Vec<String>, close_after: bool) -> (Endpoint, oneshot::Receiver<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let (uri_tx, uri_rx) = oneshot::channel();
    tokio::spawn(async move {
        let (stream, _) = listener.accept().await.unwrap();
        let callback = move |req: &Request, resp: Response| -> Result<Response, ErrorResponse> {
            let _ = uri_tx.send(req.uri().to_string());
            Ok(resp)
        };
        let mut ws = accept_hdr_async(stream, callback).await.unwrap();
        for frame in frames {
            ws.send(Message::text(frame)).await.unwrap();
        }
        if close_after {
            let _ = ws.close(None).await;
        }
        while let Some(Ok(_)) = ws.next().await {}
    });
    let endpoint = Endpoint::parse(&format!("http://{addr}")).unwrap();
    (endpoint, uri_rx)
}

fn frames(values: &[serde_json::Value]) -> Vec<String> {
    values.iter().map(serde_json::Value::to_string).collect()
}

#[tokio::test]
async fn streams_a_query_to_completion() {
    let (endpoint, uri_rx) = serve(
        frames(&[
            serde_json::json!({"type": "ack", "query": "market gaps"}),
            serde_json::json!({"type": "step", "node": "scout", "state": {
                "steps": ["Found 3 leads"],
                "opportunities": [{"title": "A", "source": "http://x", "score": 91.7}]
            }}),
            serde_json::json!({"type": "final", "state": {
                "opportunities": [
                    {"title": "A", "source": "http://x", "score": 91.7},
                    {"title": "B", "source": "http://y"}
                ],
                "result_markdown": "# Results"
            }}),
        ]),
        false,
    )
    .await;

    let mut controller = StreamController::new(endpoint);
    controller.submit("market gaps").unwrap();
    let mut logged = Vec::new();
    controller
        .run_until_settled(|effect| {
            if let Effect::Logged(entry) = effect {
                logged.push(entry.text.clone());
            }
        })
        .await;

    assert_eq!(logged, ["Started: market gaps", "Found 3 leads", "Completed"]);
    let session = controller.session();
    assert_eq!(session.state(), StreamState::Terminated);
    assert_eq!(session.rows().len(), 2);
    assert_eq!(session.attempt().result_markdown(), Some("# Results"));

    let uri = uri_rx.await.unwrap();
    let (path, query) = uri.split_once('?').unwrap();
    assert_eq!(path, "/ws");
    let pairs: Vec<(String, String)> = url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect();
    assert_eq!(pairs, [("q".to_string(), "market gaps".to_string())]);
}

#[tokio::test]
async fn server_close_without_final_settles_silently() {
    let (endpoint, _uri) = serve(
        frames(&[serde_json::json!({"type": "ack", "query": "q"})]),
        true,
    )
    .await;

    let mut controller = StreamController::new(endpoint);
    controller.submit("q").unwrap();
    controller.run_until_settled(|_| {}).await;

    let session = controller.session();
    assert!(!session.is_loading());
    assert_eq!(session.log().len(), 1);
    assert_eq!(
        session.attempt().outcome(),
        Some(&AttemptOutcome::Disconnected)
    );
}

#[tokio::test]
async fn connection_failure_is_reported() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let endpoint = Endpoint::parse(&format!("http://{addr}")).unwrap();
    let mut controller = StreamController::new(endpoint);
    controller.submit("q").unwrap();
    controller.run_until_settled(|_| {}).await;

    let session = controller.session();
    assert_eq!(session.state(), StreamState::Terminated);
    assert_eq!(session.log()[0].source_node, "socket");
    assert!(matches!(
        session.attempt().outcome(),
        Some(AttemptOutcome::TransportFailed(_))
    ));
}

#[tokio::test]
async fn empty_query_opens_nothing() {
    let endpoint = Endpoint::parse("http://127.0.0.1:9").unwrap();
    let mut controller = StreamController::new(endpoint);
    assert!(controller.submit("  ").is_err());
    assert_eq!(controller.session().state(), StreamState::Idle);
    assert!(!controller.session().is_loading());
}
