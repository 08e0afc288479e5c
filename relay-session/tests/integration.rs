//! End-to-end relay tests against a wiremock upstream.

use std::time::Duration;

use relay_provider_deepseek::DeepSeek;
use relay_session::Relay;
use relay_types::{ChatMessage, RelayEvent, RelayHandle, Role};
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Drain a session handle until the channel closes.
async fn collect(mut handle: RelayHandle) -> Vec<RelayEvent> {
    let mut events = Vec::new();
    while let Some(event) = handle.recv().await {
        events.push(event);
    }
    events
}

async fn mock_stream(body: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({"stream": true})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(body.as_bytes().to_vec(), "text/event-stream"),
        )
        .mount(&server)
        .await;
    server
}

fn relay_for(server: &MockServer) -> Relay {
    Relay::new(DeepSeek::new("test-key").base_url(server.uri()))
}

#[tokio::test]
async fn increments_arrive_in_order_and_final_carries_concatenation() {
    let sse = "\
data: {\"choices\":[{\"delta\":{\"role\":\"assistant\"}}]}\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"Hel\"}}]}\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"lo\"}}]}\n\n\
data: {\"choices\":[{\"delta\":{},\"finish_reason\":\"stop\"}]}\n\n\
data: [DONE]\n\n";
    let server = mock_stream(sse).await;

    let events = collect(relay_for(&server).stream_message(ChatMessage::user("hi"))).await;

    assert_eq!(
        events,
        vec![
            RelayEvent::Increment("Hel".into()),
            RelayEvent::Increment("lo".into()),
            RelayEvent::Final("Hello".into()),
        ]
    );
}

#[tokio::test]
async fn malformed_lines_are_skipped_without_disrupting_order() {
    let sse = "\
data: {bad json\n\
data: {\"choices\":[{\"delta\":{\"content\":\"Hi\"}}]}\n\
data: [DONE]\n";
    let server = mock_stream(sse).await;

    let events = collect(relay_for(&server).stream_message(ChatMessage::user("hi"))).await;

    assert_eq!(
        events,
        vec![
            RelayEvent::Increment("Hi".into()),
            RelayEvent::Final("Hi".into()),
        ]
    );
}

#[tokio::test]
async fn upstream_close_without_sentinel_yields_implicit_final() {
    let sse = "\
data: {\"choices\":[{\"delta\":{\"content\":\"partial \"}}]}\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"reply\"}}]}\n\n";
    let server = mock_stream(sse).await;

    let events = collect(relay_for(&server).stream_message(ChatMessage::user("hi"))).await;

    let terminals: Vec<_> = events.iter().filter(|e| e.is_terminal()).collect();
    assert_eq!(terminals.len(), 1);
    assert_eq!(
        events.last(),
        Some(&RelayEvent::Final("partial reply".into()))
    );
}

#[tokio::test]
async fn empty_string_increment_is_forwarded() {
    let sse = "\
data: {\"choices\":[{\"delta\":{\"content\":\"\"}}]}\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"x\"}}]}\n\n\
data: [DONE]\n\n";
    let server = mock_stream(sse).await;

    let events = collect(relay_for(&server).stream_message(ChatMessage::user("hi"))).await;

    assert_eq!(
        events,
        vec![
            RelayEvent::Increment(String::new()),
            RelayEvent::Increment("x".into()),
            RelayEvent::Final("x".into()),
        ]
    );
}

#[tokio::test]
async fn comments_and_heartbeats_produce_no_events() {
    let sse = "\
: keep-alive\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"ok\"}}]}\n\n\
: keep-alive\n\n\
data: [DONE]\n\n";
    let server = mock_stream(sse).await;

    let events = collect(relay_for(&server).stream_message(ChatMessage::user("hi"))).await;

    assert_eq!(
        events,
        vec![
            RelayEvent::Increment("ok".into()),
            RelayEvent::Final("ok".into()),
        ]
    );
}

#[tokio::test]
async fn lines_after_sentinel_are_not_read() {
    let sse = "\
data: [DONE]\n\n\
data: {\"choices\":[{\"delta\":{\"content\":\"ghost\"}}]}\n\n";
    let server = mock_stream(sse).await;

    let events = collect(relay_for(&server).stream_message(ChatMessage::user("hi"))).await;

    assert_eq!(events, vec![RelayEvent::Final(String::new())]);
}

#[tokio::test]
async fn non_2xx_open_produces_single_error_event() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream exploded"))
        .mount(&server)
        .await;

    let events = collect(relay_for(&server).stream_message(ChatMessage::user("hi"))).await;

    assert_eq!(events.len(), 1);
    match &events[0] {
        RelayEvent::Error(msg) => {
            assert!(msg.contains("500"), "missing status in: {msg}");
            assert!(msg.contains("upstream exploded"), "missing body in: {msg}");
        }
        other => panic!("expected Error, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_host_produces_error_event() {
    let relay = Relay::new(DeepSeek::new("k").base_url("http://127.0.0.1:1"));
    let events = collect(relay.stream_message(ChatMessage::user("hi"))).await;

    assert_eq!(events.len(), 1);
    assert!(matches!(&events[0], RelayEvent::Error(msg) if msg.contains("connection error")));
}

#[tokio::test]
async fn send_message_returns_bot_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(serde_json::json!({"stream": false})))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "id": "chatcmpl-1",
            "choices": [{
                "index": 0,
                "message": {"role": "assistant", "content": "Hello there"},
                "finish_reason": "stop"
            }]
        })))
        .mount(&server)
        .await;

    let reply = relay_for(&server).send_message(ChatMessage::user("hi")).await;
    assert_eq!(reply.role, Role::Bot);
    assert_eq!(reply.content, "Hello there");
}

#[tokio::test]
async fn send_message_never_fails_on_unreachable_upstream() {
    let relay = Relay::new(DeepSeek::new("k").base_url("http://127.0.0.1:1"));
    let reply = relay.send_message(ChatMessage::user("hi")).await;

    assert_eq!(reply.role, Role::Bot);
    assert!(
        reply.content.contains("connection error"),
        "diagnostic missing from: {}",
        reply.content
    );
}

#[tokio::test]
async fn send_message_embeds_http_diagnostics() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Authentication Fails"))
        .mount(&server)
        .await;

    let reply = relay_for(&server).send_message(ChatMessage::user("hi")).await;
    assert_eq!(reply.role, Role::Bot);
    assert!(reply.content.contains("Authentication Fails"));
}

#[tokio::test]
async fn cancelling_the_handle_ends_the_session() {
    let sse = "data: {\"choices\":[{\"delta\":{\"content\":\"late\"}}]}\n\n";
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_raw(sse.as_bytes().to_vec(), "text/event-stream")
                .set_delay(Duration::from_millis(200)),
        )
        .mount(&server)
        .await;

    let mut handle = relay_for(&server).stream_message(ChatMessage::user("hi"));
    handle.cancel();

    // The session observes cancellation before reading any line, so the
    // channel closes without a single event.
    assert_eq!(handle.recv().await, None);
}

#[tokio::test]
async fn sessions_run_concurrently_and_independently() {
    let server = MockServer::start().await;
    for (question, answer) in [("one", "1"), ("two", "2")] {
        let sse = format!(
            "data: {{\"choices\":[{{\"delta\":{{\"content\":\"{answer}\"}}}}]}}\n\ndata: [DONE]\n\n"
        );
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(body_partial_json(serde_json::json!({
                "messages": [{"role": "user", "content": question}]
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw(sse.into_bytes(), "text/event-stream"),
            )
            .mount(&server)
            .await;
    }

    let relay = relay_for(&server);
    let first = relay.stream_message(ChatMessage::user("one"));
    let second = relay.stream_message(ChatMessage::user("two"));

    let (first, second) = tokio::join!(collect(first), collect(second));

    assert_eq!(first.last(), Some(&RelayEvent::Final("1".into())));
    assert_eq!(second.last(), Some(&RelayEvent::Final("2".into())));
}
