//! Contract tests for the chat-completion fallback client.
//!
//! Every failure mode must degrade to its fixed substitute string; no
//! error may escape to the dispatcher.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use aria::config::LlmConfig;
use aria::history::{ChatRole, ConversationHistory};
use aria::llm::{
    CONNECT_FAILURE_REPLY, ChatClient, ConversationModel, INVALID_RESPONSE_REPLY, TIMEOUT_REPLY,
};
use serde_json::json;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_config(server_uri: &str, timeout_secs: u64) -> LlmConfig {
    LlmConfig {
        api_url: format!("{server_uri}/v1/chat/completions"),
        api_model: "test-model".to_owned(),
        api_key: "sk-test".to_owned(),
        request_timeout_secs: timeout_secs,
        ..LlmConfig::default()
    }
}

fn history() -> ConversationHistory {
    ConversationHistory::new("be brief")
}

#[tokio::test]
async fn reply_round_trip_appends_both_turns() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "test-model",
            "max_tokens": 80,
            "temperature": 0.5,
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "  Certainly.  "}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&test_config(&server.uri(), 5)).unwrap();
    let mut history = history();

    let reply = client.reply(&mut history, "tell me a joke").await;

    assert_eq!(reply, "Certainly.");
    let turns = history.turns();
    assert_eq!(turns.len(), 3);
    assert_eq!(turns[0].role, ChatRole::System);
    assert_eq!(turns[1].role, ChatRole::User);
    assert_eq!(turns[1].content, "tell me a joke");
    assert_eq!(turns[2].role, ChatRole::Assistant);
    assert_eq!(turns[2].content, "Certainly.");
}

#[tokio::test]
async fn request_carries_full_bounded_history() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hello"},
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "hi"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = ChatClient::new(&test_config(&server.uri(), 5)).unwrap();
    let mut history = history();
    let reply = client.reply(&mut history, "hello").await;
    assert_eq!(reply, "hi");
}

#[tokio::test]
async fn malformed_structure_substitutes_invalid_reply() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"unexpected": "shape"})),
        )
        .mount(&server)
        .await;

    let client = ChatClient::new(&test_config(&server.uri(), 5)).unwrap();
    let mut history = history();

    let reply = client.reply(&mut history, "hello").await;

    assert_eq!(reply, INVALID_RESPONSE_REPLY);
    // The endpoint answered, so the substitute joins the history.
    assert_eq!(history.len(), 3);
    assert_eq!(history.turns()[2].content, INVALID_RESPONSE_REPLY);
}

#[tokio::test]
async fn server_error_substitutes_connect_apology() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let client = ChatClient::new(&test_config(&server.uri(), 5)).unwrap();
    let mut history = history();

    let reply = client.reply(&mut history, "hello").await;

    assert_eq!(reply, CONNECT_FAILURE_REPLY);
    // No assistant turn for an unreachable endpoint.
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn unreachable_endpoint_substitutes_connect_apology() {
    let config = LlmConfig {
        api_url: "http://127.0.0.1:9/v1/chat/completions".to_owned(),
        request_timeout_secs: 2,
        ..LlmConfig::default()
    };
    let client = ChatClient::new(&config).unwrap();
    let mut history = history();

    let reply = client.reply(&mut history, "hello").await;

    assert_eq!(reply, CONNECT_FAILURE_REPLY);
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn timeout_substitutes_timeout_apology() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"choices": [{"message": {"content": "late"}}]}))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;

    let client = ChatClient::new(&test_config(&server.uri(), 1)).unwrap();
    let mut history = history();

    let reply = client.reply(&mut history, "hello").await;

    assert_eq!(reply, TIMEOUT_REPLY);
    assert_eq!(history.len(), 2);
}

#[tokio::test]
async fn history_stays_bounded_across_many_exchanges() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "ok"}}]
        })))
        .mount(&server)
        .await;

    let client = ChatClient::new(&test_config(&server.uri(), 5)).unwrap();
    let mut history = history();

    for i in 0..12 {
        let _ = client.reply(&mut history, &format!("message {i}")).await;
    }

    assert_eq!(history.len(), 11);
    assert_eq!(history.turns()[0].role, ChatRole::System);
    assert_eq!(history.turns()[0].content, "be brief");
}
