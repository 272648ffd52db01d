//! HTTP-level tests for the chat-completions client against a mock server.

use std::time::Duration;

use kseb_core::{CompletionRequest, LlmError, LlmPort};
use kseb_llm::{OpenAiClient, OpenAiConfig};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn client_for(server: &MockServer) -> OpenAiClient {
    let config = OpenAiConfig::new("sk-test", "gpt-4.1")
        .with_base_url(format!("{}/v1", server.uri()))
        .with_retry_delay(Duration::from_millis(1));
    OpenAiClient::new(config).unwrap()
}

#[tokio::test]
async fn sends_model_and_bearer_key() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({"model": "gpt-4.1", "temperature": 0.0})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "안녕하세요"}}],
            "usage": {"prompt_tokens": 5, "completion_tokens": 2, "total_tokens": 7}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let completion = client_for(&server)
        .complete(CompletionRequest::prompt("system", "hi"))
        .await
        .unwrap();

    assert_eq!(completion.text(), "안녕하세요");
    assert_eq!(completion.usage.unwrap().total_tokens, 7);
}

#[tokio::test]
async fn ask_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"role": "assistant", "content": "machine learning"}}]
        })))
        .mount(&server)
        .await;

    let text = client_for(&server)
        .ask("translate", "머신러닝", 0.0)
        .await
        .unwrap();
    assert_eq!(text, "machine learning");
}

#[tokio::test]
async fn retries_server_errors_then_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(503).set_body_json(json!({"error": {"message": "overloaded"}})),
        )
        .expect(3)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(CompletionRequest::prompt("s", "u"))
        .await
        .unwrap_err();

    assert_eq!(
        err,
        LlmError::Api {
            status: 503,
            message: "overloaded".to_string()
        }
    );
}

#[tokio::test]
async fn client_errors_are_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(
            ResponseTemplate::new(401).set_body_json(json!({"error": {"message": "bad key"}})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(CompletionRequest::prompt("s", "u"))
        .await
        .unwrap_err();

    assert_eq!(err, LlmError::Unauthorized);
}

#[tokio::test]
async fn malformed_body_is_invalid_response() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = client_for(&server)
        .complete(CompletionRequest::prompt("s", "u"))
        .await
        .unwrap_err();

    assert!(matches!(err, LlmError::InvalidResponse(_)));
}
