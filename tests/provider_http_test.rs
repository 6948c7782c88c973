//! HTTP adapter tests against mocked provider endpoints.

use commit_blog::error::GenerationError;
use commit_blog::llm::{ProviderSpec, TextGenerator};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SYSTEM: &str = "house style";
const PROMPT: &str = "write about Add JWT auth";

fn client(model: &str, server: &MockServer) -> Box<dyn TextGenerator> {
    ProviderSpec::parse(model)
        .unwrap()
        .build_client_at(&server.uri(), "test-key")
        .unwrap()
}

#[tokio::test]
async fn test_anthropic_messages_request_and_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .and(header("x-api-key", "test-key"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({
            "model": "claude-sonnet-4-20250514",
            "max_tokens": 4096,
            "system": SYSTEM,
            "messages": [{ "role": "user", "content": PROMPT }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "msg_1",
            "type": "message",
            "content": [
                { "type": "text", "text": "---\ntitle: \"JWT\"\n" },
                { "type": "tool_use", "id": "x", "name": "n", "input": {} },
                { "type": "text", "text": "---\nBody" }
            ],
            "stop_reason": "end_turn"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = client("anthropic/claude-sonnet-4-20250514", &server);
    let text = generator.generate(SYSTEM, PROMPT).await.unwrap();

    assert_eq!(text, "---\ntitle: \"JWT\"\n---\nBody");
    assert_eq!(generator.provider_name(), "anthropic");
}

#[tokio::test]
async fn test_openai_compatible_chat_completion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({
            "model": "grok-3",
            "stream": false,
            "messages": [
                { "role": "system", "content": SYSTEM },
                { "role": "user", "content": PROMPT }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "# Post" }, "finish_reason": "stop" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = client("xai/grok-3", &server);
    let text = generator.generate(SYSTEM, PROMPT).await.unwrap();

    assert_eq!(text, "# Post");
    assert_eq!(generator.provider_name(), "xai");
}

#[tokio::test]
async fn test_openai_compatible_without_choices_is_invalid() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = client("deepseek/deepseek-chat", &server)
        .generate(SYSTEM, PROMPT)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GenerationError::InvalidResponse { ref provider, .. } if provider == "deepseek"
    ));
}

#[tokio::test]
async fn test_gemini_generate_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/models/gemini-2.5-pro:generateContent"))
        .and(header("x-goog-api-key", "test-key"))
        .and(body_partial_json(json!({
            "systemInstruction": { "parts": [{ "text": SYSTEM }] },
            "contents": [{ "role": "user", "parts": [{ "text": PROMPT }] }]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "content": { "role": "model", "parts": [{ "text": "Hello " }, { "text": "world" }] } }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let generator = client("google/gemini-2.5-pro", &server);
    let text = generator.generate(SYSTEM, PROMPT).await.unwrap();

    assert_eq!(text, "Hello world");
    assert_eq!(generator.provider_name(), "google");
}

#[tokio::test]
async fn test_gemini_without_candidates_is_invalid() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "promptFeedback": {} })))
        .mount(&server)
        .await;

    let err = client("google/gemini-2.5-pro", &server)
        .generate(SYSTEM, PROMPT)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_anthropic_max_tokens_stop_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/messages"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "content": [{ "type": "text", "text": "---\ntitle: \"JWT\"\n---\nThe token is signed wi" }],
            "stop_reason": "max_tokens"
        })))
        .mount(&server)
        .await;

    let err = client("anthropic/claude-sonnet-4-20250514", &server)
        .generate(SYSTEM, PROMPT)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GenerationError::InvalidResponse { ref message, .. } if message.contains("cut off")
    ));
}

#[tokio::test]
async fn test_openai_compatible_length_finish_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [
                { "index": 0, "message": { "role": "assistant", "content": "# Half a po" }, "finish_reason": "length" }
            ]
        })))
        .mount(&server)
        .await;

    let err = client("openai/gpt-4o", &server)
        .generate(SYSTEM, PROMPT)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GenerationError::InvalidResponse { ref provider, .. } if provider == "openai"
    ));
}

#[tokio::test]
async fn test_gemini_max_tokens_finish_is_rejected() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [
                { "content": { "parts": [{ "text": "Hello" }] }, "finishReason": "MAX_TOKENS" }
            ]
        })))
        .mount(&server)
        .await;

    let err = client("google/gemini-2.5-pro", &server)
        .generate(SYSTEM, PROMPT)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_unauthorized_maps_to_auth_failed() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "type": "error",
            "error": { "type": "authentication_error", "message": "invalid x-api-key" }
        })))
        .mount(&server)
        .await;

    let err = client("anthropic/claude-sonnet-4-20250514", &server)
        .generate(SYSTEM, PROMPT)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::AuthFailed { .. }));
    assert!(err.to_string().contains("invalid x-api-key"));
}

#[tokio::test]
async fn test_too_many_requests_maps_to_rate_limited() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_json(json!({
            "error": { "message": "Rate limit reached for gpt-4o", "type": "requests" }
        })))
        .mount(&server)
        .await;

    let err = client("openai/gpt-4o", &server)
        .generate(SYSTEM, PROMPT)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        GenerationError::RateLimited { ref provider, .. } if provider == "openai"
    ));
    assert!(err.to_string().contains("Rate limit reached"));
}

#[tokio::test]
async fn test_server_error_carries_status_and_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("upstream overloaded"))
        .mount(&server)
        .await;

    let err = client("google/gemini-2.5-pro", &server)
        .generate(SYSTEM, PROMPT)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::RequestFailed { status: 503, .. }));
    assert!(err.to_string().contains("upstream overloaded"));
}

#[tokio::test]
async fn test_malformed_json_is_invalid_response() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>not json</html>"))
        .mount(&server)
        .await;

    let err = client("anthropic/claude-sonnet-4-20250514", &server)
        .generate(SYSTEM, PROMPT)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::InvalidResponse { .. }));
}

#[tokio::test]
async fn test_unreachable_host_is_network_error() {
    let server = MockServer::start().await;
    let uri = server.uri();
    drop(server);

    let err = ProviderSpec::parse("openai/gpt-4o")
        .unwrap()
        .build_client_at(&uri, "test-key")
        .unwrap()
        .generate(SYSTEM, PROMPT)
        .await
        .unwrap_err();

    assert!(matches!(err, GenerationError::Network { .. }));
}
