use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bouquet::config::LlmConfig;
use bouquet::error::BouquetError;
use bouquet::llm::{ChatMessage, LlmApiClient, LlmBackend, LlmProvider, TextGenerator};

fn llm_config(model: &str) -> LlmConfig {
    LlmConfig {
        model: model.to_string(),
        api_key: Some("test-key".to_string()),
        base_url: None,
        timeout_secs: 30,
        temperature: None,
    }
}

fn llm_config_with_base_url(model: &str, base_url: String) -> LlmConfig {
    LlmConfig {
        base_url: Some(base_url),
        timeout_secs: 5,
        ..llm_config(model)
    }
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-4o-mini",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": 1,
            "completion_tokens": 1,
            "total_tokens": 2
        }
    })
}

fn api_error_body(message: &str, error_type: &str, code: &str) -> serde_json::Value {
    json!({
        "error": {
            "message": message,
            "type": error_type,
            "param": serde_json::Value::Null,
            "code": code
        }
    })
}

#[test]
fn test_openai_provider_detection() {
    let provider = LlmProvider::new(Some(&llm_config("openai/gpt-4o")));

    assert!(matches!(provider.backend(), LlmBackend::OpenAI));
    assert_eq!(provider.base_url(), Some("https://api.openai.com/v1"));
}

#[test]
fn test_gemini_provider_detection() {
    let provider = LlmProvider::new(Some(&llm_config("gemini/gemini-2.5-flash")));

    assert!(matches!(provider.backend(), LlmBackend::Gemini));
    assert_eq!(
        provider.base_url(),
        Some("https://generativelanguage.googleapis.com/v1beta/openai")
    );
}

#[test]
fn test_ollama_provider_needs_no_key() {
    let config = LlmConfig {
        api_key: None,
        ..llm_config("ollama/llama3.2")
    };
    let provider = LlmProvider::new(Some(&config));

    assert!(matches!(provider.backend(), LlmBackend::Ollama));
    assert!(provider.is_available());
}

#[test]
fn test_unknown_provider_without_base_url_is_unavailable() {
    let provider = LlmProvider::new(Some(&llm_config("my-finetune")));

    assert!(matches!(provider.backend(), LlmBackend::Unavailable { .. }));
    assert!(!provider.is_available());
}

#[test]
fn test_unknown_provider_with_base_url_is_openai_compatible() {
    let config = llm_config_with_base_url("my-finetune", "http://localhost:9000/v1".to_string());
    let provider = LlmProvider::new(Some(&config));

    assert!(matches!(
        provider.backend(),
        LlmBackend::OpenAICompatible { base_url } if base_url == "http://localhost:9000/v1"
    ));
}

#[test]
fn test_missing_config_is_unavailable() {
    let provider = LlmProvider::new(None);

    assert!(matches!(provider.backend(), LlmBackend::Unavailable { .. }));
    assert!(!provider.is_available());
}

#[test]
fn test_api_client_uses_provider_default_base_url() {
    let client = LlmApiClient::new(&llm_config("openrouter/openai/gpt-4o-mini")).unwrap();

    assert_eq!(client.base_url(), "https://openrouter.ai/api/v1");
    assert_eq!(client.model(), "openai/gpt-4o-mini");
}

#[tokio::test]
async fn test_unavailable_provider_reports_reason() {
    let provider = LlmProvider::unavailable("no key");

    let err = provider
        .generate(&[ChatMessage::user("hello")])
        .await
        .unwrap_err();

    assert!(matches!(err, BouquetError::LlmUnavailable(ref reason) if reason == "no key"));
}

#[tokio::test]
async fn test_generate_returns_trimmed_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .and(body_partial_json(json!({ "model": "gpt-4o-mini" })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("  4:00 PM - Ceremony\n")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let config = llm_config_with_base_url("openai/gpt-4o-mini", format!("{}/v1", server.uri()));
    let provider = LlmProvider::new(Some(&config));

    let reply = provider
        .generate(&[ChatMessage::user("Build my timeline")])
        .await
        .unwrap();

    assert_eq!(reply, "4:00 PM - Ceremony");
}

#[tokio::test]
async fn test_history_is_sent_in_order() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "messages": [
                { "role": "user", "content": "Hi" },
                { "role": "assistant", "content": "Hello! How can I help?" },
                { "role": "user", "content": "Venue ideas?" }
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("A vineyard.")))
        .expect(1)
        .mount(&server)
        .await;

    let config = llm_config_with_base_url("openai/gpt-4o-mini", format!("{}/v1", server.uri()));
    let provider = LlmProvider::new(Some(&config));

    let reply = provider
        .generate(&[
            ChatMessage::user("Hi"),
            ChatMessage::assistant("Hello! How can I help?"),
            ChatMessage::user("Venue ideas?"),
        ])
        .await
        .unwrap();

    assert_eq!(reply, "A vineyard.");
}

#[tokio::test]
async fn test_rate_limit_maps_to_rate_limited() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(api_error_body(
            "Rate limit reached for requests",
            "requests",
            "rate_limit_exceeded",
        )))
        .mount(&server)
        .await;

    let config = llm_config_with_base_url("openai/gpt-4o-mini", format!("{}/v1", server.uri()));
    let provider = LlmProvider::new(Some(&config));

    let err = provider
        .generate(&[ChatMessage::user("Build my timeline")])
        .await
        .unwrap_err();

    assert!(
        matches!(err, BouquetError::GenerationRateLimited { .. }),
        "got {err:?}"
    );
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("upstream temporary failure"))
        .expect(1)
        .mount(&server)
        .await;

    let config = llm_config_with_base_url("openai/gpt-4o-mini", format!("{}/v1", server.uri()));
    let provider = LlmProvider::new(Some(&config));

    let err = provider
        .generate(&[ChatMessage::user("Build my timeline")])
        .await
        .unwrap_err();

    assert!(matches!(err, BouquetError::Generation(_)), "got {err:?}");
}

#[tokio::test]
async fn test_empty_completion_is_generation_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("   ")))
        .mount(&server)
        .await;

    let config = llm_config_with_base_url("openai/gpt-4o-mini", format!("{}/v1", server.uri()));
    let provider = LlmProvider::new(Some(&config));

    let err = provider
        .generate(&[ChatMessage::user("Build my timeline")])
        .await
        .unwrap_err();

    assert!(matches!(err, BouquetError::Generation(_)));
}

#[tokio::test]
async fn test_blank_prompt_is_rejected_before_sending() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let config = llm_config_with_base_url("openai/gpt-4o-mini", format!("{}/v1", server.uri()));
    let provider = LlmProvider::new(Some(&config));

    let err = provider
        .generate(&[ChatMessage::user("  ")])
        .await
        .unwrap_err();

    assert!(matches!(err, BouquetError::Validation(_)));
}
