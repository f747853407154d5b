use serde_json::json;
use tempfile::tempdir;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use bouquet::config::TranscriptionConfig;
use bouquet::error::BouquetError;
use bouquet::transcription::{Transcriber, TranscriptionProvider};

fn api_config(base_url: String) -> TranscriptionConfig {
    TranscriptionConfig {
        model: "openai/whisper-1".to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(base_url),
        timeout_secs: 5,
        ..TranscriptionConfig::default()
    }
}

#[tokio::test]
async fn test_provider_transcribes_stored_file() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "text": "Vows first, then photos." })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let audio = dir.path().join("meeting.m4a");
    std::fs::write(&audio, b"fake m4a bytes").unwrap();

    let provider = TranscriptionProvider::new(&api_config(format!("{}/v1", server.uri())));
    assert!(provider.is_available());
    assert_eq!(provider.backend_name(), "api");

    let text = provider.transcribe(&audio).await.unwrap();
    assert_eq!(text, "Vows first, then photos.");
}

#[tokio::test]
async fn test_provider_surfaces_upstream_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/audio/transcriptions"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .mount(&server)
        .await;

    let dir = tempdir().unwrap();
    let audio = dir.path().join("meeting.mp3");
    std::fs::write(&audio, b"fake mp3 bytes").unwrap();

    let provider = TranscriptionProvider::new(&api_config(format!("{}/v1", server.uri())));
    let err = provider.transcribe(&audio).await.unwrap_err();

    assert!(matches!(err, BouquetError::Transcription(ref m) if m.contains("503")));
}

#[tokio::test]
async fn test_hosted_provider_without_key_is_unavailable() {
    let config = TranscriptionConfig {
        api_key: None,
        ..api_config("http://localhost:1/v1".to_string())
    };
    let provider = TranscriptionProvider::new(&config);

    assert!(!provider.is_available());

    let dir = tempdir().unwrap();
    let audio = dir.path().join("meeting.wav");
    std::fs::write(&audio, b"RIFF").unwrap();
    let err = provider.transcribe(&audio).await.unwrap_err();
    assert!(matches!(err, BouquetError::TranscriptionUnavailable(_)));
}
