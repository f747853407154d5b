use std::time::Duration;

use reqwest::{multipart, Client, StatusCode};
use serde::Deserialize;
use tracing::debug;

use crate::{
    config::{parse_transcription_provider_model, TranscriptionConfig},
    error::{BouquetError, Result},
};

const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Client for OpenAI-compatible `/audio/transcriptions` endpoints.
///
/// One request per call. Retry policy belongs to the caller.
#[derive(Debug, Clone)]
pub struct TranscriptionApiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: String,
}

impl TranscriptionApiClient {
    pub fn new(config: &TranscriptionConfig) -> Result<Self> {
        let api_key = config.api_key.clone().ok_or_else(|| {
            BouquetError::Transcription("API key required for transcription API".to_string())
        })?;

        let (provider, model) = parse_transcription_provider_model(&config.model);

        let base_url = match config.base_url.as_deref() {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => match provider.to_lowercase().as_str() {
                "groq" => GROQ_BASE_URL.to_string(),
                "openrouter" => OPENROUTER_BASE_URL.to_string(),
                _ => OPENAI_BASE_URL.to_string(),
            },
        };

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| {
                BouquetError::Transcription(format!("Failed to create HTTP client: {e}"))
            })?;

        Ok(Self {
            client,
            base_url,
            model: model.to_string(),
            api_key,
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// Upload `audio_bytes` as `file_name` and return the transcript text.
    pub async fn transcribe(&self, audio_bytes: Vec<u8>, file_name: &str) -> Result<String> {
        let mime_type = mime_guess::from_path(file_name)
            .first_raw()
            .unwrap_or("audio/mpeg");

        let file_part = multipart::Part::bytes(audio_bytes)
            .file_name(file_name.to_string())
            .mime_str(mime_type)
            .map_err(|e| BouquetError::Transcription(format!("Invalid MIME type: {e}")))?;

        let form = multipart::Form::new()
            .part("file", file_part)
            .text("model", self.model.clone())
            .text("response_format", "json");

        let url = format!("{}/audio/transcriptions", self.base_url);
        debug!(url = %url, mime = %mime_type, "Sending transcription request");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    BouquetError::Transcription("Request timeout".to_string())
                } else {
                    BouquetError::Transcription(format!("Request failed: {e}"))
                }
            })?;

        let status = response.status();
        debug!(status = %status, "Transcription response");

        if !status.is_success() {
            let error_body = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read error response".to_string());
            return Err(map_http_error(status, &error_body));
        }

        let parsed: TranscriptionResponse = response.json().await.map_err(|e| {
            BouquetError::Transcription(format!("Failed to parse transcription response: {e}"))
        })?;

        let text = parsed.text.trim();
        if text.is_empty() {
            return Err(BouquetError::Transcription(
                "Transcription response contained empty text".to_string(),
            ));
        }

        Ok(text.to_string())
    }
}

fn map_http_error(status: StatusCode, error_body: &str) -> BouquetError {
    match status {
        StatusCode::UNAUTHORIZED => BouquetError::Transcription(format!(
            "Authentication failed (401): Invalid API key. Error: {error_body}"
        )),
        StatusCode::TOO_MANY_REQUESTS => BouquetError::Transcription(format!(
            "Rate limit exceeded (429). Error: {error_body}"
        )),
        _ => BouquetError::Transcription(format!(
            "Transcription API error ({status}): {error_body}"
        )),
    }
}
