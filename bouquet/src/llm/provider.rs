use std::time::Duration;

use async_trait::async_trait;

use crate::config::{parse_llm_provider_model, LlmConfig};
use crate::error::{BouquetError, Result};
use crate::llm::api::LlmApiClient;
use crate::llm::{ChatMessage, TextGenerator};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmBackend {
    OpenAI,
    OpenRouter,
    Ollama,
    LmStudio,
    Gemini,
    OpenAICompatible { base_url: String },
    Unavailable { reason: String },
}

/// Generation gateway over an OpenAI-compatible chat completions API.
///
/// Built once at startup and injected wherever text is generated.
#[derive(Clone)]
pub struct LlmProvider {
    backend: LlmBackend,
    client: Option<LlmApiClient>,
    timeout_secs: u64,
}

impl LlmProvider {
    pub fn new(config: Option<&LlmConfig>) -> Self {
        let Some(config) = config else {
            return Self::unavailable("No LLM configuration provided (set LLM_MODEL)");
        };

        let (provider, _model) = parse_llm_provider_model(&config.model);

        let backend = match provider.to_lowercase().as_str() {
            "openai" => LlmBackend::OpenAI,
            "openrouter" => LlmBackend::OpenRouter,
            "ollama" => LlmBackend::Ollama,
            "lmstudio" => LlmBackend::LmStudio,
            "gemini" => LlmBackend::Gemini,
            _ => match &config.base_url {
                Some(base_url) => LlmBackend::OpenAICompatible {
                    base_url: base_url.clone(),
                },
                None => {
                    return Self::unavailable(&format!(
                        "Unknown provider in model '{}' and no LLM_BASE_URL set",
                        config.model
                    ))
                }
            },
        };

        match LlmApiClient::new(config) {
            Ok(client) => {
                tracing::info!(backend = ?backend, model = %client.model(), "LLM backend initialized");
                Self {
                    backend,
                    client: Some(client),
                    timeout_secs: config.timeout_secs,
                }
            }
            Err(e) => {
                let reason = format!("LLM backend unavailable: {e}");
                tracing::warn!("{}", reason);
                Self::unavailable(&reason)
            }
        }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: LlmBackend::Unavailable {
                reason: reason.to_string(),
            },
            client: None,
            timeout_secs: 0,
        }
    }

    pub fn backend(&self) -> &LlmBackend {
        &self.backend
    }

    pub fn base_url(&self) -> Option<&str> {
        self.client.as_ref().map(|c| c.base_url())
    }

    fn unavailable_reason(&self) -> String {
        match &self.backend {
            LlmBackend::Unavailable { reason } => reason.clone(),
            _ => "LLM client not initialized".to_string(),
        }
    }
}

#[async_trait]
impl TextGenerator for LlmProvider {
    fn is_available(&self) -> bool {
        self.client.is_some()
    }

    async fn generate(&self, messages: &[ChatMessage]) -> Result<String> {
        let Some(client) = &self.client else {
            return Err(BouquetError::LlmUnavailable(self.unavailable_reason()));
        };

        match tokio::time::timeout(Duration::from_secs(self.timeout_secs), client.chat(messages))
            .await
        {
            Ok(result) => result,
            Err(_) => Err(BouquetError::Generation(format!(
                "LLM call timed out after {} seconds",
                self.timeout_secs
            ))),
        }
    }
}
