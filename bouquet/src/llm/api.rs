use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    error::{ApiError, OpenAIError},
    types::{
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse,
    },
    Client,
};

use crate::{
    config::{parse_llm_provider_model, LlmConfig},
    error::{BouquetError, Result},
    llm::{ChatMessage, ChatRole},
};

pub(crate) const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub(crate) const OPENROUTER_BASE_URL: &str = "https://openrouter.ai/api/v1";
pub(crate) const OLLAMA_BASE_URL: &str = "http://localhost:11434/v1";
pub(crate) const LMSTUDIO_BASE_URL: &str = "http://localhost:1234/v1";
pub(crate) const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/openai";

#[derive(Debug, Clone)]
struct ApiConfig {
    base_url: String,
    api_key: Option<String>,
    model: String,
    timeout_secs: u64,
    temperature: Option<f32>,
}

#[derive(Clone)]
pub struct LlmApiClient {
    client: Client<OpenAIConfig>,
    config: ApiConfig,
}

impl LlmApiClient {
    pub fn new(config: &LlmConfig) -> Result<Self> {
        let api_config = ApiConfig::from_llm_config(config);

        let (provider, _) = parse_llm_provider_model(&config.model);
        let needs_api_key = !matches!(
            provider.to_lowercase().as_str(),
            "ollama" | "local" | "lmstudio"
        );

        if needs_api_key && api_config.api_key.is_none() {
            return Err(BouquetError::LlmUnavailable(
                "API key required for this provider".to_string(),
            ));
        }

        let openai_config = OpenAIConfig::new()
            .with_api_base(api_config.base_url.clone())
            .with_api_key(api_config.api_key.clone().unwrap_or_default());

        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(api_config.timeout_secs))
            .build()
            .map_err(|error| {
                BouquetError::Generation(format!("Failed to create LLM HTTP client: {error}"))
            })?;

        // async-openai retries 429/5xx internally; a zero budget turns that off
        let backoff = backoff::ExponentialBackoff {
            max_elapsed_time: Some(Duration::ZERO),
            ..Default::default()
        };

        let client = Client::with_config(openai_config)
            .with_http_client(http_client)
            .with_backoff(backoff);

        Ok(Self {
            client,
            config: api_config,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub async fn chat(&self, messages: &[ChatMessage]) -> Result<String> {
        if messages.iter().all(|m| m.content.trim().is_empty()) {
            return Err(BouquetError::Validation("Prompt cannot be empty".to_string()));
        }

        let request = self.build_request(messages)?;

        tracing::debug!(
            model = %self.config.model,
            messages = messages.len(),
            "Sending chat completion request"
        );

        match self.client.chat().create(request).await {
            Ok(response) => Self::extract_content(response),
            Err(error) => Err(Self::map_openai_error(error)),
        }
    }

    fn build_request(&self, messages: &[ChatMessage]) -> Result<CreateChatCompletionRequest> {
        let messages = messages
            .iter()
            .map(Self::to_request_message)
            .collect::<Result<Vec<_>>>()?;

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(self.config.model.clone()).messages(messages);
        if let Some(temperature) = self.config.temperature {
            request.temperature(temperature);
        }

        request.build().map_err(|error| {
            BouquetError::Validation(format!("Invalid LLM completion request: {error}"))
        })
    }

    fn to_request_message(message: &ChatMessage) -> Result<ChatCompletionRequestMessage> {
        let content = message.content.as_str();
        let built: std::result::Result<ChatCompletionRequestMessage, OpenAIError> = match message.role {
            ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                .content(content)
                .build()
                .map(Into::into),
            ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                .content(content)
                .build()
                .map(Into::into),
            ChatRole::Assistant => ChatCompletionRequestAssistantMessageArgs::default()
                .content(content)
                .build()
                .map(Into::into),
        };

        built.map_err(|error| BouquetError::Validation(format!("Invalid chat message: {error}")))
    }

    fn extract_content(response: CreateChatCompletionResponse) -> Result<String> {
        let message = response
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| {
                BouquetError::Generation("LLM response contained no choices".to_string())
            })?
            .message
            .content
            .unwrap_or_default();

        let trimmed = message.trim();
        if trimmed.is_empty() {
            return Err(BouquetError::Generation(
                "LLM response contained empty content".to_string(),
            ));
        }

        Ok(trimmed.to_string())
    }

    fn is_rate_limit_api_error(api_error: &ApiError) -> bool {
        let message = api_error.message.to_lowercase();
        let error_type = api_error.r#type.clone().unwrap_or_default().to_lowercase();
        let code = api_error.code.clone().unwrap_or_default().to_lowercase();

        message.contains("rate limit")
            || message.contains("too many requests")
            || message.contains("resource has been exhausted")
            || error_type.contains("rate_limit")
            || code.contains("rate_limit")
            || code == "insufficient_quota"
            || code == "resource_exhausted"
    }

    fn map_openai_error(error: OpenAIError) -> BouquetError {
        match error {
            OpenAIError::Reqwest(reqwest_error)
                if reqwest_error.status() == Some(reqwest::StatusCode::TOO_MANY_REQUESTS) =>
            {
                BouquetError::GenerationRateLimited { retry_after: None }
            }
            OpenAIError::ApiError(api_error) if Self::is_rate_limit_api_error(&api_error) => {
                BouquetError::GenerationRateLimited { retry_after: None }
            }
            OpenAIError::Reqwest(reqwest_error) if reqwest_error.is_timeout() => {
                BouquetError::Generation("LLM request timed out".to_string())
            }
            OpenAIError::Reqwest(reqwest_error) => {
                BouquetError::Generation(format!("LLM request failed: {reqwest_error}"))
            }
            OpenAIError::ApiError(api_error) => {
                BouquetError::Generation(format!("LLM API error: {api_error}"))
            }
            OpenAIError::JSONDeserialize(err) => {
                BouquetError::Generation(format!("Failed to parse LLM response: {err}"))
            }
            OpenAIError::InvalidArgument(message) => BouquetError::Validation(message),
            other => BouquetError::Generation(other.to_string()),
        }
    }
}

impl ApiConfig {
    fn from_llm_config(config: &LlmConfig) -> Self {
        let (provider, model) = parse_llm_provider_model(&config.model);

        let base_url = config
            .base_url
            .clone()
            .unwrap_or_else(|| default_base_url(provider).to_string());

        let normalized_model = if provider.eq_ignore_ascii_case("local") {
            config.model.clone()
        } else {
            model.to_string()
        };

        Self {
            base_url,
            api_key: config.api_key.clone(),
            model: normalized_model,
            timeout_secs: config.timeout_secs,
            temperature: config.temperature,
        }
    }
}

pub(crate) fn default_base_url(provider: &str) -> &'static str {
    match provider.to_lowercase().as_str() {
        "openai" => OPENAI_BASE_URL,
        "openrouter" => OPENROUTER_BASE_URL,
        "ollama" => OLLAMA_BASE_URL,
        "lmstudio" => LMSTUDIO_BASE_URL,
        "gemini" => GEMINI_BASE_URL,
        _ => OPENAI_BASE_URL,
    }
}
