use serde::Deserialize;
use std::env;

fn parse_env_or<T: std::str::FromStr>(var: &str, default: T) -> T
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Using default.", val, var, e);
                default
            }
        },
        Err(_) => default,
    }
}

fn parse_env_opt<T: std::str::FromStr>(var: &str) -> Option<T>
where
    T::Err: std::fmt::Display,
{
    match env::var(var) {
        Ok(val) => match val.parse() {
            Ok(parsed) => Some(parsed),
            Err(e) => {
                tracing::warn!("Invalid value '{}' for {}: {}. Ignoring.", val, var, e);
                None
            }
        },
        Err(_) => None,
    }
}

fn non_empty_var(var: &str) -> Option<String> {
    env::var(var).ok().filter(|v| !v.trim().is_empty())
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub intake: IntakeConfig,
    pub transcription: TranscriptionConfig,
    pub llm: Option<LlmConfig>,
    pub chat: ChatConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_keys: Vec<String>,
    pub max_body_bytes: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// Root for per-request scratch directories.
    pub upload_dir: String,
    /// Where saved generated outputs live.
    pub output_dir: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct IntakeConfig {
    pub max_file_size: usize,
    pub max_files: usize,
    pub preview_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TranscriptionConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub model_path: Option<String>,
    pub timeout_secs: u64,
    pub max_file_size: u64,
}

/// LLM configuration for the generation gateway
#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub timeout_secs: u64,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    pub session_ttl_secs: u64,
    pub max_sessions: usize,
}

impl Default for TranscriptionConfig {
    fn default() -> Self {
        Self {
            model: "local/whisper-base".to_string(),
            api_key: None,
            base_url: None,
            model_path: None,
            timeout_secs: 300,
            max_file_size: 104857600,
        }
    }
}

impl Default for IntakeConfig {
    fn default() -> Self {
        Self {
            max_file_size: 26214400,
            max_files: 20,
            preview_chars: 1000,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            session_ttl_secs: 3600,
            max_sessions: 1000,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        let intake = IntakeConfig::default();
        Self {
            server: ServerConfig {
                host: env::var("BOUQUET_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
                port: parse_env_or("BOUQUET_PORT", 3000),
                api_keys: env::var("BOUQUET_API_KEYS")
                    .map(|keys| {
                        keys.split(',')
                            .map(|s| s.trim().to_string())
                            .filter(|s| !s.is_empty())
                            .collect()
                    })
                    .unwrap_or_default(),
                max_body_bytes: parse_env_or("BOUQUET_MAX_BODY_BYTES", 104857600),
            },
            storage: StorageConfig {
                upload_dir: env::var("UPLOAD_DIR").unwrap_or_else(|_| "uploads".to_string()),
                output_dir: env::var("OUTPUT_DIR").unwrap_or_else(|_| "outputs".to_string()),
            },
            intake: IntakeConfig {
                max_file_size: parse_env_or("INTAKE_MAX_FILE_SIZE", intake.max_file_size),
                max_files: parse_env_or("INTAKE_MAX_FILES", intake.max_files),
                preview_chars: parse_env_or("INTAKE_PREVIEW_CHARS", intake.preview_chars),
            },
            transcription: TranscriptionConfig {
                model: env::var("TRANSCRIPTION_MODEL")
                    .unwrap_or_else(|_| "local/whisper-base".to_string()),
                api_key: non_empty_var("TRANSCRIPTION_API_KEY"),
                base_url: non_empty_var("TRANSCRIPTION_BASE_URL"),
                model_path: non_empty_var("TRANSCRIPTION_MODEL_PATH"),
                timeout_secs: parse_env_or("TRANSCRIPTION_TIMEOUT", 300),
                max_file_size: parse_env_or("TRANSCRIPTION_MAX_FILE_SIZE", 104857600),
            },
            llm: non_empty_var("LLM_MODEL").map(|model| LlmConfig {
                model,
                api_key: non_empty_var("LLM_API_KEY"),
                base_url: non_empty_var("LLM_BASE_URL"),
                timeout_secs: parse_env_or("LLM_TIMEOUT", 60),
                temperature: parse_env_opt("LLM_TEMPERATURE"),
            }),
            chat: ChatConfig {
                session_ttl_secs: parse_env_or("CHAT_SESSION_TTL_SECS", 3600),
                max_sessions: parse_env_or("CHAT_MAX_SESSIONS", 1000),
            },
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        Self::default()
    }
}

/// Known speech-to-text providers; everything except `local` is an OpenAI-compatible API
pub const KNOWN_TRANSCRIPTION_PROVIDERS: &[&str] = &["openai", "groq", "openrouter", "local"];

/// Parse a transcription model name into (provider, model) tuple.
pub fn parse_transcription_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_TRANSCRIPTION_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    ("local", model)
}

/// Known LLM providers reachable through OpenAI-compatible APIs
pub const KNOWN_LLM_PROVIDERS: &[&str] = &["openai", "openrouter", "ollama", "lmstudio", "gemini"];

/// Parse an LLM model name into (provider, model) tuple.
pub fn parse_llm_provider_model(model: &str) -> (&str, &str) {
    if let Some((prefix, rest)) = model.split_once('/') {
        let prefix_lower = prefix.to_lowercase();
        if KNOWN_LLM_PROVIDERS.contains(&prefix_lower.as_str()) {
            return (prefix, rest);
        }
    }
    // Default to treating the whole string as a local model
    ("local", model)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;

    #[test]
    #[serial]
    fn test_transcription_config_defaults() {
        std::env::remove_var("TRANSCRIPTION_MODEL");
        std::env::remove_var("TRANSCRIPTION_API_KEY");

        let config = Config::default();
        assert_eq!(config.transcription.model, "local/whisper-base");
        assert!(config.transcription.api_key.is_none());
        assert_eq!(config.transcription.timeout_secs, 300);
    }

    #[test]
    #[serial]
    fn test_intake_defaults() {
        std::env::remove_var("INTAKE_MAX_FILE_SIZE");
        std::env::remove_var("INTAKE_MAX_FILES");
        std::env::remove_var("INTAKE_PREVIEW_CHARS");

        let config = Config::default();
        assert_eq!(config.intake.preview_chars, 1000);
        assert_eq!(config.intake.max_files, 20);
        assert_eq!(config.storage.upload_dir, "uploads");
    }

    #[test]
    #[serial]
    fn test_llm_config_from_env() {
        std::env::remove_var("LLM_MODEL");
        let config = Config::default();
        assert!(config.llm.is_none());

        std::env::set_var("LLM_MODEL", "gemini/gemini-2.5-flash");
        std::env::set_var("LLM_TEMPERATURE", "0.4");
        let config = Config::default();
        let llm = config.llm.unwrap();
        assert_eq!(llm.model, "gemini/gemini-2.5-flash");
        assert_eq!(llm.temperature, Some(0.4));
        assert_eq!(llm.timeout_secs, 60);

        std::env::remove_var("LLM_MODEL");
        std::env::remove_var("LLM_TEMPERATURE");
    }

    #[test]
    #[serial]
    fn test_invalid_values_fall_back() {
        std::env::set_var("BOUQUET_PORT", "not-a-port");
        std::env::set_var("LLM_TEMPERATURE", "warm");
        let port: u16 = parse_env_or("BOUQUET_PORT", 3000);
        let temp: Option<f32> = parse_env_opt("LLM_TEMPERATURE");
        assert_eq!(port, 3000);
        assert!(temp.is_none());
        std::env::remove_var("BOUQUET_PORT");
        std::env::remove_var("LLM_TEMPERATURE");
    }

    #[test]
    #[serial]
    fn test_api_keys_split_and_trimmed() {
        std::env::set_var("BOUQUET_API_KEYS", "alpha, beta,,");
        let config = Config::default();
        assert_eq!(config.server.api_keys, vec!["alpha", "beta"]);
        std::env::remove_var("BOUQUET_API_KEYS");
    }

    #[test]
    fn test_parse_llm_provider_model() {
        assert_eq!(
            parse_llm_provider_model("gemini/gemini-2.5-flash"),
            ("gemini", "gemini-2.5-flash")
        );
        assert_eq!(
            parse_llm_provider_model("openrouter/anthropic/claude-3"),
            ("openrouter", "anthropic/claude-3")
        );
        assert_eq!(parse_llm_provider_model("mistral"), ("local", "mistral"));
    }
}
