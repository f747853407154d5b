use std::path::Path;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{info, warn};

use crate::config::{parse_transcription_provider_model, TranscriptionConfig};
use crate::error::{BouquetError, Result};

use super::api::TranscriptionApiClient;
use super::Transcriber;

#[derive(Clone)]
enum TranscriptionBackend {
    #[cfg(feature = "local-whisper")]
    Local {
        whisper: super::whisper::LocalWhisper,
    },
    Api {
        client: TranscriptionApiClient,
    },
    Unavailable {
        reason: String,
    },
}

/// Speech-to-text backed by a hosted API or a local Whisper model.
///
/// Initialization never fails: a backend that cannot be set up leaves the
/// provider in an unavailable state and every call reports why.
#[derive(Clone)]
pub struct TranscriptionProvider {
    backend: TranscriptionBackend,
    config: TranscriptionConfig,
}

impl TranscriptionProvider {
    pub fn new(config: &TranscriptionConfig) -> Self {
        let (provider, _model_name) = parse_transcription_provider_model(&config.model);

        let backend = if provider.eq_ignore_ascii_case("local") {
            Self::local_backend(config)
        } else {
            match TranscriptionApiClient::new(config) {
                Ok(client) => {
                    info!(provider = %provider, "Transcription API backend initialized");
                    TranscriptionBackend::Api { client }
                }
                Err(e) => {
                    let reason = format!("Transcription API backend unavailable: {e}");
                    warn!("{}", reason);
                    TranscriptionBackend::Unavailable { reason }
                }
            }
        };

        Self {
            backend,
            config: config.clone(),
        }
    }

    #[cfg(feature = "local-whisper")]
    fn local_backend(config: &TranscriptionConfig) -> TranscriptionBackend {
        match super::whisper::LocalWhisper::new(config) {
            Ok(whisper) => {
                info!("Local Whisper backend initialized");
                TranscriptionBackend::Local { whisper }
            }
            Err(e) => {
                let reason = format!("Whisper backend unavailable: {e}");
                warn!("{}", reason);
                TranscriptionBackend::Unavailable { reason }
            }
        }
    }

    #[cfg(not(feature = "local-whisper"))]
    fn local_backend(_config: &TranscriptionConfig) -> TranscriptionBackend {
        let reason = "Local Whisper support not compiled in (enable the `local-whisper` feature)"
            .to_string();
        warn!("{}", reason);
        TranscriptionBackend::Unavailable { reason }
    }

    pub fn unavailable(reason: &str) -> Self {
        Self {
            backend: TranscriptionBackend::Unavailable {
                reason: reason.to_string(),
            },
            config: TranscriptionConfig::default(),
        }
    }

    pub fn backend_name(&self) -> &'static str {
        match &self.backend {
            #[cfg(feature = "local-whisper")]
            TranscriptionBackend::Local { .. } => "local",
            TranscriptionBackend::Api { .. } => "api",
            TranscriptionBackend::Unavailable { .. } => "unavailable",
        }
    }

    async fn transcribe_internal(&self, audio: &Path) -> Result<String> {
        if let TranscriptionBackend::Unavailable { reason } = &self.backend {
            return Err(BouquetError::TranscriptionUnavailable(reason.clone()));
        }

        let size = tokio::fs::metadata(audio)
            .await
            .map_err(|e| BouquetError::Transcription(format!("Unreadable audio file: {e}")))?
            .len();
        if size > self.config.max_file_size {
            return Err(BouquetError::Transcription(format!(
                "Audio file is {size} bytes, limit is {}",
                self.config.max_file_size
            )));
        }

        let bytes = tokio::fs::read(audio)
            .await
            .map_err(|e| BouquetError::Transcription(format!("Unreadable audio file: {e}")))?;

        match &self.backend {
            #[cfg(feature = "local-whisper")]
            TranscriptionBackend::Local { whisper } => {
                use super::preprocessing::AudioPreprocessor;

                let extension = audio
                    .extension()
                    .and_then(|e| e.to_str())
                    .map(str::to_string);
                let pcm = tokio::task::spawn_blocking(move || {
                    let (samples, rate, channels) =
                        AudioPreprocessor::decode(bytes, extension.as_deref())?;
                    AudioPreprocessor::resample_to_16khz_mono(samples, rate, channels)
                })
                .await
                .map_err(|e| BouquetError::Transcription(format!("Audio decoding panicked: {e}")))??;

                whisper.transcribe(pcm).await
            }
            TranscriptionBackend::Api { client } => {
                let file_name = audio
                    .file_name()
                    .and_then(|n| n.to_str())
                    .unwrap_or("audio.mp3");
                client.transcribe(bytes, file_name).await
            }
            TranscriptionBackend::Unavailable { reason } => {
                Err(BouquetError::TranscriptionUnavailable(reason.clone()))
            }
        }
    }
}

#[async_trait]
impl Transcriber for TranscriptionProvider {
    fn is_available(&self) -> bool {
        !matches!(self.backend, TranscriptionBackend::Unavailable { .. })
    }

    async fn transcribe(&self, audio: &Path) -> Result<String> {
        let timeout_duration = Duration::from_secs(self.config.timeout_secs);

        match tokio::time::timeout(timeout_duration, self.transcribe_internal(audio)).await {
            Ok(result) => result,
            Err(_) => Err(BouquetError::Transcription(format!(
                "Transcription timed out after {} seconds",
                self.config.timeout_secs
            ))),
        }
    }
}
