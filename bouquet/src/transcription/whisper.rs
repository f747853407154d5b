use std::sync::Arc;

use tokio::sync::Mutex;
use tracing::{debug, info};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::config::TranscriptionConfig;
use crate::error::{BouquetError, Result};

/// Shared handle to a loaded ggml Whisper model
#[derive(Clone)]
pub struct LocalWhisper {
    context: Arc<Mutex<WhisperContext>>,
}

impl LocalWhisper {
    pub fn new(config: &TranscriptionConfig) -> Result<Self> {
        let model_path = config.model_path.as_ref().ok_or_else(|| {
            BouquetError::Transcription(
                "TRANSCRIPTION_MODEL_PATH is required for local Whisper".to_string(),
            )
        })?;

        info!(model_path = %model_path, "Loading Whisper model");

        let context =
            WhisperContext::new_with_params(model_path, WhisperContextParameters::default())
                .map_err(|e| {
                    BouquetError::Transcription(format!("Failed to load Whisper model: {e}"))
                })?;

        Ok(Self {
            context: Arc::new(Mutex::new(context)),
        })
    }

    /// Transcribe 16 kHz mono f32 PCM. CPU bound, so it runs on the blocking pool.
    pub async fn transcribe(&self, samples: Vec<f32>) -> Result<String> {
        let context = Arc::clone(&self.context);

        debug!(
            duration_secs = samples.len() as f32 / 16000.0,
            "Starting local transcription"
        );

        tokio::task::spawn_blocking(move || {
            let ctx = context.blocking_lock();

            let mut params = FullParams::new(SamplingStrategy::Greedy { best_of: 1 });
            params.set_print_progress(false);
            params.set_print_realtime(false);

            let mut state = ctx.create_state().map_err(|e| {
                BouquetError::Transcription(format!("Failed to create Whisper state: {e}"))
            })?;

            state
                .full(params, &samples)
                .map_err(|e| BouquetError::Transcription(format!("Transcription failed: {e}")))?;

            let mut transcript = String::new();
            for i in 0..state.full_n_segments() {
                let segment = state.get_segment(i).ok_or_else(|| {
                    BouquetError::Transcription(format!("Failed to get segment {i}"))
                })?;
                let text = segment.to_str().map_err(|e| {
                    BouquetError::Transcription(format!("Invalid text in segment {i}: {e}"))
                })?;
                if !transcript.is_empty() {
                    transcript.push(' ');
                }
                transcript.push_str(text.trim());
            }

            Ok(transcript)
        })
        .await
        .map_err(|e| BouquetError::Transcription(format!("Transcription task panicked: {e}")))?
    }
}
