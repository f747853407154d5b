use std::path::Path;

use async_trait::async_trait;

use crate::error::Result;

mod api;
#[cfg(feature = "local-whisper")]
mod preprocessing;
mod provider;
#[cfg(feature = "local-whisper")]
mod whisper;

pub use api::TranscriptionApiClient;
#[cfg(feature = "local-whisper")]
pub use preprocessing::AudioPreprocessor;
pub use provider::TranscriptionProvider;

/// Speech-to-text capability for one stored audio file.
///
/// A call either returns the full transcript or fails; partial transcripts
/// are never surfaced.
#[async_trait]
pub trait Transcriber: Send + Sync {
    fn is_available(&self) -> bool;

    async fn transcribe(&self, audio: &Path) -> Result<String>;
}
