use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::api::v1::response::ApiResponse;
use crate::models::ErrorKind;

#[derive(Error, Debug)]
pub enum BouquetError {
    #[error("Unsupported file kind '{kind}'. Supported documents: pdf, docx, txt, csv; supported audio: mp3, wav, m4a")]
    UnsupportedKind { kind: String },

    #[error("File is empty: {0}")]
    EmptyFile(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Transcription error: {0}")]
    Transcription(String),

    #[error("Transcription unavailable: {0}")]
    TranscriptionUnavailable(String),

    #[error("Generation error: {0}")]
    Generation(String),

    #[error("Generation rate limit exceeded, retry after {retry_after:?} seconds")]
    GenerationRateLimited { retry_after: Option<u64> },

    #[error("LLM unavailable: {0}")]
    LlmUnavailable(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl BouquetError {
    /// Classification used when the error is reported per artifact.
    pub fn error_kind(&self) -> ErrorKind {
        match self {
            BouquetError::UnsupportedKind { .. } => ErrorKind::UnsupportedKind,
            BouquetError::EmptyFile(_) => ErrorKind::EmptyFile,
            BouquetError::Io(_) => ErrorKind::Io,
            BouquetError::Parse(_) => ErrorKind::Parse,
            BouquetError::Transcription(_)
            | BouquetError::TranscriptionUnavailable(_)
            | BouquetError::Http(_) => ErrorKind::Transcription,
            BouquetError::Storage(_) => ErrorKind::Storage,
            BouquetError::Generation(_)
            | BouquetError::GenerationRateLimited { .. }
            | BouquetError::LlmUnavailable(_) => ErrorKind::Generation,
            BouquetError::NotFound(_)
            | BouquetError::Validation(_)
            | BouquetError::PayloadTooLarge(_)
            | BouquetError::Json(_)
            | BouquetError::Internal(_) => ErrorKind::Internal,
        }
    }
}

/// Errors leaving a handler use the same `{ error: { code, message } }`
/// envelope as every other v1 response.
impl IntoResponse for BouquetError {
    fn into_response(self) -> Response {
        ApiResponse::<()>::from(self).into_response()
    }
}

pub type Result<T> = std::result::Result<T, BouquetError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unsupported_kind_names_supported_sets() {
        let err = BouquetError::UnsupportedKind {
            kind: "xlsx".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("'xlsx'"));
        assert!(msg.contains("pdf, docx, txt, csv"));
        assert_eq!(err.error_kind(), ErrorKind::UnsupportedKind);
    }

    #[test]
    fn transcription_errors_classify_as_transcription() {
        assert_eq!(
            BouquetError::TranscriptionUnavailable("off".into()).error_kind(),
            ErrorKind::Transcription
        );
        assert_eq!(
            BouquetError::Transcription("timeout".into()).error_kind(),
            ErrorKind::Transcription
        );
    }

    #[test]
    fn not_found_maps_to_404() {
        let response = BouquetError::NotFound("output abc".into()).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::NOT_FOUND);
    }

    #[test]
    fn payload_too_large_maps_to_413() {
        let response = BouquetError::PayloadTooLarge("2048 bytes".into()).into_response();
        assert_eq!(response.status(), axum::http::StatusCode::PAYLOAD_TOO_LARGE);
    }
}
