use serde::{Deserialize, Serialize};

use super::ArtifactKind;
use crate::error::BouquetError;

/// Classification of a per-artifact failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    UnsupportedKind,
    EmptyFile,
    Io,
    Parse,
    Transcription,
    Storage,
    Generation,
    Internal,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnsupportedKind => write!(f, "unsupported_kind"),
            Self::EmptyFile => write!(f, "empty_file"),
            Self::Io => write!(f, "io"),
            Self::Parse => write!(f, "parse"),
            Self::Transcription => write!(f, "transcription"),
            Self::Storage => write!(f, "storage"),
            Self::Generation => write!(f, "generation"),
            Self::Internal => write!(f, "internal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionFailure {
    pub kind: ErrorKind,
    pub message: String,
}

impl From<BouquetError> for ExtractionFailure {
    fn from(err: BouquetError) -> Self {
        Self {
            kind: err.error_kind(),
            message: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExtractionResult {
    Success { text: String },
    Failure(ExtractionFailure),
}

impl ExtractionResult {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Self::Success { text } => Some(text),
            Self::Failure(_) => None,
        }
    }

    pub fn failure(&self) -> Option<&ExtractionFailure> {
        match self {
            Self::Success { .. } => None,
            Self::Failure(failure) => Some(failure),
        }
    }
}

impl From<crate::error::Result<String>> for ExtractionResult {
    fn from(result: crate::error::Result<String>) -> Self {
        match result {
            Ok(text) => Self::Success { text },
            Err(err) => Self::Failure(err.into()),
        }
    }
}

/// Outcome for one uploaded artifact, in the position it was submitted.
#[derive(Debug, Clone)]
pub struct ArtifactReport {
    pub name: String,
    /// `None` when the kind could not be resolved.
    pub kind: Option<ArtifactKind>,
    pub result: ExtractionResult,
}

impl ArtifactReport {
    pub fn failed(name: impl Into<String>, kind: Option<ArtifactKind>, err: BouquetError) -> Self {
        Self {
            name: name.into(),
            kind,
            result: ExtractionResult::Failure(err.into()),
        }
    }

    /// First `limit` characters of the extracted text.
    pub fn preview(&self, limit: usize) -> Option<String> {
        self.result
            .text()
            .map(|text| text.chars().take(limit).collect())
    }

    pub fn is_audio(&self) -> bool {
        self.kind.is_some_and(|k| k.is_audio())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DocumentKind;

    #[test]
    fn test_preview_truncates_on_char_boundary() {
        let report = ArtifactReport {
            name: "menu.txt".to_string(),
            kind: Some(ArtifactKind::Document(DocumentKind::Txt)),
            result: ExtractionResult::Success {
                text: "Crème brûlée".to_string(),
            },
        };
        assert_eq!(report.preview(5).as_deref(), Some("Crème"));
    }

    #[test]
    fn test_failure_carries_kind() {
        let report = ArtifactReport::failed(
            "empty.txt",
            None,
            BouquetError::EmptyFile("empty.txt".to_string()),
        );
        let failure = report.result.failure().unwrap();
        assert_eq!(failure.kind, ErrorKind::EmptyFile);
        assert!(report.preview(10).is_none());
    }
}
