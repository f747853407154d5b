//! Shared DTO types used across multiple v1 API endpoints.

use serde::{Deserialize, Serialize};

use crate::models::{ArtifactKind, ArtifactReport, ErrorKind, ExtractionResult};

/// Coarse class of an uploaded file.
///
/// Wire format: `"document"` or `"audio"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub enum ArtifactClass {
    Document,
    Audio,
}

/// Why a single file could not be turned into text.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileErrorDto {
    pub kind: ErrorKind,
    pub message: String,
}

/// Per-file outcome. Exactly one of `preview` / `error` is present.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FileReportDto {
    /// File name as submitted by the client.
    pub file_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<ArtifactClass>,
    /// Resolved format, e.g. `"pdf"` or `"m4a"`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Leading characters of the extracted text or transcript.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub preview: Option<String>,
    /// Total characters extracted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub characters: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<FileErrorDto>,
}

impl FileReportDto {
    pub fn from_report(report: &ArtifactReport, preview_chars: usize) -> Self {
        let (class, format) = match report.kind {
            Some(ArtifactKind::Document(kind)) => {
                (Some(ArtifactClass::Document), Some(kind.to_string()))
            }
            Some(ArtifactKind::Audio(kind)) => (Some(ArtifactClass::Audio), Some(kind.to_string())),
            None => (None, None),
        };

        let (preview, characters, error) = match &report.result {
            ExtractionResult::Success { text } => (
                report.preview(preview_chars),
                Some(text.chars().count()),
                None,
            ),
            ExtractionResult::Failure(failure) => (
                None,
                None,
                Some(FileErrorDto {
                    kind: failure.kind,
                    message: failure.message.clone(),
                }),
            ),
        };

        Self {
            file_name: report.name.clone(),
            class,
            format,
            preview,
            characters,
            error,
        }
    }

    pub fn from_reports(reports: &[ArtifactReport], preview_chars: usize) -> Vec<Self> {
        reports
            .iter()
            .map(|report| Self::from_report(report, preview_chars))
            .collect()
    }
}
