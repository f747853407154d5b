use std::path::Path;

use crate::error::{BouquetError, Result};
use crate::models::{ArtifactKind, DocumentKind, UploadedArtifact};
use crate::processing::extractors::{CsvExtractor, DocxExtractor, PdfExtractor, TextExtractor};

/// Turns a stored document into normalized plain text.
///
/// Parsing runs on the blocking pool. A parser that panics on hostile input
/// is reported as a parse failure rather than taking the request down.
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentExtractor;

impl ContentExtractor {
    pub fn new() -> Self {
        Self
    }

    pub async fn extract(&self, path: &Path, kind: DocumentKind) -> Result<String> {
        let bytes = tokio::fs::read(path).await?;
        let text = Self::extract_blocking(bytes, kind).await?;

        tracing::debug!(
            path = %path.display(),
            kind = %kind,
            chars = text.chars().count(),
            "Extracted document text"
        );

        Ok(text)
    }

    /// Extract an in-memory upload without persisting it.
    ///
    /// Only document kinds are accepted; an empty upload is `EmptyFile`.
    pub async fn extract_upload(&self, artifact: &UploadedArtifact) -> Result<String> {
        let kind = match ArtifactKind::resolve(&artifact.original_name, artifact.hint.as_deref())? {
            ArtifactKind::Document(kind) => kind,
            ArtifactKind::Audio(kind) => {
                return Err(BouquetError::UnsupportedKind {
                    kind: kind.to_string(),
                })
            }
        };

        if artifact.is_empty() {
            return Err(BouquetError::EmptyFile(artifact.original_name.clone()));
        }

        Self::extract_blocking(artifact.bytes.clone(), kind).await
    }

    async fn extract_blocking(bytes: Vec<u8>, kind: DocumentKind) -> Result<String> {
        tokio::task::spawn_blocking(move || Self::extract_bytes(&bytes, kind))
            .await
            .map_err(|e| {
                if e.is_panic() {
                    BouquetError::Parse(format!("{kind} parser panicked on malformed input"))
                } else {
                    BouquetError::Internal(format!("Extraction task failed: {e}"))
                }
            })?
    }

    /// Resolve the kind from the path's extension or `hint`, then extract.
    ///
    /// Unrecognized kinds fail before the file is opened.
    pub async fn extract_declared(&self, path: &Path, hint: Option<&str>) -> Result<String> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or_default();

        match ArtifactKind::resolve(name, hint)? {
            ArtifactKind::Document(kind) => self.extract(path, kind).await,
            ArtifactKind::Audio(kind) => Err(BouquetError::UnsupportedKind {
                kind: kind.to_string(),
            }),
        }
    }

    /// Extract text from in-memory bytes of a known kind.
    pub fn extract_bytes(bytes: &[u8], kind: DocumentKind) -> Result<String> {
        let text = match kind {
            DocumentKind::Pdf => PdfExtractor::extract(bytes)?,
            DocumentKind::Docx => DocxExtractor::extract(bytes)?,
            DocumentKind::Txt => TextExtractor::extract(bytes),
            DocumentKind::Csv => CsvExtractor::extract(bytes)?,
        };

        Ok(text.trim().to_string())
    }
}
