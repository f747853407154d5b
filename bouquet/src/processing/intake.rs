use std::path::PathBuf;
use std::sync::Arc;

use futures::future::join_all;

use crate::error::{BouquetError, Result};
use crate::models::{ArtifactKind, ArtifactReport, ExtractionResult, UploadedArtifact};
use crate::storage::ScratchSpace;
use crate::transcription::Transcriber;

use super::ContentExtractor;

/// Reports for one request, plus the scratch space their files live in.
///
/// The scratch space stays on disk until [`IntakeBatch::release`] is called.
#[derive(Debug)]
pub struct IntakeBatch {
    pub reports: Vec<ArtifactReport>,
    scratch: ScratchSpace,
}

impl IntakeBatch {
    pub fn successes(&self) -> impl Iterator<Item = &ArtifactReport> {
        self.reports.iter().filter(|r| r.result.is_success())
    }

    pub fn failures(&self) -> impl Iterator<Item = &ArtifactReport> {
        self.reports.iter().filter(|r| !r.result.is_success())
    }

    /// Delete the scratch space and hand back the reports.
    ///
    /// A cleanup failure is logged; the reports are still returned.
    pub async fn release(self) -> Vec<ArtifactReport> {
        let Self { reports, scratch } = self;
        let path = scratch.path().to_path_buf();
        if let Err(e) = scratch.release().await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to release scratch space");
        }
        reports
    }
}

/// Persists uploads and turns each one into text.
///
/// Documents go through the [`ContentExtractor`]; audio goes through the
/// injected [`Transcriber`]. A failing artifact yields a failure report and
/// never aborts the batch.
#[derive(Clone)]
pub struct UploadIntake {
    scratch_root: PathBuf,
    extractor: ContentExtractor,
    transcriber: Arc<dyn Transcriber>,
}

impl UploadIntake {
    pub fn new(scratch_root: impl Into<PathBuf>, transcriber: Arc<dyn Transcriber>) -> Self {
        Self {
            scratch_root: scratch_root.into(),
            extractor: ContentExtractor::new(),
            transcriber,
        }
    }

    pub fn transcriber(&self) -> &Arc<dyn Transcriber> {
        &self.transcriber
    }

    /// Process every artifact and return exactly one report per input, in
    /// input order.
    ///
    /// The only batch-level error is failing to create the scratch space.
    pub async fn ingest(&self, artifacts: Vec<UploadedArtifact>) -> Result<IntakeBatch> {
        let scratch = ScratchSpace::acquire(&self.scratch_root).await?;
        let total = artifacts.len();

        let reports = join_all(
            artifacts
                .iter()
                .map(|artifact| self.process(&scratch, artifact)),
        )
        .await;

        let failed = reports.iter().filter(|r| !r.result.is_success()).count();
        tracing::info!(
            artifacts = total,
            succeeded = total - failed,
            failed,
            "Upload intake finished"
        );

        Ok(IntakeBatch { reports, scratch })
    }

    async fn process(&self, scratch: &ScratchSpace, artifact: &UploadedArtifact) -> ArtifactReport {
        let name = artifact.original_name.clone();

        let kind = match ArtifactKind::resolve(&name, artifact.hint.as_deref()) {
            Ok(kind) => kind,
            Err(e) => {
                tracing::debug!(name = %name, error = %e, "Rejected upload");
                return ArtifactReport::failed(name, None, e);
            }
        };

        if artifact.is_empty() {
            return ArtifactReport::failed(
                name.clone(),
                Some(kind),
                BouquetError::EmptyFile(name),
            );
        }

        let stored = match scratch.persist(&name, &artifact.bytes).await {
            Ok(stored) => stored,
            Err(e) => return ArtifactReport::failed(name, Some(kind), e),
        };

        let result = match kind {
            ArtifactKind::Document(document) => self.extractor.extract(&stored.path, document).await,
            ArtifactKind::Audio(_) => self.transcriber.transcribe(&stored.path).await,
        };

        if let Err(e) = &result {
            tracing::warn!(name = %name, kind = %kind, error = %e, "Artifact processing failed");
        }

        ArtifactReport {
            name,
            kind: Some(kind),
            result: ExtractionResult::from(result),
        }
    }
}
