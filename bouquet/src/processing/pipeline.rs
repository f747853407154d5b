use std::sync::Arc;

use crate::error::{BouquetError, Result};
use crate::llm::{prompts, ChatMessage, TextGenerator};
use crate::models::{ArtifactReport, AssembledContext, GeneratedOutput, UploadedArtifact};
use crate::storage::OutputStore;

use super::{ContextAssembler, UploadIntake};

/// Reports and context for a batch, without any model call.
#[derive(Debug, Clone)]
pub struct Analysis {
    pub reports: Vec<ArtifactReport>,
    pub context: AssembledContext,
}

#[derive(Debug, Clone, Default)]
pub struct TimelineRequest {
    pub artifacts: Vec<UploadedArtifact>,
    pub instruction: String,
    /// Existing timeline used as a formatting model.
    pub reference_example: Option<String>,
    pub save_output: bool,
}

#[derive(Debug, Clone)]
pub struct TimelineOutcome {
    pub reports: Vec<ArtifactReport>,
    pub context: AssembledContext,
    pub timeline: String,
    /// Present when the request asked for the output to be saved.
    pub output: Option<GeneratedOutput>,
}

/// Upload intake, context assembly and generation for one request at a time.
///
/// Shared across requests; each call owns its own scratch space.
#[derive(Clone)]
pub struct PlanningPipeline {
    intake: UploadIntake,
    generator: Arc<dyn TextGenerator>,
    outputs: OutputStore,
}

impl PlanningPipeline {
    pub fn new(intake: UploadIntake, generator: Arc<dyn TextGenerator>, outputs: OutputStore) -> Self {
        Self {
            intake,
            generator,
            outputs,
        }
    }

    pub fn intake(&self) -> &UploadIntake {
        &self.intake
    }

    pub fn generator(&self) -> &Arc<dyn TextGenerator> {
        &self.generator
    }

    pub fn outputs(&self) -> &OutputStore {
        &self.outputs
    }

    pub async fn analyze(
        &self,
        artifacts: Vec<UploadedArtifact>,
        instruction: &str,
    ) -> Result<Analysis> {
        let batch = self.intake.ingest(artifacts).await?;
        let reports = batch.release().await;
        let context = ContextAssembler::from_reports(&reports, instruction);

        Ok(Analysis { reports, context })
    }

    /// Ingest, assemble and generate a day-of timeline.
    ///
    /// Per-artifact failures come back in the outcome's reports. A
    /// generation or save failure fails the whole request. The scratch space
    /// is released before generation starts, so it is gone on every path.
    pub async fn generate_timeline(&self, request: TimelineRequest) -> Result<TimelineOutcome> {
        let TimelineRequest {
            artifacts,
            instruction,
            reference_example,
            save_output,
        } = request;

        let Analysis { reports, context } = self.analyze(artifacts, &instruction).await?;

        if context.is_empty() {
            return Err(BouquetError::Validation(
                "Nothing to generate from: no file produced text and the instruction is empty"
                    .to_string(),
            ));
        }

        let prompt = prompts::timeline_prompt(&context.render(), reference_example.as_deref());

        tracing::info!(
            sections = context.sections.len(),
            prompt_chars = prompt.len(),
            "Generating timeline"
        );

        let timeline = self.generator.generate(&[ChatMessage::user(prompt)]).await?;

        let output = if save_output {
            Some(self.outputs.save(&timeline).await?)
        } else {
            None
        };

        Ok(TimelineOutcome {
            reports,
            context,
            timeline,
            output,
        })
    }
}
