use crate::models::{ArtifactReport, AssembledContext, Section, SectionLabel};

/// Orders extracted texts and the user's instruction into one context.
///
/// Documents come first in upload order, transcripts next, and the
/// instruction last. Blank sections are dropped. Texts are never merged,
/// deduplicated or rewritten.
pub struct ContextAssembler;

impl ContextAssembler {
    pub fn assemble(sections: Vec<Section>, instruction: &str) -> AssembledContext {
        let (transcripts, documents): (Vec<_>, Vec<_>) = sections
            .into_iter()
            .filter(|s| s.label != SectionLabel::Instruction)
            .filter(|s| !s.text.trim().is_empty())
            .partition(|s| s.label == SectionLabel::Transcript);

        let mut ordered = documents;
        ordered.extend(transcripts);

        if !instruction.trim().is_empty() {
            ordered.push(Section::new(SectionLabel::Instruction, None, instruction));
        }

        AssembledContext { sections: ordered }
    }

    /// Build sections from successful intake reports, then [`Self::assemble`].
    ///
    /// Documents are numbered by their position among the documents that
    /// produced text.
    pub fn from_reports(reports: &[ArtifactReport], instruction: &str) -> AssembledContext {
        let mut document_index = 0;
        let sections = reports
            .iter()
            .filter_map(|report| {
                let text = report.result.text()?;
                if text.trim().is_empty() {
                    return None;
                }

                let label = if report.is_audio() {
                    SectionLabel::Transcript
                } else {
                    document_index += 1;
                    SectionLabel::Document(document_index)
                };
                Some(Section::new(label, Some(report.name.clone()), text))
            })
            .collect();

        Self::assemble(sections, instruction)
    }
}
