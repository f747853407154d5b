use serde::{Deserialize, Serialize};

/// Provenance of one block of assembled context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "index", rename_all = "snake_case")]
pub enum SectionLabel {
    /// 1-based position among the documents that made it into the context.
    Document(usize),
    Transcript,
    Instruction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub label: SectionLabel,
    /// Original file name the text came from.
    pub source: Option<String>,
    pub text: String,
}

impl Section {
    pub fn new(label: SectionLabel, source: Option<String>, text: impl Into<String>) -> Self {
        Self {
            label,
            source,
            text: text.into(),
        }
    }

    pub fn header(&self) -> String {
        let base = match self.label {
            SectionLabel::Document(n) => format!("Document {n}"),
            SectionLabel::Transcript => "Meeting transcript".to_string(),
            SectionLabel::Instruction => "User instruction".to_string(),
        };
        match &self.source {
            Some(source) => format!("{base}: {source}"),
            None => base,
        }
    }
}

/// Ordered, labelled context handed to the generation step.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssembledContext {
    pub sections: Vec<Section>,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    pub fn render(&self) -> String {
        if let [only] = self.sections.as_slice() {
            if only.label == SectionLabel::Instruction {
                return only.text.clone();
            }
        }

        self.sections
            .iter()
            .map(|section| format!("### {}\n{}", section.header(), section.text))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    pub fn instruction(&self) -> Option<&str> {
        self.sections
            .iter()
            .find(|s| s.label == SectionLabel::Instruction)
            .map(|s| s.text.as_str())
    }
}
