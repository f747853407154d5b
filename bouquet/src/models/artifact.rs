use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{BouquetError, Result};

/// Document formats the extractor understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocumentKind {
    Pdf,
    Docx,
    Txt,
    Csv,
}

/// Audio formats accepted for transcription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum AudioKind {
    Mp3,
    Wav,
    M4a,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "class", content = "format", rename_all = "snake_case")]
pub enum ArtifactKind {
    Document(DocumentKind),
    Audio(AudioKind),
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [Self::Pdf, Self::Docx, Self::Txt, Self::Csv];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
            Self::Txt => "txt",
            Self::Csv => "csv",
        }
    }
}

impl AudioKind {
    pub const ALL: [AudioKind; 3] = [Self::Mp3, Self::Wav, Self::M4a];

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Mp3 => "mp3",
            Self::Wav => "wav",
            Self::M4a => "m4a",
        }
    }
}

impl std::fmt::Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::fmt::Display for AudioKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.extension())
    }
}

impl std::fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Document(kind) => write!(f, "{kind}"),
            Self::Audio(kind) => write!(f, "{kind}"),
        }
    }
}

impl ArtifactKind {
    /// Resolve the kind of an upload from its file name, falling back to the
    /// caller-supplied hint (a bare extension or a MIME type).
    ///
    /// Only the name and hint are inspected; nothing is read from disk.
    pub fn resolve(original_name: &str, hint: Option<&str>) -> Result<Self> {
        let extension = Path::new(original_name)
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase());

        if let Some(kind) = extension.as_deref().and_then(Self::from_token) {
            return Ok(kind);
        }

        if let Some(kind) = hint.and_then(Self::from_hint) {
            return Ok(kind);
        }

        let kind = extension
            .or_else(|| hint.map(|h| h.trim().to_lowercase()))
            .filter(|k| !k.is_empty())
            .unwrap_or_else(|| "unknown".to_string());

        Err(BouquetError::UnsupportedKind { kind })
    }

    fn from_hint(hint: &str) -> Option<Self> {
        let hint = hint.trim().to_lowercase();
        // Drop MIME parameters such as "; charset=utf-8"
        let essence = hint.split(';').next().unwrap_or_default().trim();

        Self::from_token(essence.trim_start_matches('.')).or_else(|| {
            mime_guess::get_mime_extensions_str(essence)?
                .iter()
                .find_map(|ext| Self::from_token(ext))
        })
    }

    fn from_token(token: &str) -> Option<Self> {
        match token {
            "pdf" => Some(Self::Document(DocumentKind::Pdf)),
            "docx" => Some(Self::Document(DocumentKind::Docx)),
            "txt" => Some(Self::Document(DocumentKind::Txt)),
            "csv" => Some(Self::Document(DocumentKind::Csv)),
            "mp3" => Some(Self::Audio(AudioKind::Mp3)),
            "wav" => Some(Self::Audio(AudioKind::Wav)),
            "m4a" => Some(Self::Audio(AudioKind::M4a)),
            _ => None,
        }
    }

    pub fn is_audio(&self) -> bool {
        matches!(self, Self::Audio(_))
    }
}

/// One file or audio clip submitted with a request.
#[derive(Debug, Clone)]
pub struct UploadedArtifact {
    /// Client-supplied file name. Untrusted.
    pub original_name: String,
    /// Extension or MIME type the client declared, if any.
    pub hint: Option<String>,
    pub bytes: Vec<u8>,
}

impl UploadedArtifact {
    pub fn new(original_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            original_name: original_name.into(),
            hint: None,
            bytes: bytes.into(),
        }
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }
}
