use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use nanoid::nanoid;

use crate::error::{BouquetError, Result};
use crate::models::GeneratedOutput;

const MAX_OUTPUT_ID_LEN: usize = 64;

/// File-backed store for generated outputs, addressed by opaque id.
#[derive(Debug, Clone)]
pub struct OutputStore {
    root: PathBuf,
}

impl OutputStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Valid ids are 1-64 characters of `[A-Za-z0-9_-]`.
    pub fn is_valid_id(id: &str) -> bool {
        !id.is_empty()
            && id.len() <= MAX_OUTPUT_ID_LEN
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    }

    fn path_for(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.md"))
    }

    pub async fn save(&self, text: &str) -> Result<GeneratedOutput> {
        tokio::fs::create_dir_all(&self.root).await.map_err(|e| {
            BouquetError::Storage(format!(
                "Failed to create output directory {}: {}",
                self.root.display(),
                e
            ))
        })?;

        let id = nanoid!();
        let final_path = self.path_for(&id);
        let tmp_path = self.root.join(format!(".{id}.tmp"));

        tokio::fs::write(&tmp_path, text)
            .await
            .map_err(|e| BouquetError::Storage(format!("Failed to write output {id}: {e}")))?;

        if let Err(e) = tokio::fs::rename(&tmp_path, &final_path).await {
            let _ = tokio::fs::remove_file(&tmp_path).await;
            return Err(BouquetError::Storage(format!(
                "Failed to finalize output {id}: {e}"
            )));
        }

        tracing::info!(output_id = %id, bytes = text.len(), "Saved generated output");

        Ok(GeneratedOutput {
            id,
            text: text.to_string(),
            created_at: Utc::now(),
        })
    }

    /// Unknown or malformed ids are reported as `Ok(None)`.
    pub async fn fetch(&self, id: &str) -> Result<Option<GeneratedOutput>> {
        if !Self::is_valid_id(id) {
            return Ok(None);
        }

        let path = self.path_for(id);
        let text = match tokio::fs::read_to_string(&path).await {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => {
                return Err(BouquetError::Storage(format!(
                    "Failed to read output {id}: {e}"
                )))
            }
        };

        let created_at = tokio::fs::metadata(&path)
            .await
            .ok()
            .and_then(|m| m.modified().ok())
            .map(DateTime::<Utc>::from)
            .unwrap_or_else(Utc::now);

        Ok(Some(GeneratedOutput {
            id: id.to_string(),
            text,
            created_at,
        }))
    }

    /// Returns whether anything was deleted.
    pub async fn delete(&self, id: &str) -> Result<bool> {
        if !Self::is_valid_id(id) {
            return Ok(false);
        }

        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => {
                tracing::info!(output_id = %id, "Deleted generated output");
                Ok(true)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(BouquetError::Storage(format!(
                "Failed to delete output {id}: {e}"
            ))),
        }
    }
}
