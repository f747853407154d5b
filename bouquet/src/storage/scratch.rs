use std::path::{Path, PathBuf};

use nanoid::nanoid;

use crate::error::{BouquetError, Result};

const MAX_STORED_NAME_LEN: usize = 100;

/// An upload persisted inside a [`ScratchSpace`].
#[derive(Debug, Clone)]
pub struct StoredArtifact {
    pub original_name: String,
    pub path: PathBuf,
}

/// Per-request directory holding uploaded bytes while they are extracted.
///
/// Call [`ScratchSpace::release`] once the request is done with its uploads.
/// A space that is dropped without being released is removed synchronously
/// from `Drop`.
#[derive(Debug)]
pub struct ScratchSpace {
    dir: PathBuf,
    released: bool,
}

impl ScratchSpace {
    /// Create a fresh, uniquely named directory under `root`.
    pub async fn acquire(root: impl AsRef<Path>) -> Result<Self> {
        let dir = root.as_ref().join(nanoid!());

        tokio::fs::create_dir_all(&dir).await.map_err(|e| {
            BouquetError::Storage(format!(
                "Failed to create scratch directory {}: {}",
                dir.display(),
                e
            ))
        })?;

        tracing::debug!(path = %dir.display(), "Acquired scratch space");

        Ok(Self {
            dir,
            released: false,
        })
    }

    pub fn path(&self) -> &Path {
        &self.dir
    }

    /// Write `bytes` under a collision-resistant name derived from `original_name`.
    pub async fn persist(&self, original_name: &str, bytes: &[u8]) -> Result<StoredArtifact> {
        let stored_name = format!("{}-{}", nanoid!(10), sanitize_file_name(original_name));
        let path = self.dir.join(stored_name);

        tokio::fs::write(&path, bytes).await.map_err(|e| {
            BouquetError::Storage(format!("Failed to persist '{original_name}': {e}"))
        })?;

        tracing::debug!(
            original_name = %original_name,
            path = %path.display(),
            size = bytes.len(),
            "Persisted upload"
        );

        Ok(StoredArtifact {
            original_name: original_name.to_string(),
            path,
        })
    }

    /// Remove the directory and everything in it.
    pub async fn release(mut self) -> Result<()> {
        self.released = true;
        match tokio::fs::remove_dir_all(&self.dir).await {
            Ok(()) => {
                tracing::debug!(path = %self.dir.display(), "Released scratch space");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(BouquetError::Storage(format!(
                "Failed to remove scratch directory {}: {}",
                self.dir.display(),
                e
            ))),
        }
    }
}

impl Drop for ScratchSpace {
    fn drop(&mut self) {
        if self.released {
            return;
        }

        tracing::warn!(
            path = %self.dir.display(),
            "Scratch space dropped without release, removing synchronously"
        );

        if let Err(e) = std::fs::remove_dir_all(&self.dir) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::error!(path = %self.dir.display(), error = %e, "Failed to remove scratch space");
            }
        }
    }
}

/// Reduce an untrusted file name to a safe storage suffix.
///
/// Path components are stripped, anything outside `[A-Za-z0-9._-]` becomes
/// `_`, and the result is capped at 100 characters.
pub fn sanitize_file_name(name: &str) -> String {
    let base = name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default()
        .trim();

    let mut sanitized: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect();

    // ".." or "." alone would still be a path component
    if sanitized.chars().all(|c| c == '.') {
        sanitized = "upload".to_string();
    }

    if sanitized.len() > MAX_STORED_NAME_LEN {
        // Keep the extension so the stored file still dispatches correctly
        let ext = Path::new(&sanitized)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| format!(".{e}"))
            .filter(|e| e.len() < MAX_STORED_NAME_LEN / 2)
            .unwrap_or_default();
        let keep = MAX_STORED_NAME_LEN - ext.len();
        sanitized = format!("{}{}", &sanitized[..keep], ext);
    }

    sanitized
}
