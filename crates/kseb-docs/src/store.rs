//! Filesystem artifact store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::{Duration, SystemTime};

use async_trait::async_trait;
use kseb_core::{ArtifactError, ArtifactStore, is_safe_name};
use uuid::Uuid;

/// Stores generated documents as `<uuid>.<ext>` files in one directory.
#[derive(Debug, Clone)]
pub struct FsArtifactStore {
    dir: PathBuf,
}

impl FsArtifactStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Delete stored files last modified more than `max_age` ago.
    ///
    /// Returns how many were removed. A missing directory counts as empty.
    pub async fn purge_older_than(&self, max_age: Duration) -> Result<usize, ArtifactError> {
        let Some(cutoff) = SystemTime::now().checked_sub(max_age) else {
            return Ok(0);
        };

        let mut entries = match tokio::fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(io_error(&e)),
        };

        let mut removed = 0;
        while let Some(entry) = entries.next_entry().await.map_err(|e| io_error(&e))? {
            let metadata = entry.metadata().await.map_err(|e| io_error(&e))?;
            if !metadata.is_file() {
                continue;
            }
            let expired = metadata.modified().is_ok_and(|modified| modified < cutoff);
            if !expired {
                continue;
            }

            match tokio::fs::remove_file(entry.path()).await {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => {
                    tracing::warn!(
                        path = %entry.path().display(),
                        error = %e,
                        "Failed to remove expired artifact"
                    );
                }
            }
        }

        if removed > 0 {
            tracing::info!(removed, dir = %self.dir.display(), "Expired artifacts removed");
        }
        Ok(removed)
    }
}

fn io_error(err: &std::io::Error) -> ArtifactError {
    ArtifactError::Io(err.to_string())
}

#[async_trait]
impl ArtifactStore for FsArtifactStore {
    async fn save(&self, extension: &str, bytes: Vec<u8>) -> Result<String, ArtifactError> {
        let extension = extension.trim_start_matches('.');
        if !is_safe_name(extension) {
            return Err(ArtifactError::InvalidName(extension.to_string()));
        }

        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| io_error(&e))?;

        let name = format!("{}.{extension}", Uuid::new_v4());
        tokio::fs::write(self.dir.join(&name), bytes)
            .await
            .map_err(|e| io_error(&e))?;

        tracing::info!(name = %name, dir = %self.dir.display(), "Artifact saved");
        Ok(name)
    }

    async fn load(&self, name: &str) -> Result<Option<Vec<u8>>, ArtifactError> {
        if !is_safe_name(name) {
            return Err(ArtifactError::InvalidName(name.to_string()));
        }
        match tokio::fs::read(self.dir.join(name)).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(io_error(&e)),
        }
    }
}
