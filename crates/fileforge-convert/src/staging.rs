//! Staging file guard.
//!
//! A staging file is the short-lived disk copy of an upload handed to the
//! external converter. Its name is built from a fresh request identifier
//! and the validated content type — never from client input, so path
//! traversal and cross-request collisions are impossible by construction.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use fileforge_entity::RequestId;

/// A payload written to a private, collision-free path inside the staging
/// directory.
///
/// Deleting the file is the `Drop` impl's job: whoever holds the guard
/// gets cleanup on every exit path, including panics and early returns.
#[derive(Debug)]
pub struct StagingFile {
    path: PathBuf,
}

impl StagingFile {
    /// Write `data` to a fresh staging path and return the guard.
    ///
    /// The staging directory is created if missing. `extension` must come
    /// from the validated signature, not the client filename.
    pub async fn create(
        staging_dir: &Path,
        request_id: RequestId,
        extension: &str,
        data: &[u8],
    ) -> std::io::Result<Self> {
        tokio::fs::create_dir_all(staging_dir).await?;

        let name = format!("{}.{}", request_id.simple(), extension.trim_start_matches('.'));
        let path = staging_dir.join(name);
        tokio::fs::write(&path, data).await?;

        debug!(path = %path.display(), bytes = data.len(), "Staged upload");
        Ok(Self { path })
    }

    /// The staged file's path.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for StagingFile {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to clean up staging file"
                );
            }
        }
    }
}
