//! Artifact hand-off to the caller.

use std::path::{Path, PathBuf};

use tracing::warn;

/// A converted output file handed to the transport layer.
///
/// The core guarantees the file exists and is readable until
/// [`release`](ArtifactHandle::release) is called; the caller must call it
/// exactly once after delivering the artifact — `release` consumes the
/// handle, so the type system enforces "at most once". If a handle is
/// dropped unreleased (delivery crashed), the file is removed best-effort
/// so converted output cannot accumulate on disk.
#[derive(Debug)]
pub struct ArtifactHandle {
    path: PathBuf,
    size_bytes: u64,
    released: bool,
}

impl ArtifactHandle {
    /// Wrap a verified artifact path.
    pub(crate) fn new(path: PathBuf, size_bytes: u64) -> Self {
        Self {
            path,
            size_bytes,
            released: false,
        }
    }

    /// Filesystem path of the artifact.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Artifact size in bytes.
    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }

    /// Delete the artifact after delivery.
    pub async fn release(mut self) -> std::io::Result<()> {
        self.released = true;
        tokio::fs::remove_file(&self.path).await
    }
}

impl Drop for ArtifactHandle {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(
                    path = %self.path.display(),
                    error = %e,
                    "Failed to remove unreleased artifact"
                );
            }
        }
    }
}
