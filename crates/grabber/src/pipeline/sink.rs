//! Archive persistence

use async_trait::async_trait;
use std::path::PathBuf;
use tokio::fs;
use tracing::debug;

use crate::pipeline::error::Result;

/// Destination for the assembled archive
///
/// Stands in for the browser save dialog at the same seam: a byte buffer
/// plus a suggested filename, invoked once per run.
#[async_trait]
pub trait ArchiveSink: Send + Sync {
    /// Persist the archive under the suggested name, returning bytes written
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<u64>;
}

/// Filesystem sink writing into a fixed directory
///
/// Writes through a `.part` temp file and renames into place, so the
/// archive either exists completely or not at all.
pub struct FsSink {
    dir: PathBuf,
}

impl FsSink {
    pub fn new<P: Into<PathBuf>>(dir: P) -> Self {
        Self { dir: dir.into() }
    }

    /// Final path an archive with the given name lands at
    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }
}

#[async_trait]
impl ArchiveSink for FsSink {
    async fn save(&self, name: &str, bytes: &[u8]) -> Result<u64> {
        fs::create_dir_all(&self.dir).await?;

        let dest_path = self.path_for(name);
        let temp_path = dest_path.with_extension("part");
        fs::write(&temp_path, bytes).await?;
        fs::rename(&temp_path, &dest_path).await?;

        debug!("Archive saved to {}", dest_path.display());
        Ok(bytes.len() as u64)
    }
}
