//! Pre-write backups of managed files.
//!
//! Backups are plain file copies in a flat directory, one per save, named
//! `{config_id}_{YYYYMMDD_HHMMSS}` in local time. Two saves of the same
//! config within one second collide on the name and the later copy wins.
//! Nothing is ever pruned here.

use std::io;
use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::debug;

/// Creates timestamped copies of files before they are overwritten.
#[derive(Debug, Clone)]
pub struct BackupManager {
    backups_dir: PathBuf,
}

impl BackupManager {
    pub fn new(backups_dir: PathBuf) -> Self {
        Self { backups_dir }
    }

    /// The directory backups are written to.
    pub fn dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Copy the current bytes of `source` into the archive.
    ///
    /// Returns the backup path, or `Ok(None)` when `source` does not exist
    /// yet (first write, nothing to preserve). The backup directory is
    /// created on first use, so a fresh checkout stays clean until the
    /// first save.
    pub async fn snapshot(&self, config_id: &str, source: &Path) -> io::Result<Option<PathBuf>> {
        if !tokio::fs::try_exists(source).await? {
            return Ok(None);
        }

        tokio::fs::create_dir_all(&self.backups_dir).await?;

        let timestamp = Local::now().format("%Y%m%d_%H%M%S");
        let backup_path = self.backups_dir.join(format!("{config_id}_{timestamp}"));
        tokio::fs::copy(source, &backup_path).await?;

        debug!(
            config = %config_id,
            backup = %backup_path.display(),
            "Created backup"
        );
        Ok(Some(backup_path))
    }
}
