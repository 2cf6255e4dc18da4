//! Subprocess execution of the system `git` binary.

use std::path::Path;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

/// Captured result of one VCS invocation.
#[derive(Debug, Clone)]
pub struct VcsOutput {
    pub success: bool,
    pub stdout: String,
    pub stderr: String,
}

/// Error type for VCS invocations.
#[derive(Debug, thiserror::Error)]
pub enum VcsError {
    #[error("failed to spawn vcs process: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("vcs command timed out after {0:?}")]
    TimedOut(Duration),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Seam between the history provider and the real VCS binary.
///
/// `args` never includes the binary name; the implementation decides what
/// to execute. Implementations must enforce `timeout` themselves.
#[async_trait]
pub trait VcsRunner: Send + Sync {
    async fn run(&self, args: &[&str], cwd: &Path, timeout: Duration)
        -> Result<VcsOutput, VcsError>;
}

/// Runs the system `git` with captured output and a hard timeout.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemGit;

#[async_trait]
impl VcsRunner for SystemGit {
    async fn run(
        &self,
        args: &[&str],
        cwd: &Path,
        timeout: Duration,
    ) -> Result<VcsOutput, VcsError> {
        let child = Command::new("git")
            .args(args)
            .current_dir(cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(VcsError::Spawn)?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|_| VcsError::TimedOut(timeout))??;

        Ok(VcsOutput {
            success: output.status.success(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Requires the git binary on PATH.
    #[tokio::test]
    async fn test_version_runs_and_captures_stdout() {
        let dir = tempfile::tempdir().unwrap();
        let output = SystemGit
            .run(&["--version"], dir.path(), Duration::from_secs(10))
            .await
            .unwrap();

        assert!(output.success);
        assert!(output.stdout.starts_with("git version"));
    }

    #[tokio::test]
    async fn test_failure_is_captured_not_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = SystemGit
            .run(&["log"], dir.path(), Duration::from_secs(10))
            .await
            .unwrap();

        // Not a repository: git exits non-zero but the call itself is Ok.
        assert!(!output.success);
        assert!(!output.stderr.is_empty());
    }
}
