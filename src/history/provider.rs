//! History and diff lookups for managed files.
//!
//! # Responsibilities
//! - Build `git log` / `git diff` invocations for a tracked relative path
//! - Validate commit hashes before they reach a command line
//! - Parse log output into [`HistoryEntry`] values
//!
//! Failures never leave this module: a machine without git, a root that
//! is not a repository, or a hung subprocess all produce empty results.

use std::path::PathBuf;
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use regex::Regex;
use serde::Serialize;
use tracing::debug;

use crate::history::git::{SystemGit, VcsRunner};

/// Commits shown per file unless the request asks for more.
pub const DEFAULT_HISTORY_LIMIT: usize = 5;

/// Hard cap on any single VCS subprocess.
const VCS_TIMEOUT: Duration = Duration::from_secs(10);

/// One field per commit, `|`-separated: full hash, author date, author
/// name, subject. The subject may itself contain `|`, so parsing splits
/// at most three times.
const LOG_FORMAT: &str = "--format=%H|%ai|%an|%s";

static COMMIT_HASH_REGEX: OnceLock<Regex> = OnceLock::new();

fn commit_hash_regex() -> &'static Regex {
    COMMIT_HASH_REGEX
        .get_or_init(|| Regex::new(r"^[a-fA-F0-9]{7,40}$").expect("commit hash regex is valid"))
}

/// Whether `commit` is an abbreviated-to-full hex object name. Anything
/// else is refused before a subprocess is built from it.
pub fn is_valid_commit_hash(commit: &str) -> bool {
    commit_hash_regex().is_match(commit)
}

/// One commit touching a managed file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// First seven characters of the full hash.
    pub short_hash: String,
    pub full_hash: String,
    /// Author date as the VCS prints it (`2024-01-15 10:30:00 +0900`).
    pub date: String,
    pub author: String,
    /// Subject line of the commit message.
    pub message: String,
}

/// Fetches commit history and per-commit diffs for files under one
/// working directory.
#[derive(Clone)]
pub struct HistoryProvider {
    runner: Arc<dyn VcsRunner>,
    work_dir: PathBuf,
}

impl HistoryProvider {
    /// Provider backed by the system `git` binary.
    pub fn new(work_dir: PathBuf) -> Self {
        Self::with_runner(Arc::new(SystemGit), work_dir)
    }

    pub fn with_runner(runner: Arc<dyn VcsRunner>, work_dir: PathBuf) -> Self {
        Self { runner, work_dir }
    }

    /// Most recent commits touching `source_path`, newest first.
    pub async fn list(&self, source_path: &str, limit: usize) -> Vec<HistoryEntry> {
        let count = format!("-n{limit}");
        let args = ["log", LOG_FORMAT, count.as_str(), "--", source_path];

        match self.runner.run(&args, &self.work_dir, VCS_TIMEOUT).await {
            Ok(output) if output.success => parse_log(&output.stdout),
            Ok(output) => {
                debug!(
                    path = %source_path,
                    stderr = %output.stderr.trim(),
                    "History lookup failed; returning empty history"
                );
                Vec::new()
            }
            Err(error) => {
                debug!(
                    path = %source_path,
                    error = %error,
                    "VCS unavailable; returning empty history"
                );
                Vec::new()
            }
        }
    }

    /// Diff of `source_path` introduced by `commit`, or empty when it
    /// cannot be produced.
    ///
    /// A commit without a parent has no `{commit}~1`, so the file content
    /// at that commit is shown instead, marked as the initial version.
    pub async fn commit_diff(&self, source_path: &str, commit: &str) -> String {
        if !is_valid_commit_hash(commit) {
            return String::new();
        }

        let parent = format!("{commit}~1");
        let args = ["diff", parent.as_str(), commit, "--", source_path];
        match self.runner.run(&args, &self.work_dir, VCS_TIMEOUT).await {
            Ok(output) if output.success => output.stdout,
            _ => self.initial_version(source_path, commit).await,
        }
    }

    async fn initial_version(&self, source_path: &str, commit: &str) -> String {
        let object = format!("{commit}:{source_path}");
        let args = ["show", object.as_str()];
        match self.runner.run(&args, &self.work_dir, VCS_TIMEOUT).await {
            Ok(output) if output.success => format!("(Initial commit)\n\n{}", output.stdout),
            _ => String::new(),
        }
    }
}

fn parse_log(stdout: &str) -> Vec<HistoryEntry> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let mut fields = line.splitn(4, '|');
            let full_hash = fields.next()?;
            let date = fields.next()?;
            let author = fields.next()?;
            let message = fields.next()?;
            Some(HistoryEntry {
                short_hash: full_hash.chars().take(7).collect(),
                full_hash: full_hash.to_string(),
                date: date.to_string(),
                author: author.to_string(),
                message: message.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::history::git::{VcsError, VcsOutput};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::path::Path;
    use std::sync::Mutex;

    /// Replays canned responses and records every invocation.
    struct FakeRunner {
        responses: Mutex<VecDeque<Result<VcsOutput, VcsError>>>,
        calls: Mutex<Vec<Vec<String>>>,
    }

    impl FakeRunner {
        fn new(responses: Vec<Result<VcsOutput, VcsError>>) -> Arc<Self> {
            Arc::new(Self {
                responses: Mutex::new(responses.into()),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn ok(stdout: &str) -> Result<VcsOutput, VcsError> {
            Ok(VcsOutput {
                success: true,
                stdout: stdout.to_string(),
                stderr: String::new(),
            })
        }

        fn failed(stderr: &str) -> Result<VcsOutput, VcsError> {
            Ok(VcsOutput {
                success: false,
                stdout: String::new(),
                stderr: stderr.to_string(),
            })
        }

        fn calls(&self) -> Vec<Vec<String>> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VcsRunner for FakeRunner {
        async fn run(
            &self,
            args: &[&str],
            _cwd: &Path,
            _timeout: Duration,
        ) -> Result<VcsOutput, VcsError> {
            self.calls
                .lock()
                .unwrap()
                .push(args.iter().map(|a| a.to_string()).collect());
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Self::failed("no canned response left"))
        }
    }

    fn provider(runner: &Arc<FakeRunner>) -> HistoryProvider {
        HistoryProvider::with_runner(runner.clone(), PathBuf::from("/dotfiles"))
    }

    const COMMIT_A: &str = "aaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa";
    const COMMIT_B: &str = "bbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb";

    #[tokio::test]
    async fn test_list_parses_log_output() {
        let runner = FakeRunner::new(vec![FakeRunner::ok(&format!(
            "{COMMIT_A}|2024-01-15 10:30:00 +0900|Alice|Update prompt\n\
             {COMMIT_B}|2024-01-10 08:00:00 +0900|Bob|Initial commit\n"
        ))]);

        let history = provider(&runner).list(".zshrc", 5).await;

        assert_eq!(history.len(), 2);
        assert_eq!(history[0].short_hash, "aaaaaaa");
        assert_eq!(history[0].full_hash, COMMIT_A);
        assert_eq!(history[0].date, "2024-01-15 10:30:00 +0900");
        assert_eq!(history[0].author, "Alice");
        assert_eq!(history[0].message, "Update prompt");
        assert_eq!(history[1].short_hash, "bbbbbbb");

        assert_eq!(
            runner.calls(),
            vec![vec![
                "log".to_string(),
                "--format=%H|%ai|%an|%s".to_string(),
                "-n5".to_string(),
                "--".to_string(),
                ".zshrc".to_string(),
            ]]
        );
    }

    #[tokio::test]
    async fn test_list_honors_limit() {
        let runner = FakeRunner::new(vec![FakeRunner::ok("")]);

        provider(&runner).list(".vimrc", 20).await;

        assert_eq!(runner.calls()[0][2], "-n20");
    }

    #[tokio::test]
    async fn test_subject_may_contain_pipes() {
        let runner = FakeRunner::new(vec![FakeRunner::ok(&format!(
            "{COMMIT_A}|2024-01-15 10:30:00 +0900|Alice|fix: a | b | c\n"
        ))]);

        let history = provider(&runner).list(".zshrc", 5).await;

        assert_eq!(history[0].message, "fix: a | b | c");
    }

    #[tokio::test]
    async fn test_malformed_lines_are_skipped() {
        let runner = FakeRunner::new(vec![FakeRunner::ok(&format!(
            "not-a-log-line\n{COMMIT_A}|2024-01-15 10:30:00 +0900|Alice|ok\n"
        ))]);

        let history = provider(&runner).list(".zshrc", 5).await;

        assert_eq!(history.len(), 1);
        assert_eq!(history[0].message, "ok");
    }

    #[tokio::test]
    async fn test_vcs_failure_degrades_to_empty() {
        let runner = FakeRunner::new(vec![FakeRunner::failed(
            "fatal: not a git repository (or any of the parent directories): .git",
        )]);

        assert!(provider(&runner).list(".zshrc", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_missing_binary_degrades_to_empty() {
        let runner = FakeRunner::new(vec![Err(VcsError::Spawn(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "No such file or directory",
        )))]);

        assert!(provider(&runner).list(".zshrc", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_empty() {
        let runner = FakeRunner::new(vec![Err(VcsError::TimedOut(Duration::from_secs(10)))]);

        assert!(provider(&runner).list(".zshrc", 5).await.is_empty());
    }

    #[tokio::test]
    async fn test_diff_returns_stdout() {
        let runner = FakeRunner::new(vec![FakeRunner::ok("--- a/.zshrc\n+++ b/.zshrc\n")]);

        let diff = provider(&runner).commit_diff(".zshrc", "abc1234").await;

        assert_eq!(diff, "--- a/.zshrc\n+++ b/.zshrc\n");
        assert_eq!(
            runner.calls(),
            vec![vec![
                "diff".to_string(),
                "abc1234~1".to_string(),
                "abc1234".to_string(),
                "--".to_string(),
                ".zshrc".to_string(),
            ]]
        );
    }

    #[tokio::test]
    async fn test_root_commit_falls_back_to_initial_version() {
        let runner = FakeRunner::new(vec![
            FakeRunner::failed("fatal: bad revision 'abc1234~1'"),
            FakeRunner::ok("export EDITOR=vim\n"),
        ]);

        let diff = provider(&runner).commit_diff(".zshrc", "abc1234").await;

        assert_eq!(diff, "(Initial commit)\n\nexport EDITOR=vim\n");
        assert_eq!(runner.calls()[1], vec!["show", "abc1234:.zshrc"]);
    }

    #[tokio::test]
    async fn test_diff_empty_when_both_attempts_fail() {
        let runner = FakeRunner::new(vec![
            FakeRunner::failed("fatal: bad revision"),
            FakeRunner::failed("fatal: invalid object name"),
        ]);

        assert_eq!(provider(&runner).commit_diff(".zshrc", "abc1234").await, "");
    }

    #[tokio::test]
    async fn test_invalid_hash_never_reaches_the_runner() {
        let runner = FakeRunner::new(vec![]);

        let diff = provider(&runner).commit_diff(".zshrc", "../../etc").await;

        assert_eq!(diff, "");
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn test_commit_hash_validation() {
        assert!(is_valid_commit_hash("abc1234"));
        assert!(is_valid_commit_hash("ABCDEF1"));
        assert!(is_valid_commit_hash(COMMIT_A));

        assert!(!is_valid_commit_hash(""));
        assert!(!is_valid_commit_hash("abc123")); // six chars
        assert!(!is_valid_commit_hash(&"a".repeat(41)));
        assert!(!is_valid_commit_hash("abc123g")); // non-hex
        assert!(!is_valid_commit_hash("../../etc"));
        assert!(!is_valid_commit_hash("abc1234 --help"));
    }

    #[test]
    fn test_wire_shape_is_camel_case() {
        let entry = HistoryEntry {
            short_hash: "abc1234".to_string(),
            full_hash: COMMIT_A.to_string(),
            date: "2024-01-15 10:30:00 +0900".to_string(),
            author: "Alice".to_string(),
            message: "Update prompt".to_string(),
        };
        let value = serde_json::to_value(&entry).unwrap();

        assert_eq!(value["shortHash"], "abc1234");
        assert_eq!(value["fullHash"], COMMIT_A);
    }
}
