//! Commit history via the system VCS binary.
//!
//! # Data Flow
//! ```text
//! config id
//!     → ConfigRegistry (relative source path)
//!     → provider.rs (argument construction, hash validation)
//!     → git.rs (subprocess with timeout)
//!     → parsed HistoryEntry list / raw diff text
//! ```
//!
//! # Design Decisions
//! - `git` is an external collaborator, never linked in; the dashboard
//!   must work on machines where the dotfiles are not a repo at all
//! - Every VCS failure (no binary, not a repo, timeout) degrades to an
//!   empty result instead of an error response
//! - The runner is a trait object so tests exercise the provider without
//!   spawning processes

pub mod git;
pub mod provider;

pub use git::{SystemGit, VcsError, VcsOutput, VcsRunner};
pub use provider::{HistoryEntry, HistoryProvider, DEFAULT_HISTORY_LIMIT};
