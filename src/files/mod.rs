//! Filesystem access for managed config files.
//!
//! # Data Flow
//! ```text
//! config id
//!     → ConfigRegistry (metadata lookup)
//!     → resolver.rs (absolute path + sandbox containment)
//!     → snapshot.rs (read content + size + mtime)   on GET
//!     → backup.rs  (timestamped copy) → fs write    on PUT
//! ```
//!
//! # Design Decisions
//! - Containment is checked against the canonicalized root, so symlinked
//!   roots (e.g. /tmp on macOS) compare correctly
//! - Backups are plain copies in a flat directory, named so that sorting
//!   by filename sorts by config and time

pub mod backup;
pub mod resolver;
pub mod snapshot;

pub use backup::BackupManager;
pub use resolver::PathResolver;
pub use snapshot::FileSnapshot;
