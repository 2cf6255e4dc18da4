//! Path resolution and sandbox containment.
//!
//! # Responsibilities
//! - Turn a registry entry into the absolute path of its source file
//! - Verify that a path stays inside the dotfiles root, including paths
//!   for files that do not exist yet (first write)

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::config::ConfigEntry;

/// Resolves registry entries to absolute paths under one root directory
/// and answers containment questions about them.
#[derive(Debug, Clone)]
pub struct PathResolver {
    root: PathBuf,
}

impl PathResolver {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// The dotfiles root all managed files must live under.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Absolute path of an entry's source file.
    pub fn resolve(&self, entry: &ConfigEntry) -> PathBuf {
        self.root.join(&entry.source_path)
    }

    /// Whether `path` stays inside the root once symlinks and `..` are
    /// resolved.
    ///
    /// `canonicalize` fails on paths that do not exist, so for a missing
    /// file the nearest existing ancestor is canonicalized and the missing
    /// components are re-appended. A missing component that is itself `..`
    /// cannot be resolved and is rejected outright.
    pub fn is_contained(&self, path: &Path) -> bool {
        let Ok(root) = self.root.canonicalize() else {
            return false;
        };

        // symlink_metadata, not exists(): a broken symlink occupies its
        // path and must reach canonicalize (which then rejects it) rather
        // than be treated as a missing component.
        let mut existing = path;
        let mut missing: Vec<OsString> = Vec::new();
        while existing.symlink_metadata().is_err() {
            let Some(name) = existing.file_name() else {
                return false;
            };
            missing.push(name.to_os_string());
            let Some(parent) = existing.parent() else {
                return false;
            };
            existing = parent;
        }

        let Ok(mut resolved) = existing.canonicalize() else {
            return false;
        };
        for component in missing.iter().rev() {
            resolved.push(component);
        }

        resolved.starts_with(&root)
    }
}
