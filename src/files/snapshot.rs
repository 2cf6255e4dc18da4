//! Point-in-time view of a managed file.

use std::io;
use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ConfigEntry;

/// A managed file's metadata plus its current content.
///
/// This is the wire shape of `GET /api/configs/{id}`: the registry entry
/// flattened together with the content, byte size, and last-modified time
/// in UTC (RFC 3339).
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSnapshot {
    #[serde(flatten)]
    pub entry: ConfigEntry,
    pub content: String,
    pub size_bytes: u64,
    pub modified_at: DateTime<Utc>,
}

impl FileSnapshot {
    /// Read `path` and capture its current state.
    ///
    /// Fails with `NotFound` when the file is missing and `InvalidData`
    /// when it is not valid UTF-8; callers map those onto API errors.
    pub async fn load(entry: &ConfigEntry, path: &Path) -> io::Result<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let metadata = tokio::fs::metadata(path).await?;
        let modified_at = DateTime::<Utc>::from(metadata.modified()?);

        Ok(Self {
            entry: entry.clone(),
            content,
            size_bytes: metadata.len(),
            modified_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigRegistry;

    #[tokio::test]
    async fn test_load_captures_content_and_metadata() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".zshrc");
        tokio::fs::write(&path, "alias ll='ls -la'\n").await.unwrap();

        let registry = ConfigRegistry::builtin();
        let snapshot = FileSnapshot::load(registry.get("zshrc").unwrap(), &path)
            .await
            .unwrap();

        assert_eq!(snapshot.content, "alias ll='ls -la'\n");
        assert_eq!(snapshot.size_bytes, 18);
        assert!(snapshot.modified_at <= Utc::now());
    }

    #[tokio::test]
    async fn test_wire_shape_flattens_entry() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("starship.toml");
        tokio::fs::write(&path, "[character]\n").await.unwrap();

        let registry = ConfigRegistry::builtin();
        let snapshot = FileSnapshot::load(registry.get("starship").unwrap(), &path)
            .await
            .unwrap();
        let value = serde_json::to_value(&snapshot).unwrap();

        // Entry fields sit at the top level next to the file state.
        assert_eq!(value["id"], "starship");
        assert_eq!(value["displayName"], "starship.toml");
        assert_eq!(value["content"], "[character]\n");
        assert_eq!(value["sizeBytes"], 12);
        assert!(value["modifiedAt"].as_str().unwrap().ends_with('Z'));
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ConfigRegistry::builtin();

        let err = FileSnapshot::load(registry.get("zshrc").unwrap(), &dir.path().join(".zshrc"))
            .await
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }
}
