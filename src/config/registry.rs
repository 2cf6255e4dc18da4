//! Registry of managed config files.
//!
//! The registry maps short config ids (`"zshrc"`, `"starship"`) to the
//! metadata the dashboard needs: where the file lives relative to the
//! dotfiles root, what syntax it uses, and where its upstream docs are.
//! A built-in set covers a typical macOS dotfiles layout; a TOML file can
//! replace it wholesale at startup.

use std::collections::HashMap;
use std::path::{Component, Path};

use serde::{Deserialize, Serialize};

/// Syntax family of a managed file. Only `Toml` has a write-time gate;
/// the rest are hints for the front-end highlighter. `Json` and `Yaml`
/// never appear in the built-in registry but are accepted from registry
/// files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfigFormat {
    Shell,
    Conf,
    Vim,
    Lua,
    Toml,
    Bash,
    Ruby,
    Json,
    Yaml,
}

/// Metadata for one managed config file.
///
/// Serializes with camelCase keys; this is the wire shape returned by
/// `GET /api/configs` and embedded in file snapshots.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigEntry {
    /// Short identifier used in API paths.
    pub id: String,

    /// Human-readable name shown in the dashboard.
    pub display_name: String,

    /// The program this file configures.
    pub software: String,

    /// Grouping label (Shell, Editor, WM, ...).
    pub category: String,

    /// Syntax family of the file.
    pub format: ConfigFormat,

    /// Path of the file relative to the dotfiles root.
    pub source_path: String,

    /// Upstream documentation URL.
    pub docs_url: String,

    /// Upstream repository URL.
    pub repo_url: String,
}

/// Error type for registry loading.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", .0.join(", "))]
    Validation(Vec<String>),
}

/// On-disk registry file shape (snake_case TOML).
#[derive(Debug, Deserialize)]
struct RegistryFile {
    #[serde(default)]
    configs: Vec<RegistryFileEntry>,
}

#[derive(Debug, Deserialize)]
struct RegistryFileEntry {
    id: String,
    display_name: String,
    software: String,
    category: String,
    format: ConfigFormat,
    source_path: String,
    #[serde(default)]
    docs_url: String,
    #[serde(default)]
    repo_url: String,
}

impl From<RegistryFileEntry> for ConfigEntry {
    fn from(raw: RegistryFileEntry) -> Self {
        Self {
            id: raw.id,
            display_name: raw.display_name,
            software: raw.software,
            category: raw.category,
            format: raw.format,
            source_path: raw.source_path,
            docs_url: raw.docs_url,
            repo_url: raw.repo_url,
        }
    }
}

/// Immutable, ordered collection of [`ConfigEntry`] values with id lookup.
///
/// Listing order is definition order, so the dashboard shows files the way
/// the registry author arranged them.
#[derive(Debug)]
pub struct ConfigRegistry {
    entries: Vec<ConfigEntry>,
    index: HashMap<String, usize>,
}

impl ConfigRegistry {
    /// The built-in registry: a typical macOS dotfiles layout.
    pub fn builtin() -> Self {
        let entries = vec![
            entry(
                "zshrc",
                ".zshrc",
                "Zsh",
                "Shell",
                ConfigFormat::Shell,
                ".zshrc",
                "https://zsh.sourceforge.io/Doc/",
                "https://github.com/zsh-users/zsh",
            ),
            entry(
                "tmux",
                ".tmux.conf",
                "tmux",
                "Terminal",
                ConfigFormat::Conf,
                ".tmux.conf",
                "https://github.com/tmux/tmux/wiki",
                "https://github.com/tmux/tmux",
            ),
            entry(
                "vimrc",
                ".vimrc",
                "Vim",
                "Editor",
                ConfigFormat::Vim,
                ".vimrc",
                "https://vimdoc.sourceforge.net/",
                "https://github.com/vim/vim",
            ),
            entry(
                "nvim",
                "nvim/init.lua",
                "Neovim",
                "Editor",
                ConfigFormat::Lua,
                "config/nvim/init.lua",
                "https://neovim.io/doc/user/",
                "https://github.com/neovim/neovim",
            ),
            entry(
                "starship",
                "starship.toml",
                "Starship",
                "Shell",
                ConfigFormat::Toml,
                "config/starship.toml",
                "https://starship.rs/config/",
                "https://github.com/starship/starship",
            ),
            entry(
                "aerospace",
                "aerospace.toml",
                "AeroSpace",
                "WM",
                ConfigFormat::Toml,
                "config/aerospace/aerospace.toml",
                "https://nikitabobko.github.io/AeroSpace/guide",
                "https://github.com/nikitabobko/AeroSpace",
            ),
            entry(
                "borders",
                "bordersrc",
                "JankyBorders",
                "WM",
                ConfigFormat::Bash,
                "config/borders/bordersrc",
                "https://github.com/FelixKratz/JankyBorders",
                "https://github.com/FelixKratz/JankyBorders",
            ),
            entry(
                "brewfile",
                "Brewfile",
                "Homebrew",
                "Package",
                ConfigFormat::Ruby,
                "packages/Brewfile",
                "https://docs.brew.sh/",
                "https://github.com/Homebrew/brew",
            ),
        ];

        match Self::from_entries(entries) {
            Ok(registry) => registry,
            Err(errors) => unreachable!("built-in registry is invalid: {}", errors.join(", ")),
        }
    }

    /// Load and validate a registry from a TOML file.
    pub fn from_toml_file(path: &Path) -> Result<Self, RegistryError> {
        let content = std::fs::read_to_string(path)?;
        let file: RegistryFile = toml::from_str(&content)?;
        let entries = file.configs.into_iter().map(ConfigEntry::from).collect();

        Self::from_entries(entries).map_err(RegistryError::Validation)
    }

    /// Semantic checks; collects every problem instead of stopping early.
    fn from_entries(entries: Vec<ConfigEntry>) -> Result<Self, Vec<String>> {
        let mut errors = Vec::new();
        let mut index = HashMap::with_capacity(entries.len());

        for (position, entry) in entries.iter().enumerate() {
            if entry.id.is_empty() {
                errors.push(format!("entry #{}: empty id", position + 1));
                continue;
            }
            if index.insert(entry.id.clone(), position).is_some() {
                errors.push(format!("entry '{}': duplicate id", entry.id));
            }
            if entry.source_path.is_empty() {
                errors.push(format!("entry '{}': empty source_path", entry.id));
                continue;
            }
            let source = Path::new(&entry.source_path);
            if source.is_absolute() {
                errors.push(format!(
                    "entry '{}': source_path must be relative, got '{}'",
                    entry.id, entry.source_path
                ));
            }
            if source.components().any(|c| c == Component::ParentDir) {
                errors.push(format!(
                    "entry '{}': source_path must not contain '..', got '{}'",
                    entry.id, entry.source_path
                ));
            }
        }

        if errors.is_empty() {
            Ok(Self { entries, index })
        } else {
            Err(errors)
        }
    }

    /// Look up an entry by id.
    pub fn get(&self, id: &str) -> Option<&ConfigEntry> {
        self.index.get(id).map(|&position| &self.entries[position])
    }

    /// All entries in definition order.
    pub fn entries(&self) -> &[ConfigEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[allow(clippy::too_many_arguments)]
fn entry(
    id: &str,
    display_name: &str,
    software: &str,
    category: &str,
    format: ConfigFormat,
    source_path: &str,
    docs_url: &str,
    repo_url: &str,
) -> ConfigEntry {
    ConfigEntry {
        id: id.to_string(),
        display_name: display_name.to_string(),
        software: software.to_string(),
        category: category.to_string(),
        format,
        source_path: source_path.to_string(),
        docs_url: docs_url.to_string(),
        repo_url: repo_url.to_string(),
    }
}
