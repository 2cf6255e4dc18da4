//! Shared fixtures for API integration tests.

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tempfile::TempDir;
use tokio::net::TcpListener;

use dotfiles_dashboard::config::{ConfigRegistry, Settings};
use dotfiles_dashboard::http::HttpServer;

/// A running dashboard over a throwaway dotfiles root.
pub struct Dashboard {
    pub addr: SocketAddr,
    root: TempDir,
}

impl Dashboard {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }

    pub fn root(&self) -> &Path {
        self.root.path()
    }

    #[allow(dead_code)]
    pub fn backups_dir(&self) -> PathBuf {
        self.root.path().join(".backups")
    }

    /// Names of all backup files currently in the archive.
    #[allow(dead_code)]
    pub fn backup_names(&self) -> Vec<String> {
        let Ok(entries) = std::fs::read_dir(self.backups_dir()) else {
            return Vec::new();
        };
        entries
            .filter_map(|entry| Some(entry.ok()?.file_name().to_string_lossy().into_owned()))
            .collect()
    }
}

/// Boot a server on an ephemeral port over a fresh root seeded with a few
/// managed files. `.vimrc` is left unseeded so tests can exercise
/// missing-file and first-write behavior.
pub async fn spawn_dashboard() -> Dashboard {
    let root = TempDir::new().unwrap();
    seed_root(root.path());

    let settings = Settings {
        port: 0,
        root: root.path().to_path_buf(),
        static_dir: root.path().join("static"),
        backups_dir: None,
        registry: None,
    };

    let listener = TcpListener::bind(settings.bind_address()).await.unwrap();
    let addr = listener.local_addr().unwrap();

    let server = HttpServer::new(&settings, Arc::new(ConfigRegistry::builtin()));
    tokio::spawn(async move {
        let _ = server.run(listener).await;
    });

    Dashboard { addr, root }
}

fn seed_root(root: &Path) {
    std::fs::write(root.join(".zshrc"), "export EDITOR=vim\n").unwrap();

    std::fs::create_dir_all(root.join("config")).unwrap();
    std::fs::write(
        root.join("config/starship.toml"),
        "[character]\nsymbol = \">\"\n",
    )
    .unwrap();

    std::fs::create_dir_all(root.join("packages")).unwrap();
    std::fs::write(
        root.join("packages/Brewfile"),
        "# Packages\n\
         tap \"homebrew/bundle\"\n\
         brew \"git\"\n\
         brew \"ripgrep\"\n\
         cask \"iterm2\"\n\
         mas \"Xcode\", id: 497799835\n",
    )
    .unwrap();

    std::fs::create_dir_all(root.join("static")).unwrap();
    std::fs::write(
        root.join("static/index.html"),
        "<!doctype html>\n<title>Dotfiles Dashboard</title>\n",
    )
    .unwrap();
}

/// Client that talks straight to loopback, ignoring any proxy environment.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
