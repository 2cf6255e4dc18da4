//! Command-line and environment settings.

use std::net::{Ipv4Addr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

/// Startup settings for the dashboard server.
///
/// The server always binds to loopback; the dashboard is a single-user
/// local tool and is never meant to be reachable from the network.
#[derive(Debug, Clone, Parser)]
#[command(name = "dotfiles-dashboard", version, about = "Local dashboard for dotfiles")]
pub struct Settings {
    /// Port to listen on (loopback only).
    #[arg(long, env = "DOTFILES_DASHBOARD_PORT", default_value_t = 8765)]
    pub port: u16,

    /// Dotfiles root directory; every managed file must live under it.
    #[arg(long, env = "DOTFILES_DIR", default_value = ".")]
    pub root: PathBuf,

    /// Directory of front-end assets served at `/` and `/static`.
    #[arg(long, env = "DOTFILES_DASHBOARD_STATIC_DIR", default_value = "static")]
    pub static_dir: PathBuf,

    /// Backup directory [default: .backups under the root].
    #[arg(long, env = "DOTFILES_DASHBOARD_BACKUPS_DIR")]
    pub backups_dir: Option<PathBuf>,

    /// TOML file replacing the built-in config registry.
    #[arg(long, env = "DOTFILES_DASHBOARD_REGISTRY")]
    pub registry: Option<PathBuf>,
}

impl Settings {
    /// Loopback socket address for the listener.
    pub fn bind_address(&self) -> SocketAddr {
        SocketAddr::from((Ipv4Addr::LOCALHOST, self.port))
    }

    /// Backup directory, defaulting to `.backups` under the root.
    pub fn backups_dir(&self) -> PathBuf {
        self.backups_dir
            .clone()
            .unwrap_or_else(|| self.root.join(".backups"))
    }
}
