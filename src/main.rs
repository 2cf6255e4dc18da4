//! Dotfiles Dashboard Server
//!
//! A localhost-only dashboard for viewing, editing, and version-inspecting
//! dotfiles, built with Tokio and Axum.
//!
//! # Architecture Overview
//!
//! ```text
//!                      ┌───────────────────────────────────────────────┐
//!                      │               DASHBOARD SERVER                │
//!                      │                                               │
//!   Browser Request    │  ┌─────────┐    ┌──────────────────────────┐  │
//!   ──────────────────▶│  │  http   │───▶│        handlers          │  │
//!                      │  │ server  │    └───┬──────┬──────┬────────┘  │
//!                      │  └─────────┘        │      │      │           │
//!                      │                     ▼      ▼      ▼           │
//!                      │              ┌────────┐ ┌─────┐ ┌─────────┐   │
//!                      │              │ files  │ │vali-│ │ history │   │
//!                      │              │resolve │ │date │ │ git     │   │
//!                      │              │backup  │ │     │ │subproc. │   │
//!                      │              └───┬────┘ └─────┘ └────┬────┘   │
//!                      │                  ▼                   ▼        │
//!                      │             dotfiles root       git binary    │
//!                      │                                               │
//!                      │  ┌─────────────────────────────────────────┐  │
//!                      │  │     config: CLI/env + file registry     │  │
//!                      │  └─────────────────────────────────────────┘  │
//!                      └───────────────────────────────────────────────┘
//! ```

use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dotfiles_dashboard::config::{ConfigRegistry, Settings};
use dotfiles_dashboard::http::HttpServer;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing subscriber
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dotfiles_dashboard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let settings = Settings::parse();

    let registry = match &settings.registry {
        Some(path) => Arc::new(ConfigRegistry::from_toml_file(path)?),
        None => Arc::new(ConfigRegistry::builtin()),
    };

    tracing::info!(
        root = %settings.root.display(),
        static_dir = %settings.static_dir.display(),
        backups_dir = %settings.backups_dir().display(),
        configs = registry.len(),
        "Configuration loaded"
    );

    // Bind TCP listener (loopback only)
    let listener = TcpListener::bind(settings.bind_address()).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(
        address = %local_addr,
        "Listening for connections"
    );

    // Create and run HTTP server
    let server = HttpServer::new(&settings, registry);
    server.run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
