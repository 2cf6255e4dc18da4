//! HTTP serving subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection (loopback)
//!     → server.rs (Axum setup, middleware stack)
//!     → handlers.rs (API endpoints)
//!         → ConfigRegistry / PathResolver / validate
//!         → BackupManager / HistoryProvider
//!     → JSON response (errors included)
//!
//! non-API paths → ServeDir (front-end assets)
//! ```

pub(crate) mod handlers;
pub mod server;

pub use server::AppState;
pub use server::HttpServer;
