//! Dotfiles dashboard server library.

pub mod config;
pub mod error;
pub mod files;
pub mod history;
pub mod http;
pub mod validate;

pub use config::ConfigRegistry;
pub use config::Settings;
pub use error::ApiError;
pub use http::HttpServer;
