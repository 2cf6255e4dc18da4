//! Startup configuration subsystem.
//!
//! # Data Flow
//! ```text
//! CLI flags / environment
//!     → settings.rs (clap parse)
//!     → Settings (bind address, directories, registry path)
//!
//! registry file (TOML, optional)
//!     → registry.rs (parse & deserialize)
//!     → semantic checks (ids unique, paths relative)
//!     → ConfigRegistry (validated, immutable)
//!     → shared via Arc with every handler
//! ```
//!
//! # Design Decisions
//! - The registry is immutable once loaded; editing it means restarting
//! - Without a registry file the built-in entries are served as-is
//! - Validation separates syntactic (serde) from semantic checks and
//!   reports every semantic problem at once, not just the first

pub mod registry;
pub mod settings;

pub use registry::ConfigEntry;
pub use registry::ConfigFormat;
pub use registry::ConfigRegistry;
pub use registry::RegistryError;
pub use settings::Settings;
