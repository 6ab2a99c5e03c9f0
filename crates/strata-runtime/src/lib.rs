//! Strata Runtime - concrete sources and startup wiring for layered settings.
//!
//! This crate provides:
//! - Settings sources: init overrides, environment, dotenv, secrets directory,
//!   project manifest (`sources`)
//! - The standard source order with room for extra sources (`SettingsLoader`)
//! - The application settings recipe (`AppSettings`, `ProjectSettings`)
//! - Logging configuration
//!
//! # Reading the API version from `pyproject.toml`
//!
//! ```ignore
//! use strata_runtime::{AppOptions, AppSettings};
//!
//! fn main() -> anyhow::Result<()> {
//!     // Resolved once, then passed to whatever needs it.
//!     let settings = AppSettings::load(&AppOptions::default())?;
//!     println!("serving version {}", settings.project.version);
//!     Ok(())
//! }
//! ```

pub mod app;
pub mod loader;
pub mod logging;
pub mod sources;

// Re-exports
pub use app::{AppOptions, AppSettings, ProjectSettings};
pub use loader::SettingsLoader;
pub use logging::{LogFormat, LogLevel, LogOutput, LoggingBuilder, LoggingConfig};
pub use sources::{DotenvSource, EnvSource, InitSource, ManifestSource, SecretsDirSource};

// Re-export tracing for use by other crates
pub use tracing;
pub use tracing_subscriber;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use tracing::{debug, error, info, trace, warn};
}
