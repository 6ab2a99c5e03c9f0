//! # Strata
//!
//! Layered settings resolution: a schema of typed keys with defaults, an
//! ordered list of sources, and one pass that takes the first value each key
//! is given.
//!
//! ## Overview
//!
//! ```text
//! ┌──────────┐   ┌──────┐   ┌─────┐   ┌────────┐   ┌─────────┐   ┌─────────┐
//! │ manifest │──▶│ init │──▶│ env │──▶│ dotenv │──▶│ secrets │──▶│ default │
//! └──────────┘   └──────┘   └─────┘   └────────┘   └─────────┘   └─────────┘
//!   prepended     ─────────── standard order ───────────────
//! ```
//!
//! - **Core** (`strata-core`): [`Schema`](core::Schema), the
//!   [`ConfigSource`](core::ConfigSource) trait, [`resolve`](core::resolve)
//! - **Runtime** (`strata-runtime`): concrete sources, `SettingsLoader`,
//!   `AppSettings`, logging
//! - **OpenAPI** (`strata-openapi`): `info` and `tags` metadata built from
//!   resolved settings
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strata::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = AppSettings::load(&AppOptions::default())?;
//!     let metadata = ApiMetadata::new(
//!         ApiInfo::new("Example Backend", settings.project.version),
//!         TagList::new(),
//!     );
//!     println!("{}", metadata.to_json_pretty()?);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - `json-log`: enable JSON log output

pub use strata_core as core;
pub use strata_openapi as openapi;
pub use strata_runtime as runtime;

/// Prelude module for convenient imports.
///
/// ```rust,ignore
/// use strata::prelude::*;
/// ```
pub mod prelude {
    // Resolution
    pub use strata_core::{
        ConfigKey, ConfigSource, Kind, Origin, ResolveError, ResolvedSettings, Schema,
        SourceChain, resolve,
    };

    // Sources and startup wiring
    pub use strata_runtime::{
        AppOptions, AppSettings, DotenvSource, EnvSource, InitSource, LoggingBuilder,
        LoggingConfig, ManifestSource, ProjectSettings, SecretsDirSource, SettingsLoader,
    };

    // Documentation metadata
    pub use strata_openapi::{ApiInfo, ApiMetadata, ApiTag, Tag, TagList};
}
