//! # Strata OpenAPI
//!
//! Metadata a web framework needs at construction time to document an API:
//! the `info` block (title and a version taken from resolved settings) and an
//! ordered `tags` list describing the operation groups.
//!
//! Rendering documentation and routing requests stay with the framework;
//! this crate only produces the values passed to it.
//!
//! ```rust,ignore
//! use strata_openapi::{ApiInfo, ApiMetadata, TagList};
//!
//! let settings = ProjectSettings::load(&AppOptions::default())?;
//! let metadata = ApiMetadata::new(
//!     ApiInfo::new("Example Backend", settings.version),
//!     TagList::from_enum::<Tags>()?,
//! );
//! println!("{}", metadata.to_json_pretty()?);
//! ```

pub mod error;
pub mod info;
pub mod tag;

pub use error::{OpenApiError, OpenApiResult};
pub use info::{ApiInfo, ApiMetadata, FALLBACK_VERSION, OPENAPI_VERSION};
pub use tag::{ApiTag, ExternalDocs, Tag, TagList};
