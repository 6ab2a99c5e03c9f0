//! # Strata Core
//!
//! Schema, source abstraction and the resolution pass for layered settings.
//!
//! A [`Schema`] says which keys exist, what type each has and what its
//! compiled-in default is. A [`SourceChain`] says where values may come from
//! and in which order. [`resolve`] walks the chain once per key and returns
//! an immutable [`ResolvedSettings`]:
//!
//! ```text
//! ┌────────────┐   ┌─────────┐   ┌──────────┐   ┌─────────┐
//! │  manifest  │──▶│  init   │──▶│   env    │──▶│ default │   first hit wins
//! └────────────┘   └─────────┘   └──────────┘   └─────────┘
//! ```
//!
//! Concrete sources live in `strata-runtime`; anything implementing
//! [`ConfigSource`] can be placed anywhere in the chain.
//!
//! ## Example
//!
//! ```rust,ignore
//! use strata_core::{ConfigKey, Schema, SourceChain, resolve};
//!
//! let schema = Schema::builder()
//!     .key(ConfigKey::string("version", "0.1.0"))
//!     .build()?;
//!
//! let chain = SourceChain::new().then(my_source);
//! let settings = resolve(&schema, &chain)?;
//! assert_eq!(settings.get_str("version"), Some("0.1.0"));
//! ```

pub mod error;
pub mod resolve;
pub mod schema;
pub mod settings;
pub mod source;
pub mod value;

pub use error::{ResolveError, ResolveResult, SourceError, SourceResult};
pub use resolve::resolve;
pub use schema::{ConfigKey, Schema, SchemaBuilder};
pub use settings::{Origin, Resolved, ResolvedSettings};
pub use source::{ConfigSource, SourceChain};
pub use value::Kind;

// Values are figment values so sources can hand over parsed documents as-is.
pub use figment::value::{Dict, Value};
