//! The [`ConfigSource`] trait and the ordered [`SourceChain`].

use std::fmt;

use figment::value::Value;

use crate::error::SourceResult;
use crate::schema::Schema;
use crate::settings::ResolvedSettings;

/// A provider that may hold a value for a schema key.
///
/// Implementations decide for themselves whether a missing backing input
/// (file, directory) is an error: optional sources return `Ok(None)`,
/// required ones return [`SourceError::Unavailable`](crate::SourceError::Unavailable).
pub trait ConfigSource: Send + Sync {
    /// Human-readable name used in logs and error messages.
    fn name(&self) -> &str;

    /// Attempts to resolve `key`, returning `Ok(None)` when this source has no value.
    fn attempt(&self, key: &str) -> SourceResult<Option<Value>>;
}

impl<S: ConfigSource + ?Sized> ConfigSource for Box<S> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn attempt(&self, key: &str) -> SourceResult<Option<Value>> {
        (**self).attempt(key)
    }
}

/// Sources in priority order: earlier sources win.
#[derive(Default)]
pub struct SourceChain {
    sources: Vec<Box<dyn ConfigSource>>,
}

impl SourceChain {
    /// Creates an empty chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a source with lower priority than every source already present.
    pub fn then<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.push(source);
        self
    }

    /// Appends a source in place.
    pub fn push<S: ConfigSource + 'static>(&mut self, source: S) {
        self.sources.push(Box::new(source));
    }

    /// Inserts a source with higher priority than every source already present.
    pub fn prepend<S: ConfigSource + 'static>(&mut self, source: S) {
        self.sources.insert(0, Box::new(source));
    }

    /// Appends every source of `other` after the sources of `self`.
    pub fn extend(&mut self, other: SourceChain) {
        self.sources.extend(other.sources);
    }

    /// Iterates sources in priority order.
    pub fn iter(&self) -> impl Iterator<Item = &dyn ConfigSource> {
        self.sources.iter().map(|s| s.as_ref())
    }

    /// Source names in priority order.
    pub fn names(&self) -> Vec<&str> {
        self.sources.iter().map(|s| s.name()).collect()
    }

    /// Number of sources.
    pub fn len(&self) -> usize {
        self.sources.len()
    }

    /// Returns true if no sources are present.
    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Resolves `schema` against this chain. See [`crate::resolve`].
    pub fn resolve(&self, schema: &Schema) -> crate::ResolveResult<ResolvedSettings> {
        crate::resolve(schema, self)
    }
}

impl fmt::Debug for SourceChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceChain")
            .field("sources", &self.names())
            .finish()
    }
}
