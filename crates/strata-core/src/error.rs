//! Error types for settings resolution.
//!
//! Sources report [`SourceError`]; the resolver wraps it into a
//! [`ResolveError`] tagged with the name of the failing source.

use thiserror::Error;

use crate::value::Kind;

// =============================================================================
// Source Errors
// =============================================================================

/// Errors a [`ConfigSource`](crate::ConfigSource) can report while attempting a key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SourceError {
    /// A required backing input (file, directory) could not be located or read.
    #[error("source unavailable: {reason}")]
    Unavailable {
        /// Why the input could not be read.
        reason: String,
    },

    /// The backing input exists but its content could not be parsed.
    #[error("malformed source content: {reason}")]
    Malformed {
        /// Parser diagnostic.
        reason: String,
    },
}

impl SourceError {
    /// Creates an unavailable error with the given reason.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }

    /// Creates a malformed-content error with the given reason.
    pub fn malformed(reason: impl Into<String>) -> Self {
        Self::Malformed {
            reason: reason.into(),
        }
    }
}

/// Result type for source lookups.
pub type SourceResult<T> = Result<T, SourceError>;

// =============================================================================
// Resolve Errors
// =============================================================================

/// Errors that abort settings resolution.
#[derive(Debug, Clone, Error)]
pub enum ResolveError {
    /// A source supplied a value that cannot be coerced to the declared type.
    #[error("invalid value for '{key}' from {source_name}: expected {expected}, found {found}")]
    Validation {
        /// Schema key being resolved.
        key: String,
        /// Name of the source that supplied the value.
        source_name: String,
        /// Declared type of the key.
        expected: Kind,
        /// Short rendering of the rejected value.
        found: String,
    },

    /// A source marked as required could not be read.
    #[error("required source {source_name} is unavailable: {reason}")]
    SourceUnavailable {
        /// Name of the source.
        source_name: String,
        /// Why it could not be read.
        reason: String,
    },

    /// A source exists but its content could not be parsed.
    #[error("source {source_name} is malformed: {reason}")]
    Malformed {
        /// Name of the source.
        source_name: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// Resolution was attempted with an empty source chain.
    #[error("no settings sources configured")]
    NoSources,

    /// A schema declared the same key twice.
    #[error("duplicate schema key: {0}")]
    DuplicateKey(String),

    /// A lookup named a key that is not part of the schema.
    #[error("unknown settings key: {0}")]
    MissingKey(String),

    /// Resolved values could not be deserialized into the requested type.
    #[error("failed to extract settings: {0}")]
    Extract(String),
}

impl ResolveError {
    /// Attaches a source name to a [`SourceError`].
    pub fn from_source(source_name: impl Into<String>, err: SourceError) -> Self {
        let source_name = source_name.into();
        match err {
            SourceError::Unavailable { reason } => Self::SourceUnavailable {
                source_name,
                reason,
            },
            SourceError::Malformed { reason } => Self::Malformed {
                source_name,
                reason,
            },
        }
    }
}

/// Result type for resolution.
pub type ResolveResult<T> = Result<T, ResolveError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_error_is_tagged_with_source_name() {
        let err = ResolveError::from_source("manifest", SourceError::unavailable("not found"));
        assert!(matches!(
            &err,
            ResolveError::SourceUnavailable { source_name, reason }
                if source_name == "manifest" && reason == "not found"
        ));

        let err = ResolveError::from_source("dotenv", SourceError::malformed("line 3"));
        assert_eq!(err.to_string(), "source dotenv is malformed: line 3");
    }
}
