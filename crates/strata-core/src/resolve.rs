//! The resolution pass.

use tracing::{debug, trace};

use crate::error::{ResolveError, ResolveResult};
use crate::schema::Schema;
use crate::settings::{Origin, ResolvedSettings};
use crate::source::SourceChain;
use crate::value::describe;

/// Resolves every key of `schema` against `sources`.
///
/// For each key the sources are consulted in chain order and the first one
/// that yields a value wins; keys no source knows about take their schema
/// default. Values a source holds for keys outside the schema are never
/// looked at.
///
/// # Errors
///
/// - [`ResolveError::NoSources`] if the chain is empty.
/// - [`ResolveError::Validation`] if the winning value does not fit the key's type.
/// - [`ResolveError::SourceUnavailable`] / [`ResolveError::Malformed`] as
///   reported by a source.
pub fn resolve(schema: &Schema, sources: &SourceChain) -> ResolveResult<ResolvedSettings> {
    if sources.is_empty() {
        return Err(ResolveError::NoSources);
    }

    let mut settings = ResolvedSettings::default();

    'keys: for key in schema.keys() {
        for source in sources.iter() {
            trace!(key = key.name(), source = source.name(), "Attempting key");

            let found = source
                .attempt(key.name())
                .map_err(|e| ResolveError::from_source(source.name(), e))?;

            if let Some(raw) = found {
                let value = key.kind().coerce(&raw).ok_or_else(|| ResolveError::Validation {
                    key: key.name().to_string(),
                    source_name: source.name().to_string(),
                    expected: key.kind(),
                    found: describe(&raw),
                })?;

                debug!(key = key.name(), source = source.name(), "Resolved setting");
                settings.insert(
                    key.name().to_string(),
                    value,
                    Origin::Source(source.name().to_string()),
                );
                continue 'keys;
            }
        }

        debug!(key = key.name(), "Using default value");
        settings.insert(
            key.name().to_string(),
            key.default_value().clone(),
            Origin::Default,
        );
    }

    Ok(settings)
}
