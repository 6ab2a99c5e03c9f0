//! Environment variables.

use std::collections::BTreeMap;

use figment::providers::Env;
use figment::value::Value;
use strata_core::{ConfigSource, SourceResult};
use tracing::trace;

use super::{strip_prefix_ci, variable_name};

/// A snapshot of environment variables, optionally filtered by a prefix.
///
/// The snapshot is taken when the source is built, so later changes to the
/// process environment do not leak into a resolution pass. Values are raw
/// strings; typed schema keys parse them.
///
/// - `EnvSource::prefixed("API_")` answers `version` from `API_VERSION`
/// - `project.version` is looked up as `API_PROJECT__VERSION`
#[derive(Debug, Clone, Default)]
pub struct EnvSource {
    prefix: String,
    vars: BTreeMap<String, String>,
}

impl EnvSource {
    /// Snapshots every process environment variable.
    pub fn raw() -> Self {
        Self::prefixed("")
    }

    /// Snapshots the process environment variables starting with `prefix` (case-insensitive).
    pub fn prefixed(prefix: &str) -> Self {
        let env = Env::raw();
        let vars = env
            .iter()
            .map(|(key, value)| (key.as_str().to_string(), value));
        Self::from_vars(prefix, vars)
    }

    /// Builds the source from explicit `(name, value)` pairs instead of the process environment.
    pub fn from_vars<I, K, V>(prefix: &str, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: Into<String>,
    {
        let vars = vars
            .into_iter()
            .filter_map(|(name, value)| {
                strip_prefix_ci(name.as_ref(), prefix).map(|stripped| (stripped, value.into()))
            })
            .collect::<BTreeMap<_, _>>();

        trace!(prefix, count = vars.len(), "Captured environment variables");

        Self {
            prefix: prefix.to_string(),
            vars,
        }
    }

    /// The prefix this source filters on.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }
}

impl ConfigSource for EnvSource {
    fn name(&self) -> &str {
        "env"
    }

    fn attempt(&self, key: &str) -> SourceResult<Option<Value>> {
        Ok(self
            .vars
            .get(&variable_name(key))
            .map(|raw| Value::from(raw.clone())))
    }
}
