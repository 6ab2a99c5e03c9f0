//! Explicit initialization-time overrides.

use figment::Provider;
use figment::providers::Serialized;
use figment::value::{Dict, Value};
use serde::Serialize;
use strata_core::value::insert_path;
use strata_core::{ConfigSource, SourceError, SourceResult};

/// Values supplied directly in code. Highest priority in the standard order.
///
/// # Example
///
/// ```rust,ignore
/// let init = InitSource::new()
///     .set("version", "1.4.0")
///     .set("debug", true);
/// ```
#[derive(Debug, Clone, Default)]
pub struct InitSource {
    values: Dict,
}

impl InitSource {
    /// Creates an empty override set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets `key` (dotted keys create nested tables).
    pub fn set(mut self, key: &str, value: impl Into<Value>) -> Self {
        insert_path(&mut self.values, key, value.into());
        self
    }

    /// Builds overrides from any serializable value, e.g. a partially filled settings struct.
    pub fn from_serialized<T: Serialize>(value: &T) -> SourceResult<Self> {
        let data = Serialized::defaults(value)
            .data()
            .map_err(|e| SourceError::malformed(e.to_string()))?;
        Ok(Self {
            values: data.into_values().next().unwrap_or_default(),
        })
    }
}

impl ConfigSource for InitSource {
    fn name(&self) -> &str {
        "init"
    }

    fn attempt(&self, key: &str) -> SourceResult<Option<Value>> {
        match key.split_once('.') {
            None => Ok(self.values.get(key).cloned()),
            Some((head, rest)) => Ok(self
                .values
                .get(head)
                .and_then(|table| table.find_ref(rest))
                .cloned()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Overrides {
        environment: &'static str,
        project: Project,
    }

    #[derive(Serialize)]
    struct Project {
        version: &'static str,
    }

    #[test]
    fn test_set_and_attempt() {
        let init = InitSource::new()
            .set("version", "1.4.0")
            .set("project.name", "demo");

        assert_eq!(init.attempt("version").unwrap(), Some(Value::from("1.4.0")));
        assert_eq!(init.attempt("project.name").unwrap(), Some(Value::from("demo")));
        assert_eq!(init.attempt("project.version").unwrap(), None);
        assert_eq!(init.attempt("missing").unwrap(), None);
    }

    #[test]
    fn test_from_serialized() {
        let init = InitSource::from_serialized(&Overrides {
            environment: "PROD",
            project: Project { version: "3.0.0" },
        })
        .unwrap();

        assert_eq!(init.attempt("environment").unwrap(), Some(Value::from("PROD")));
        assert_eq!(
            init.attempt("project.version").unwrap(),
            Some(Value::from("3.0.0"))
        );
    }
}
