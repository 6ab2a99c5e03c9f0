//! The immutable result of a resolution pass.

use std::collections::BTreeMap;
use std::fmt;

use figment::value::{Dict, Tag, Value};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::error::{ResolveError, ResolveResult};
use crate::value::insert_path;

/// Where a resolved value came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "name", rename_all = "lowercase")]
pub enum Origin {
    /// Supplied by the named source.
    Source(String),
    /// No source supplied a value; the schema default was used.
    Default,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source(name) => f.write_str(name),
            Self::Default => f.write_str("default"),
        }
    }
}

/// One resolved key.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Resolved {
    /// Value coerced to the key's declared type.
    pub value: Value,
    /// Source that supplied it.
    pub origin: Origin,
}

/// Final key → value record produced by [`resolve`](crate::resolve).
///
/// Built once and never mutated; share it by reference or clone.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ResolvedSettings {
    values: BTreeMap<String, Resolved>,
}

impl ResolvedSettings {
    pub(crate) fn insert(&mut self, key: String, value: Value, origin: Origin) {
        self.values.insert(key, Resolved { value, origin });
    }

    /// Returns the resolved value for `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key).map(|r| &r.value)
    }

    /// Returns the resolved value for a string key.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        match self.get(key)? {
            Value::String(_, s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Deserializes the value of `key` into `T`.
    pub fn get_as<T: DeserializeOwned>(&self, key: &str) -> ResolveResult<T> {
        let value = self
            .get(key)
            .ok_or_else(|| ResolveError::MissingKey(key.to_string()))?;
        value
            .deserialize()
            .map_err(|e| ResolveError::Extract(format!("{key}: {e}")))
    }

    /// Returns where the value of `key` came from.
    pub fn origin(&self, key: &str) -> Option<&Origin> {
        self.values.get(key).map(|r| &r.origin)
    }

    /// Deserializes every resolved key into a struct.
    ///
    /// Dotted keys become nested tables, so `project.version` fills
    /// `project: Project { version }`.
    pub fn extract<T: DeserializeOwned>(&self) -> ResolveResult<T> {
        self.to_value()
            .deserialize()
            .map_err(|e| ResolveError::Extract(e.to_string()))
    }

    /// Renders all resolved keys as a nested table value.
    pub fn to_value(&self) -> Value {
        let mut root = Dict::new();
        for (key, resolved) in &self.values {
            insert_path(&mut root, key, resolved.value.clone());
        }
        Value::Dict(Tag::Default, root)
    }

    /// Iterates `(key, resolved)` pairs in key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Resolved)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of resolved keys.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if nothing was resolved.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}
