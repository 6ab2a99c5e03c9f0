//! Schema definitions: the recognized keys, their types and defaults.

use figment::value::Value;

use crate::error::{ResolveError, ResolveResult};
use crate::value::{Kind, describe};

/// A named, typed configuration field with a compiled-in default.
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigKey {
    name: String,
    kind: Kind,
    default: Value,
    description: Option<String>,
}

impl ConfigKey {
    /// Creates a key, coercing `default` to `kind`.
    ///
    /// Fails with [`ResolveError::Validation`] if the default itself does not fit.
    pub fn new(
        name: impl Into<String>,
        kind: Kind,
        default: impl Into<Value>,
    ) -> ResolveResult<Self> {
        let name = name.into();
        let raw = default.into();
        let default = kind.coerce(&raw).ok_or_else(|| ResolveError::Validation {
            key: name.clone(),
            source_name: "default".to_string(),
            expected: kind,
            found: describe(&raw),
        })?;

        Ok(Self {
            name,
            kind,
            default,
            description: None,
        })
    }

    /// String key.
    pub fn string(name: impl Into<String>, default: impl Into<String>) -> Self {
        Self::typed(name, Kind::String, Value::from(default.into()))
    }

    /// Integer key.
    pub fn integer(name: impl Into<String>, default: i64) -> Self {
        Self::typed(name, Kind::Integer, Value::from(default))
    }

    /// Float key.
    pub fn float(name: impl Into<String>, default: f64) -> Self {
        Self::typed(name, Kind::Float, Value::from(default))
    }

    /// Boolean key.
    pub fn boolean(name: impl Into<String>, default: bool) -> Self {
        Self::typed(name, Kind::Boolean, Value::from(default))
    }

    fn typed(name: impl Into<String>, kind: Kind, default: Value) -> Self {
        Self {
            name: name.into(),
            kind,
            default,
            description: None,
        }
    }

    /// Attaches a human-readable description.
    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Key name. Dotted names address nested tables in structured sources.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declared type.
    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Compiled-in default, already in canonical shape for [`Self::kind`].
    pub fn default_value(&self) -> &Value {
        &self.default
    }

    /// Optional description.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }
}

/// The ordered set of keys a resolution pass produces values for.
///
/// # Example
///
/// ```rust,ignore
/// let schema = Schema::builder()
///     .key(ConfigKey::string("version", "0.1.0"))
///     .key(ConfigKey::boolean("debug", false))
///     .build()?;
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    keys: Vec<ConfigKey>,
}

impl Schema {
    /// Starts a schema builder.
    pub fn builder() -> SchemaBuilder {
        SchemaBuilder::default()
    }

    /// Builds a schema from keys, rejecting duplicate names.
    pub fn from_keys(keys: impl IntoIterator<Item = ConfigKey>) -> ResolveResult<Self> {
        let mut schema = Self::default();
        for key in keys {
            if schema.get(key.name()).is_some() {
                return Err(ResolveError::DuplicateKey(key.name().to_string()));
            }
            schema.keys.push(key);
        }
        Ok(schema)
    }

    /// Looks up a key by name.
    pub fn get(&self, name: &str) -> Option<&ConfigKey> {
        self.keys.iter().find(|k| k.name == name)
    }

    /// Iterates keys in declaration order.
    pub fn keys(&self) -> impl Iterator<Item = &ConfigKey> {
        self.keys.iter()
    }

    /// Number of keys.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if no keys are declared.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

/// Builder for [`Schema`].
#[derive(Debug, Default)]
pub struct SchemaBuilder {
    keys: Vec<ConfigKey>,
}

impl SchemaBuilder {
    /// Adds a key.
    pub fn key(mut self, key: ConfigKey) -> Self {
        self.keys.push(key);
        self
    }

    /// Finishes the schema, rejecting duplicate names.
    pub fn build(self) -> ResolveResult<Schema> {
        Schema::from_keys(self.keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_keeps_declaration_order() {
        let schema = Schema::builder()
            .key(ConfigKey::string("version", "0.1.0"))
            .key(ConfigKey::integer("workers", 4))
            .key(ConfigKey::boolean("debug", false))
            .build()
            .unwrap();

        let names: Vec<_> = schema.keys().map(ConfigKey::name).collect();
        assert_eq!(names, ["version", "workers", "debug"]);
        assert_eq!(schema.get("workers").unwrap().kind(), Kind::Integer);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let result = Schema::builder()
            .key(ConfigKey::string("version", "0.1.0"))
            .key(ConfigKey::string("version", "0.2.0"))
            .build();
        assert!(matches!(result, Err(ResolveError::DuplicateKey(k)) if k == "version"));
    }

    #[test]
    fn test_untyped_default_is_coerced() {
        let key = ConfigKey::new("port", Kind::Integer, "8080").unwrap();
        assert_eq!(key.default_value(), &Value::from(8080_i64));

        let err = ConfigKey::new("port", Kind::Integer, "eighty").unwrap_err();
        assert!(matches!(err, ResolveError::Validation { expected: Kind::Integer, .. }));
    }
}
