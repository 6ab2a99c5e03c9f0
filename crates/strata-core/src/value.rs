//! Declared value types and coercion.
//!
//! Values travel through the resolver as [`figment::value::Value`]. Every
//! schema key declares a [`Kind`]; the winning value for a key is coerced to
//! that kind before it is stored. Untyped inputs (environment variables,
//! dotenv lines, secret files) arrive as strings and are parsed; typed inputs
//! (TOML manifests, code overrides) must already carry a compatible type.

use std::fmt;

use figment::value::{Dict, Tag, Value};
use serde::{Deserialize, Serialize};

/// Declared type of a schema key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Kind {
    /// UTF-8 string.
    String,
    /// Signed 64-bit integer.
    Integer,
    /// 64-bit float.
    Float,
    /// Boolean.
    Boolean,
}

impl Kind {
    /// Returns the kind name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }

    /// Coerces `value` to this kind, or returns `None` if it cannot be.
    ///
    /// A non-string value is never accepted where a string is declared.
    pub fn coerce(self, value: &Value) -> Option<Value> {
        match self {
            Self::String => match value {
                Value::String(_, s) => Some(Value::from(s.clone())),
                Value::Char(_, c) => Some(Value::from(c.to_string())),
                _ => None,
            },
            Self::Integer => match value {
                Value::String(_, s) => s.trim().parse::<i64>().ok().map(Value::from),
                Value::Num(..) => value.deserialize::<i64>().ok().map(Value::from),
                _ => None,
            },
            Self::Float => match value {
                Value::String(_, s) => s.trim().parse::<f64>().ok().map(Value::from),
                Value::Num(..) => value.deserialize::<f64>().ok().map(Value::from),
                _ => None,
            },
            Self::Boolean => match value {
                Value::Bool(_, b) => Some(Value::from(*b)),
                Value::String(_, s) => parse_bool(s).map(Value::from),
                _ => None,
            },
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the boolean spellings accepted from untyped inputs.
fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

/// Short human-readable rendering of a value for error messages.
pub fn describe(value: &Value) -> String {
    match value {
        Value::String(_, s) => format!("string {s:?}"),
        Value::Char(_, c) => format!("char {c:?}"),
        Value::Bool(_, b) => format!("boolean {b}"),
        Value::Num(..) => match value.deserialize::<f64>() {
            Ok(n) => format!("number {n}"),
            Err(_) => "number".to_string(),
        },
        Value::Dict(..) => "table".to_string(),
        Value::Array(..) => "array".to_string(),
        _ => "empty value".to_string(),
    }
}

/// Inserts `value` into `dict` at a dotted path, creating intermediate tables.
///
/// A non-table value in the way is replaced by a table.
pub fn insert_path(dict: &mut Dict, path: &str, value: Value) {
    match path.split_once('.') {
        None => {
            dict.insert(path.to_string(), value);
        }
        Some((head, rest)) => {
            let entry = dict
                .entry(head.to_string())
                .or_insert_with(|| Value::Dict(Tag::Default, Dict::new()));
            if !matches!(entry, Value::Dict(..)) {
                *entry = Value::Dict(Tag::Default, Dict::new());
            }
            if let Value::Dict(_, inner) = entry {
                insert_path(inner, rest, value);
            }
        }
    }
}
