//! Concrete settings sources.
//!
//! | Source               | Backing input                    | Missing input         |
//! |----------------------|----------------------------------|-----------------------|
//! | [`InitSource`]       | values set in code               | n/a                   |
//! | [`EnvSource`]        | process environment snapshot     | n/a                   |
//! | [`DotenvSource`]     | `.env` file                      | absent unless required|
//! | [`SecretsDirSource`] | one file per key in a directory  | absent unless required|
//! | [`ManifestSource`]   | TOML manifest (`pyproject.toml`) | absent unless required|
//!
//! Environment-style sources (env, dotenv, secrets) match names
//! case-insensitively after stripping an optional prefix, and map dotted keys
//! to `__`: `project.version` is looked up as `PROJECT__VERSION`.
//!
//! Malformed content is always an error, optional or not.

pub mod dotenv;
pub mod env;
pub mod init;
pub mod manifest;
pub mod secrets;

pub use dotenv::DotenvSource;
pub use env::EnvSource;
pub use init::InitSource;
pub use manifest::ManifestSource;
pub use secrets::SecretsDirSource;

/// Upper-cased variable name a schema key is looked up under.
pub(crate) fn variable_name(key: &str) -> String {
    key.replace('.', "__").to_ascii_uppercase()
}

/// Strips `prefix` from `name` ignoring ASCII case, returning the upper-cased remainder.
pub(crate) fn strip_prefix_ci(name: &str, prefix: &str) -> Option<String> {
    if name.len() < prefix.len() || !name.is_char_boundary(prefix.len()) {
        return None;
    }
    let (head, rest) = name.split_at(prefix.len());
    if head.eq_ignore_ascii_case(prefix) && !rest.is_empty() {
        Some(rest.to_ascii_uppercase())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variable_name() {
        assert_eq!(variable_name("version"), "VERSION");
        assert_eq!(variable_name("project.version"), "PROJECT__VERSION");
    }

    #[test]
    fn test_strip_prefix_ci() {
        assert_eq!(strip_prefix_ci("APP_VERSION", "app_"), Some("VERSION".into()));
        assert_eq!(strip_prefix_ci("app_version", "APP_"), Some("VERSION".into()));
        assert_eq!(strip_prefix_ci("VERSION", ""), Some("VERSION".into()));
        assert_eq!(strip_prefix_ci("OTHER_VERSION", "APP_"), None);
        assert_eq!(strip_prefix_ci("APP_", "APP_"), None);
    }
}
