//! Settings loader: the standard source order plus caller-chosen extras.
//!
//! # Source Priority (highest to lowest)
//!
//! 1. Prepended sources, in the order they were prepended (e.g. a manifest)
//! 2. Explicit initialization overrides (always present, possibly empty)
//! 3. Environment variables (`{prefix}{KEY}`)
//! 4. Dotenv file
//! 5. Secrets directory
//! 6. Appended sources
//! 7. Schema defaults
//!
//! # Example
//!
//! ```rust,ignore
//! use strata_runtime::{ManifestSource, SettingsLoader};
//!
//! let settings = SettingsLoader::new()
//!     .env_prefix("API_")
//!     .dotenv(".env")
//!     .prepend(ManifestSource::new().search_depth(1))
//!     .load(&schema)?;
//! ```

use std::path::{Path, PathBuf};

use strata_core::{ConfigSource, ResolveResult, ResolvedSettings, Schema, SourceChain, resolve};
use tracing::{debug, trace};

use crate::sources::{DotenvSource, EnvSource, InitSource, SecretsDirSource};

/// Builder assembling a [`SourceChain`] in the standard order.
pub struct SettingsLoader {
    init: InitSource,
    load_env: bool,
    env_prefix: String,
    env_vars: Option<Vec<(String, String)>>,
    dotenv: Option<(PathBuf, bool)>,
    secrets_dir: Option<(PathBuf, bool)>,
    prepended: SourceChain,
    appended: SourceChain,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SettingsLoader {
    /// Creates a loader that reads the unprefixed process environment.
    pub fn new() -> Self {
        Self {
            init: InitSource::new(),
            load_env: true,
            env_prefix: String::new(),
            env_vars: None,
            dotenv: None,
            secrets_dir: None,
            prepended: SourceChain::new(),
            appended: SourceChain::new(),
        }
    }

    /// Sets explicit initialization overrides.
    pub fn init(mut self, init: InitSource) -> Self {
        self.init = init;
        self
    }

    /// Sets one initialization override.
    pub fn set(mut self, key: &str, value: impl Into<strata_core::Value>) -> Self {
        self.init = self.init.set(key, value);
        self
    }

    /// Prefix for environment variables, dotenv entries and secret file names.
    pub fn env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Enables environment variable lookup (default: true).
    pub fn with_env(mut self) -> Self {
        self.load_env = true;
        self
    }

    /// Disables environment variable lookup.
    pub fn without_env(mut self) -> Self {
        self.load_env = false;
        self
    }

    /// Uses the given variables instead of snapshotting the process environment.
    pub fn env_vars<I, K, V>(mut self, vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.env_vars = Some(
            vars.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        );
        self
    }

    /// Reads an optional dotenv file.
    pub fn dotenv<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dotenv = Some((path.as_ref().to_path_buf(), false));
        self
    }

    /// Reads a dotenv file that must exist.
    pub fn required_dotenv<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.dotenv = Some((path.as_ref().to_path_buf(), true));
        self
    }

    /// Reads an optional secrets directory.
    pub fn secrets_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.secrets_dir = Some((dir.as_ref().to_path_buf(), false));
        self
    }

    /// Reads a secrets directory that must exist.
    pub fn required_secrets_dir<P: AsRef<Path>>(mut self, dir: P) -> Self {
        self.secrets_dir = Some((dir.as_ref().to_path_buf(), true));
        self
    }

    /// Places `source` ahead of the standard order, after earlier prepended sources.
    pub fn prepend<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.prepended.push(source);
        self
    }

    /// Places `source` after the standard order, before schema defaults.
    pub fn append<S: ConfigSource + 'static>(mut self, source: S) -> Self {
        self.appended.push(source);
        self
    }

    /// Builds the ordered source chain.
    pub fn build_chain(self) -> SourceChain {
        let mut chain = self.prepended;

        // Always present, so a loader with everything else disabled still yields defaults.
        chain.push(self.init);

        if self.load_env {
            trace!(prefix = %self.env_prefix, "Adding environment source");
            let env = match self.env_vars {
                Some(vars) => EnvSource::from_vars(&self.env_prefix, vars),
                None => EnvSource::prefixed(&self.env_prefix),
            };
            chain.push(env);
        }

        if let Some((path, required)) = self.dotenv {
            let mut source = DotenvSource::new(path).prefix(self.env_prefix.clone());
            if required {
                source = source.required();
            }
            chain.push(source);
        }

        if let Some((dir, required)) = self.secrets_dir {
            let mut source = SecretsDirSource::new(dir).prefix(self.env_prefix.clone());
            if required {
                source = source.required();
            }
            chain.push(source);
        }

        chain.extend(self.appended);
        chain
    }

    /// Builds the chain and resolves `schema` against it.
    pub fn load(self, schema: &Schema) -> ResolveResult<ResolvedSettings> {
        let chain = self.build_chain();
        debug!(sources = ?chain.names(), keys = schema.len(), "Resolving settings");
        resolve(schema, &chain)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sources::ManifestSource;
    use std::fs;
    use strata_core::{ConfigKey, Origin, ResolveError};

    fn version_schema() -> Schema {
        Schema::builder()
            .key(ConfigKey::string("version", "0.1.0"))
            .build()
            .unwrap()
    }

    fn no_env() -> Vec<(String, String)> {
        Vec::new()
    }

    #[test]
    fn test_standard_order() {
        let dir = tempfile::tempdir().unwrap();
        let dotenv = dir.path().join(".env");
        fs::write(&dotenv, "VERSION=3.0.0\n").unwrap();

        let chain = SettingsLoader::new()
            .set("version", "9.0.0")
            .env_vars(no_env())
            .dotenv(&dotenv)
            .secrets_dir(dir.path().join("secrets"))
            .prepend(ManifestSource::new().start_dir(dir.path()))
            .build_chain();

        assert_eq!(chain.names(), ["manifest", "init", "env", "dotenv", "secrets"]);
    }

    #[test]
    fn test_without_env_keeps_init() {
        let chain = SettingsLoader::new().without_env().build_chain();
        assert_eq!(chain.names(), ["init"]);
    }

    #[test]
    fn test_bare_loader_returns_defaults() {
        let settings = SettingsLoader::new()
            .without_env()
            .load(&version_schema())
            .unwrap();

        assert_eq!(settings.get_str("version"), Some("0.1.0"));
        assert_eq!(settings.origin("version"), Some(&Origin::Default));
    }

    #[test]
    fn test_manifest_wins_when_env_unset() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pyproject.toml"),
            "[project]\nversion = \"0.1.2\"\n",
        )
        .unwrap();

        let settings = SettingsLoader::new()
            .env_vars(no_env())
            .prepend(ManifestSource::new().start_dir(dir.path()))
            .load(&version_schema())
            .unwrap();

        assert_eq!(settings.get_str("version"), Some("0.1.2"));
        assert_eq!(
            settings.origin("version"),
            Some(&Origin::Source("manifest".into()))
        );
    }

    #[test]
    fn test_missing_manifest_falls_back_to_default() {
        let dir = tempfile::tempdir().unwrap();

        let settings = SettingsLoader::new()
            .env_vars(no_env())
            .prepend(ManifestSource::new().start_dir(dir.path()))
            .load(&version_schema())
            .unwrap();

        assert_eq!(settings.get_str("version"), Some("0.1.0"));
        assert_eq!(settings.origin("version"), Some(&Origin::Default));
    }

    #[test]
    fn test_env_listed_first_beats_manifest() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pyproject.toml"),
            "[project]\nversion = \"0.1.2\"\n",
        )
        .unwrap();

        // Standard order puts env ahead of appended sources.
        let settings = SettingsLoader::new()
            .env_vars([("VERSION", "2.0.0")])
            .append(ManifestSource::new().start_dir(dir.path()))
            .load(&version_schema())
            .unwrap();

        assert_eq!(settings.get_str("version"), Some("2.0.0"));
    }

    #[test]
    fn test_extra_manifest_keys_ignored() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pyproject.toml"),
            r#"
[project]
name = "example-backend"
version = "0.1.2"
description = "Example backend"
authors = [{ name = "Jane Doe", email = "jane@example.net" }]
dependencies = ["fastapi>=0.115"]
"#,
        )
        .unwrap();

        let settings = SettingsLoader::new()
            .env_vars(no_env())
            .prepend(ManifestSource::new().start_dir(dir.path()))
            .load(&version_schema())
            .unwrap();

        assert_eq!(settings.len(), 1);
        assert_eq!(settings.get_str("version"), Some("0.1.2"));
    }

    #[test]
    fn test_non_string_manifest_version_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pyproject.toml"), "[project]\nversion = 2\n").unwrap();

        let err = SettingsLoader::new()
            .env_vars(no_env())
            .prepend(ManifestSource::new().start_dir(dir.path()))
            .load(&version_schema())
            .unwrap_err();

        assert!(matches!(err, ResolveError::Validation { .. }));
    }

    #[test]
    fn test_required_manifest_missing() {
        let dir = tempfile::tempdir().unwrap();

        let err = SettingsLoader::new()
            .env_vars(no_env())
            .prepend(ManifestSource::new().start_dir(dir.path()).required())
            .load(&version_schema())
            .unwrap_err();

        assert!(matches!(
            err,
            ResolveError::SourceUnavailable { ref source_name, .. } if source_name == "manifest"
        ));
    }

    #[test]
    fn test_prefixed_secrets_and_dotenv() {
        let dir = tempfile::tempdir().unwrap();
        let secrets = dir.path().join("secrets");
        fs::create_dir(&secrets).unwrap();
        fs::write(secrets.join("api_token"), "hunter2\n").unwrap();
        fs::write(dir.path().join(".env"), "API_WORKERS=8\nWORKERS=1\n").unwrap();

        let schema = Schema::builder()
            .key(ConfigKey::string("token", ""))
            .key(ConfigKey::integer("workers", 2))
            .build()
            .unwrap();

        let settings = SettingsLoader::new()
            .env_prefix("API_")
            .env_vars(no_env())
            .dotenv(dir.path().join(".env"))
            .required_secrets_dir(&secrets)
            .load(&schema)
            .unwrap();

        assert_eq!(settings.get_str("token"), Some("hunter2"));
        assert_eq!(settings.get_as::<i64>("workers").unwrap(), 8);
    }
}
