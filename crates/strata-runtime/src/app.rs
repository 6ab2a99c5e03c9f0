//! Application settings: environment name plus project metadata from the manifest.
//!
//! The project section reads the manifest's `[project]` table ahead of every
//! other source, so the version declared in `pyproject.toml` is what the API
//! documentation reports unless the manifest is missing or silent. The
//! remaining settings follow the standard order.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use strata_core::{ConfigKey, ResolveResult, ResolvedSettings, Schema};
use tracing::info;

use crate::loader::SettingsLoader;
use crate::sources::ManifestSource;
use crate::sources::manifest::DEFAULT_MANIFEST;

/// Version reported when nothing else supplies one.
pub const DEFAULT_VERSION: &str = "0.1.0";

/// Environment name used when nothing else supplies one.
pub const DEFAULT_ENVIRONMENT: &str = "DEV";

/// Values loaded from the project manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectSettings {
    /// Project version, e.g. `0.1.2`. Not validated as semver.
    pub version: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            version: DEFAULT_VERSION.to_string(),
        }
    }
}

impl ProjectSettings {
    /// Keys of the project section.
    pub fn schema() -> ResolveResult<Schema> {
        Schema::builder()
            .key(
                ConfigKey::string("version", DEFAULT_VERSION)
                    .describe("Project version reported in API documentation"),
            )
            .build()
    }

    /// Resolves the project section: manifest first, then the standard order.
    ///
    /// Keeps the per-key origins; [`Self::load`] when only the values matter.
    pub fn resolve(options: &AppOptions) -> ResolveResult<ResolvedSettings> {
        options
            .loader()
            .prepend(options.manifest())
            .load(&Self::schema()?)
    }

    /// Resolves and extracts the project section.
    pub fn load(options: &AppOptions) -> ResolveResult<Self> {
        Self::resolve(options)?.extract()
    }
}

/// Top-level application settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppSettings {
    /// Deployment environment name.
    pub environment: String,
    /// Project metadata.
    pub project: ProjectSettings,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            environment: DEFAULT_ENVIRONMENT.to_string(),
            project: ProjectSettings::default(),
        }
    }
}

#[derive(Deserialize)]
struct AppSection {
    environment: String,
}

impl AppSettings {
    /// Keys of the application section.
    pub fn schema() -> ResolveResult<Schema> {
        Schema::builder()
            .key(
                ConfigKey::string("environment", DEFAULT_ENVIRONMENT)
                    .describe("Deployment environment name"),
            )
            .build()
    }

    /// Resolves both sections. Called once at startup.
    pub fn load(options: &AppOptions) -> ResolveResult<Self> {
        let project = ProjectSettings::load(options)?;
        Self::with_project(options, project)
    }

    /// Resolves the application section around an already resolved project section.
    pub fn with_project(options: &AppOptions, project: ProjectSettings) -> ResolveResult<Self> {
        let app: AppSection = options.loader().load(&Self::schema()?)?.extract()?;

        info!(
            environment = %app.environment,
            version = %project.version,
            "Application settings resolved"
        );

        Ok(Self {
            environment: app.environment,
            project,
        })
    }
}

/// Where [`AppSettings::load`] looks for values.
#[derive(Debug, Clone)]
pub struct AppOptions {
    /// Manifest file name or absolute path.
    pub manifest_file: PathBuf,
    /// Directory the manifest search starts in (default: working directory).
    pub manifest_dir: Option<PathBuf>,
    /// Parent directories searched after `manifest_dir`.
    pub manifest_depth: usize,
    /// Fail if the manifest cannot be found.
    pub manifest_required: bool,
    /// Prefix for environment variables, dotenv entries and secret files.
    pub env_prefix: String,
    /// Explicit environment snapshot; `None` reads the process environment.
    pub env_vars: Option<Vec<(String, String)>>,
    /// Optional dotenv file.
    pub dotenv: Option<PathBuf>,
    /// Optional secrets directory.
    pub secrets_dir: Option<PathBuf>,
}

impl Default for AppOptions {
    fn default() -> Self {
        Self {
            manifest_file: PathBuf::from(DEFAULT_MANIFEST),
            manifest_dir: None,
            // The manifest usually sits one level above `src/`.
            manifest_depth: 1,
            manifest_required: false,
            env_prefix: String::new(),
            env_vars: None,
            dotenv: None,
            secrets_dir: None,
        }
    }
}

impl AppOptions {
    /// Loader with the standard order configured from these options.
    pub fn loader(&self) -> SettingsLoader {
        let mut loader = SettingsLoader::new().env_prefix(self.env_prefix.clone());
        if let Some(vars) = &self.env_vars {
            loader = loader.env_vars(vars.clone());
        }
        if let Some(path) = &self.dotenv {
            loader = loader.dotenv(path);
        }
        if let Some(dir) = &self.secrets_dir {
            loader = loader.secrets_dir(dir);
        }
        loader
    }

    /// Manifest source configured from these options.
    pub fn manifest(&self) -> ManifestSource {
        let mut manifest =
            ManifestSource::file(&self.manifest_file).search_depth(self.manifest_depth);
        if let Some(dir) = &self.manifest_dir {
            manifest = manifest.start_dir(dir);
        }
        if self.manifest_required {
            manifest = manifest.required();
        }
        manifest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use strata_core::{Origin, ResolveError};

    fn options(dir: &std::path::Path, env: &[(&str, &str)]) -> AppOptions {
        AppOptions {
            manifest_dir: Some(dir.to_path_buf()),
            manifest_depth: 0,
            env_vars: Some(
                env.iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect(),
            ),
            ..AppOptions::default()
        }
    }

    #[test]
    fn test_version_from_manifest_in_parent_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pyproject.toml"),
            "[project]\nname = \"example-backend\"\nversion = \"0.1.2\"\n",
        )
        .unwrap();
        let src = dir.path().join("src");
        fs::create_dir(&src).unwrap();

        let opts = AppOptions {
            manifest_depth: 1,
            ..options(&src, &[])
        };
        let settings = AppSettings::load(&opts).unwrap();
        assert_eq!(settings.project.version, "0.1.2");
        assert_eq!(settings.environment, DEFAULT_ENVIRONMENT);
    }

    #[test]
    fn test_defaults_without_manifest() {
        let dir = tempfile::tempdir().unwrap();

        let settings = AppSettings::load(&options(dir.path(), &[])).unwrap();
        assert_eq!(settings, AppSettings::default());
    }

    #[test]
    fn test_manifest_beats_env_for_project_only() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pyproject.toml"),
            "[project]\nversion = \"0.1.2\"\n",
        )
        .unwrap();

        let settings = AppSettings::load(&options(
            dir.path(),
            &[("VERSION", "2.0.0"), ("ENVIRONMENT", "PROD")],
        ))
        .unwrap();

        assert_eq!(settings.project.version, "0.1.2");
        assert_eq!(settings.environment, "PROD");
    }

    #[test]
    fn test_env_fills_version_when_manifest_silent() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("pyproject.toml"), "[project]\nname = \"x\"\n").unwrap();

        let settings =
            AppSettings::load(&options(dir.path(), &[("VERSION", "2.0.0")])).unwrap();
        assert_eq!(settings.project.version, "2.0.0");
    }

    #[test]
    fn test_project_origin_kept_with_values() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("pyproject.toml"),
            "[project]\nversion = \"0.1.2\"\n",
        )
        .unwrap();
        let opts = options(dir.path(), &[("ENVIRONMENT", "PROD")]);

        let resolved = ProjectSettings::resolve(&opts).unwrap();
        assert_eq!(
            resolved.origin("version"),
            Some(&Origin::Source("manifest".into()))
        );

        let project: ProjectSettings = resolved.extract().unwrap();
        let settings = AppSettings::with_project(&opts, project).unwrap();
        assert_eq!(settings.project.version, "0.1.2");
        assert_eq!(settings.environment, "PROD");
    }

    #[test]
    fn test_required_manifest() {
        let dir = tempfile::tempdir().unwrap();
        let opts = AppOptions {
            manifest_required: true,
            ..options(dir.path(), &[])
        };

        assert!(matches!(
            AppSettings::load(&opts),
            Err(ResolveError::SourceUnavailable { .. })
        ));
    }
}
