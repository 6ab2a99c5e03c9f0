//! Project manifest files (`pyproject.toml` and friends).
//!
//! The manifest is a TOML document; keys are read from one of its tables,
//! `[project]` by default:
//!
//! ```toml
//! [project]
//! name = "example-backend"
//! version = "0.1.2"
//! description = "ignored unless the schema asks for it"
//! ```
//!
//! The file is searched for in a start directory and then up to
//! `search_depth` parent directories, so a binary started from `src/` can
//! still find the manifest next to it.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use figment::Provider;
use figment::providers::{Format, Toml};
use figment::value::{Dict, Tag, Value};
use strata_core::value::describe;
use strata_core::{ConfigSource, SourceError, SourceResult};
use tracing::{debug, info, warn};

/// Default manifest file name.
pub const DEFAULT_MANIFEST: &str = "pyproject.toml";

/// Reads keys from a table of a TOML manifest.
///
/// # Example
///
/// ```rust,ignore
/// // pyproject.toml one directory above the working directory
/// let manifest = ManifestSource::new().search_depth(1);
///
/// // Cargo.toml, [package] table, must exist
/// let cargo = ManifestSource::file("Cargo.toml").table(["package"]).required();
/// ```
#[derive(Debug)]
pub struct ManifestSource {
    file_name: PathBuf,
    start_dir: Option<PathBuf>,
    search_depth: usize,
    table: Vec<String>,
    required: bool,
    loaded: OnceLock<SourceResult<Option<Value>>>,
}

impl Default for ManifestSource {
    fn default() -> Self {
        Self::new()
    }
}

impl ManifestSource {
    /// `pyproject.toml`, `[project]` table, working directory only.
    pub fn new() -> Self {
        Self::file(DEFAULT_MANIFEST)
    }

    /// A manifest with a custom file name (or absolute path), `[project]` table.
    pub fn file(file_name: impl AsRef<Path>) -> Self {
        Self {
            file_name: file_name.as_ref().to_path_buf(),
            start_dir: None,
            search_depth: 0,
            table: vec!["project".to_string()],
            required: false,
            loaded: OnceLock::new(),
        }
    }

    /// Directory the search starts in (default: the working directory).
    pub fn start_dir(mut self, dir: impl AsRef<Path>) -> Self {
        self.start_dir = Some(dir.as_ref().to_path_buf());
        self
    }

    /// Number of parent directories to search after the start directory.
    pub fn search_depth(mut self, depth: usize) -> Self {
        self.search_depth = depth;
        self
    }

    /// Table header path keys are read from; an empty path reads the document root.
    pub fn table<I, S>(mut self, header: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.table = header.into_iter().map(Into::into).collect();
        self
    }

    /// Fail resolution if the manifest cannot be located or read.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Finds the manifest file, honoring the search depth.
    pub fn locate(&self) -> Option<PathBuf> {
        if self.file_name.is_absolute() {
            return self.file_name.is_file().then(|| self.file_name.clone());
        }

        let start = match &self.start_dir {
            Some(dir) => dir.clone(),
            None => match std::env::current_dir() {
                Ok(cwd) => cwd,
                Err(e) => {
                    warn!(error = %e, "Cannot determine working directory for manifest search");
                    return None;
                }
            },
        };

        start
            .ancestors()
            .take(self.search_depth.saturating_add(1))
            .map(|dir| dir.join(&self.file_name))
            .find(|candidate| candidate.is_file())
    }

    fn header(&self) -> String {
        self.table.join(".")
    }

    fn not_found(&self) -> SourceResult<Option<Value>> {
        if self.required {
            Err(SourceError::unavailable(format!(
                "{} not found (search depth {})",
                self.file_name.display(),
                self.search_depth
            )))
        } else {
            debug!(file = %self.file_name.display(), "No manifest found, skipping");
            Ok(None)
        }
    }

    /// Reads the manifest and returns the configured table, if present.
    fn load(&self) -> SourceResult<Option<Value>> {
        let Some(path) = self.locate() else {
            return self.not_found();
        };

        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if self.required => {
                return Err(SourceError::unavailable(format!("{}: {e}", path.display())));
            }
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable manifest, skipping");
                return Ok(None);
            }
        };

        info!(path = %path.display(), table = %self.header(), "Loading manifest");

        let document = Toml::string(&text)
            .data()
            .map_err(|e| SourceError::malformed(format!("{}: {e}", path.display())))?
            .into_values()
            .next()
            .unwrap_or_default();

        self.select_table(document, &path)
    }

    fn select_table(&self, document: Dict, path: &Path) -> SourceResult<Option<Value>> {
        let mut current = document;
        for header in &self.table {
            match current.remove(header) {
                None => {
                    debug!(
                        path = %path.display(),
                        table = %self.header(),
                        "Manifest has no such table"
                    );
                    return Ok(None);
                }
                Some(Value::Dict(_, inner)) => current = inner,
                Some(other) => {
                    return Err(SourceError::malformed(format!(
                        "{}: `{}` is a {}, not a table",
                        path.display(),
                        self.header(),
                        describe(&other)
                    )));
                }
            }
        }
        Ok(Some(Value::Dict(Tag::Default, current)))
    }
}

impl ConfigSource for ManifestSource {
    fn name(&self) -> &str {
        "manifest"
    }

    fn attempt(&self, key: &str) -> SourceResult<Option<Value>> {
        let table = self
            .loaded
            .get_or_init(|| self.load())
            .as_ref()
            .map_err(Clone::clone)?;

        Ok(table.as_ref().and_then(|t| t.find_ref(key)).cloned())
    }
}
