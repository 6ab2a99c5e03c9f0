//! Secrets directories (one file per value, as mounted by container runtimes).

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use figment::value::Value;
use strata_core::{ConfigSource, SourceError, SourceResult};
use tracing::{debug, warn};

use super::{strip_prefix_ci, variable_name};

/// Reads each key from a file named after it inside a directory.
///
/// `version` with prefix `api_` is read from `<dir>/api_version` (any case).
/// Trailing whitespace, including the final newline, is stripped.
#[derive(Debug)]
pub struct SecretsDirSource {
    dir: PathBuf,
    prefix: String,
    required: bool,
    entries: OnceLock<SourceResult<BTreeMap<String, PathBuf>>>,
}

impl SecretsDirSource {
    /// Creates an optional source for `dir`.
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            prefix: String::new(),
            required: false,
            entries: OnceLock::new(),
        }
    }

    /// Only consider files whose name starts with `prefix` (case-insensitive).
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Fail resolution if the directory or a listed secret cannot be read.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// The secrets directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn unavailable_or_empty(&self, reason: String) -> SourceResult<BTreeMap<String, PathBuf>> {
        if self.required {
            Err(SourceError::unavailable(reason))
        } else {
            debug!(dir = %self.dir.display(), %reason, "Skipping secrets directory");
            Ok(BTreeMap::new())
        }
    }

    fn scan(&self) -> SourceResult<BTreeMap<String, PathBuf>> {
        match fs::metadata(&self.dir) {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => {
                return self.unavailable_or_empty(format!(
                    "{} is not a directory",
                    self.dir.display()
                ));
            }
            Err(e) => return self.unavailable_or_empty(format!("{}: {e}", self.dir.display())),
        }

        let entries = match fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) => return self.unavailable_or_empty(format!("{}: {e}", self.dir.display())),
        };

        let mut found = BTreeMap::new();
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(stripped) = strip_prefix_ci(name, &self.prefix) {
                found.insert(stripped, path.clone());
            }
        }

        debug!(dir = %self.dir.display(), count = found.len(), "Scanned secrets directory");
        Ok(found)
    }
}

impl ConfigSource for SecretsDirSource {
    fn name(&self) -> &str {
        "secrets"
    }

    fn attempt(&self, key: &str) -> SourceResult<Option<Value>> {
        let entries = self
            .entries
            .get_or_init(|| self.scan())
            .as_ref()
            .map_err(Clone::clone)?;

        let Some(path) = entries.get(&variable_name(key)) else {
            return Ok(None);
        };

        match fs::read_to_string(path) {
            Ok(content) => Ok(Some(Value::from(content.trim_end().to_string()))),
            Err(e) if self.required => Err(SourceError::unavailable(format!(
                "{}: {e}",
                path.display()
            ))),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Unreadable secret file, skipping");
                Ok(None)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_secret_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("api_version"), "4.0.0\n").unwrap();
        fs::write(dir.path().join("API_TOKEN"), "s3cr3t  \n").unwrap();
        fs::write(dir.path().join("unrelated"), "x").unwrap();

        let source = SecretsDirSource::new(dir.path()).prefix("api_");
        assert_eq!(source.attempt("version").unwrap(), Some(Value::from("4.0.0")));
        assert_eq!(source.attempt("token").unwrap(), Some(Value::from("s3cr3t")));
        assert_eq!(source.attempt("unrelated").unwrap(), None);
    }

    #[test]
    fn test_missing_dir_optional_vs_required() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("secrets");

        assert_eq!(
            SecretsDirSource::new(&missing).attempt("version").unwrap(),
            None
        );
        assert!(matches!(
            SecretsDirSource::new(&missing).required().attempt("version"),
            Err(SourceError::Unavailable { .. })
        ));
    }

    #[test]
    fn test_file_instead_of_dir() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("secrets");
        fs::write(&file, "not a dir").unwrap();

        assert_eq!(SecretsDirSource::new(&file).attempt("version").unwrap(), None);
        assert!(matches!(
            SecretsDirSource::new(&file).required().attempt("version"),
            Err(SourceError::Unavailable { reason }) if reason.contains("not a directory")
        ));
    }
}
