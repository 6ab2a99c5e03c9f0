//! `.env` files.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use figment::value::Value;
use strata_core::{ConfigSource, SourceError, SourceResult};
use tracing::{debug, info, warn};

use super::{strip_prefix_ci, variable_name};

/// Variables read from a dotenv file, without touching the process environment.
///
/// The file is read on first lookup and cached for the lifetime of the source.
#[derive(Debug)]
pub struct DotenvSource {
    path: PathBuf,
    prefix: String,
    required: bool,
    vars: OnceLock<SourceResult<BTreeMap<String, String>>>,
}

impl DotenvSource {
    /// Creates an optional source for the file at `path`.
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            prefix: String::new(),
            required: false,
            vars: OnceLock::new(),
        }
    }

    /// Only consider variables starting with `prefix` (case-insensitive).
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Fail resolution if the file cannot be read.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Path of the backing file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> SourceResult<BTreeMap<String, String>> {
        let iter = match dotenvy::from_path_iter(&self.path) {
            Ok(iter) => iter,
            Err(e) if self.required => {
                return Err(SourceError::unavailable(format!(
                    "{}: {e}",
                    self.path.display()
                )));
            }
            Err(e) if e.not_found() => {
                debug!(path = %self.path.display(), "No dotenv file, skipping");
                return Ok(BTreeMap::new());
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Unreadable dotenv file, skipping");
                return Ok(BTreeMap::new());
            }
        };

        info!(path = %self.path.display(), "Loading dotenv file");

        let mut vars = BTreeMap::new();
        for item in iter {
            let (name, value) = item
                .map_err(|e| SourceError::malformed(format!("{}: {e}", self.path.display())))?;
            if let Some(stripped) = strip_prefix_ci(&name, &self.prefix) {
                vars.insert(stripped, value);
            }
        }
        Ok(vars)
    }
}

impl ConfigSource for DotenvSource {
    fn name(&self) -> &str {
        "dotenv"
    }

    fn attempt(&self, key: &str) -> SourceResult<Option<Value>> {
        let vars = self.vars.get_or_init(|| self.load()).as_ref().map_err(Clone::clone)?;
        Ok(vars.get(&variable_name(key)).map(|raw| Value::from(raw.clone())))
    }
}
