//! Logging setup using `tracing` and `tracing-subscriber`.
//!
//! The logging configuration is itself resolved through the settings
//! resolver, so `LOG_LEVEL=debug` in the environment (or `log_level` in an
//! init override) works like any other setting. `RUST_LOG` still takes
//! precedence over the configured level.
//!
//! # Configuration-Based Initialization
//!
//! ```rust,ignore
//! use strata_runtime::logging::{LoggingBuilder, LoggingConfig};
//!
//! let settings = SettingsLoader::new().load(&LoggingConfig::schema()?)?;
//! LoggingBuilder::from_config(&LoggingConfig::from_settings(&settings)?).init();
//! ```
//!
//! # Manual Initialization
//!
//! ```rust,ignore
//! use strata_runtime::logging::LoggingBuilder;
//!
//! LoggingBuilder::new()
//!     .directive("strata_core=trace")
//!     .init();
//! ```

use std::ffi::OsStr;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use strata_core::{ConfigKey, ResolveError, ResolveResult, ResolvedSettings, Schema};
use tracing::warn;
use tracing_subscriber::prelude::*;
use tracing_subscriber::util::TryInitError;
use tracing_subscriber::{EnvFilter, fmt as sfmt};

// =============================================================================
// Configuration Types
// =============================================================================

/// Log level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
}

impl LogLevel {
    /// Returns the level name as a string.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Converts to a `tracing::Level`.
    pub fn to_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warn" | "warning" => Ok(Self::Warn),
            "error" => Ok(Self::Error),
            other => Err(format!(
                "unknown log level '{other}' (expected trace, debug, info, warn or error)"
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Log line format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    /// Single-line, abbreviated.
    #[default]
    Compact,
    /// Single-line, full field set.
    Full,
    /// Multi-line, human oriented.
    Pretty,
    /// Newline-delimited JSON (requires the `json-log` feature).
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "compact" => Ok(Self::Compact),
            "full" => Ok(Self::Full),
            "pretty" => Ok(Self::Pretty),
            "json" => Ok(Self::Json),
            other => Err(format!(
                "unknown log format '{other}' (expected compact, full, pretty or json)"
            )),
        }
    }
}

/// Log destination.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogOutput {
    Stdout,
    /// Default, keeps stdout free for program output.
    #[default]
    Stderr,
    File,
}

impl FromStr for LogOutput {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stdout" => Ok(Self::Stdout),
            "stderr" => Ok(Self::Stderr),
            "file" => Ok(Self::File),
            other => Err(format!(
                "unknown log output '{other}' (expected stdout, stderr or file)"
            )),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: LogLevel,
    pub format: LogFormat,
    pub output: LogOutput,
    /// Target file when `output` is [`LogOutput::File`].
    pub file_path: Option<PathBuf>,
}

impl LoggingConfig {
    /// Keys the logging configuration is resolved from.
    pub fn schema() -> ResolveResult<Schema> {
        Schema::builder()
            .key(ConfigKey::string("log_level", "info").describe("trace, debug, info, warn, error"))
            .key(ConfigKey::string("log_format", "compact").describe("compact, full, pretty, json"))
            .key(ConfigKey::string("log_output", "stderr").describe("stdout, stderr, file"))
            .key(ConfigKey::string("log_file", "").describe("log file path for file output"))
            .build()
    }

    /// Reads the configuration from settings resolved against [`Self::schema`].
    pub fn from_settings(settings: &ResolvedSettings) -> ResolveResult<Self> {
        let file = lookup(settings, "log_file")?;
        Ok(Self {
            level: parse(settings, "log_level")?,
            format: parse(settings, "log_format")?,
            output: parse(settings, "log_output")?,
            file_path: (!file.is_empty()).then(|| PathBuf::from(file)),
        })
    }
}

fn lookup<'a>(settings: &'a ResolvedSettings, key: &str) -> ResolveResult<&'a str> {
    settings
        .get_str(key)
        .ok_or_else(|| ResolveError::MissingKey(key.to_string()))
}

fn parse<T: FromStr<Err = String>>(settings: &ResolvedSettings, key: &str) -> ResolveResult<T> {
    lookup(settings, key)?
        .parse()
        .map_err(|e| ResolveError::Extract(format!("{key}: {e}")))
}

// =============================================================================
// LoggingBuilder
// =============================================================================

/// A builder for configuring logging.
#[derive(Default)]
pub struct LoggingBuilder {
    directives: Vec<String>,
    level: Option<tracing::Level>,
    format: LogFormat,
    output: LogOutput,
    with_target: bool,
    file_path: Option<PathBuf>,
}

impl LoggingBuilder {
    /// Create a new logging builder.
    pub fn new() -> Self {
        Self {
            with_target: true,
            ..Default::default()
        }
    }

    /// Create a LoggingBuilder from a LoggingConfig.
    pub fn from_config(config: &LoggingConfig) -> Self {
        let builder = Self::new()
            .with_level(config.level.to_tracing_level())
            .format(config.format)
            .output(config.output);
        match &config.file_path {
            Some(path) => builder.file_path(path.clone()),
            None => builder,
        }
    }

    /// Set the global log level.
    pub fn with_level(mut self, level: tracing::Level) -> Self {
        self.level = Some(level);
        self
    }

    /// Add a filter directive, e.g. `strata_runtime=debug`.
    pub fn directive(mut self, directive: &str) -> Self {
        self.directives.push(directive.to_string());
        self
    }

    /// Set the output format.
    pub fn format(mut self, format: LogFormat) -> Self {
        self.format = format;
        self
    }

    /// Set the output destination.
    pub fn output(mut self, output: LogOutput) -> Self {
        self.output = output;
        self
    }

    /// Include the target (module path) in log output.
    pub fn with_target(mut self, enabled: bool) -> Self {
        self.with_target = enabled;
        self
    }

    /// Set file path for file output.
    pub fn file_path(mut self, path: PathBuf) -> Self {
        self.file_path = Some(path);
        self
    }

    /// Build the filter from directives.
    fn build_filter(&self) -> EnvFilter {
        let base_level = self.level.unwrap_or(tracing::Level::INFO);
        let base_filter = base_level.to_string().to_lowercase();

        // RUST_LOG wins over the configured level
        let mut filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&base_filter));

        for directive in &self.directives {
            if let Ok(d) = directive.parse() {
                filter = filter.add_directive(d);
            }
        }

        filter
    }

    /// Initialize the logging system.
    pub fn init(self) {
        let _ = self.try_init();
    }

    /// Try to initialize the logging system, returning an error on failure.
    pub fn try_init(self) -> Result<(), TryInitError> {
        let filter = self.build_filter();

        macro_rules! configure_layer {
            ($layer:expr) => {
                $layer.with_target(self.with_target)
            };
        }

        macro_rules! init_with_writer {
            ($writer:expr) => {
                match &self.format {
                    #[cfg(feature = "json-log")]
                    LogFormat::Json => {
                        let layer = sfmt::layer().json().with_writer($writer);
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    #[cfg(not(feature = "json-log"))]
                    LogFormat::Json => {
                        let layer = configure_layer!(sfmt::layer().with_writer($writer));
                        let result = tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init();
                        warn!("JSON log format requires the `json-log` feature, using full format");
                        result
                    }
                    LogFormat::Compact => {
                        let layer = configure_layer!(sfmt::layer().compact().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    LogFormat::Full => {
                        let layer = configure_layer!(sfmt::layer().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                    LogFormat::Pretty => {
                        let layer = configure_layer!(sfmt::layer().pretty().with_writer($writer));
                        tracing_subscriber::registry()
                            .with(layer)
                            .with(filter)
                            .try_init()
                    }
                }
            };
        }

        match &self.output {
            LogOutput::Stdout => init_with_writer!(std::io::stdout),
            LogOutput::Stderr => init_with_writer!(std::io::stderr),
            LogOutput::File => {
                if let Some(path) = &self.file_path {
                    let file_appender = tracing_appender::rolling::never(
                        path.parent().unwrap_or_else(|| Path::new(".")),
                        path.file_name().unwrap_or_else(|| OsStr::new("strata.log")),
                    );
                    init_with_writer!(file_appender)
                } else {
                    let result = init_with_writer!(std::io::stderr);
                    warn!("File output requested but no file path configured, using stderr");
                    result
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loader::SettingsLoader;

    #[test]
    fn test_defaults_from_schema() {
        let settings = SettingsLoader::new()
            .env_vars(Vec::<(String, String)>::new())
            .load(&LoggingConfig::schema().unwrap())
            .unwrap();

        assert_eq!(
            LoggingConfig::from_settings(&settings).unwrap(),
            LoggingConfig::default()
        );
    }

    #[test]
    fn test_env_overrides() {
        let settings = SettingsLoader::new()
            .env_prefix("API_")
            .env_vars([
                ("API_LOG_LEVEL", "Debug"),
                ("API_LOG_FORMAT", "pretty"),
                ("API_LOG_OUTPUT", "file"),
                ("API_LOG_FILE", "/var/log/api.log"),
            ])
            .load(&LoggingConfig::schema().unwrap())
            .unwrap();

        let config = LoggingConfig::from_settings(&settings).unwrap();
        assert_eq!(config.level, LogLevel::Debug);
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.output, LogOutput::File);
        assert_eq!(config.file_path, Some(PathBuf::from("/var/log/api.log")));
    }

    #[test]
    fn test_builder_from_config() {
        let config = LoggingConfig {
            level: LogLevel::Debug,
            format: LogFormat::Pretty,
            output: LogOutput::File,
            file_path: Some(PathBuf::from("api.log")),
        };

        let builder = LoggingBuilder::from_config(&config)
            .with_target(false)
            .directive("strata_core=trace");

        assert_eq!(builder.level, Some(tracing::Level::DEBUG));
        assert_eq!(builder.format, LogFormat::Pretty);
        assert_eq!(builder.output, LogOutput::File);
        assert_eq!(builder.file_path, Some(PathBuf::from("api.log")));
        assert!(!builder.with_target);
        assert_eq!(builder.directives, ["strata_core=trace"]);
    }

    #[test]
    fn test_unknown_level_rejected() {
        let settings = SettingsLoader::new()
            .env_vars([("LOG_LEVEL", "loud")])
            .load(&LoggingConfig::schema().unwrap())
            .unwrap();

        assert!(matches!(
            LoggingConfig::from_settings(&settings),
            Err(ResolveError::Extract(msg)) if msg.contains("log_level")
        ));
    }
}
