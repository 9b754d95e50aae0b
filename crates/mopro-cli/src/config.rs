//! # Binding Configuration
//!
//! Layered in three steps, later steps winning:
//!
//! 1. built-in defaults;
//! 2. an optional JSON file (`--config`);
//! 3. `MOPRO_*` environment variables.
//!
//! Command-line flags are applied on top by the binary.
//!
//! A variable that is set but cannot be parsed is an error. It is never
//! silently replaced by the default.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing_subscriber::EnvFilter;

pub const ENV_LOG: &str = "MOPRO_LOG";
pub const ENV_LOG_FORMAT: &str = "MOPRO_LOG_FORMAT";
pub const ENV_WORKER_THREADS: &str = "MOPRO_WORKER_THREADS";
pub const ENV_MAX_BLOCKING_THREADS: &str = "MOPRO_MAX_BLOCKING_THREADS";

/// Proving is CPU- and memory-bound; a handful of engine calls at once is
/// already enough to saturate a device.
pub const DEFAULT_MAX_BLOCKING_THREADS: usize = 4;

const DEFAULT_FILTER: &str = "warn";

/// Errors raised while assembling a [`BridgeConfig`] or acting on it.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid value {value:?} for {var}: {reason}")]
    InvalidEnv {
        var: &'static str,
        value: String,
        reason: String,
    },

    #[error("invalid configuration: {0}")]
    Invalid(String),

    #[error("invalid log filter {filter:?}: {reason}")]
    Filter { filter: String, reason: String },

    #[error("failed to build tokio runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

/// Log output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Text => "text",
            Self::Json => "json",
        })
    }
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(format!("expected \"text\" or \"json\", got {other:?}")),
        }
    }
}

/// Runtime and logging settings for a host binding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// `EnvFilter` directive, e.g. `"mopro_bridge=debug"`.
    pub log_filter: Option<String>,
    pub log_format: LogFormat,
    /// Tokio worker threads; `None` lets tokio pick one per core.
    pub worker_threads: Option<usize>,
    /// Upper bound on concurrent engine computations.
    pub max_blocking_threads: usize,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            log_filter: None,
            log_format: LogFormat::Text,
            worker_threads: None,
            max_blocking_threads: DEFAULT_MAX_BLOCKING_THREADS,
        }
    }
}

impl BridgeConfig {
    /// Defaults, then `path` if given, then the process environment.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let base = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        base.with_env(|var| std::env::var(var).ok())
    }

    /// Read a JSON config file. Absent fields keep their defaults.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `MOPRO_*` overrides read through `lookup`.
    pub fn with_env<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = Some(filter);
        }
        if let Some(value) = lookup(ENV_LOG_FORMAT) {
            self.log_format = value.parse().map_err(|reason| ConfigError::InvalidEnv {
                var: ENV_LOG_FORMAT,
                value: value.clone(),
                reason,
            })?;
        }
        if let Some(value) = lookup(ENV_WORKER_THREADS) {
            self.worker_threads = Some(parse_count(ENV_WORKER_THREADS, &value)?);
        }
        if let Some(value) = lookup(ENV_MAX_BLOCKING_THREADS) {
            self.max_blocking_threads = parse_count(ENV_MAX_BLOCKING_THREADS, &value)?;
        }
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.worker_threads == Some(0) {
            return Err(ConfigError::Invalid("worker_threads must be at least 1".into()));
        }
        if self.max_blocking_threads == 0 {
            return Err(ConfigError::Invalid(
                "max_blocking_threads must be at least 1".into(),
            ));
        }
        Ok(())
    }

    /// The log filter to install.
    ///
    /// `-v` flags take precedence over the configured filter; with neither,
    /// only warnings and errors are shown.
    pub fn env_filter(&self, verbose: u8) -> Result<EnvFilter, ConfigError> {
        let directive = match verbose {
            0 => self.log_filter.as_deref().unwrap_or(DEFAULT_FILTER),
            1 => "info",
            2 => "debug",
            _ => "trace",
        };
        EnvFilter::try_new(directive).map_err(|e| ConfigError::Filter {
            filter: directive.to_string(),
            reason: e.to_string(),
        })
    }

    /// Build the multi-threaded runtime the bridge runs on.
    pub fn build_runtime(&self) -> Result<tokio::runtime::Runtime, ConfigError> {
        let mut builder = tokio::runtime::Builder::new_multi_thread();
        builder
            .enable_all()
            .thread_name("mopro-worker")
            .max_blocking_threads(self.max_blocking_threads);
        if let Some(workers) = self.worker_threads {
            builder.worker_threads(workers);
        }
        builder.build().map_err(ConfigError::Runtime)
    }
}

fn parse_count(var: &'static str, value: &str) -> Result<usize, ConfigError> {
    value
        .trim()
        .parse::<usize>()
        .map_err(|e| ConfigError::InvalidEnv {
            var,
            value: value.to_string(),
            reason: e.to_string(),
        })
}
