//! Configuration management
//!
//! Handles loading configuration from TOML files, environment variables and
//! CLI arguments.

use serde::Deserialize;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use thiserror::Error;
use tracing::Level;
use tracing_subscriber::filter::LevelFilter;

use quantum_core::source::{SourceSettings, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS, MAX_REQUEST_LENGTH};
use quantum_core::{RejectionPolicy, SourceKind};

/// Configuration error types
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid batch length: {0}. Must be at least 1")]
    InvalidBatchLength(usize),

    #[error("Invalid timeout: {0}s. Must be at least 1 second")]
    InvalidTimeout(u64),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid rejection cap: {0}. Must be at least 1 when set")]
    InvalidMaxRejections(u64),

    #[error("Invalid source: {0}. Must be one of: authentic, pseudo")]
    InvalidSource(String),

    #[error("Configuration file error: {0}")]
    FileError(String),

    #[error("Environment variable error: {0}")]
    EnvError(String),
}

/// Verbosity of the stderr log
///
/// Parsed through [`tracing::Level`], so any spelling tracing accepts
/// (`WARN`, `warn`, `3`) works here too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    #[default]
    Warn,
    Error,
}

impl From<Level> for LogLevel {
    fn from(level: Level) -> Self {
        match level {
            Level::TRACE => LogLevel::Trace,
            Level::DEBUG => LogLevel::Debug,
            Level::INFO => LogLevel::Info,
            Level::WARN => LogLevel::Warn,
            _ => LogLevel::Error,
        }
    }
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => LevelFilter::TRACE,
            LogLevel::Debug => LevelFilter::DEBUG,
            LogLevel::Info => LevelFilter::INFO,
            LogLevel::Warn => LevelFilter::WARN,
            LogLevel::Error => LevelFilter::ERROR,
        }
    }
}

impl FromStr for LogLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<Level>()
            .map(LogLevel::from)
            .map_err(|_| ConfigError::InvalidLogLevel(s.to_string()))
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let filter = LevelFilter::from(*self).to_string();
        f.write_str(&filter.to_lowercase())
    }
}

/// randomsys configuration structure
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct QuantumConfig {
    /// Raw source: authentic (ANU) or pseudo
    pub source: SourceKind,
    /// Samples requested per refill
    pub batch_length: usize,
    /// QRNG JSON API endpoint
    pub api_url: String,
    /// Per-request timeout in seconds
    pub timeout_secs: u64,
    /// Seed for the pseudo source
    pub seed: Option<u64>,
    /// Fall back to pseudo numbers when the authentic source fails
    pub fallback: bool,
    /// Cap on consecutive rejections in rejection sampling
    pub max_rejections: Option<u64>,
    /// Log level
    #[serde(deserialize_with = "deserialize_log_level")]
    pub log_level: LogLevel,
}

fn deserialize_log_level<'de, D>(deserializer: D) -> Result<LogLevel, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s = String::deserialize(deserializer)?;
    LogLevel::from_str(&s).map_err(serde::de::Error::custom)
}

impl Default for QuantumConfig {
    fn default() -> Self {
        Self {
            source: SourceKind::Pseudo,
            batch_length: MAX_REQUEST_LENGTH,
            api_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            seed: None,
            fallback: true,
            max_rejections: None,
            log_level: LogLevel::Warn,
        }
    }
}

// Environment variables read by `QuantumConfig::apply_env`
pub const ENV_SOURCE: &str = "RANDOMSYS_SOURCE";
pub const ENV_BATCH_LENGTH: &str = "RANDOMSYS_BATCH_LENGTH";
pub const ENV_API_URL: &str = "RANDOMSYS_API_URL";
pub const ENV_TIMEOUT_SECS: &str = "RANDOMSYS_TIMEOUT_SECS";
pub const ENV_SEED: &str = "RANDOMSYS_SEED";
pub const ENV_FALLBACK: &str = "RANDOMSYS_FALLBACK";
pub const ENV_MAX_REJECTIONS: &str = "RANDOMSYS_MAX_REJECTIONS";
pub const ENV_LOG_LEVEL: &str = "RANDOMSYS_LOG_LEVEL";

fn parse_flag(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim() {
        "1" => Ok(true),
        "0" => Ok(false),
        other => parse_env(key, &other.to_lowercase()),
    }
}

fn parse_env<T: FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::EnvError(format!("{}={} is not valid", key, value)))
}

impl QuantumConfig {
    /// Override fields from variables returned by `lookup`
    ///
    /// Only variables that are present are applied.
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(source) = lookup(ENV_SOURCE) {
            self.source = SourceKind::from_str(&source)
                .map_err(|_| ConfigError::InvalidSource(source.clone()))?;
        }
        if let Some(value) = lookup(ENV_BATCH_LENGTH) {
            self.batch_length = parse_env(ENV_BATCH_LENGTH, &value)?;
        }
        if let Some(url) = lookup(ENV_API_URL) {
            self.api_url = url;
        }
        if let Some(value) = lookup(ENV_TIMEOUT_SECS) {
            self.timeout_secs = parse_env(ENV_TIMEOUT_SECS, &value)?;
        }
        if let Some(value) = lookup(ENV_SEED) {
            self.seed = Some(parse_env(ENV_SEED, &value)?);
        }
        if let Some(value) = lookup(ENV_FALLBACK) {
            self.fallback = parse_flag(ENV_FALLBACK, &value)?;
        }
        if let Some(value) = lookup(ENV_MAX_REJECTIONS) {
            self.max_rejections = Some(parse_env(ENV_MAX_REJECTIONS, &value)?);
        }
        if let Some(level) = lookup(ENV_LOG_LEVEL) {
            self.log_level = LogLevel::from_str(&level)?;
        }
        Ok(())
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &PathBuf) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::FileError(format!("Failed to read config file: {}", e)))?;

        let config: QuantumConfig = toml::from_str(&content)
            .map_err(|e| ConfigError::FileError(format!("Failed to parse TOML: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.batch_length == 0 {
            return Err(ConfigError::InvalidBatchLength(self.batch_length));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::InvalidTimeout(self.timeout_secs));
        }
        if self.max_rejections == Some(0) {
            return Err(ConfigError::InvalidMaxRejections(0));
        }
        Ok(())
    }

    /// Merge with CLI arguments (CLI takes precedence)
    pub fn merge_with_cli(&mut self, cli: &CliArgs) -> Result<(), ConfigError> {
        if let Some(source) = &cli.source {
            self.source = SourceKind::from_str(source)
                .map_err(|_| ConfigError::InvalidSource(source.clone()))?;
        }
        if let Some(batch_length) = cli.batch_length {
            self.batch_length = batch_length;
        }
        if let Some(seed) = cli.seed {
            self.seed = Some(seed);
        }
        if cli.no_fallback {
            self.fallback = false;
        }
        if let Some(max) = cli.max_rejections {
            self.max_rejections = Some(max);
        }
        if let Some(log_level) = &cli.log_level {
            self.log_level = LogLevel::from_str(log_level)?;
        }
        Ok(())
    }

    /// Settings for building the raw source
    pub fn source_settings(&self) -> SourceSettings {
        SourceSettings {
            kind: self.source,
            api_url: self.api_url.clone(),
            timeout: Duration::from_secs(self.timeout_secs),
            seed: self.seed,
            fallback: self.fallback,
        }
    }

    /// Rejection policy for samplers
    pub fn rejection_policy(&self) -> RejectionPolicy {
        RejectionPolicy {
            max_consecutive: self.max_rejections,
        }
    }
}

/// CLI arguments structure
#[derive(Debug, Clone, Default)]
pub struct CliArgs {
    /// Config file path
    pub config_file: Option<PathBuf>,
    /// Source override
    pub source: Option<String>,
    /// Batch length override
    pub batch_length: Option<usize>,
    /// Seed override
    pub seed: Option<u64>,
    /// Disable the pseudo fallback
    pub no_fallback: bool,
    /// Rejection cap override
    pub max_rejections: Option<u64>,
    /// Log level override
    pub log_level: Option<String>,
}

/// Build configuration from all sources
///
/// Priority (highest to lowest):
/// 1. CLI arguments
/// 2. Environment variables
/// 3. Config file
/// 4. Default values
pub fn build_config(cli: &CliArgs) -> Result<QuantumConfig, ConfigError> {
    build_config_with_env(cli, |key| std::env::var(key).ok())
}

/// [`build_config`] with an explicit environment lookup
pub fn build_config_with_env<F>(cli: &CliArgs, lookup: F) -> Result<QuantumConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = if let Some(config_path) = &cli.config_file {
        QuantumConfig::from_file(config_path)?
    } else {
        QuantumConfig::default()
    };

    config.apply_env(lookup)?;
    config.merge_with_cli(cli)?;
    config.validate()?;

    Ok(config)
}
