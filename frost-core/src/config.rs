// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Ankit Kumar Pandey

//! YAML environment configuration.
//!
//! The configuration file is located through the `FROST_CONFIG` environment
//! variable and falls back to built-in defaults when that file is absent.
//! Present but invalid files are rejected.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{SimError, SimResult, ValidationError};
use crate::time::TimePrecision;

/// Environment variable naming the configuration file.
pub const CONFIG_ENV_VAR: &str = "FROST_CONFIG";

/// Configuration path used when `FROST_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "resources/frost_config.yml";

/// Raw configuration as parsed from YAML (before validation).
#[derive(Debug, Deserialize)]
struct RawConfig {
    #[serde(default = "default_time_precision")]
    time_precision: String,
    #[serde(default = "default_logging_level")]
    logging_level: String,
}

fn default_time_precision() -> String {
    "NSECS".to_string()
}

fn default_logging_level() -> String {
    "INFO".to_string()
}

/// Logging verbosity, named after the levels accepted in configuration files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Critical,
}

impl LogLevel {
    /// Directive understood by `tracing_subscriber::EnvFilter`.
    pub const fn as_filter(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warn",
            // tracing has no level above error
            Self::Error | Self::Critical => "error",
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Critical => "CRITICAL",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for LogLevel {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "TRACE" => Ok(Self::Trace),
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "CRITICAL" => Ok(Self::Critical),
            _ => Err(ValidationError::InvalidFieldValue {
                field: "logging_level",
                value: s.to_string(),
                reason: "Expected one of TRACE, DEBUG, INFO, WARNING, ERROR, CRITICAL"
                    .to_string(),
            }),
        }
    }
}

/// Validated environment configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrostConfig {
    /// Unit used when printing simulation time.
    pub time_precision: TimePrecision,
    pub logging_level: LogLevel,
}

impl Default for FrostConfig {
    fn default() -> Self {
        Self {
            time_precision: TimePrecision::Nsecs,
            logging_level: LogLevel::Info,
        }
    }
}

/// Configuration loader with strict validation.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Path named by `FROST_CONFIG`, or the default location.
    pub fn config_path() -> PathBuf {
        std::env::var_os(CONFIG_ENV_VAR)
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
    }

    /// Load the configuration named by the environment.
    /// A missing file yields the defaults.
    pub fn load_from_env() -> SimResult<FrostConfig> {
        Self::load_or_default(Self::config_path())
    }

    /// Load `path` if it is a file, otherwise return the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> SimResult<FrostConfig> {
        let path = path.as_ref();
        if !path.is_file() {
            tracing::debug!(path = %path.display(), "No configuration file, using defaults");
            return Ok(FrostConfig::default());
        }
        Self::load_file(path)
    }

    /// Load and validate configuration from a YAML file.
    pub fn load_file(path: impl AsRef<Path>) -> SimResult<FrostConfig> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SimError::ConfigNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SimError::Io {
            context: "reading config file",
            source: e,
        })?;

        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Self::load_string(&content)
    }

    /// Load and validate configuration from a YAML string.
    pub fn load_string(content: &str) -> SimResult<FrostConfig> {
        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| SimError::ConfigParse {
                message: format!("YAML parse error: {}", e),
            })?;

        Self::validate(raw)
    }

    fn validate(raw: RawConfig) -> SimResult<FrostConfig> {
        let time_precision = raw.time_precision.parse::<TimePrecision>()?;
        let logging_level = raw.logging_level.parse::<LogLevel>()?;

        Ok(FrostConfig {
            time_precision,
            logging_level,
        })
    }
}
