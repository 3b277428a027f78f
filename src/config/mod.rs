//! Configuration System for fuzzy-paradise
//!
//! Provides:
//! - TOML configuration files
//! - Environment variable overrides
//! - Multiple config file locations
//!
//! # Configuration File Locations
//!
//! Configuration files are searched in order (first found wins):
//! 1. `./fuzzy-paradise.toml` - Project-local configuration
//! 2. `~/.config/fuzzy-paradise/config.toml` - User configuration (XDG)
//! 3. `~/.fuzzy-paradise/config.toml` - User configuration (legacy)
//! 4. `/etc/fuzzy-paradise/config.toml` - System-wide configuration
//!
//! # Environment Variables
//!
//! - `FUZZY_LOG_LEVEL` - Logging verbosity (quiet, normal, verbose, debug)
//! - `FUZZY_FORMAT` - Output format (text, json)
//! - `FUZZY_MODEL` - Path to a model definition file
//! - `FUZZY_DEFUZZ` - Defuzzification method (centroid, bisector, mom, som, lom)
//! - `FUZZY_VALIDATE_RANGE` - Reject inputs outside the universe (true/false)
//!
//! # Example Configuration
//!
//! ```toml
//! # fuzzy-paradise.toml
//!
//! [general]
//! log_level = "normal"
//! format = "text"
//!
//! [engine]
//! model = "models/satisfaction.toml"
//! defuzzification = "centroid"
//!
//! [input]
//! validate_range = true
//! interactive = true
//! ```

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::engine::Defuzzifier;
use crate::error::{ErrorCode, FuzzyError};

// ============================================================================
// Configuration Schema
// ============================================================================

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct FuzzyConfig {
    pub general: GeneralConfig,
    pub engine: EngineConfig,
    pub input: InputConfig,
}

/// General configuration options
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GeneralConfig {
    /// Logging level
    pub log_level: LogLevel,
    /// Result output format
    pub format: OutputFormat,
}

/// Which model to load and how to defuzzify it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct EngineConfig {
    /// Model definition file; the built-in satisfaction model when unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,
    /// Overrides the model's own method when set
    #[serde(skip_serializing_if = "Option::is_none")]
    pub defuzzification: Option<Defuzzifier>,
}

/// How crisp inputs are collected
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Reject values outside the variable's universe before evaluation
    pub validate_range: bool,
    /// Prompt on stdin for inputs not given on the command line
    pub interactive: bool,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            validate_range: true,
            interactive: true,
        }
    }
}

// ============================================================================
// Enums
// ============================================================================

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            OutputFormat::Text => "text",
            OutputFormat::Json => "json",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "text" | "txt" | "plain" => Some(OutputFormat::Text),
            "json" => Some(OutputFormat::Json),
            _ => None,
        }
    }
}

/// Log level options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Quiet,
    #[default]
    Normal,
    Verbose,
    Debug,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Quiet => "quiet",
            LogLevel::Normal => "normal",
            LogLevel::Verbose => "verbose",
            LogLevel::Debug => "debug",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "quiet" | "q" | "0" => Some(LogLevel::Quiet),
            "normal" | "n" | "1" => Some(LogLevel::Normal),
            "verbose" | "v" | "2" => Some(LogLevel::Verbose),
            "debug" | "d" | "3" => Some(LogLevel::Debug),
            _ => None,
        }
    }

    /// Maximum tracing level for this verbosity
    pub fn tracing_level(&self) -> tracing::Level {
        match self {
            LogLevel::Quiet => tracing::Level::ERROR,
            LogLevel::Normal => tracing::Level::WARN,
            LogLevel::Verbose => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
        }
    }
}

fn parse_bool(val: &str) -> Option<bool> {
    match val.to_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}

// ============================================================================
// Configuration Loading
// ============================================================================

impl FuzzyConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the first file found in [`config_paths`](Self::config_paths),
    /// then apply environment variable overrides
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default();

        for path in Self::config_paths() {
            if path.exists() {
                config = Self::load_from_file(&path)?;
                break;
            }
        }

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))?;

        toml::from_str(&content).map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))
    }

    /// Load configuration from a TOML string
    pub fn load_from_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content)
            .map_err(|e| ConfigError::ParseError(PathBuf::from("<string>"), e.to_string()))
    }

    /// Get the list of config file search paths
    pub fn config_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from("./fuzzy-paradise.toml")];

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("fuzzy-paradise").join("config.toml"));
        }

        if let Some(home_dir) = dirs::home_dir() {
            paths.push(home_dir.join(".fuzzy-paradise").join("config.toml"));
        }

        #[cfg(unix)]
        paths.push(PathBuf::from("/etc/fuzzy-paradise/config.toml"));

        paths
    }

    /// Apply `FUZZY_*` environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| env::var(key).ok());
    }

    /// Apply overrides from any key lookup; unparsable values are ignored
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(level) = lookup("FUZZY_LOG_LEVEL").as_deref().and_then(LogLevel::from_str) {
            self.general.log_level = level;
        }

        if let Some(format) = lookup("FUZZY_FORMAT").as_deref().and_then(OutputFormat::from_str) {
            self.general.format = format;
        }

        if let Some(model) = lookup("FUZZY_MODEL").filter(|m| !m.is_empty()) {
            self.engine.model = Some(PathBuf::from(model));
        }

        if let Some(method) = lookup("FUZZY_DEFUZZ").as_deref().and_then(Defuzzifier::from_str) {
            self.engine.defuzzification = Some(method);
        }

        if let Some(validate) = lookup("FUZZY_VALIDATE_RANGE").as_deref().and_then(parse_bool) {
            self.input.validate_range = validate;
        }
    }

    /// Serialize configuration to TOML string
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::SerializeError(e.to_string()))
    }

    /// Write configuration to a file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let content = self.to_toml()?;
        fs::write(path, content).map_err(|e| ConfigError::IoError(path.to_path_buf(), e.to_string()))
    }

    /// Generate a default configuration file content
    pub fn default_config_content() -> &'static str {
        r#"# fuzzy-paradise configuration file

[general]
# Logging level: quiet, normal, verbose, debug
log_level = "normal"
# Result format: text, json
format = "text"

[engine]
# Model definition file (optional, built-in satisfaction model if unset)
# model = "models/satisfaction.toml"
# Defuzzification method (optional, overrides the model):
# centroid, bisector, mean_of_maximum, smallest_of_maximum, largest_of_maximum
# defuzzification = "centroid"

[input]
# Reject inputs outside each variable's universe
validate_range = true
# Prompt for inputs not given with --input
interactive = true
"#
    }
}

// ============================================================================
// Error Types
// ============================================================================

/// Configuration errors
#[derive(Debug, Clone)]
pub enum ConfigError {
    /// IO error reading/writing config file
    IoError(PathBuf, String),
    /// Parse error in config file
    ParseError(PathBuf, String),
    /// Serialization error
    SerializeError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(path, msg) => {
                write!(f, "IO error reading {}: {}", path.display(), msg)
            }
            ConfigError::ParseError(path, msg) => {
                write!(f, "Parse error in {}: {}", path.display(), msg)
            }
            ConfigError::SerializeError(msg) => {
                write!(f, "Serialization error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for FuzzyError {
    fn from(err: ConfigError) -> Self {
        let message = err.to_string();
        match err {
            ConfigError::IoError(path, _) => FuzzyError::config(message)
                .with_code(ErrorCode::ConfigNotFound)
                .with_context("path", path.display().to_string()),
            ConfigError::ParseError(path, _) => FuzzyError::config(message)
                .with_code(ErrorCode::InvalidConfigSyntax)
                .with_context("path", path.display().to_string()),
            ConfigError::SerializeError(_) => {
                FuzzyError::config(message).with_code(ErrorCode::InvalidConfigValue)
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
