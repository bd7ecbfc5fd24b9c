//! Configuration loading and scan file resolution
//!
//! Bootstrap configuration comes from an optional TOML file. A missing file is
//! never fatal: defaults are used and a warning is logged. A file that exists
//! but cannot be parsed is a configuration error.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming the TOML config file
pub const CONFIG_ENV_VAR: &str = "SSCOPE_CONFIG";

/// Environment variable naming the scan file to decode
pub const SCAN_FILE_ENV_VAR: &str = "SSCOPE_SCAN_FILE";

/// File written by `hashdb expand_identified_blocks` inside a bulk_extractor
/// output directory
pub const EXPANDED_FILE_NAME: &str = "identified_blocks_expanded.txt";

/// Bootstrap configuration loaded from TOML file
#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq)]
pub struct TomlConfig {
    /// Scan file to decode when none is given on the command line
    #[serde(default)]
    pub scan_file: Option<PathBuf>,

    /// Logging configuration (optional)
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Scan reader options (optional)
    #[serde(default)]
    pub reader: ReaderConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Scan reader section
///
/// Values are kept as strings here and validated by the reader crate, which
/// owns the corresponding enums.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct ReaderConfig {
    /// JSON fragment layout: `positional_pair` or `keyed`
    #[serde(default = "default_layout")]
    pub layout: String,

    /// Where descriptive source fields are read from: `container` or `per_source`
    #[serde(default = "default_source_details")]
    pub source_details: String,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            layout: default_layout(),
            source_details: default_source_details(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_layout() -> String {
    "positional_pair".to_string()
}

fn default_source_details() -> String {
    "container".to_string()
}

/// Default configuration file path for the platform
///
/// `~/.config/sectorscope/config.toml` on Linux, the platform equivalent
/// elsewhere.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sectorscope").join("config.toml"))
}

/// Read and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load bootstrap configuration
///
/// Path priority:
/// 1. Explicit path (command line); must exist
/// 2. `SSCOPE_CONFIG` environment variable
/// 3. Platform default path
///
/// When the path comes from 2 or 3 and no file exists, defaults are returned.
pub fn load_config(explicit: Option<&Path>) -> Result<TomlConfig> {
    if let Some(path) = explicit {
        if !path.exists() {
            return Err(Error::Config(format!("Config file not found: {}", path.display())));
        }
        return load_toml_config(path);
    }

    let candidate = std::env::var_os(CONFIG_ENV_VAR)
        .map(PathBuf::from)
        .or_else(default_config_path);

    match candidate {
        Some(path) if path.exists() => {
            debug!("Loading config from {}", path.display());
            load_toml_config(&path)
        }
        Some(path) => {
            warn!("Config file {} not found, using defaults", path.display());
            Ok(TomlConfig::default())
        }
        None => {
            warn!("Could not determine config directory, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

/// Path of the expanded identified blocks file inside a bulk_extractor
/// output directory
pub fn expanded_file_path(be_dir: &Path) -> PathBuf {
    be_dir.join(EXPANDED_FILE_NAME)
}

/// Resolve the scan file to decode
///
/// Priority order:
/// 1. Scan file given on the command line (highest priority)
/// 2. bulk_extractor directory given on the command line
/// 3. `SSCOPE_SCAN_FILE` environment variable
/// 4. `scan_file` in the TOML config
pub fn resolve_scan_file(
    cli_scan_file: Option<&Path>,
    cli_be_dir: Option<&Path>,
    config: &TomlConfig,
) -> Result<PathBuf> {
    // Priority 1: explicit scan file
    if let Some(path) = cli_scan_file {
        return Ok(path.to_path_buf());
    }

    // Priority 2: bulk_extractor output directory
    if let Some(be_dir) = cli_be_dir {
        let path = expanded_file_path(be_dir);
        info!("Using scan file from bulk_extractor directory: {}", path.display());
        return Ok(path);
    }

    // Priority 3: environment variable
    if let Some(path) = std::env::var_os(SCAN_FILE_ENV_VAR) {
        if !path.is_empty() {
            return Ok(PathBuf::from(path));
        }
    }

    // Priority 4: TOML config
    if let Some(path) = &config.scan_file {
        return Ok(path.clone());
    }

    Err(Error::Config(format!(
        "No scan file given. Provide one of:\n\
         1. Command line: sscope-scan <SCAN_FILE> or --be-dir <DIR>\n\
         2. Environment: {}=/path/to/{}\n\
         3. TOML config: scan_file = \"/path/to/{}\"",
        SCAN_FILE_ENV_VAR, EXPANDED_FILE_NAME, EXPANDED_FILE_NAME
    )))
}
