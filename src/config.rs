//!
//! This module defines the configuration structure and loading logic for qmdlint.
//! Settings are read from `.qmdlint.toml`, `qmdlint.toml`, or the `[tool.qmdlint]`
//! table of a `pyproject.toml`, discovered by walking up from the working directory.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Config file names, in order of precedence within one directory.
const CONFIG_FILES: &[&str] = &[".qmdlint.toml", "qmdlint.toml", "pyproject.toml"];

/// Prevent runaway traversal on pathological filesystems.
const MAX_DEPTH: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the config file
    #[error("Failed to read config file at {path}: {source}")]
    Io { path: String, source: io::Error },

    /// Failed to parse the config content
    #[error("Failed to parse config: {0}")]
    Parse(String),

    /// A linter name that qmdlint does not know how to drive
    #[error("Unsupported linter '{name}'. Supported linters: {}", .supported.join(", "))]
    UnsupportedLinter { name: String, supported: Vec<String> },
}

/// Represents the complete configuration loaded from a qmdlint config file
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Config {
    /// Linters to run when none are given on the command line
    pub linters: Vec<String>,

    /// Files, directories or glob patterns to skip during discovery
    pub exclude: Vec<String>,

    /// Keep the generated `.py` files after linting
    pub keep_temp_files: bool,

    /// Override the line length limit detected from the linter's own config
    pub max_line_length: Option<usize>,
}

/// Load configuration from an explicit path, or discover one upward from the
/// current directory. No config file at all yields the defaults.
pub fn load_config(config_path: Option<&str>) -> Result<Config, ConfigError> {
    if let Some(path) = config_path {
        return parse_config_file(Path::new(path));
    }

    let start_dir = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            log::debug!("[qmdlint-config] Failed to get current directory: {e}");
            return Ok(Config::default());
        }
    };

    match discover_config_upward(&start_dir) {
        Some(path) => parse_config_file(&path),
        None => Ok(Config::default()),
    }
}

/// Read and parse one config file. `pyproject.toml` files are read from their
/// `[tool.qmdlint]` table; a pyproject without one yields the defaults.
pub fn parse_config_file(path: &Path) -> Result<Config, ConfigError> {
    let display_path = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: display_path.clone(),
        source,
    })?;

    if path.file_name().is_some_and(|name| name == "pyproject.toml") {
        return Ok(parse_pyproject_toml(&content, &display_path)?.unwrap_or_default());
    }

    toml::from_str(&content).map_err(|e| ConfigError::Parse(format!("{display_path}: {e}")))
}

/// Parses pyproject.toml content and extracts the [tool.qmdlint] section if present.
pub fn parse_pyproject_toml(content: &str, path: &str) -> Result<Option<Config>, ConfigError> {
    let doc: toml::Table = toml::from_str(content).map_err(|e| ConfigError::Parse(format!("{path}: {e}")))?;

    let Some(section) = doc
        .get("tool")
        .and_then(|tool| tool.get("qmdlint"))
        .cloned()
    else {
        return Ok(None);
    };

    let config: Config = section
        .try_into()
        .map_err(|e| ConfigError::Parse(format!("{path} [tool.qmdlint]: {e}")))?;
    Ok(Some(config))
}

/// Walk up from `start_dir` looking for a config file, stopping at the first
/// directory that contains `.git`.
pub fn discover_config_upward(start_dir: &Path) -> Option<PathBuf> {
    let mut current_dir = start_dir.to_path_buf();

    for _ in 0..MAX_DEPTH {
        log::debug!("[qmdlint-config] Searching for config in: {}", current_dir.display());

        for config_name in CONFIG_FILES {
            let config_path = current_dir.join(config_name);
            if !config_path.is_file() {
                continue;
            }

            // For pyproject.toml, verify it contains a [tool.qmdlint] section
            if *config_name == "pyproject.toml" {
                match fs::read_to_string(&config_path) {
                    Ok(content) if content.contains("tool.qmdlint") => {}
                    _ => {
                        log::debug!("[qmdlint-config] Found pyproject.toml but no [tool.qmdlint] section");
                        continue;
                    }
                }
            }

            log::debug!("[qmdlint-config] Found config file: {}", config_path.display());
            return Some(config_path);
        }

        if current_dir.join(".git").exists() {
            log::debug!("[qmdlint-config] Stopping at .git directory");
            break;
        }

        if !current_dir.pop() {
            log::debug!("[qmdlint-config] Reached filesystem root");
            break;
        }
    }

    None
}
