//! Line length limit detection for noqa-aware linters.
//!
//! The converter needs the limit to decide whether appending a `# noqa`
//! comment could itself push a line over it. Limits are read from the
//! linter's own configuration files, searched upward from a start directory:
//!
//! - `ruff`: `ruff.toml`, `.ruff.toml` (`line-length`), `pyproject.toml` (`[tool.ruff]`)
//! - `flake8`: `.flake8`, `setup.cfg`, `tox.ini` (`[flake8] max-line-length`)
//! - `pycodestyle`: `setup.cfg`, `tox.ini` (`[pycodestyle]` or `[pep8]`)
//!
//! A config file that exists but cannot be understood makes the lookup fail,
//! which callers treat as "noqa not supported" rather than an error.

use super::registry::LinterDefinition;
use std::fs;
use std::path::{Path, PathBuf};

const MAX_DEPTH: usize = 100;

/// Source of the line length limit for a linter.
pub trait LineLengthSource {
    /// Returns the limit for `name`, or `None` if it cannot be determined.
    fn line_length(&self, name: &str, linter: &LinterDefinition) -> Option<usize>;
}

/// A constant limit, regardless of linter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedLineLength(pub usize);

impl LineLengthSource for FixedLineLength {
    fn line_length(&self, _name: &str, _linter: &LinterDefinition) -> Option<usize> {
        Some(self.0)
    }
}

#[derive(Debug, thiserror::Error)]
enum LookupError {
    #[error("failed to read {path}: {source}")]
    Io { path: String, source: std::io::Error },
    #[error("failed to parse {path}: {message}")]
    Parse { path: String, message: String },
}

/// Where a linter keeps its limit inside one config file.
#[derive(Debug, Clone, Copy)]
enum ConfigLocation {
    /// Top-level TOML key
    Toml(&'static str),
    /// TOML key nested under `[tool.<name>]`
    PyprojectTool(&'static str, &'static str),
    /// INI key inside one of the given sections
    Ini(&'static [&'static str], &'static [&'static str]),
}

const FLAKE8_SECTIONS: &[&str] = &["flake8"];
const PYCODESTYLE_SECTIONS: &[&str] = &["pycodestyle", "pep8"];
const INI_KEYS: &[&str] = &["max-line-length", "max_line_length"];

fn config_files_for(name: &str) -> &'static [(&'static str, ConfigLocation)] {
    match name {
        "ruff" => &[
            ("ruff.toml", ConfigLocation::Toml("line-length")),
            (".ruff.toml", ConfigLocation::Toml("line-length")),
            ("pyproject.toml", ConfigLocation::PyprojectTool("ruff", "line-length")),
        ],
        "flake8" => &[
            (".flake8", ConfigLocation::Ini(FLAKE8_SECTIONS, INI_KEYS)),
            ("setup.cfg", ConfigLocation::Ini(FLAKE8_SECTIONS, INI_KEYS)),
            ("tox.ini", ConfigLocation::Ini(FLAKE8_SECTIONS, INI_KEYS)),
        ],
        "pycodestyle" => &[
            ("setup.cfg", ConfigLocation::Ini(PYCODESTYLE_SECTIONS, INI_KEYS)),
            ("tox.ini", ConfigLocation::Ini(PYCODESTYLE_SECTIONS, INI_KEYS)),
        ],
        _ => &[],
    }
}

/// Detects the configured line length by searching the linter's config files.
#[derive(Debug, Clone)]
pub struct LineLengthDetector {
    start_dir: PathBuf,
}

impl LineLengthDetector {
    pub fn new(start_dir: impl Into<PathBuf>) -> Self {
        Self {
            start_dir: start_dir.into(),
        }
    }

    /// Detector rooted at the current working directory.
    pub fn from_current_dir() -> Self {
        Self::new(std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
    }

    fn search(&self, name: &str) -> Result<Option<usize>, LookupError> {
        let files = config_files_for(name);
        if files.is_empty() {
            return Ok(None);
        }

        let mut current_dir = self.start_dir.clone();
        for _ in 0..MAX_DEPTH {
            for (file_name, location) in files {
                let path = current_dir.join(file_name);
                if !path.is_file() {
                    continue;
                }
                if let Some(length) = read_line_length(&path, *location)? {
                    log::debug!("[qmdlint-linelength] {name}: {length} from {}", path.display());
                    return Ok(Some(length));
                }
            }

            if current_dir.join(".git").exists() || !current_dir.pop() {
                break;
            }
        }

        Ok(None)
    }
}

impl LineLengthSource for LineLengthDetector {
    fn line_length(&self, name: &str, linter: &LinterDefinition) -> Option<usize> {
        if !linter.uses_noqa {
            return None;
        }
        match self.search(name) {
            Ok(Some(length)) => Some(length),
            Ok(None) => linter.default_line_length,
            Err(e) => {
                log::warn!("Could not determine line length for {name}: {e}");
                None
            }
        }
    }
}

fn read_line_length(path: &Path, location: ConfigLocation) -> Result<Option<usize>, LookupError> {
    let display_path = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|source| LookupError::Io {
        path: display_path.clone(),
        source,
    })?;

    let parse_error = |message: String| LookupError::Parse {
        path: display_path.clone(),
        message,
    };

    match location {
        ConfigLocation::Toml(key) => {
            let table: toml::Table = toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
            toml_integer(table.get(key), key).map_err(parse_error)
        }
        ConfigLocation::PyprojectTool(tool, key) => {
            let table: toml::Table = toml::from_str(&content).map_err(|e| parse_error(e.to_string()))?;
            let value = table
                .get("tool")
                .and_then(|t| t.get(tool))
                .and_then(|t| t.get(key));
            toml_integer(value, key).map_err(parse_error)
        }
        ConfigLocation::Ini(sections, keys) => match ini_value(&content, sections, keys) {
            Some(raw) => raw
                .parse::<usize>()
                .map(Some)
                .map_err(|_| parse_error(format!("invalid line length '{raw}'"))),
            None => Ok(None),
        },
    }
}

fn toml_integer(value: Option<&toml::Value>, key: &str) -> Result<Option<usize>, String> {
    match value {
        None => Ok(None),
        Some(toml::Value::Integer(n)) if *n > 0 => Ok(Some(*n as usize)),
        Some(other) => Err(format!("'{key}' must be a positive integer, found {other}")),
    }
}

/// Find the first value of any of `keys` inside any of `sections` of an
/// INI-style file. Section names match case-insensitively.
///
/// Only single-line `key = value` / `key: value` entries are read. Continuation
/// lines, `%` interpolation and `DEFAULT` section inheritance are not supported.
fn ini_value(content: &str, sections: &[&str], keys: &[&str]) -> Option<String> {
    let mut in_section = false;

    for line in content.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with(';') {
            continue;
        }

        if let Some(header) = trimmed.strip_prefix('[').and_then(|rest| rest.strip_suffix(']')) {
            in_section = sections.iter().any(|s| s.eq_ignore_ascii_case(header.trim()));
            continue;
        }

        if !in_section {
            continue;
        }

        let Some((key, value)) = trimmed.split_once(['=', ':']) else {
            continue;
        };
        if keys.contains(&key.trim()) {
            return Some(value.trim().to_string());
        }
    }

    None
}
