//! Runs a linter on the Python file generated from a Quarto document.

use super::line_length::LineLengthSource;
use super::registry::LinterRegistry;
use crate::config::ConfigError;
use crate::converter::{ConverterConfig, QmdConverter};
use crate::file_processor::{ConvertError, convert_file};
use regex::{Captures, Regex};
use std::io;
use std::path::{Path, PathBuf};
use std::process::Command;

/// Result of running one linter on one document.
#[derive(Debug, Clone)]
pub struct LintOutcome {
    /// Name of the linter
    pub linter: String,
    /// The document that was linted
    pub qmd_path: PathBuf,
    /// Combined stdout and stderr, with the temporary file mapped back to the document
    pub output: String,
    /// Exit code of the linter (`None` if killed by a signal)
    pub exit_code: Option<i32>,
}

impl LintOutcome {
    /// Whether the linter exited cleanly
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Error while linting a document.
#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    /// Linter binary not found in PATH
    #[error("Linter '{linter}' not found in PATH (is '{binary}' installed?)")]
    ToolNotFound { linter: String, binary: String },

    /// Linter could not be started
    #[error("Failed to run '{linter}': {source}")]
    Spawn { linter: String, source: io::Error },

    /// The document could not be converted
    #[error(transparent)]
    Conversion(#[from] ConvertError),
}

/// Removes the generated Python file when dropped, unless asked to keep it.
struct TempOutput {
    path: PathBuf,
    keep: bool,
}

impl Drop for TempOutput {
    fn drop(&mut self) {
        if self.keep {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            log::warn!("Failed to remove temporary file {}: {e}", self.path.display());
        }
    }
}

/// Converts documents and runs one linter on the result.
#[derive(Debug, Clone)]
pub struct LintRunner {
    converter: QmdConverter,
    command: Vec<String>,
    keep_temp_files: bool,
}

impl LintRunner {
    /// Create a runner that invokes `command` with the generated file appended.
    pub fn new(converter: QmdConverter, command: Vec<String>, keep_temp_files: bool) -> Self {
        Self {
            converter,
            command,
            keep_temp_files,
        }
    }

    /// Create a runner for a built-in linter.
    pub fn for_linter(
        name: &str,
        registry: &LinterRegistry,
        line_length: &dyn LineLengthSource,
        keep_temp_files: bool,
    ) -> Result<Self, ConfigError> {
        let definition = registry.check_supported(name)?;
        let config = ConverterConfig::new(name, registry, line_length)?;
        Ok(Self::new(
            QmdConverter::new(config),
            definition.command.clone(),
            keep_temp_files,
        ))
    }

    pub fn linter(&self) -> &str {
        self.converter.config().linter()
    }

    /// Convert `qmd_path` and lint the result.
    pub fn run(&self, qmd_path: &Path) -> Result<LintOutcome, RunnerError> {
        let linter = self.linter().to_string();
        let converted = convert_file(qmd_path, &self.converter, None)?;
        let temp = TempOutput {
            path: converted.output_path,
            keep: self.keep_temp_files,
        };

        let Some((binary, args)) = self.command.split_first() else {
            return Err(RunnerError::Spawn {
                linter,
                source: io::Error::new(io::ErrorKind::InvalidInput, "empty command"),
            });
        };

        log::debug!("Running {} on {}", self.command.join(" "), temp.path.display());
        let output = Command::new(binary)
            .args(args)
            .arg(&temp.path)
            .output()
            .map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => RunnerError::ToolNotFound {
                    linter: linter.clone(),
                    binary: binary.clone(),
                },
                _ => RunnerError::Spawn {
                    linter: linter.clone(),
                    source,
                },
            })?;

        let mut report = String::from_utf8_lossy(&output.stdout).into_owned();
        report.push_str(&String::from_utf8_lossy(&output.stderr));

        Ok(LintOutcome {
            linter,
            qmd_path: qmd_path.to_path_buf(),
            output: map_paths_to_document(&report, &temp.path, qmd_path),
            exit_code: output.status.code(),
        })
    }
}

/// Replace mentions of the generated file with the document it came from.
///
/// The full path is replaced anywhere. The bare file name is replaced only as
/// a whole token, so `data.py` survives when the generated file is `a.py`.
fn map_paths_to_document(report: &str, py_path: &Path, qmd_path: &Path) -> String {
    let mapped = report.replace(&py_path.display().to_string(), &qmd_path.display().to_string());

    let (Some(py_name), Some(qmd_name)) = (py_path.file_name(), qmd_path.file_name()) else {
        return mapped;
    };
    let qmd_name = qmd_name.to_string_lossy();
    let pattern = format!(r"(?m)(^|[^\w./\\-])({})($|[^\w-])", regex::escape(&py_name.to_string_lossy()));

    match Regex::new(&pattern) {
        Ok(bare_name) => bare_name
            .replace_all(&mapped, |caps: &Captures| format!("{}{}{}", &caps[1], qmd_name, &caps[3]))
            .into_owned(),
        Err(e) => {
            log::debug!("Not mapping bare file name {}: {e}", py_name.to_string_lossy());
            mapped
        }
    }
}
