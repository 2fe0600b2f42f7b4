//! Reading a document, converting it, and writing the Python file.

use crate::config::ConfigError;
use crate::converter::{ConverterConfig, QmdConverter};
use colored::*;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Error while converting one file.
#[derive(Debug, thiserror::Error)]
pub enum ConvertError {
    #[error("Input file '{path}' not found")]
    NotFound { path: String },

    #[error("Permission denied accessing '{input}' or '{output}'")]
    PermissionDenied { input: String, output: String },

    #[error("Error during conversion of '{path}': {source}")]
    Io { path: String, source: io::Error },

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// A successfully written conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    /// Where the Python file was written
    pub output_path: PathBuf,
    pub input_line_count: usize,
    pub output_line_count: usize,
    /// Whether the converter promised one output line per input line
    pub line_count_checked: bool,
}

impl ConvertedFile {
    /// False only when line preservation was expected but did not hold
    pub fn line_count_matches(&self) -> bool {
        !self.line_count_checked || self.input_line_count == self.output_line_count
    }
}

/// The input path with a `.py` extension.
pub fn default_output_path(input: &Path) -> PathBuf {
    input.with_extension("py")
}

/// Returns `path` if nothing exists there yet, otherwise the first free
/// `<stem>_<n><ext>` in the same directory.
pub fn unique_output_path(path: &Path) -> PathBuf {
    if !path.exists() {
        return path.to_path_buf();
    }

    let stem = path.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_default();
    let extension = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();

    (1..)
        .map(|n| path.with_file_name(format!("{stem}_{n}{extension}")))
        .find(|candidate| !candidate.exists())
        .unwrap_or_else(|| path.to_path_buf())
}

/// Convert `input` and write the result.
///
/// The output goes to `output` (or the input path with a `.py` extension),
/// disambiguated so that no existing file is overwritten. A line count
/// mismatch is logged as a warning and reported in the result, not an error.
pub fn convert_file(input: &Path, converter: &QmdConverter, output: Option<&Path>) -> Result<ConvertedFile, ConvertError> {
    let requested = output.map_or_else(|| default_output_path(input), Path::to_path_buf);
    let output_path = unique_output_path(&requested);
    log::debug!("Converting {} to {}", input.display(), output_path.display());

    let content = fs::read_to_string(input).map_err(|e| io_error(e, input, &output_path))?;
    let qmd_lines: Vec<&str> = content.lines().collect();

    let py_lines = converter.convert(&qmd_lines);

    let mut py_content = py_lines.join("\n");
    py_content.push('\n');
    fs::write(&output_path, py_content).map_err(|e| io_error(e, &output_path, &output_path).into_write_error(input))?;

    let converted = ConvertedFile {
        output_path,
        input_line_count: qmd_lines.len(),
        output_line_count: py_lines.len(),
        line_count_checked: converter.config().preserve_line_count(),
    };

    if !converted.line_count_matches() {
        log::warn!(
            "Line count mismatch: {} → {} ({})",
            converted.input_line_count,
            converted.output_line_count,
            input.display()
        );
    }

    Ok(converted)
}

/// Convert `input` for `linter`, building the converter settings first.
pub fn convert_file_for_linter(input: &Path, linter: &str, output: Option<&Path>) -> Result<ConvertedFile, ConvertError> {
    let converter = QmdConverter::new(ConverterConfig::for_linter(linter)?);
    convert_file(input, &converter, output)
}

/// Like [`convert_file_for_linter`], but reports any failure on stderr and
/// returns `None`, so a batch of documents can carry on past a bad one.
pub fn try_convert_file(input: &Path, linter: &str, output: Option<&Path>, verbose: bool) -> Option<ConvertedFile> {
    match convert_file_for_linter(input, linter, output) {
        Ok(converted) => {
            if verbose {
                println!(
                    "{} Converted {} to {}",
                    "✓".green(),
                    input.display(),
                    converted.output_path.display()
                );
                if converted.line_count_matches() && converted.line_count_checked {
                    println!(
                        "  Line count: {} → {}",
                        converted.input_line_count, converted.output_line_count
                    );
                }
            }
            Some(converted)
        }
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            None
        }
    }
}

fn io_error(e: io::Error, path: &Path, output: &Path) -> ConvertError {
    match e.kind() {
        io::ErrorKind::NotFound => ConvertError::NotFound {
            path: path.display().to_string(),
        },
        io::ErrorKind::PermissionDenied => ConvertError::PermissionDenied {
            input: path.display().to_string(),
            output: output.display().to_string(),
        },
        _ => ConvertError::Io {
            path: path.display().to_string(),
            source: e,
        },
    }
}

impl ConvertError {
    /// A missing output directory is not a missing input file.
    fn into_write_error(self, input: &Path) -> Self {
        match self {
            Self::NotFound { path } => Self::Io {
                source: io::Error::new(io::ErrorKind::NotFound, format!("cannot create '{path}'")),
                path,
            },
            Self::PermissionDenied { output, .. } => Self::PermissionDenied {
                input: input.display().to_string(),
                output,
            },
            other => other,
        }
    }
}
