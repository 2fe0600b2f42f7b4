//! Lint the Python code in Quarto (`.qmd`) documents.
//!
//! Python linters only understand `.py` files, so each document is converted
//! into a Python file that keeps the code chunks and replaces everything else
//! with placeholder comments, line for line. Diagnostics reported against the
//! Python file therefore carry the document's own line numbers.

pub mod config;
pub mod converter;
pub mod exit_codes;
pub mod file_processor;
pub mod linters;

pub use crate::config::{Config, ConfigError};
pub use crate::converter::{ConverterConfig, QmdConverter, convert_lines};
pub use crate::file_processor::{ConvertError, ConvertedFile, convert_file, gather_qmd_files, try_convert_file};
pub use crate::linters::{LintRunner, LinterRegistry};
