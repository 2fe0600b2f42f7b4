//! Python linters that qmdlint can run against converted documents.
//!
//! # Overview
//!
//! A `.qmd` file is converted into a line-aligned `.py` file next to it, the
//! linter is run on that file, and file names in its report are mapped back
//! to the document. Supported linters:
//!
//! - `flake8`, `pycodestyle`, `ruff` - honour `# noqa`, so chunk boundary
//!   warnings are suppressed inline
//! - `pylint`, `pyflakes`, `pylama`, `vulture`, `pydoclint`
//! - `mypy`, `pyright`, `pyrefly`
//! - `radon-cc`, `radon-mi`, `radon-hal`, `radon-raw`
//!
//! See [`registry`] for the commands used and [`line_length`] for how the
//! line length limit of noqa-aware linters is found.

pub mod line_length;
pub mod registry;
pub mod runner;

pub use line_length::{FixedLineLength, LineLengthDetector, LineLengthSource};
pub use registry::{LinterDefinition, LinterRegistry};
pub use runner::{LintOutcome, LintRunner, RunnerError};
