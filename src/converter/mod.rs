//! Conversion of Quarto documents into Python files for linting.
//!
//! The converter walks the document line by line. Lines inside `{python}`
//! chunks are kept (with a few rewrites), everything else becomes a `# -`
//! placeholder, so that line N of the output is line N of the document and
//! linter diagnostics point at the right place without any remapping.
//!
//! # Example
//!
//! ```text
//! ---                         # -
//! title: Demo                 # -
//! ---                         # -
//! Some text.                  # -
//! ```{python}                 # %% [python]
//! #| echo: false              #| echo: false  # noqa: E265,E501
//! import math                 import math  # noqa: E305,E501
//! x = math.pi                 x = math.pi
//! ```                         # -
//! ```
//!
//! Linters whose diagnostics do not depend on line numbers (`radon-raw`) get
//! a compact file instead: placeholders are dropped entirely.

pub mod chunk_options;
pub mod front_matter;
pub mod rewrite;

use crate::config::ConfigError;
use crate::linters::{LineLengthDetector, LineLengthSource, LinterRegistry};
use chunk_options::{is_chunk_option, parse_eval_option};
use front_matter::DocumentDefaults;
use regex::Regex;
use rewrite::{NoqaSettings, codes, comment_include, starts_definition, strip_annotations};
use std::sync::LazyLock;

/// Emitted for a `{python}` chunk opening fence
pub const CHUNK_START: &str = "# %% [python]";

/// Emitted for a chunk closing fence
pub const CHUNK_END: &str = "# -";

/// Emitted for every line that is not kept as Python code
pub const PLACEHOLDER: &str = "# -";

/// Opening fence of a Python chunk: ```{python}, ``` {python}, ```{python, echo=FALSE}
static PYTHON_CHUNK_OPEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^```\s*\{python[^}]*\}$").unwrap());

/// Check if a line opens a Python code chunk
pub fn is_python_chunk_open(line: &str) -> bool {
    PYTHON_CHUNK_OPEN.is_match(line)
}

/// Check if a line closes a code chunk
pub fn is_chunk_close(line: &str) -> bool {
    line.trim() == "```"
}

/// Per-run converter settings, fixed once the target linter is known.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConverterConfig {
    linter: String,
    preserve_line_count: bool,
    noqa: Option<NoqaSettings>,
}

impl ConverterConfig {
    /// Build the settings for `linter`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnsupportedLinter`] if the registry does not know the linter.
    pub fn new(
        linter: &str,
        registry: &LinterRegistry,
        line_length: &dyn LineLengthSource,
    ) -> Result<Self, ConfigError> {
        let definition = registry.check_supported(linter)?;

        let noqa = if definition.uses_noqa {
            let limit = line_length.line_length(linter, definition);
            if limit.is_none() {
                log::warn!("No line length limit for {linter}; noqa comments will not be added");
            }
            limit.map(NoqaSettings::new)
        } else {
            None
        };

        Ok(Self {
            linter: linter.to_string(),
            preserve_line_count: definition.preserves_line_count,
            noqa,
        })
    }

    /// Settings for `linter` using the built-in registry and line lengths
    /// detected from the current directory.
    pub fn for_linter(linter: &str) -> Result<Self, ConfigError> {
        Self::new(linter, &LinterRegistry::new(), &LineLengthDetector::from_current_dir())
    }

    pub fn linter(&self) -> &str {
        &self.linter
    }

    /// Whether the output keeps one line per input line
    pub fn preserve_line_count(&self) -> bool {
        self.preserve_line_count
    }

    /// `noqa` settings, present only for linters that honour them
    pub fn noqa(&self) -> Option<NoqaSettings> {
        self.noqa
    }
}

/// Converts Quarto document lines into Python lines.
#[derive(Debug, Clone)]
pub struct QmdConverter {
    config: ConverterConfig,
}

impl QmdConverter {
    pub fn new(config: ConverterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ConverterConfig {
        &self.config
    }

    /// Convert a whole document. Every call starts from a fresh state.
    pub fn convert<S: AsRef<str>>(&self, lines: &[S]) -> Vec<String> {
        let defaults = DocumentDefaults::from_lines(lines);
        let mut state = ConversionState::new(&self.config, defaults, lines.len());

        for line in lines {
            state.process_line(line.as_ref().trim_end_matches(['\n', '\r']));
        }

        log::debug!(
            "Converted {} lines to {} lines for {}",
            lines.len(),
            state.output.len(),
            self.config.linter
        );
        state.output
    }
}

/// Convert document lines for `linter` with the built-in registry.
///
/// # Errors
///
/// Fails only if `linter` is not supported.
pub fn convert_lines<S: AsRef<str>>(lines: &[S], linter: &str) -> Result<Vec<String>, ConfigError> {
    Ok(QmdConverter::new(ConverterConfig::for_linter(linter)?).convert(lines))
}

/// Mutable state of a single conversion.
struct ConversionState<'a> {
    config: &'a ConverterConfig,
    /// Document default for `eval`, from the front matter
    defaults: DocumentDefaults,
    /// Inside a `{python}` chunk
    in_python: bool,
    /// Still in the chunk's leading blank, option and comment lines
    in_preamble: bool,
    /// `eval` override from the current chunk's options
    chunk_eval: Option<bool>,
    output: Vec<String>,
}

impl<'a> ConversionState<'a> {
    fn new(config: &'a ConverterConfig, defaults: DocumentDefaults, capacity: usize) -> Self {
        Self {
            config,
            defaults,
            in_python: false,
            in_preamble: false,
            chunk_eval: None,
            output: Vec::with_capacity(capacity),
        }
    }

    fn process_line(&mut self, line: &str) {
        if is_python_chunk_open(line) {
            self.open_chunk();
        } else if is_chunk_close(line) {
            self.close_chunk();
        } else if self.in_python {
            self.handle_python_line(line);
        } else {
            self.push_placeholder(PLACEHOLDER);
        }
    }

    fn open_chunk(&mut self) {
        self.in_python = true;
        self.in_preamble = true;
        self.chunk_eval = None;
        self.push_placeholder(CHUNK_START);
    }

    fn close_chunk(&mut self) {
        self.in_python = false;
        self.in_preamble = false;
        self.chunk_eval = None;
        self.push_placeholder(CHUNK_END);
    }

    /// Chunk override if set, otherwise the document default
    fn chunk_executes(&self) -> bool {
        self.chunk_eval.unwrap_or(self.defaults.executes)
    }

    fn handle_python_line(&mut self, line: &str) {
        if !self.in_preamble {
            self.handle_body_line(line);
            return;
        }

        // Blank lines in the preamble are kept as-is
        if line.trim().is_empty() {
            self.output.push(line.to_string());
            return;
        }

        let stripped = line.trim_start();
        if is_chunk_option(line) {
            self.handle_chunk_option(line);
        } else if stripped.starts_with('#') {
            self.handle_preamble_comment(line);
        } else {
            self.handle_first_code_line(line, stripped);
        }
    }

    fn handle_body_line(&mut self, line: &str) {
        if !self.chunk_executes() {
            self.push_placeholder(PLACEHOLDER);
            return;
        }
        let line = comment_include(line);
        self.output.push(strip_annotations(&line).into_owned());
    }

    fn handle_chunk_option(&mut self, line: &str) {
        if let Some(eval) = parse_eval_option(line) {
            self.chunk_eval = eval.as_override();
        }

        if !self.config.preserve_line_count {
            return;
        }

        // `#|` looks like a badly spaced comment to pycodestyle
        let line = match self.config.noqa {
            Some(noqa) => noqa.suppress(line, &[codes::COMMENT_SPACING]),
            None => line.to_string(),
        };
        self.output.push(line);
    }

    fn handle_preamble_comment(&mut self, line: &str) {
        if self.chunk_executes() {
            self.output.push(strip_annotations(line).into_owned());
        } else {
            self.push_placeholder(PLACEHOLDER);
        }
    }

    fn handle_first_code_line(&mut self, line: &str, stripped: &str) {
        self.in_preamble = false;

        if !self.chunk_executes() {
            self.push_placeholder(PLACEHOLDER);
            return;
        }

        let line = comment_include(line);
        let line = strip_annotations(&line);

        // The chunk boundary is not a real blank-line gap, so silence the
        // blank line checks pycodestyle applies around top-level statements
        let line = match self.config.noqa {
            Some(noqa) if starts_definition(stripped) => noqa.suppress(
                &line,
                &[codes::BLANK_LINES_BEFORE_DEF, codes::BLANK_LINES_AFTER_DEF],
            ),
            Some(noqa) => noqa.suppress(&line, &[codes::BLANK_LINES_AFTER_DEF]),
            None => line.into_owned(),
        };
        self.output.push(line);
    }

    fn push_placeholder(&mut self, placeholder: &str) {
        if self.config.preserve_line_count {
            self.output.push(placeholder.to_string());
        }
    }
}
