//! Quarto chunk option lines (`#| key: value`).

use fancy_regex::Regex as FancyRegex;
use std::sync::LazyLock;

/// Prefix of a chunk option line, after leading whitespace
pub const CHUNK_OPTION_MARKER: &str = "#| ";

/// `eval: value`, value optionally wrapped in matching quotes
static EVAL_OPTION: LazyLock<FancyRegex> =
    LazyLock::new(|| FancyRegex::new(r#"eval\s*:\s*(['"]?)(\w+)\1"#).unwrap());

/// Value of an `eval` chunk option.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvalOption {
    /// `true`, `yes` or `1`
    Enabled,
    /// `false`, `no` or `0`
    Disabled,
    /// Any other word; the chunk falls back to the document default
    Unrecognized,
}

impl EvalOption {
    fn from_token(token: &str) -> Self {
        match token.to_lowercase().as_str() {
            "true" | "yes" | "1" => Self::Enabled,
            "false" | "no" | "0" => Self::Disabled,
            _ => Self::Unrecognized,
        }
    }

    /// The per-chunk override this option produces.
    pub fn as_override(self) -> Option<bool> {
        match self {
            Self::Enabled => Some(true),
            Self::Disabled => Some(false),
            Self::Unrecognized => None,
        }
    }
}

/// Check if a line (leading whitespace allowed) is a chunk option line
pub fn is_chunk_option(line: &str) -> bool {
    line.trim_start().starts_with(CHUNK_OPTION_MARKER)
}

/// Extract the `eval` option from a chunk option line.
///
/// Returns `None` when the line carries no `eval` option, so that an earlier
/// option line of the same chunk keeps its effect.
pub fn parse_eval_option(line: &str) -> Option<EvalOption> {
    let options = line.trim_start().strip_prefix(CHUNK_OPTION_MARKER)?;
    let captures = EVAL_OPTION.captures(options).ok().flatten()?;
    captures.get(2).map(|m| EvalOption::from_token(m.as_str()))
}
