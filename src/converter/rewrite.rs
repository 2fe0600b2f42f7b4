//! Single-line rewrites applied to Python lines that are kept in the output.

use regex::Regex;
use std::borrow::Cow;
use std::sync::LazyLock;

/// `#<<` line highlight marker at end of line
static HIGHLIGHT_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*#<<\s*$").unwrap());

/// Numbered code annotation such as `# <1>` at end of line
static NUMBERED_ANNOTATION: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*# <\d+>\s*$").unwrap());

const INCLUDE_OPEN: &str = "{{< include ";
const INCLUDE_CLOSE: &str = ">}}";

/// Leading tokens of lines that start a function, class or decorator
const DEFINITION_PREFIXES: &[&str] = &["@", "def", "class"];

/// pycodestyle codes used in generated `noqa` comments
pub mod codes {
    /// Block comment should start with '# ' (raised by `#|` option lines)
    pub const COMMENT_SPACING: &str = "E265";
    /// Expected 2 blank lines before a definition. Added only when the first
    /// statement of a chunk is itself a definition.
    pub const BLANK_LINES_BEFORE_DEF: &str = "E302";
    /// Expected 2 blank lines after a function or class. Added to the first
    /// statement of every chunk, since earlier chunks may end in a definition.
    pub const BLANK_LINES_AFTER_DEF: &str = "E305";
    /// Line too long
    pub const LINE_TOO_LONG: &str = "E501";
}

/// Check if a line is a Quarto include shortcode (`{{< include file >}}`)
pub fn is_include(line: &str) -> bool {
    line.trim_start().starts_with(INCLUDE_OPEN) && line.trim_end().ends_with(INCLUDE_CLOSE)
}

/// Comment out a Quarto include shortcode, leaving other lines untouched.
pub fn comment_include(line: &str) -> Cow<'_, str> {
    if is_include(line) {
        Cow::Owned(format!("# {line}"))
    } else {
        Cow::Borrowed(line)
    }
}

/// Remove a trailing `#<<` highlight marker and a trailing `# <n>` annotation,
/// along with the whitespace before them. Markers mid-line are left alone.
pub fn strip_annotations(line: &str) -> Cow<'_, str> {
    match HIGHLIGHT_ANNOTATION.replace(line, "") {
        Cow::Borrowed(unchanged) => NUMBERED_ANNOTATION.replace(unchanged, ""),
        Cow::Owned(stripped) => Cow::Owned(NUMBERED_ANNOTATION.replace(&stripped, "").into_owned()),
    }
}

/// Check if a (left-trimmed) line begins a function, class or decorator
pub fn starts_definition(stripped: &str) -> bool {
    DEFINITION_PREFIXES.iter().any(|prefix| stripped.starts_with(prefix))
}

/// `noqa` handling for linters that honour inline suppression comments.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NoqaSettings {
    /// The linter's line length limit
    pub max_line_length: usize,
}

impl NoqaSettings {
    pub fn new(max_line_length: usize) -> Self {
        Self { max_line_length }
    }

    /// Append `  # noqa: CODES` to a line.
    ///
    /// When the line fits within the limit, E501 is suppressed as well, since
    /// the appended comment may be what pushes it over.
    pub fn suppress(&self, line: &str, codes: &[&str]) -> String {
        let mut all_codes = codes.to_vec();
        if line.chars().count() <= self.max_line_length {
            all_codes.push(codes::LINE_TOO_LONG);
        }
        format!("{}  # noqa: {}", line.trim_end(), all_codes.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_comment_include() {
        assert_eq!(comment_include("{{< include _setup.py >}}"), "# {{< include _setup.py >}}");
        assert_eq!(
            comment_include("  {{< include _setup.py >}}  "),
            "#   {{< include _setup.py >}}  "
        );
    }

    #[test]
    fn test_include_requires_both_markers() {
        assert_eq!(comment_include("{{< include _setup.py"), "{{< include _setup.py");
        assert_eq!(comment_include("x = '{{< include a >}}'"), "x = '{{< include a >}}'");
        assert_eq!(comment_include("{{< includes a >}}"), "{{< includes a >}}");
        assert!(matches!(comment_include("x = 1"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_strip_highlight_annotation() {
        assert_eq!(strip_annotations("x = 1 #<<"), "x = 1");
        assert_eq!(strip_annotations("x = 1   #<<   "), "x = 1");
        assert_eq!(strip_annotations("x = 1#<<"), "x = 1");
    }

    #[test]
    fn test_strip_numbered_annotation() {
        assert_eq!(strip_annotations("df = load() # <1>"), "df = load()");
        assert_eq!(strip_annotations("df = load()  # <12>  "), "df = load()");
    }

    #[test]
    fn test_strip_both_annotations() {
        assert_eq!(strip_annotations("x = 1 # <2> #<<"), "x = 1");
    }

    #[test]
    fn test_annotations_mid_line_untouched() {
        assert_eq!(strip_annotations("x = '#<<' + y"), "x = '#<<' + y");
        assert_eq!(strip_annotations("x = 1 # <1> trailing"), "x = 1 # <1> trailing");
        assert_eq!(strip_annotations("x = 1 # <a>"), "x = 1 # <a>");
        assert!(matches!(strip_annotations("x = 1"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_starts_definition() {
        assert!(starts_definition("def foo():"));
        assert!(starts_definition("class Foo:"));
        assert!(starts_definition("@dataclass"));
        assert!(!starts_definition("x = 1"));
        assert!(!starts_definition("import math"));
    }

    #[test]
    fn test_blank_line_codes() {
        assert_eq!(codes::BLANK_LINES_BEFORE_DEF, "E302");
        assert_eq!(codes::BLANK_LINES_AFTER_DEF, "E305");
        let noqa = NoqaSettings::new(79);
        assert_eq!(
            noqa.suppress("class A:", &[codes::BLANK_LINES_BEFORE_DEF, codes::BLANK_LINES_AFTER_DEF]),
            "class A:  # noqa: E302,E305,E501"
        );
    }

    #[test]
    fn test_suppress_adds_line_too_long_when_within_limit() {
        let noqa = NoqaSettings::new(79);
        assert_eq!(noqa.suppress("1+1", &[codes::BLANK_LINES_AFTER_DEF]), "1+1  # noqa: E305,E501");
    }

    #[test]
    fn test_suppress_skips_line_too_long_when_over_limit() {
        let noqa = NoqaSettings::new(10);
        let line = "value = compute(argument)";
        assert_eq!(
            noqa.suppress(line, &[codes::BLANK_LINES_AFTER_DEF]),
            "value = compute(argument)  # noqa: E305"
        );
    }

    #[test]
    fn test_suppress_limit_is_inclusive() {
        let noqa = NoqaSettings::new(5);
        assert_eq!(noqa.suppress("x = 1", &[codes::COMMENT_SPACING]), "x = 1  # noqa: E265,E501");
        assert_eq!(noqa.suppress("x = 10", &[codes::COMMENT_SPACING]), "x = 10  # noqa: E265");
    }

    #[test]
    fn test_suppress_trims_trailing_whitespace() {
        let noqa = NoqaSettings::new(79);
        assert_eq!(
            noqa.suppress("#| echo: false   ", &[codes::COMMENT_SPACING]),
            "#| echo: false  # noqa: E265,E501"
        );
    }

    #[test]
    fn test_suppress_counts_characters_not_bytes() {
        let noqa = NoqaSettings::new(6);
        assert_eq!(noqa.suppress("s = 'é'", &[codes::BLANK_LINES_AFTER_DEF]), "s = 'é'  # noqa: E305");
        assert_eq!(noqa.suppress("s='é'", &[codes::BLANK_LINES_AFTER_DEF]), "s='é'  # noqa: E305,E501");
    }
}
