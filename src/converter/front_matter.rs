//! YAML front matter handling for Quarto documents.
//!
//! Only one setting is read: `execute.eval`, the document-wide default for
//! whether code chunks run. Anything unexpected (no front matter, no closing
//! fence, invalid YAML, a non-mapping `execute`) falls back to `true`.

use serde_yml::Value;

/// Values taken from the document's front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentDefaults {
    /// Whether chunks without their own `eval` option are executed
    pub executes: bool,
}

impl Default for DocumentDefaults {
    fn default() -> Self {
        Self { executes: true }
    }
}

impl DocumentDefaults {
    /// Read the defaults from the document's front matter, if it has one.
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let Some(body) = front_matter_body(lines) else {
            return Self::default();
        };

        let yaml = body.iter().map(AsRef::as_ref).collect::<Vec<&str>>().join("\n");
        match serde_yml::from_str::<Value>(&yaml) {
            Ok(value) => Self {
                executes: execute_eval(&value),
            },
            Err(e) => {
                log::debug!("Ignoring invalid front matter: {e}");
                Self::default()
            }
        }
    }
}

/// Check if a line is a front matter fence (`---`)
pub fn is_front_matter_fence(line: &str) -> bool {
    line.trim() == "---"
}

/// Lines between the opening and closing fences, or `None` when the document
/// does not start with a fence or the fence is never closed.
fn front_matter_body<S: AsRef<str>>(lines: &[S]) -> Option<&[S]> {
    let first = lines.first()?;
    if !is_front_matter_fence(first.as_ref()) {
        return None;
    }

    let close = lines
        .iter()
        .skip(1)
        .position(|line| is_front_matter_fence(line.as_ref()))?;
    Some(&lines[1..=close])
}

fn execute_eval(front_matter: &Value) -> bool {
    match front_matter.get("execute").and_then(|execute| execute.get("eval")) {
        Some(eval) => is_truthy(eval),
        None => true,
    }
}

/// Truthiness of a YAML scalar.
///
/// Headers are parsed as YAML 1.2, so the YAML 1.1 booleans `no`, `n` and
/// `off` arrive as strings and are mapped back here.
fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Bool(b) => *b,
        Value::String(s) => !matches!(s.to_lowercase().as_str(), "false" | "no" | "n" | "off" | "0"),
        Value::Number(n) => n.as_f64().is_none_or(|f| f != 0.0),
        Value::Null => false,
        Value::Sequence(seq) => !seq.is_empty(),
        Value::Mapping(map) => !map.is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn executes(lines: &[&str]) -> bool {
        DocumentDefaults::from_lines(lines).executes
    }

    #[test]
    fn test_no_front_matter() {
        assert!(executes(&[]));
        assert!(executes(&["# Title", "---", "execute:", "  eval: false", "---"]));
    }

    #[test]
    fn test_eval_false() {
        assert!(!executes(&["---", "title: Test", "execute:", "  eval: false", "---", "text"]));
    }

    #[test]
    fn test_eval_true() {
        assert!(executes(&["---", "execute:", "  eval: true", "---"]));
    }

    #[test]
    fn test_eval_string_tokens() {
        assert!(!executes(&["---", "execute:", "  eval: \"FALSE\"", "---"]));
        assert!(!executes(&["---", "execute:", "  eval: 'no'", "---"]));
        assert!(!executes(&["---", "execute:", "  eval: '0'", "---"]));
        assert!(executes(&["---", "execute:", "  eval: 'maybe'", "---"]));
    }

    #[test]
    fn test_eval_yaml11_false_tokens() {
        assert!(!executes(&["---", "execute:", "  eval: off", "---"]));
        assert!(!executes(&["---", "execute:", "  eval: Off", "---"]));
        assert!(!executes(&["---", "execute:", "  eval: n", "---"]));
        assert!(!executes(&["---", "execute:", "  eval: NO", "---"]));
        assert!(executes(&["---", "execute:", "  eval: on", "---"]));
        assert!(executes(&["---", "execute:", "  eval: yes", "---"]));
    }

    #[test]
    fn test_eval_numeric() {
        assert!(!executes(&["---", "execute:", "  eval: 0", "---"]));
        assert!(executes(&["---", "execute:", "  eval: 1", "---"]));
    }

    #[test]
    fn test_missing_eval_key() {
        assert!(executes(&["---", "execute:", "  echo: false", "---"]));
        assert!(executes(&["---", "title: No execute block", "---"]));
    }

    #[test]
    fn test_execute_not_a_mapping() {
        assert!(executes(&["---", "execute: false", "---"]));
        assert!(executes(&["---", "execute:", "  - eval", "---"]));
    }

    #[test]
    fn test_unclosed_front_matter() {
        assert!(executes(&["---", "execute:", "  eval: false"]));
    }

    #[test]
    fn test_invalid_yaml_falls_back() {
        assert!(executes(&["---", "execute: [unclosed", "  eval: false", "---"]));
    }

    #[test]
    fn test_empty_front_matter() {
        assert!(executes(&["---", "---"]));
    }

    #[test]
    fn test_fence_with_trailing_whitespace() {
        assert!(!executes(&["---  ", "execute:", "  eval: false", "  ---"]));
    }

    #[test]
    fn test_front_matter_body() {
        let lines = ["---", "a: 1", "b: 2", "---", "rest"];
        assert_eq!(front_matter_body(&lines), Some(&lines[1..3]));
        assert_eq!(front_matter_body(&["text"]), None);
    }
}
