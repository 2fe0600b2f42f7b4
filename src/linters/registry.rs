//! Built-in registry of the Python linters qmdlint knows how to drive.
//!
//! Each definition records how the linter is invoked and the two capabilities
//! the converter cares about: whether it honours `# noqa` directives, and
//! whether its diagnostics depend on line numbers at all.

use crate::config::ConfigError;
use std::collections::HashMap;
use std::sync::LazyLock;

/// Definition of a supported linter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinterDefinition {
    /// Command to run (first element is the binary, rest are arguments).
    /// The path of the generated Python file is appended.
    pub command: Vec<String>,

    /// Whether the linter recognises inline `# noqa: CODE` directives
    pub uses_noqa: bool,

    /// Whether the generated file must keep the document's line numbering
    pub preserves_line_count: bool,

    /// Line length limit the linter uses when its config does not set one
    pub default_line_length: Option<usize>,
}

impl LinterDefinition {
    fn new(command: &[&str]) -> Self {
        Self {
            command: command.iter().map(|s| s.to_string()).collect(),
            uses_noqa: false,
            preserves_line_count: true,
            default_line_length: None,
        }
    }

    fn with_noqa(mut self, default_line_length: usize) -> Self {
        self.uses_noqa = true;
        self.default_line_length = Some(default_line_length);
        self
    }

    fn without_line_preservation(mut self) -> Self {
        self.preserves_line_count = false;
        self
    }

    /// Name of the executable, used for availability checks and messages.
    pub fn binary(&self) -> &str {
        self.command.first().map(String::as_str).unwrap_or_default()
    }
}

/// Registry of built-in linter definitions.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinterRegistry;

impl LinterRegistry {
    pub fn new() -> Self {
        Self
    }

    /// Get a linter definition by name.
    pub fn get(&self, name: &str) -> Option<&'static LinterDefinition> {
        BUILTIN_LINTERS.get(name)
    }

    /// Check if a linter name is supported.
    pub fn contains(&self, name: &str) -> bool {
        BUILTIN_LINTERS.contains_key(name)
    }

    /// List all supported linter names, sorted.
    pub fn list(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = BUILTIN_LINTERS.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Resolve a linter name, failing with a configuration error if unknown.
    pub fn check_supported(&self, name: &str) -> Result<&'static LinterDefinition, ConfigError> {
        self.get(name).ok_or_else(|| ConfigError::UnsupportedLinter {
            name: name.to_string(),
            supported: self.list().into_iter().map(String::from).collect(),
        })
    }
}

static BUILTIN_LINTERS: LazyLock<HashMap<&'static str, LinterDefinition>> = LazyLock::new(|| {
    let mut m = HashMap::new();

    // pycodestyle-based checkers understand noqa and report E501
    m.insert("flake8", LinterDefinition::new(&["flake8"]).with_noqa(79));
    m.insert("pycodestyle", LinterDefinition::new(&["pycodestyle"]).with_noqa(79));
    m.insert("ruff", LinterDefinition::new(&["ruff", "check"]).with_noqa(88));

    m.insert("pylint", LinterDefinition::new(&["pylint"]));
    m.insert("pyflakes", LinterDefinition::new(&["pyflakes"]));
    m.insert("pylama", LinterDefinition::new(&["pylama"]));
    m.insert("vulture", LinterDefinition::new(&["vulture"]));
    m.insert("pydoclint", LinterDefinition::new(&["pydoclint"]));

    // Type checkers
    m.insert("mypy", LinterDefinition::new(&["mypy"]));
    m.insert("pyright", LinterDefinition::new(&["pyright"]));
    m.insert("pyrefly", LinterDefinition::new(&["pyrefly", "check"]));

    // Radon metrics; raw counts (LOC, comments, blanks) are skewed by placeholders
    m.insert("radon-cc", LinterDefinition::new(&["radon", "cc"]));
    m.insert("radon-mi", LinterDefinition::new(&["radon", "mi"]));
    m.insert("radon-hal", LinterDefinition::new(&["radon", "hal"]));
    m.insert(
        "radon-raw",
        LinterDefinition::new(&["radon", "raw"]).without_line_preservation(),
    );

    m
});

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_builtin_linter() {
        let registry = LinterRegistry::new();

        let ruff = registry.get("ruff").expect("Should find ruff");
        assert_eq!(ruff.command, vec!["ruff", "check"]);
        assert!(ruff.uses_noqa);
        assert_eq!(ruff.default_line_length, Some(88));
        assert_eq!(ruff.binary(), "ruff");

        let pylint = registry.get("pylint").expect("Should find pylint");
        assert!(!pylint.uses_noqa);
        assert!(pylint.preserves_line_count);
    }

    #[test]
    fn test_noqa_linters() {
        let registry = LinterRegistry::new();
        let noqa: Vec<&str> = registry
            .list()
            .into_iter()
            .filter(|name| registry.get(name).is_some_and(|l| l.uses_noqa))
            .collect();
        assert_eq!(noqa, vec!["flake8", "pycodestyle", "ruff"]);
    }

    #[test]
    fn test_only_radon_raw_drops_line_preservation() {
        let registry = LinterRegistry::new();
        let non_preserving: Vec<&str> = registry
            .list()
            .into_iter()
            .filter(|name| registry.get(name).is_some_and(|l| !l.preserves_line_count))
            .collect();
        assert_eq!(non_preserving, vec!["radon-raw"]);
    }

    #[test]
    fn test_contains() {
        let registry = LinterRegistry::new();
        assert!(registry.contains("flake8"));
        assert!(registry.contains("radon-cc"));
        assert!(!registry.contains("black"));
        assert!(!registry.contains("Flake8"));
    }

    #[test]
    fn test_check_supported_rejects_unknown() {
        let registry = LinterRegistry::new();
        let err = registry.check_supported("nonexistent-linter").unwrap_err();
        match err {
            ConfigError::UnsupportedLinter { name, supported } => {
                assert_eq!(name, "nonexistent-linter");
                assert!(supported.contains(&"pylint".to_string()));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_list_is_sorted() {
        let names = LinterRegistry::new().list();
        let mut sorted = names.clone();
        sorted.sort_unstable();
        assert_eq!(names, sorted);
        assert_eq!(names.len(), 15);
    }
}
