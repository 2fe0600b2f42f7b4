//! Exit codes for qmdlint, following Ruff's convention
//!
//! These exit codes allow users and CI/CD systems to distinguish between
//! linter findings and failures of qmdlint itself.

/// Success - Every linter passed on every document
pub const SUCCESS: i32 = 0;

/// Linting issues found - At least one linter reported a problem
pub const VIOLATIONS_FOUND: i32 = 1;

/// Tool error - Configuration error, missing linter, no documents, or file access error
pub const TOOL_ERROR: i32 = 2;

/// Pick the exit code for a finished run.
pub fn for_run(had_tool_error: bool, had_violations: bool) -> i32 {
    if had_tool_error {
        TOOL_ERROR
    } else if had_violations {
        VIOLATIONS_FOUND
    } else {
        SUCCESS
    }
}

/// Helper functions for consistent exit behavior
pub mod exit {
    use super::TOOL_ERROR;

    /// Exit with tool error code (2)
    pub fn tool_error() -> ! {
        std::process::exit(TOOL_ERROR);
    }
}
