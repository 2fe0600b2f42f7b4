//! Integration tests for the qmdlint command line
//!
//! These cover everything that does not need an external linter installed:
//! listing linters, converting documents, and the error paths of `check`.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

const DOC: &str = "# Title\n\n```{python}\nimport os\nprint(os.getcwd())\n```\n";

fn qmdlint() -> Command {
    Command::cargo_bin("qmdlint").unwrap()
}

#[test]
fn test_linters_lists_registry() {
    qmdlint()
        .arg("linters")
        .assert()
        .success()
        .stdout(predicate::str::contains("flake8"))
        .stdout(predicate::str::contains("radon-raw"))
        .stdout(predicate::str::contains("pyrefly check"));
}

#[test]
fn test_linters_quiet_prints_names_only() {
    let assert = qmdlint().args(["linters", "--quiet"]).assert().success();
    let stdout = String::from_utf8(assert.get_output().stdout.clone()).unwrap();
    let names: Vec<&str> = stdout.lines().collect();
    assert!(names.contains(&"ruff"));
    assert!(names.iter().all(|name| !name.contains(' ')));
}

#[test]
fn test_convert_writes_python_file() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("analysis.qmd");
    let output = temp_dir.path().join("out.py");
    fs::write(&input, DOC).unwrap();

    qmdlint()
        .current_dir(temp_dir.path())
        .arg("convert")
        .arg(&input)
        .arg(&output)
        .args(["--linter", "pylint"])
        .assert()
        .success();

    let content = fs::read_to_string(&output).unwrap();
    assert_eq!(content, "# -\n# -\n# %% [python]\nimport os\nprint(os.getcwd())\n# -\n");
}

#[test]
fn test_convert_never_overwrites() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("analysis.qmd");
    fs::write(&input, DOC).unwrap();
    fs::write(temp_dir.path().join("analysis.py"), "keep me\n").unwrap();

    qmdlint()
        .current_dir(temp_dir.path())
        .arg("convert")
        .arg(&input)
        .args(["-l", "flake8"])
        .assert()
        .success()
        .stdout(predicate::str::contains("analysis_1.py"));

    assert_eq!(fs::read_to_string(temp_dir.path().join("analysis.py")).unwrap(), "keep me\n");
    assert!(temp_dir.path().join("analysis_1.py").exists());
}

#[test]
fn test_convert_missing_input() {
    let temp_dir = tempdir().unwrap();

    qmdlint()
        .current_dir(temp_dir.path())
        .args(["convert", "missing.qmd", "-l", "flake8"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Input file 'missing.qmd' not found"));
}

#[test]
fn test_convert_unsupported_linter() {
    let temp_dir = tempdir().unwrap();
    let input = temp_dir.path().join("analysis.qmd");
    fs::write(&input, DOC).unwrap();

    qmdlint()
        .current_dir(temp_dir.path())
        .arg("convert")
        .arg(&input)
        .args(["-l", "black"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported linter 'black'"));

    assert!(!temp_dir.path().join("analysis.py").exists());
}

#[test]
fn test_check_no_documents() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("notes.md"), "# Notes\n").unwrap();

    qmdlint()
        .current_dir(temp_dir.path())
        .args(["check", "-l", "flake8", "-p", "."])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No .qmd files found"));
}

#[test]
fn test_check_everything_excluded() {
    let temp_dir = tempdir().unwrap();
    fs::create_dir(temp_dir.path().join("drafts")).unwrap();
    fs::write(temp_dir.path().join("drafts").join("a.qmd"), DOC).unwrap();

    qmdlint()
        .current_dir(temp_dir.path())
        .args(["check", "-l", "flake8", "-p", ".", "-e", "drafts"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No .qmd files found"));
}

#[test]
fn test_check_rejects_unknown_linter_before_converting() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("a.qmd"), DOC).unwrap();

    qmdlint()
        .current_dir(temp_dir.path())
        .args(["check", "-l", "flake8", "notalinter", "-p", "a.qmd"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported linter 'notalinter'"));

    assert!(!temp_dir.path().join("a.py").exists());
}

#[test]
fn test_check_linters_from_config() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("a.qmd"), DOC).unwrap();
    fs::write(temp_dir.path().join(".qmdlint.toml"), "linters = [\"bogus\"]\n").unwrap();

    qmdlint()
        .current_dir(temp_dir.path())
        .args(["check", "-p", "a.qmd"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unsupported linter 'bogus'"));
}

#[test]
fn test_check_requires_linters() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("a.qmd"), DOC).unwrap();

    qmdlint()
        .current_dir(temp_dir.path())
        .args(["check", "-p", "a.qmd"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("No linters specified"));
}

#[test]
fn test_check_explicit_config_must_exist() {
    let temp_dir = tempdir().unwrap();
    fs::write(temp_dir.path().join("a.qmd"), DOC).unwrap();

    qmdlint()
        .current_dir(temp_dir.path())
        .args(["check", "-l", "flake8", "-p", "a.qmd", "--config", "nope.toml"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Failed to load configuration"));
}
