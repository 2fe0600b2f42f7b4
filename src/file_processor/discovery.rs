//! Finding the Quarto documents to lint.

use globset::{Glob, GlobSet, GlobSetBuilder};
use ignore::WalkBuilder;
use std::collections::BTreeSet;
use std::path::{Component, Path, PathBuf};

/// Extension of the documents qmdlint processes
pub const QMD_EXTENSION: &str = "qmd";

#[derive(Debug, thiserror::Error)]
pub enum DiscoveryError {
    #[error("Invalid exclude pattern '{pattern}': {source}")]
    InvalidPattern { pattern: String, source: globset::Error },
}

/// Exclusions given either as plain paths (files or directories) or as globs.
#[derive(Debug)]
struct ExcludeMatcher {
    paths: Vec<PathBuf>,
    globs: GlobSet,
}

impl ExcludeMatcher {
    fn new(exclude: &[String]) -> Result<Self, DiscoveryError> {
        let mut paths = Vec::new();
        let mut builder = GlobSetBuilder::new();

        for pattern in exclude {
            if is_glob(pattern) {
                let glob = Glob::new(pattern).map_err(|source| DiscoveryError::InvalidPattern {
                    pattern: pattern.clone(),
                    source,
                })?;
                builder.add(glob);
            } else {
                paths.push(normalize(Path::new(pattern.trim_end_matches('/'))));
            }
        }

        let globs = builder.build().map_err(|source| DiscoveryError::InvalidPattern {
            pattern: exclude.join(", "),
            source,
        })?;
        Ok(Self { paths, globs })
    }

    fn is_excluded(&self, path: &Path) -> bool {
        let normalized = normalize(path);
        self.paths.iter().any(|excluded| normalized.starts_with(excluded))
            || self.globs.is_match(&normalized)
            || normalized.file_name().is_some_and(|name| self.globs.is_match(name))
    }
}

fn is_glob(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Drop `.` components so that `./docs/a.qmd` and `docs/a.qmd` compare equal.
fn normalize(path: &Path) -> PathBuf {
    path.components().filter(|c| !matches!(c, Component::CurDir)).collect()
}

fn is_qmd(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case(QMD_EXTENSION))
}

/// Collect `.qmd` files from files and directories, minus exclusions.
///
/// Directories are walked recursively, honouring `.gitignore` and skipping
/// hidden entries. Paths that do not exist are logged and skipped. The result
/// is sorted and free of duplicates.
pub fn gather_qmd_files<P: AsRef<Path>>(paths: &[P], exclude: &[String]) -> Result<Vec<PathBuf>, DiscoveryError> {
    let matcher = ExcludeMatcher::new(exclude)?;
    let mut found = BTreeSet::new();

    for path in paths {
        let path = path.as_ref();

        if path.is_file() {
            if !is_qmd(path) {
                log::debug!("Skipping non-.qmd file: {}", path.display());
            } else if matcher.is_excluded(path) {
                log::debug!("Excluding: {}", path.display());
            } else {
                found.insert(path.to_path_buf());
            }
            continue;
        }

        if !path.is_dir() {
            log::warn!("Path does not exist: {}", path.display());
            continue;
        }

        let walker = WalkBuilder::new(path).require_git(false).build();
        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    log::warn!("Error walking {}: {e}", path.display());
                    continue;
                }
            };

            let entry_path = entry.path();
            if !entry.file_type().is_some_and(|ft| ft.is_file()) || !is_qmd(entry_path) {
                continue;
            }
            if matcher.is_excluded(entry_path) {
                log::debug!("Excluding: {}", entry_path.display());
                continue;
            }
            found.insert(entry_path.to_path_buf());
        }
    }

    Ok(found.into_iter().collect())
}
