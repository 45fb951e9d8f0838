//! Kconfig file discovery.
//!
//! Directories are walked with `.gitignore` support; a file is a Kconfig file
//! if its name starts with `Kconfig`, it has a `.kconfig`/`.Kconfig`
//! extension, or it matches one of the configured `include` patterns.
//! Paths named explicitly on the command line are always checked.

use anyhow::{Context, Result};
use glob::Pattern;
use kconfig_lint_core::{FileReport, FilesConfig};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Which files to check.
#[derive(Debug, Clone)]
pub struct Discovery {
    exclude: Vec<Pattern>,
    include: Vec<Pattern>,
    respect_gitignore: bool,
}

/// Files found, plus reports for paths that do not exist.
#[derive(Debug, Default)]
pub struct Discovered {
    /// Files to check, sorted and deduplicated.
    pub files: Vec<PathBuf>,
    /// Paths that could not be found.
    pub missing: Vec<FileReport>,
}

impl Discovery {
    /// Builds the discovery settings from the config file and `--exclude`.
    ///
    /// # Errors
    ///
    /// Returns an error if a pattern is not a valid glob.
    pub fn new(files: &FilesConfig, extra_exclude: &[String]) -> Result<Self> {
        let compile = |pattern: &String| {
            Pattern::new(pattern).with_context(|| format!("Invalid glob pattern: {pattern}"))
        };
        Ok(Self {
            exclude: files
                .exclude
                .iter()
                .chain(extra_exclude)
                .map(compile)
                .collect::<Result<_>>()?,
            include: files.include.iter().map(compile).collect::<Result<_>>()?,
            respect_gitignore: files.respect_gitignore,
        })
    }

    /// True if the file name marks a Kconfig file.
    #[must_use]
    pub fn is_kconfig_file(&self, path: &Path) -> bool {
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            return false;
        };
        name.starts_with("Kconfig")
            || matches!(
                path.extension().and_then(|e| e.to_str()),
                Some("kconfig" | "Kconfig")
            )
            || self.include.iter().any(|p| p.matches(name))
    }

    /// True if `path`, taken relative to `root`, matches an exclude pattern.
    #[must_use]
    pub fn is_excluded(&self, path: &Path, root: &Path) -> bool {
        let relative = path.strip_prefix(root).unwrap_or(path);
        self.exclude
            .iter()
            .any(|p| p.matches_path(relative) || p.matches_path(path))
    }

    /// Expands the given paths into the files to check.
    #[must_use]
    pub fn collect(&self, paths: &[PathBuf]) -> Discovered {
        let mut found = Discovered::default();
        for path in paths {
            if path.is_file() {
                found.files.push(path.clone());
            } else if path.is_dir() {
                self.walk(path, &mut found.files);
            } else {
                found.missing.push(FileReport::failed(path, "File not found"));
            }
        }
        found.files.sort();
        found.files.dedup();
        debug!("Discovered {} Kconfig file(s)", found.files.len());
        found
    }

    fn walk(&self, root: &Path, files: &mut Vec<PathBuf>) {
        let mut builder = ignore::WalkBuilder::new(root);
        builder
            .hidden(false)
            .git_ignore(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .require_git(false);

        for entry in builder.build() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    warn!("Skipping unreadable path: {}", err);
                    continue;
                }
            };
            let path = entry.path();
            if !entry.file_type().is_some_and(|t| t.is_file()) || !self.is_kconfig_file(path) {
                continue;
            }
            if self.is_excluded(path, root) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }
    }
}
