//! Run settings: which config file applies and what it asks for.
//!
//! The config file is the first one found of:
//!
//! 1. the `--config` path
//! 2. `kconfig-lint.toml` or `.kconfig-lint.toml` in the directory of the first
//!    checked path, or in the nearest ancestor directory that has one
//! 3. `config.toml` under `$KCONFIG_LINT_CONFIG_DIR`, else under `~/.kconfig-lint/`
//!
//! Without a file the preset defaults apply and warnings fail the run.

use anyhow::{Context, Result};
use kconfig_lint_core::{Config, Severity};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Project-level config file names, checked in order within each directory.
pub const PROJECT_CONFIG_NAMES: &[&str] = &["kconfig-lint.toml", ".kconfig-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Loaded configuration plus the values derived from it for a check run.
#[derive(Debug)]
pub struct Settings {
    /// Parsed config file contents (defaults when no file applies).
    pub config: Config,
    /// Lowest severity that fails the run.
    pub fail_on: Severity,
    /// File the config was read from.
    pub origin: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            config: Config::default(),
            fail_on: Severity::Warning,
            origin: None,
        }
    }
}

impl Settings {
    /// Finds, reads and validates the config that applies to `paths`.
    ///
    /// # Errors
    ///
    /// Returns an error if the chosen file cannot be read, is not valid TOML,
    /// or names an unknown `fail_on` severity.
    pub fn load(paths: &[PathBuf], explicit: Option<&Path>) -> Result<Self> {
        Self::load_from(&start_dir(paths), explicit, global_config_dir().as_deref())
    }

    fn load_from(start: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> Result<Self> {
        let Some(path) = locate(start, explicit, global_dir) else {
            return Ok(Self::default());
        };
        debug!("Found config: {}", path.display());

        let config = Config::from_file(&path)
            .with_context(|| format!("Failed to load config: {}", path.display()))?;
        let fail_on = config
            .fail_on()
            .with_context(|| format!("Invalid `fail_on` in {}", path.display()))?;
        Ok(Self {
            config,
            fail_on,
            origin: Some(path),
        })
    }
}

fn locate(start: &Path, explicit: Option<&Path>, global_dir: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }

    let start = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());
    let project = start
        .ancestors()
        .flat_map(|dir| PROJECT_CONFIG_NAMES.iter().map(move |name| dir.join(name)))
        .find(|candidate| candidate.is_file());
    if project.is_some() {
        return project;
    }

    global_dir
        .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
        .filter(|candidate| candidate.is_file())
}

/// `$KCONFIG_LINT_CONFIG_DIR`, else `~/.kconfig-lint/`.
fn global_config_dir() -> Option<PathBuf> {
    if let Ok(dir) = std::env::var("KCONFIG_LINT_CONFIG_DIR") {
        return Some(PathBuf::from(dir));
    }
    home::home_dir().map(|h| h.join(".kconfig-lint"))
}

/// Directory the project config search starts from.
fn start_dir(paths: &[PathBuf]) -> PathBuf {
    paths
        .first()
        .map(|p| {
            if p.is_dir() {
                p.clone()
            } else {
                p.parent()
                    .filter(|parent| !parent.as_os_str().is_empty())
                    .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
            }
        })
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[test]
    fn component_directory_picks_up_tree_root_config() {
        let tree = TempDir::new().unwrap();
        write(&tree.path().join("kconfig-lint.toml"), "preset = \"espidf\"\n");
        let component = tree.path().join("components/wifi");
        write(&component.join("Kconfig"), "");

        let settings = Settings::load(&[component.join("Kconfig")], None).unwrap();
        assert_eq!(settings.config.preset.as_deref(), Some("espidf"));
        assert!(settings.origin.unwrap().ends_with("kconfig-lint.toml"));
    }

    #[test]
    fn nearest_config_shadows_outer_one() {
        let tree = TempDir::new().unwrap();
        write(&tree.path().join("kconfig-lint.toml"), "preset = \"zephyr\"\n");
        let board = tree.path().join("boards/arm");
        write(&board.join(".kconfig-lint.toml"), "preset = \"espidf\"\n");

        let settings = Settings::load_from(&board, None, None).unwrap();
        assert_eq!(settings.config.preset.as_deref(), Some("espidf"));
    }

    #[test]
    fn plain_name_beats_dotfile_in_same_directory() {
        let tree = TempDir::new().unwrap();
        write(&tree.path().join("kconfig-lint.toml"), "fail_on = \"error\"\n");
        write(&tree.path().join(".kconfig-lint.toml"), "fail_on = \"info\"\n");

        let settings = Settings::load_from(tree.path(), None, None).unwrap();
        assert_eq!(settings.fail_on, Severity::Error);
    }

    #[test]
    fn config_flag_overrides_tree_config() {
        let tree = TempDir::new().unwrap();
        write(&tree.path().join("kconfig-lint.toml"), "preset = \"zephyr\"\n");
        let flag = tree.path().join("ci/strict.toml");
        write(&flag, "preset = \"espidf\"\nfail_on = \"info\"\n");

        let settings = Settings::load_from(tree.path(), Some(&flag), None).unwrap();
        assert_eq!(settings.config.preset.as_deref(), Some("espidf"));
        assert_eq!(settings.fail_on, Severity::Info);
        assert_eq!(settings.origin, Some(flag));
    }

    #[test]
    fn missing_config_flag_file_is_an_error() {
        let tree = TempDir::new().unwrap();
        let err = Settings::load_from(tree.path(), Some(&tree.path().join("nope.toml")), None)
            .unwrap_err();
        assert!(format!("{err:#}").contains("Failed to load config"));
    }

    #[test]
    fn user_config_applies_outside_any_tree() {
        let tree = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();
        write(&user.path().join("config.toml"), "fail_on = \"error\"\n");

        let settings = Settings::load_from(tree.path(), None, Some(user.path())).unwrap();
        assert_eq!(settings.fail_on, Severity::Error);
        assert_eq!(settings.origin, Some(user.path().join("config.toml")));
    }

    #[test]
    fn defaults_fail_on_warnings() {
        let tree = TempDir::new().unwrap();
        let user = TempDir::new().unwrap();

        let settings = Settings::load_from(tree.path(), None, Some(user.path())).unwrap();
        assert!(settings.origin.is_none());
        assert!(settings.config.preset.is_none());
        assert_eq!(settings.fail_on, Severity::Warning);
    }

    #[test]
    fn unknown_fail_on_names_the_file() {
        let tree = TempDir::new().unwrap();
        write(&tree.path().join(".kconfig-lint.toml"), "fail_on = \"fatal\"\n");

        let err = Settings::load_from(tree.path(), None, None).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("Invalid `fail_on`"));
        assert!(message.contains(".kconfig-lint.toml"));
    }

    #[test]
    fn broken_toml_names_the_file() {
        let tree = TempDir::new().unwrap();
        write(&tree.path().join("kconfig-lint.toml"), "preset = [");

        let err = Settings::load_from(tree.path(), None, None).unwrap_err();
        assert!(format!("{err:#}").contains("kconfig-lint.toml"));
    }

    #[test]
    fn search_starts_next_to_the_first_path() {
        let tree = TempDir::new().unwrap();
        let file = tree.path().join("Kconfig");
        write(&file, "");

        assert_eq!(start_dir(&[tree.path().to_path_buf()]), tree.path());
        assert_eq!(start_dir(&[file]), tree.path());
        assert_eq!(start_dir(&[PathBuf::from("Kconfig")]), PathBuf::from("."));
        assert_eq!(start_dir(&[]), PathBuf::from("."));
    }
}
