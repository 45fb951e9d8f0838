//! Init command implementation.

use anyhow::{bail, Context, Result};
use kconfig_lint_rules::Preset;
use std::path::{Path, PathBuf};

fn default_config(preset: Preset) -> String {
    format!(
        r#"# kconfig-lint configuration

# Style preset: "zephyr" (tabs, flat) or "espidf" (4 spaces, nested)
preset = "{preset}"

# Lowest severity that fails the run: "error", "warning" or "info"
fail_on = "warning"

[files]
# Glob patterns to exclude from discovery
exclude = [
    "**/build/**",
    "**/.git/**",
]

# Extra file name patterns to treat as Kconfig files
# include = ["*.projbuild"]

# Respect .gitignore files
respect_gitignore = true

# Rule configurations
# Each rule can be enabled/disabled, have its severity overridden,
# and take rule-specific options on top of the preset.

# [rules.line-length]
# max = 120
# severity = "error"

# [rules.blank-lines]
# enabled = true
# max_consecutive = 1
# between_entries = 1

# [rules.property-order]
# enabled = true
# order = ["type", "prompt", "depends", "select", "default", "range"]

# [rules.config-naming]
# prefixes = ["NET_", "BT_"]
"#
    )
}

/// Runs the init command in the current directory.
pub fn run(force: bool, preset: Preset) -> Result<()> {
    let path = write_config(Path::new("."), force, preset)?;

    println!("Created {}", path.display());
    println!("\nNext steps:");
    println!("  1. Edit {} to configure rules", path.display());
    println!("  2. Run: kconfig-lint check");

    Ok(())
}

/// Writes the starter configuration into `dir`.
///
/// # Errors
///
/// Returns an error if the file exists and `force` is not set, or if it
/// cannot be written.
pub fn write_config(dir: &Path, force: bool, preset: Preset) -> Result<PathBuf> {
    let config_path = dir.join(crate::config_resolver::PROJECT_CONFIG_NAMES[0]);

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(&config_path, default_config(preset))
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(config_path)
}
