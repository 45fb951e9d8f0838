//! Resolution of the effective style profile.
//!
//! Layers, lowest first: the preset, the `[rules]` tables of the config file,
//! then command-line overrides. `--rules` finally restricts the run to the
//! named rules.

use anyhow::{Context, Result};
use kconfig_lint_core::{Config, StyleProfile};
use kconfig_lint_rules::{
    blank_lines, builtin_registry, config_naming, help_indent, indentation, line_length, Preset,
};
use tracing::debug;

use crate::StyleOverrides;

/// Indentation width used by `--use-spaces` without `--primary-indent`.
const DEFAULT_SPACE_WIDTH: i64 = 4;

/// Rules that share the indentation settings.
const INDENT_RULES: [&str; 2] = [indentation::NAME, help_indent::NAME];

/// Picks the preset: the command line wins over the config file.
///
/// # Errors
///
/// Returns an error if the config file names an unknown preset.
pub fn preset(config: &Config, flag: Option<Preset>) -> Result<Preset> {
    if let Some(preset) = flag {
        return Ok(preset);
    }
    config
        .preset
        .as_deref()
        .map_or(Ok(Preset::default()), str::parse)
        .context("Invalid preset in config file")
}

/// Builds the profile for a run.
///
/// # Errors
///
/// Returns an error for an unknown preset or an unknown rule in `--rules`.
pub fn resolve(
    config: &Config,
    preset_flag: Option<Preset>,
    rules: Option<&str>,
    overrides: &StyleOverrides,
) -> Result<StyleProfile> {
    let preset = preset(config, preset_flag)?;
    let mut profile = preset.profile();
    profile.merge(&config.rules);
    overrides.apply(&mut profile);

    if let Some(filter) = rules {
        let names = builtin_registry()
            .resolve_names(filter.split(',').filter(|s| !s.trim().is_empty()))
            .context("Invalid --rules")?;
        profile.restrict_to(&names);
    }

    debug!("Resolved profile `{}` from preset {}", profile.name, preset);
    Ok(profile)
}

impl StyleOverrides {
    /// Writes the overrides into `profile`.
    pub fn apply(&self, profile: &mut StyleProfile) {
        let width = self
            .primary_indent
            .map(to_int)
            .or(self.use_spaces.then_some(DEFAULT_SPACE_WIDTH));
        for rule in INDENT_RULES {
            if self.use_spaces {
                profile.set_option(rule, "style", "spaces");
            }
            if let Some(width) = width {
                profile.set_option(rule, "width", width);
            }
            if self.indent_sub_items {
                profile.set_option(rule, "indent_sub_items", true);
            }
        }
        if let Some(n) = self.help_indent {
            profile.set_option(help_indent::NAME, "help_indent", to_int(n));
        }
        if let Some(n) = self.max_line_length {
            profile.set_option(line_length::NAME, "max", to_int(n));
        }
        if let Some(n) = self.max_option_length {
            profile.set_option(config_naming::NAME, "max_length", to_int(n));
        }
        if self.uppercase_configs {
            profile.set_option(config_naming::NAME, "uppercase", true);
        }
        if let Some(n) = self.min_prefix_length {
            profile.set_option(config_naming::NAME, "min_prefix_length", to_int(n));
        }
        if self.consolidate_empty_lines {
            profile.set_enabled(blank_lines::NAME, true);
        }
    }
}

fn to_int(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
