//! Style presets for common Kconfig trees.

use crate::{
    blank_lines, comment_spacing, config_naming, help_indent, indentation, line_length,
    property_order, trailing_whitespace,
};
use kconfig_lint_core::{ConfigError, RuleConfig, StyleProfile};
use std::str::FromStr;

/// Named reference styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Embedded-OS style: tabs, flat structure, help text at tab + 2 spaces.
    #[default]
    Zephyr,
    /// Vendor-SDK style: 4 spaces per level, nested structure, uppercase names.
    Espidf,
}

impl Preset {
    /// All presets.
    pub const ALL: [Self; 2] = [Self::Zephyr, Self::Espidf];

    /// Preset name as used in configuration files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Zephyr => "zephyr",
            Self::Espidf => "espidf",
        }
    }

    /// Returns the style profile of this preset.
    ///
    /// Includes:
    /// - `trailing-whitespace` (KL001), `line-length` (KL002),
    ///   `comment-spacing` (KL003)
    /// - `indentation` (KL004) and `help-indent` (KL005)
    /// - `config-naming` (KL008)
    ///
    /// `blank-lines` (KL006) and `property-order` (KL007) are configured but
    /// disabled.
    #[must_use]
    pub fn profile(self) -> StyleProfile {
        match self {
            Self::Zephyr => zephyr_profile(),
            Self::Espidf => espidf_profile(),
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "zephyr" => Ok(Self::Zephyr),
            "espidf" | "esp-idf" => Ok(Self::Espidf),
            _ => Err(ConfigError::UnknownPreset(s.to_string())),
        }
    }
}

impl std::fmt::Display for Preset {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

fn indent(config: RuleConfig, style: &str, width: i64, nested: bool) -> RuleConfig {
    config
        .with("style", style)
        .with("width", width)
        .with("indent_sub_items", nested)
}

fn zephyr_profile() -> StyleProfile {
    StyleProfile::new("zephyr")
        .with_rule(trailing_whitespace::NAME, RuleConfig::enabled())
        .with_rule(line_length::NAME, RuleConfig::enabled().with("max", 100_i64))
        .with_rule(comment_spacing::NAME, RuleConfig::enabled())
        .with_rule(
            indentation::NAME,
            indent(RuleConfig::enabled(), "tabs", 1, false),
        )
        .with_rule(
            help_indent::NAME,
            indent(RuleConfig::enabled(), "tabs", 1, false).with("help_indent", 2_i64),
        )
        .with_rule(
            blank_lines::NAME,
            RuleConfig::disabled()
                .with("max_consecutive", 1_i64)
                .with("allow_inside_entries", true),
        )
        .with_rule(property_order::NAME, RuleConfig::disabled())
        .with_rule(
            config_naming::NAME,
            RuleConfig::enabled()
                .with("uppercase", false)
                .with("max_length", 50_i64)
                .with("min_prefix_length", 0_i64),
        )
}

fn espidf_profile() -> StyleProfile {
    StyleProfile::new("espidf")
        .with_rule(trailing_whitespace::NAME, RuleConfig::enabled())
        .with_rule(line_length::NAME, RuleConfig::enabled().with("max", 120_i64))
        .with_rule(comment_spacing::NAME, RuleConfig::enabled())
        .with_rule(
            indentation::NAME,
            indent(RuleConfig::enabled(), "spaces", 4, true),
        )
        .with_rule(
            help_indent::NAME,
            indent(RuleConfig::enabled(), "spaces", 4, true).with("help_indent", 4_i64),
        )
        .with_rule(
            blank_lines::NAME,
            RuleConfig::disabled()
                .with("max_consecutive", 1_i64)
                .with("allow_inside_entries", true),
        )
        .with_rule(property_order::NAME, RuleConfig::disabled())
        .with_rule(
            config_naming::NAME,
            RuleConfig::enabled()
                .with("uppercase", true)
                .with("max_length", 50_i64)
                .with("min_prefix_length", 3_i64),
        )
}
