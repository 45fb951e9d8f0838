//! Indentation style shared by the indentation-related rules.

use crate::config::{ConfigError, RuleConfig};
use crate::syntax::{Entry, EntryKind};
use std::str::FromStr;

/// Character used for indentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndentStyle {
    /// One or more tabs per level.
    Tabs,
    /// A fixed number of spaces per level.
    Spaces,
}

impl IndentStyle {
    /// Indentation character.
    #[must_use]
    pub fn as_char(self) -> char {
        match self {
            Self::Tabs => '\t',
            Self::Spaces => ' ',
        }
    }

    /// Configuration name (`"tabs"` or `"spaces"`).
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Tabs => "tabs",
            Self::Spaces => "spaces",
        }
    }
}

impl FromStr for IndentStyle {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "tabs" | "tab" => Ok(Self::Tabs),
            "spaces" | "space" => Ok(Self::Spaces),
            other => Err(format!("expected `tabs` or `spaces`, got `{other}`")),
        }
    }
}

/// How deep each structural level is indented.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndentSpec {
    /// Indentation character.
    pub style: IndentStyle,
    /// Characters per level.
    pub width: usize,
    /// Whether entries nested in containers are indented by their depth.
    pub indent_sub_items: bool,
}

impl IndentSpec {
    /// One tab per level, entries not nested.
    #[must_use]
    pub fn tabs() -> Self {
        Self {
            style: IndentStyle::Tabs,
            width: 1,
            indent_sub_items: false,
        }
    }

    /// `width` spaces per level, entries not nested.
    #[must_use]
    pub fn spaces(width: usize) -> Self {
        Self {
            style: IndentStyle::Spaces,
            width,
            indent_sub_items: false,
        }
    }

    /// Enables or disables nesting indentation.
    #[must_use]
    pub fn nested(mut self, indent_sub_items: bool) -> Self {
        self.indent_sub_items = indent_sub_items;
        self
    }

    /// Reads `style`, `width` and `indent_sub_items` from a rule configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidOption`] for an unknown style or a zero
    /// width.
    pub fn from_config(rule: &str, config: &RuleConfig) -> Result<Self, ConfigError> {
        let invalid = |key: &str, message: String| ConfigError::InvalidOption {
            rule: rule.to_string(),
            key: key.to_string(),
            message,
        };
        let style: IndentStyle = config
            .get_str("style", "tabs")
            .parse()
            .map_err(|e| invalid("style", e))?;
        let default_width = match style {
            IndentStyle::Tabs => 1,
            IndentStyle::Spaces => 4,
        };
        let width = config.get_usize(rule, "width", default_width)?;
        if width == 0 {
            return Err(invalid("width", "must be at least 1".to_string()));
        }
        Ok(Self {
            style,
            width,
            indent_sub_items: config.get_bool("indent_sub_items", false),
        })
    }

    /// Indentation of `level` levels.
    #[must_use]
    pub fn prefix(&self, level: usize) -> String {
        std::iter::repeat(self.style.as_char())
            .take(self.width * level)
            .collect()
    }

    /// Level of entry headers and closers at nesting `depth`.
    #[must_use]
    pub fn header_level(&self, depth: usize) -> usize {
        if self.indent_sub_items {
            depth
        } else {
            0
        }
    }

    /// Indentation of entry headers and closers at nesting `depth`.
    #[must_use]
    pub fn header_prefix(&self, depth: usize) -> String {
        self.prefix(self.header_level(depth))
    }

    /// Indentation of property lines and `help` at nesting `depth`.
    #[must_use]
    pub fn property_prefix(&self, depth: usize) -> String {
        self.prefix(self.header_level(depth) + 1)
    }

    /// Indentation of the `help` keyword of `entry`.
    ///
    /// A free-standing help block is its own header; any other help belongs
    /// to the entry's property region.
    #[must_use]
    pub fn help_prefix(&self, entry: &Entry) -> String {
        if entry.kind == EntryKind::HelpBlock {
            self.header_prefix(entry.depth)
        } else {
            self.property_prefix(entry.depth)
        }
    }
}

/// Describes an indentation string for messages ("1 tab", "tab + 2 spaces").
#[must_use]
pub fn describe_indent(indent: &str) -> String {
    let tabs = indent.chars().take_while(|&c| c == '\t').count();
    let spaces = indent[tabs..].chars().take_while(|&c| c == ' ').count();
    let plural = |n: usize, word: &str| {
        if n == 1 {
            format!("1 {word}")
        } else {
            format!("{n} {word}s")
        }
    };
    match (tabs, spaces) {
        (0, 0) => "no indentation".to_string(),
        (0, s) => plural(s, "space"),
        (t, 0) => plural(t, "tab"),
        (1, s) => format!("tab + {}", plural(s, "space")),
        (t, s) => format!("{} + {}", plural(t, "tab"), plural(s, "space")),
    }
}
