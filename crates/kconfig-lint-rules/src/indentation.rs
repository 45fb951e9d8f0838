//! Rule to enforce structural indentation.
//!
//! # Rationale
//!
//! Kconfig trees are read by humans far more often than by tools. A single
//! indentation convention per tree keeps entries, their properties and the
//! block structure recognizable at a glance.
//!
//! # Governed Lines
//!
//! - Entry headers and container closers: `depth` levels when
//!   `indent_sub_items` is set, otherwise none
//! - Property lines and the `help` keyword: one level deeper than the header
//!
//! Only the first physical line of a continued line is governed. Comments,
//! help text and unrecognized lines are left alone.
//!
//! # Configuration
//!
//! - `style`: `"tabs"` or `"spaces"` (default: `"tabs"`)
//! - `width`: Characters per level (default: 1 for tabs, 4 for spaces)
//! - `indent_sub_items`: Indent entries nested in containers (default: false)

use kconfig_lint_core::utils::{describe_indent, IndentSpec, IndentStyle};
use kconfig_lint_core::{
    ConfigError, Entry, EntryKind, EntryRule, FileContext, Fix, Rule, RuleConfig, RuleResult,
    Severity, Violation,
};

/// Rule code for indentation.
pub const CODE: &str = "KL004";

/// Rule name for indentation.
pub const NAME: &str = "indentation";

/// Enforces the indentation of headers, properties and closers.
#[derive(Debug, Clone)]
pub struct Indentation {
    spec: IndentSpec,
    severity: Severity,
}

impl Default for Indentation {
    fn default() -> Self {
        Self::new()
    }
}

impl Indentation {
    /// Creates a new rule with default settings (one tab, no nesting).
    #[must_use]
    pub fn new() -> Self {
        Self {
            spec: IndentSpec::tabs(),
            severity: Severity::Warning,
        }
    }

    /// Creates the rule from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for an unknown style or an invalid width.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Ok(Self::new().spec(IndentSpec::from_config(NAME, config)?))
    }

    /// Sets the indentation style.
    #[must_use]
    pub fn spec(mut self, spec: IndentSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Lines of `entry` governed by this rule, with their expected indentation.
    fn governed_lines(&self, entry: &Entry) -> Vec<(usize, String)> {
        let header = self.spec.header_prefix(entry.depth);
        let property = self.spec.property_prefix(entry.depth);

        let mut lines = Vec::new();
        match entry.kind {
            EntryKind::RawBlock => {}
            EntryKind::HelpBlock => lines.push((entry.start, header)),
            EntryKind::Config
            | EntryKind::MenuConfig
            | EntryKind::Choice
            | EntryKind::Menu
            | EntryKind::If
            | EntryKind::Source
            | EntryKind::Comment
            | EntryKind::MainMenu => {
                lines.push((entry.start, header.clone()));
                lines.extend(entry.properties.iter().map(|p| (p.line, property.clone())));
                if let Some(help) = &entry.help {
                    lines.push((help.keyword_line, self.spec.help_prefix(entry)));
                }
                if let Some(closer) = entry.closer {
                    lines.push((closer, header));
                }
            }
        }
        lines
    }

    fn message(&self, found: &str, expected: &str) -> String {
        let tabs = found.contains('\t');
        let spaces = found.contains(' ');
        if tabs && spaces {
            return "Mixed tabs and spaces in indentation".to_string();
        }
        match self.spec.style {
            IndentStyle::Tabs if spaces => "Use tabs for indentation".to_string(),
            IndentStyle::Spaces if tabs => "Use spaces for indentation".to_string(),
            IndentStyle::Spaces if found.len() % self.spec.width != 0 => format!(
                "Indentation must be a multiple of {} spaces",
                self.spec.width
            ),
            _ => format!(
                "Expected {} of indentation, found {}",
                describe_indent(expected),
                describe_indent(found)
            ),
        }
    }
}

impl Rule for Indentation {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Enforces the indentation of entries, properties and closers"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }
}

impl EntryRule for Indentation {
    fn check_entry(&self, ctx: &FileContext<'_>, entry: &Entry) -> RuleResult {
        let mut violations = Vec::new();

        for (index, expected) in self.governed_lines(entry) {
            let line = ctx.line(index);
            let found = line.indent();
            if found == expected {
                continue;
            }
            let range = line.indent_range();
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location_at(index, range.start, range.len()),
                    self.message(found, &expected),
                )
                .with_help(format!("Indent this line with {}", describe_indent(&expected)))
                .with_fix(Fix::replace(range.start, range.end, expected)),
            );
        }

        Ok(violations)
    }
}
