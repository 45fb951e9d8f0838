//! Rule to enforce the indentation of help text.
//!
//! # Rationale
//!
//! Help text is prose shown verbatim by configuration front-ends. It must sit
//! a fixed distance inside the `help` keyword, while lists and wrapped lines
//! keep their alignment relative to the rest of the block.
//!
//! # Expected Indentation
//!
//! Each text line gets the property indentation of its entry, then
//! `help_indent` spaces, then whatever extra columns it had relative to the
//! least-indented line of its block. Blank lines are exempt.
//!
//! # Configuration
//!
//! - `style`, `width`, `indent_sub_items`: as for `indentation`
//! - `help_indent`: Spaces between the `help` keyword and its text (default: 2)

use kconfig_lint_core::utils::{describe_indent, IndentSpec};
use kconfig_lint_core::{
    visual_width, ConfigError, Entry, EntryRule, FileContext, Fix, Rule, RuleConfig, RuleResult,
    Severity, Violation,
};

/// Rule code for help-indent.
pub const CODE: &str = "KL005";

/// Rule name for help-indent.
pub const NAME: &str = "help-indent";

/// Default number of spaces between the `help` keyword and its text.
pub const DEFAULT_HELP_INDENT: usize = 2;

/// Enforces the indentation of help text lines.
#[derive(Debug, Clone)]
pub struct HelpIndent {
    spec: IndentSpec,
    help_indent: usize,
    severity: Severity,
}

impl Default for HelpIndent {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpIndent {
    /// Creates a new rule with default settings (tab plus two spaces).
    #[must_use]
    pub fn new() -> Self {
        Self {
            spec: IndentSpec::tabs(),
            help_indent: DEFAULT_HELP_INDENT,
            severity: Severity::Warning,
        }
    }

    /// Creates the rule from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error for invalid indentation options or a `help_indent`
    /// of zero.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let help_indent = config.get_usize(NAME, "help_indent", DEFAULT_HELP_INDENT)?;
        if help_indent == 0 {
            return Err(ConfigError::InvalidOption {
                rule: NAME.to_string(),
                key: "help_indent".to_string(),
                message: "must be at least 1".to_string(),
            });
        }
        Ok(Self::new()
            .spec(IndentSpec::from_config(NAME, config)?)
            .help_indent(help_indent))
    }

    /// Sets the indentation style of the enclosing entries.
    #[must_use]
    pub fn spec(mut self, spec: IndentSpec) -> Self {
        self.spec = spec;
        self
    }

    /// Sets the number of spaces between the keyword and its text.
    #[must_use]
    pub fn help_indent(mut self, help_indent: usize) -> Self {
        self.help_indent = help_indent;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for HelpIndent {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Enforces the indentation of help text"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }
}

impl EntryRule for HelpIndent {
    fn check_entry(&self, ctx: &FileContext<'_>, entry: &Entry) -> RuleResult {
        let Some(help) = &entry.help else {
            return Ok(Vec::new());
        };
        let text_lines: Vec<usize> = help
            .lines
            .clone()
            .filter(|&i| !ctx.line(i).is_blank())
            .collect();
        let Some(base_width) = text_lines
            .iter()
            .map(|&i| ctx.line(i).indent_width())
            .min()
        else {
            return Ok(Vec::new());
        };

        let mut base = self.spec.help_prefix(entry);
        base.extend(std::iter::repeat(' ').take(self.help_indent));

        let mut violations = Vec::new();
        for index in text_lines {
            let line = ctx.line(index);
            let found = line.indent();
            let extra = visual_width(found) - base_width;
            let mut expected = base.clone();
            expected.extend(std::iter::repeat(' ').take(extra));
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
                    format!(
                        "Help text should be indented with {}",
                        describe_indent(&base)
                    ),
                )
                .with_help(format!("Indent this line with {}", describe_indent(&expected)))
                .with_fix(Fix::replace(range.start, range.end, expected)),
            );
        }

        Ok(violations)
    }
}
