//! Rule to limit line length.
//!
//! # Rationale
//!
//! Long lines are hard to read in menuconfig-style tooling and side-by-side
//! diffs. Length is counted in characters, per physical line.
//!
//! # Configuration
//!
//! - `max`: Maximum number of characters per line (default: 100)

use kconfig_lint_core::{
    ConfigError, FileContext, LineRule, Rule, RuleConfig, RuleResult, Severity, Violation,
};

/// Rule code for line-length.
pub const CODE: &str = "KL002";

/// Rule name for line-length.
pub const NAME: &str = "line-length";

/// Default maximum line length.
pub const DEFAULT_MAX: usize = 100;

/// Limits the number of characters per line.
#[derive(Debug, Clone)]
pub struct LineLength {
    max: usize,
    severity: Severity,
}

impl Default for LineLength {
    fn default() -> Self {
        Self::new()
    }
}

impl LineLength {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max: DEFAULT_MAX,
            severity: Severity::Warning,
        }
    }

    /// Creates the rule from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `max` is not a non-negative integer.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Ok(Self::new().max(config.get_usize(NAME, "max", DEFAULT_MAX)?))
    }

    /// Sets the maximum line length.
    #[must_use]
    pub fn max(mut self, max: usize) -> Self {
        self.max = max;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for LineLength {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Limits the number of characters per line"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }
}

impl LineRule for LineLength {
    fn check_lines(&self, ctx: &FileContext<'_>) -> RuleResult {
        let mut violations = Vec::new();

        for (index, line) in ctx.lines().iter().enumerate() {
            for physical in line.physical_lines() {
                let length = physical.text.chars().count();
                if length <= self.max {
                    continue;
                }
                let mut location = ctx.location_at(index, physical.start, physical.text.len());
                location.column = 1;
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        location,
                        format!("Line exceeds {} characters ({length})", self.max),
                    )
                    .with_help("Split the line with a `\\` continuation or shorten it"),
                );
            }
        }

        Ok(violations)
    }
}
