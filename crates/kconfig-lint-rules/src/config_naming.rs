//! Rule to enforce naming conventions for configuration symbols.
//!
//! # Rationale
//!
//! Symbol names end up as C macros and in `.config` files. Consistent case,
//! bounded length and a component prefix keep them unambiguous across a
//! large tree.
//!
//! # Checks
//!
//! Applies to `config`, `menuconfig` and named `choice` entries:
//!
//! - uppercase only, when `uppercase` is set
//! - at most `max_length` characters
//! - the prefix (text before the first `_`) is at least `min_prefix_length`
//!   characters; names without `_` have no prefix and are not checked
//! - starts with one of `prefixes`, when that list is not empty
//!
//! Report-only: renaming a symbol would break references elsewhere.
//!
//! # Configuration
//!
//! - `uppercase`: Require uppercase names (default: false)
//! - `max_length`: Maximum name length (default: 50)
//! - `min_prefix_length`: Minimum prefix length, 0 to disable (default: 0)
//! - `prefixes`: Allowed name prefixes (default: any)

use kconfig_lint_core::{
    lex_line, ConfigError, Entry, EntryRule, FileContext, Rule, RuleConfig, RuleResult, Severity,
    TokenKind, Violation,
};

/// Rule code for config-naming.
pub const CODE: &str = "KL008";

/// Rule name for config-naming.
pub const NAME: &str = "config-naming";

/// Default maximum name length.
pub const DEFAULT_MAX_LENGTH: usize = 50;

/// Enforces naming conventions for configuration symbols.
#[derive(Debug, Clone)]
pub struct ConfigNaming {
    uppercase: bool,
    max_length: usize,
    min_prefix_length: usize,
    prefixes: Vec<String>,
    severity: Severity,
}

impl Default for ConfigNaming {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigNaming {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            uppercase: false,
            max_length: DEFAULT_MAX_LENGTH,
            min_prefix_length: 0,
            prefixes: Vec::new(),
            severity: Severity::Warning,
        }
    }

    /// Creates the rule from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a length is not a non-negative integer.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            uppercase: config.get_bool("uppercase", false),
            max_length: config.get_usize(NAME, "max_length", DEFAULT_MAX_LENGTH)?,
            min_prefix_length: config.get_usize(NAME, "min_prefix_length", 0)?,
            prefixes: config.get_str_array("prefixes"),
            severity: Severity::Warning,
        })
    }

    /// Requires uppercase names.
    #[must_use]
    pub fn uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    /// Sets the maximum name length.
    #[must_use]
    pub fn max_length(mut self, max_length: usize) -> Self {
        self.max_length = max_length;
        self
    }

    /// Sets the minimum prefix length.
    #[must_use]
    pub fn min_prefix_length(mut self, min: usize) -> Self {
        self.min_prefix_length = min;
        self
    }

    /// Sets the allowed prefixes.
    #[must_use]
    pub fn prefixes(mut self, prefixes: Vec<String>) -> Self {
        self.prefixes = prefixes;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn problems(&self, name: &str) -> Vec<String> {
        let mut problems = Vec::new();

        if self.uppercase && name.chars().any(char::is_lowercase) {
            problems.push(format!("Config name `{name}` must be uppercase"));
        }

        let length = name.chars().count();
        if length > self.max_length {
            problems.push(format!(
                "Config name `{name}` exceeds {} characters ({length})",
                self.max_length
            ));
        }

        if self.min_prefix_length > 0 {
            if let Some((prefix, _)) = name.split_once('_') {
                if prefix.chars().count() < self.min_prefix_length {
                    problems.push(format!(
                        "Config name prefix `{prefix}` must be at least {} characters",
                        self.min_prefix_length
                    ));
                }
            }
        }

        let prefixed = self.prefixes.iter().any(|p| name.starts_with(p.as_str()));
        if !self.prefixes.is_empty() && !prefixed {
            problems.push(format!(
                "Config name `{name}` must start with one of: {}",
                self.prefixes.join(", ")
            ));
        }

        problems
    }
}

impl Rule for ConfigNaming {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Enforces naming conventions for configuration symbols"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }
}

impl EntryRule for ConfigNaming {
    fn check_entry(&self, ctx: &FileContext<'_>, entry: &Entry) -> RuleResult {
        if !entry.kind.is_symbol() {
            return Ok(Vec::new());
        }
        let line = ctx.line(entry.start);
        let Some(identifier) = lex_line(line)
            .into_iter()
            .find(|t| t.kind == TokenKind::Identifier)
        else {
            return Ok(Vec::new());
        };
        let name = identifier.text(line);
        let location = ctx.location_at(entry.start, identifier.span.start, identifier.span.len());

        Ok(self
            .problems(name)
            .into_iter()
            .map(|message| {
                Violation::new(CODE, NAME, self.severity, location.clone(), message)
                    .with_help("Rename the symbol and every reference to it")
            })
            .collect())
    }
}
