//! Rule to forbid trailing whitespace.
//!
//! # Rationale
//!
//! Trailing spaces and tabs are invisible in most editors and produce noisy
//! diffs. Lines that contain only whitespace are reported here as well.
//!
//! # Fix
//!
//! Deletes the trailing whitespace of each physical line.

use kconfig_lint_core::{
    is_indent_char, FileContext, Fix, LineRule, Rule, RuleResult, Severity, Violation,
};

/// Rule code for trailing-whitespace.
pub const CODE: &str = "KL001";

/// Rule name for trailing-whitespace.
pub const NAME: &str = "trailing-whitespace";

/// Forbids spaces and tabs at the end of a line.
#[derive(Debug, Clone)]
pub struct TrailingWhitespace {
    severity: Severity,
}

impl Default for TrailingWhitespace {
    fn default() -> Self {
        Self::new()
    }
}

impl TrailingWhitespace {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for TrailingWhitespace {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Forbids trailing spaces and tabs"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }
}

impl LineRule for TrailingWhitespace {
    fn check_lines(&self, ctx: &FileContext<'_>) -> RuleResult {
        let mut violations = Vec::new();

        for (index, line) in ctx.lines().iter().enumerate() {
            for physical in line.physical_lines() {
                let trimmed = physical.text.trim_end_matches(is_indent_char);
                if trimmed.len() == physical.text.len() {
                    continue;
                }
                let start = physical.start + trimmed.len();
                let end = physical.start + physical.text.len();
                violations.push(
                    Violation::new(
                        CODE,
                        NAME,
                        self.severity,
                        ctx.location_at(index, start, end - start),
                        "Trailing whitespace",
                    )
                    .with_help("Remove the spaces and tabs at the end of the line")
                    .with_fix(Fix::delete(start, end)),
                );
            }
        }

        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kconfig_lint_core::{parse, tokenize};

    fn check_code(code: &str) -> Vec<Violation> {
        let (tree, _) = parse(tokenize(code));
        TrailingWhitespace::new()
            .check_lines(&FileContext::new(&tree))
            .unwrap()
    }

    #[test]
    fn test_detects_trailing_spaces() {
        let violations = check_code("config TEST\n\tbool \"Test\"  \n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 2);
        assert_eq!(violations[0].location.column, 13);
        assert_eq!(violations[0].fix, Some(Fix::delete(24, 26)));
    }

    #[test]
    fn test_whitespace_only_line() {
        let violations = check_code("config A\n \t\nconfig B\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].fix, Some(Fix::delete(9, 11)));
    }

    #[test]
    fn test_each_physical_line_of_continuation() {
        let violations = check_code("\tdepends on A \\\n\t\tB \r\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 2);

        let violations = check_code("\tdepends on A  \\ \n\t\tB\n");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 1);
    }

    #[test]
    fn test_clean_file() {
        assert!(check_code("config A\n\tbool\r\n").is_empty());
    }
}
