//! Rule to require a space after `#` in comments.
//!
//! # Rationale
//!
//! `# Comment` reads better than `#Comment` and matches the style of the
//! upstream Kconfig trees.
//!
//! # Exemptions
//!
//! - A lone `#` (or `##`) with nothing after it
//! - Shebang-like `#!` lines
//! - Banner lines made only of `#`, `-`, `=`, `*`, `~` and `_`
//! - `#` lines inside help text, which are prose
//!
//! # Fix
//!
//! Inserts a single space after the leading run of `#`.

use kconfig_lint_core::{
    FileContext, Fix, LineRole, LineRule, Rule, RuleResult, Severity, Violation,
};

/// Rule code for comment-spacing.
pub const CODE: &str = "KL003";

/// Rule name for comment-spacing.
pub const NAME: &str = "comment-spacing";

const BANNER_CHARS: &[char] = &['#', '-', '=', '*', '~', '_'];

/// Requires a space after the `#` of full-line comments.
#[derive(Debug, Clone)]
pub struct CommentSpacing {
    severity: Severity,
}

impl Default for CommentSpacing {
    fn default() -> Self {
        Self::new()
    }
}

impl CommentSpacing {
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

impl Rule for CommentSpacing {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires a space after `#` in comments"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }
}

/// Returns the byte length of the leading `#` run if the comment needs a
/// space after it.
fn missing_space(content: &str) -> Option<usize> {
    let rest = content.trim_start_matches('#');
    let hashes = content.len() - rest.len();
    let exempt = hashes == 0
        || rest.is_empty()
        || rest.starts_with(char::is_whitespace)
        || rest.starts_with('!')
        || rest.chars().all(|c| BANNER_CHARS.contains(&c));
    (!exempt).then_some(hashes)
}

impl LineRule for CommentSpacing {
    fn check_lines(&self, ctx: &FileContext<'_>) -> RuleResult {
        let mut violations = Vec::new();

        for (index, line) in ctx.lines().iter().enumerate() {
            if ctx.role(index) != LineRole::Comment {
                continue;
            }
            let Some(hashes) = missing_space(line.content()) else {
                continue;
            };
            let at = line.content_range().start + hashes;
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location(index),
                    "Comment should have a space after #",
                )
                .with_help("Write `# text` instead of `#text`")
                .with_fix(Fix::insert(at, " ")),
            );
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
        CommentSpacing::new()
            .check_lines(&FileContext::new(&tree))
            .unwrap()
    }

    #[test]
    fn test_detects_missing_space() {
        let violations = check_code("#Bad comment\n");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("space after #"));
        assert_eq!(violations[0].fix, Some(Fix::insert(1, " ")));
    }

    #[test]
    fn test_indented_and_double_hash() {
        let violations = check_code("\t##Section\n");
        assert_eq!(violations[0].fix, Some(Fix::insert(3, " ")));
    }

    #[test]
    fn test_exemptions() {
        assert!(check_code("#\n").is_empty());
        assert!(check_code("#!/usr/bin/env kconfig\n").is_empty());
        assert!(check_code("#-----------\n").is_empty());
        assert!(check_code("# fine\n").is_empty());
        assert!(check_code("#\tfine\n").is_empty());
    }

    #[test]
    fn test_help_text_is_prose() {
        let code = "config A\n\tbool\n\thelp\n\t  #not a comment\n";
        assert!(check_code(code).is_empty());
    }
}
