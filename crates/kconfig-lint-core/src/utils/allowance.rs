//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! # kconfig-lint: allow(line-length) reason="generated URL"
//! ```
//!
//! A directive suppresses the named rules on its own line and on the
//! following logical line. `all` suppresses every rule.

use crate::syntax::{LineRole, SyntaxTree};
use std::collections::{BTreeMap, HashSet};

/// Result of checking for an allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AllowDirective {
    /// Rule names that are allowed.
    pub rules: HashSet<String>,
    /// Optional reason for the allowance.
    pub reason: Option<String>,
}

impl AllowDirective {
    fn covers(&self, rule: &str) -> bool {
        self.rules.contains(rule) || self.rules.contains("all")
    }
}

/// Allow directives of one file, keyed by physical line number.
#[derive(Debug, Clone, Default)]
pub struct Allowances {
    /// Directive in effect for each covered physical line.
    by_line: BTreeMap<usize, AllowDirective>,
}

impl Allowances {
    /// Collects the directives of a parsed file.
    #[must_use]
    pub fn collect(tree: &SyntaxTree<'_>) -> Self {
        let mut by_line = BTreeMap::new();
        for (index, line) in tree.lines.iter().enumerate() {
            if tree.role(index) != LineRole::Comment {
                continue;
            }
            let Some(directive) = parse_allow_directive(line.content()) else {
                continue;
            };
            by_line.insert(line.number, directive.clone());
            if let Some(next) = tree.lines.get(index + 1) {
                for number in next.number..=next.last_number {
                    by_line.insert(number, directive.clone());
                }
            }
        }
        Self { by_line }
    }

    /// True if the file has no directives.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_line.is_empty()
    }

    /// Checks whether `rule` is allowed on physical line `line`.
    #[must_use]
    pub fn check(&self, line: usize, rule: &str) -> AllowCheck {
        match self.by_line.get(&line) {
            Some(directive) if directive.covers(rule) => AllowCheck::Allowed {
                reason: directive.reason.clone(),
            },
            _ => AllowCheck::Denied,
        }
    }
}

/// Parses an allowance directive from a comment line.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    let comment_content = line.trim().strip_prefix('#')?.trim();

    let directive = comment_content.strip_prefix("kconfig-lint:")?.trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()));

    Some(AllowDirective { rules, reason })
}
