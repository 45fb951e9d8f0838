//! Rule traits for defining lint rules.
//!
//! Every rule implements [`Rule`] for its metadata plus exactly one
//! capability trait, which decides what the engine hands it:
//!
//! - [`EntryRule`]: one tree entry at a time, at every depth;
//! - [`SiblingRule`]: one ordered list of sibling entries at a time;
//! - [`LineRule`]: the logical lines of the whole file, with their roles.

use crate::context::FileContext;
use crate::syntax::Entry;
use crate::types::{Severity, Violation};

/// Common metadata of all rules.
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "indentation").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "KL004").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }
}

/// Result of evaluating a rule on one node.
pub type RuleResult = Result<Vec<Violation>, RuleError>;

/// A rule that inspects one entry.
///
/// # Example
///
/// ```ignore
/// use kconfig_lint_core::{Entry, EntryKind, EntryRule, FileContext, Rule, RuleResult, Violation};
///
/// pub struct NoEmptyMenus;
///
/// impl Rule for NoEmptyMenus {
///     fn name(&self) -> &'static str { "no-empty-menus" }
///     fn code(&self) -> &'static str { "KL050" }
/// }
///
/// impl EntryRule for NoEmptyMenus {
///     fn check_entry(&self, ctx: &FileContext, entry: &Entry) -> RuleResult {
///         if entry.kind == EntryKind::Menu && entry.children.is_empty() {
///             return Ok(vec![Violation::new(
///                 self.code(),
///                 self.name(),
///                 self.default_severity(),
///                 ctx.location(entry.start),
///                 "Menu has no entries",
///             )]);
///         }
///         Ok(Vec::new())
///     }
/// }
/// ```
pub trait EntryRule: Rule {
    /// Checks a single entry. Children are visited separately.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule cannot evaluate this entry; the engine
    /// reports it as an internal error and keeps going.
    fn check_entry(&self, ctx: &FileContext<'_>, entry: &Entry) -> RuleResult;
}

/// A rule that inspects one sibling list.
pub trait SiblingRule: Rule {
    /// Checks the children of `parent`, or the top level when `parent` is
    /// `None`. Called for every container, even one without children.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule cannot evaluate this list.
    fn check_siblings(
        &self,
        ctx: &FileContext<'_>,
        parent: Option<&Entry>,
        siblings: &[Entry],
    ) -> RuleResult;
}

/// A rule that inspects the logical lines of a file.
pub trait LineRule: Rule {
    /// Checks all lines of the file.
    ///
    /// # Errors
    ///
    /// Returns an error if the rule cannot evaluate this file.
    fn check_lines(&self, ctx: &FileContext<'_>) -> RuleResult;
}

/// Which part of the tree a rule receives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// [`EntryRule`]
    Entry,
    /// [`SiblingRule`]
    Siblings,
    /// [`LineRule`]
    Lines,
}

impl std::fmt::Display for Capability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Entry => write!(f, "entry"),
            Self::Siblings => write!(f, "sibling"),
            Self::Lines => write!(f, "line"),
        }
    }
}

/// An instantiated rule of any capability.
pub enum RuleBox {
    /// Per-entry rule.
    Entry(Box<dyn EntryRule>),
    /// Per-sibling-list rule.
    Siblings(Box<dyn SiblingRule>),
    /// Whole-file line rule.
    Lines(Box<dyn LineRule>),
}

impl RuleBox {
    /// Boxes an entry rule.
    #[must_use]
    pub fn entry<R: EntryRule + 'static>(rule: R) -> Self {
        Self::Entry(Box::new(rule))
    }

    /// Boxes a sibling rule.
    #[must_use]
    pub fn siblings<R: SiblingRule + 'static>(rule: R) -> Self {
        Self::Siblings(Box::new(rule))
    }

    /// Boxes a line rule.
    #[must_use]
    pub fn lines<R: LineRule + 'static>(rule: R) -> Self {
        Self::Lines(Box::new(rule))
    }

    /// Rule name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Entry(r) => r.name(),
            Self::Siblings(r) => r.name(),
            Self::Lines(r) => r.name(),
        }
    }

    /// Rule code.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            Self::Entry(r) => r.code(),
            Self::Siblings(r) => r.code(),
            Self::Lines(r) => r.code(),
        }
    }

    /// Capability of the rule.
    #[must_use]
    pub fn capability(&self) -> Capability {
        match self {
            Self::Entry(_) => Capability::Entry,
            Self::Siblings(_) => Capability::Siblings,
            Self::Lines(_) => Capability::Lines,
        }
    }
}

impl std::fmt::Debug for RuleBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleBox")
            .field("name", &self.name())
            .field("capability", &self.capability())
            .finish()
    }
}

/// Failure of a rule while evaluating one node.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The rule met input it cannot handle.
    #[error("{0}")]
    Unsupported(String),

    /// The rule panicked.
    #[error("rule panicked: {0}")]
    Panic(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Location;

    struct TestRule;

    impl Rule for TestRule {
        fn name(&self) -> &'static str {
            "test-rule"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }
        fn description(&self) -> &'static str {
            "A test rule"
        }
    }

    impl LineRule for TestRule {
        fn check_lines(&self, _ctx: &FileContext<'_>) -> RuleResult {
            Ok(vec![Violation::new(
                self.code(),
                self.name(),
                self.default_severity(),
                Location::new(1, 1),
                "Test violation",
            )])
        }
    }

    #[test]
    fn test_rule_trait() {
        let rule = TestRule;
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.code(), "TEST001");
        assert_eq!(rule.default_severity(), Severity::Warning);
    }

    #[test]
    fn test_rule_box_metadata() {
        let rule = RuleBox::lines(TestRule);
        assert_eq!(rule.name(), "test-rule");
        assert_eq!(rule.capability(), Capability::Lines);
        assert_eq!(rule.capability().to_string(), "line");
    }
}
