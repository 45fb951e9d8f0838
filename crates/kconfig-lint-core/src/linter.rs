//! Rule engine: runs rules over a parsed file and drives fix mode.

use crate::config::{ConfigError, StyleProfile};
use crate::context::FileContext;
use crate::fixer::{apply_fixes, source_offset, FixConflict, FixError};
use crate::lexer::tokenize;
use crate::parser::{parse, UNMATCHED_CLOSER, UNTERMINATED_BLOCK};
use crate::registry::Registry;
use crate::rule::{RuleBox, RuleError, RuleResult};
use crate::syntax::SyntaxTree;
use crate::types::{Fix, Location, Severity, Violation};
use crate::utils::allowance::{AllowCheck, Allowances};

use std::any::Any;
use std::collections::BTreeMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::{debug, info, warn};

/// Rule name of isolated rule failures.
pub const INTERNAL_ERROR: &str = "internal-error";
/// Rule code of isolated rule failures.
pub const INTERNAL_ERROR_CODE: &str = "KL900";
/// Rule name of conflicting fixes.
pub const FIX_CONFLICT: &str = "fix-conflict";
/// Rule code of conflicting fixes.
pub const FIX_CONFLICT_CODE: &str = "KL901";
/// Upper bound on check-and-apply rounds in fix mode.
pub const MAX_FIX_PASSES: usize = 10;

/// Names reported by the parser and the engine rather than by rules.
pub const BUILTIN_CHECKS: [&str; 4] = [
    UNMATCHED_CLOSER,
    UNTERMINATED_BLOCK,
    INTERNAL_ERROR,
    FIX_CONFLICT,
];

/// Builder for configuring a [`Linter`].
#[derive(Debug, Default)]
pub struct LinterBuilder {
    rules: Vec<RuleBox>,
    severities: BTreeMap<String, Severity>,
}

impl LinterBuilder {
    /// Creates a new builder with no rules.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a rule. Rules run in the order they are added.
    #[must_use]
    pub fn rule(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Overrides the severity of every violation reported under `rule`.
    #[must_use]
    pub fn severity(mut self, rule: impl Into<String>, severity: Severity) -> Self {
        self.severities.insert(rule.into(), severity);
        self
    }

    /// Builds the linter.
    #[must_use]
    pub fn build(self) -> Linter {
        Linter {
            rules: self.rules,
            severities: self.severities,
        }
    }
}

/// Immutable set of configured rules, shareable across threads.
///
/// Use [`Linter::builder()`] or [`Linter::from_profile`] to construct an
/// instance.
#[derive(Debug)]
pub struct Linter {
    rules: Vec<RuleBox>,
    severities: BTreeMap<String, Severity>,
}

/// Result of [`Linter::fix`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Corrected text, or `None` when fixes conflicted.
    pub output: Option<String>,
    /// Violations that remain: report-only ones after fixing, or those of
    /// the original text plus `fix-conflict` entries on conflict.
    pub violations: Vec<Violation>,
    /// Number of passes that applied fixes.
    pub passes: usize,
    /// Number of fixes applied over all passes.
    pub fixes_applied: usize,
}

impl FixOutcome {
    /// True if fixes conflicted and no output was produced.
    #[must_use]
    pub fn is_conflicted(&self) -> bool {
        self.output.is_none()
    }

    /// True if the output differs from `original`.
    #[must_use]
    pub fn is_changed(&self, original: &str) -> bool {
        self.output.as_deref().is_some_and(|out| out != original)
    }
}

impl Linter {
    /// Creates a new builder for configuring a linter.
    #[must_use]
    pub fn builder() -> LinterBuilder {
        LinterBuilder::new()
    }

    /// Instantiates every rule of `registry` enabled in `profile`, in
    /// registry order.
    ///
    /// # Errors
    ///
    /// Returns an error if a rule rejects its parameters.
    pub fn from_profile(registry: &Registry, profile: &StyleProfile) -> Result<Self, ConfigError> {
        for name in profile.rules.keys() {
            if registry.get(name).is_none() && !BUILTIN_CHECKS.contains(&name.as_str()) {
                warn!("Ignoring unknown rule `{}` in profile `{}`", name, profile.name);
            }
        }

        let mut builder = Self::builder();
        for descriptor in registry.iter() {
            if !profile.is_rule_enabled(descriptor.name) {
                debug!("Skipping disabled rule: {}", descriptor.name);
                continue;
            }
            let config = profile
                .rule_config(descriptor.name)
                .cloned()
                .unwrap_or_default();
            builder = builder.rule((descriptor.build)(&config)?);
        }
        for name in profile.rules.keys() {
            if let Some(severity) = profile.rule_severity(name) {
                builder = builder.severity(name.clone(), severity);
            }
        }

        let linter = builder.build();
        debug!(
            "Linter ready with {} rule(s) from profile `{}`",
            linter.rule_count(),
            profile.name
        );
        Ok(linter)
    }

    /// Returns the number of configured rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Names of the configured rules, in execution order.
    pub fn rule_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.rules.iter().map(RuleBox::name)
    }

    /// Tokenizes, parses and checks `text`.
    ///
    /// Violations are sorted by line, then rule name; the sort is stable.
    #[must_use]
    pub fn check(&self, text: &str) -> Vec<Violation> {
        let (tree, mut violations) = parse(tokenize(text));
        violations.extend(self.evaluate(&tree));

        for v in &mut violations {
            if let Some(severity) = self.severities.get(&v.rule) {
                v.severity = *severity;
            }
        }

        let allowances = Allowances::collect(&tree);
        if !allowances.is_empty() {
            violations.retain(|v| match allowances.check(v.location.line, &v.rule) {
                AllowCheck::Denied => true,
                allowed => {
                    debug!(
                        "Allowed {} at line {} ({})",
                        v.rule,
                        v.location.line,
                        allowed.reason().unwrap_or("no reason given")
                    );
                    false
                }
            });
        }

        violations.sort_by(|a, b| {
            a.location
                .line
                .cmp(&b.location.line)
                .then_with(|| a.rule.cmp(&b.rule))
        });
        violations
    }

    /// Runs every rule over a parsed file.
    ///
    /// A rule that fails or panics on one node is reported as an
    /// `internal-error` violation for that node; evaluation continues.
    #[must_use]
    pub fn evaluate(&self, tree: &SyntaxTree<'_>) -> Vec<Violation> {
        let ctx = FileContext::new(tree);
        let mut violations = Vec::new();

        for rule in &self.rules {
            match rule {
                RuleBox::Entry(r) => {
                    for entry in tree.walk() {
                        let result = guarded(|| r.check_entry(&ctx, entry));
                        collect(rule, result, &ctx, entry.start, &mut violations);
                    }
                }
                RuleBox::Siblings(r) => {
                    for (parent, siblings) in tree.sibling_lists() {
                        let anchor = parent.map_or(0, |p| p.start);
                        let result = guarded(|| r.check_siblings(&ctx, parent, siblings));
                        collect(rule, result, &ctx, anchor, &mut violations);
                    }
                }
                RuleBox::Lines(r) => {
                    let result = guarded(|| r.check_lines(&ctx));
                    collect(rule, result, &ctx, 0, &mut violations);
                }
            }
        }

        violations
    }

    /// Checks and fixes `text` until no fixable violation remains.
    ///
    /// Each pass applies all fixes of the current text at once. The loop ends
    /// when no fix is left, when a pass changes nothing, or after
    /// [`MAX_FIX_PASSES`] passes. On a fix conflict no output is produced and
    /// the violations of the original text are returned, plus one
    /// `fix-conflict` violation per conflicting pair.
    #[must_use]
    pub fn fix(&self, text: &str) -> FixOutcome {
        let mut current = text.to_string();
        let mut passes = 0;
        let mut fixes_applied = 0;
        let mut applied: Vec<Vec<Fix>> = Vec::new();

        loop {
            let violations = self.check(&current);
            let fixes: Vec<_> = violations.iter().filter_map(|v| v.fix.clone()).collect();

            if fixes.is_empty() || passes == MAX_FIX_PASSES {
                if !fixes.is_empty() {
                    warn!(
                        "Fixes did not converge after {} passes; {} fix(es) left",
                        passes,
                        fixes.len()
                    );
                }
                return FixOutcome {
                    output: Some(current),
                    violations,
                    passes,
                    fixes_applied,
                };
            }

            match apply_fixes(&current, &fixes) {
                Ok(next) if next == current => {
                    warn!("Fix pass {} made no progress", passes + 1);
                    return FixOutcome {
                        output: Some(current),
                        violations,
                        passes,
                        fixes_applied,
                    };
                }
                Ok(next) => {
                    passes += 1;
                    fixes_applied += fixes.len();
                    debug!("Fix pass {} applied {} fix(es)", passes, fixes.len());
                    applied.push(fixes);
                    current = next;
                }
                Err(err) => {
                    warn!("Fix pass {} failed: {}", passes + 1, err);
                    let mut reported = if passes == 0 {
                        violations.clone()
                    } else {
                        self.check(text)
                    };
                    reported.extend(conflict_violations(&err, &violations, &applied, text));
                    reported.sort_by(|a, b| {
                        a.location
                            .line
                            .cmp(&b.location.line)
                            .then_with(|| a.rule.cmp(&b.rule))
                    });
                    info!("Leaving text unchanged after fix conflict");
                    return FixOutcome {
                        output: None,
                        violations: reported,
                        passes,
                        fixes_applied: 0,
                    };
                }
            }
        }
    }
}

fn guarded<F: FnOnce() -> RuleResult>(run: F) -> RuleResult {
    match catch_unwind(AssertUnwindSafe(run)) {
        Ok(result) => result,
        Err(payload) => Err(RuleError::Panic(panic_message(payload.as_ref()))),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string())
}

fn collect(
    rule: &RuleBox,
    result: RuleResult,
    ctx: &FileContext<'_>,
    anchor: usize,
    violations: &mut Vec<Violation>,
) {
    match result {
        Ok(found) => violations.extend(found),
        Err(err) => {
            warn!("Rule {} failed: {}", rule.name(), err);
            let location = if ctx.lines().is_empty() {
                Location::new(1, 1)
            } else {
                ctx.location(anchor)
            };
            violations.push(
                Violation::new(
                    INTERNAL_ERROR_CODE,
                    INTERNAL_ERROR,
                    Severity::Error,
                    location,
                    format!("Rule `{}` failed: {err}", rule.name()),
                )
                .with_help("This is a bug in the rule; other rules still ran"),
            );
        }
    }
}

/// One `fix-conflict` violation per conflicting pair, located in the original
/// text.
///
/// `applied` holds the fixes of every pass completed before the conflict;
/// conflict offsets are mapped back through them.
fn conflict_violations(
    err: &FixError,
    violations: &[Violation],
    applied: &[Vec<Fix>],
    original: &str,
) -> Vec<Violation> {
    let conflicts: &[FixConflict] = match err {
        FixError::Conflict(conflicts) => conflicts,
        FixError::InvalidRange { .. } => &[],
    };
    let rule_of = |fix: &Fix| {
        violations
            .iter()
            .find(|v| v.fix.as_ref() == Some(fix))
            .map_or("unknown", |v| v.rule.as_str())
    };

    if conflicts.is_empty() {
        return vec![Violation::new(
            FIX_CONFLICT_CODE,
            FIX_CONFLICT,
            Severity::Error,
            Location::new(1, 1),
            format!("Fixes could not be applied: {err}"),
        )];
    }

    let to_original = |offset: usize| {
        applied
            .iter()
            .rev()
            .fold(offset, |offset, fixes| source_offset(fixes, offset))
            .min(original.len())
    };

    conflicts
        .iter()
        .map(|c| {
            let start = to_original(c.second.start);
            let end = to_original(c.second.end).max(start);
            Violation::new(
                FIX_CONFLICT_CODE,
                FIX_CONFLICT,
                Severity::Error,
                location_of(original, start).with_span(start, end - start),
                format!(
                    "Fixes from `{}` and `{}` overlap; file left unchanged",
                    rule_of(&c.first),
                    rule_of(&c.second)
                ),
            )
            .with_help("Fix one of the violations by hand and run again")
        })
        .collect()
}

/// Line and column of a byte offset in `text`.
fn location_of(text: &str, offset: usize) -> Location {
    let before = text.get(..offset).unwrap_or(text);
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    Location::new(
        before.matches('\n').count() + 1,
        before[line_start..].chars().count() + 1,
    )
}
