//! Rule to control blank lines.
//!
//! # Rationale
//!
//! Blank lines separate entries. Too many of them scatter a file, and blank
//! lines between the properties of one entry make the entry look like two.
//!
//! # Regions
//!
//! Every run of empty lines falls into exactly one region of one sibling list:
//!
//! - inside an entry's header and property region: not allowed unless
//!   `allow_inside_entries`, then at most `max_consecutive`
//! - the whole gap between two consecutive siblings, when it holds nothing
//!   but empty lines: exactly `between_entries` (if set)
//! - everywhere else, help text included: at most `max_consecutive`
//!
//! Lines holding only spaces or tabs are not empty here; they belong to
//! `trailing-whitespace`.
//!
//! # Configuration
//!
//! - `max_consecutive`: Longest allowed run of empty lines (default: 1)
//! - `between_entries`: Exact number of empty lines between siblings
//!   (default: not enforced)
//! - `top_level_only`: Enforce `between_entries` only at the top level
//!   (default: true)
//! - `allow_inside_entries`: Allow empty lines between properties
//!   (default: false)

use kconfig_lint_core::{
    ConfigError, Entry, EntryKind, FileContext, Fix, Rule, RuleConfig, RuleResult, Severity,
    SiblingRule, Violation,
};
use std::ops::Range;

/// Rule code for blank-lines.
pub const CODE: &str = "KL006";

/// Rule name for blank-lines.
pub const NAME: &str = "blank-lines";

/// Controls the number and placement of empty lines.
#[derive(Debug, Clone)]
pub struct BlankLines {
    max_consecutive: usize,
    between_entries: Option<usize>,
    top_level_only: bool,
    allow_inside_entries: bool,
    severity: Severity,
}

impl Default for BlankLines {
    fn default() -> Self {
        Self::new()
    }
}

impl BlankLines {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            max_consecutive: 1,
            between_entries: None,
            top_level_only: true,
            allow_inside_entries: false,
            severity: Severity::Warning,
        }
    }

    /// Creates the rule from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if a count is not a non-negative integer.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        let between_entries = if config.options.contains_key("between_entries") {
            Some(config.get_usize(NAME, "between_entries", 1)?)
        } else {
            None
        };
        Ok(Self {
            max_consecutive: config.get_usize(NAME, "max_consecutive", 1)?,
            between_entries,
            top_level_only: config.get_bool("top_level_only", true),
            allow_inside_entries: config.get_bool("allow_inside_entries", false),
            severity: Severity::Warning,
        })
    }

    /// Sets the longest allowed run of empty lines.
    #[must_use]
    pub fn max_consecutive(mut self, max: usize) -> Self {
        self.max_consecutive = max;
        self
    }

    /// Requires exactly `count` empty lines between siblings.
    #[must_use]
    pub fn between_entries(mut self, count: usize) -> Self {
        self.between_entries = Some(count);
        self
    }

    /// Sets whether `between_entries` applies to the top level only.
    #[must_use]
    pub fn top_level_only(mut self, top_level_only: bool) -> Self {
        self.top_level_only = top_level_only;
        self
    }

    /// Sets whether empty lines may separate the properties of an entry.
    #[must_use]
    pub fn allow_inside_entries(mut self, allow: bool) -> Self {
        self.allow_inside_entries = allow;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn violation(&self, ctx: &FileContext<'_>, line: usize, message: String) -> Violation {
        Violation::new(CODE, NAME, self.severity, ctx.location(line), message)
    }

    /// Reports a run longer than `limit`, deleting the surplus lines.
    fn check_run(
        &self,
        ctx: &FileContext<'_>,
        run: Range<usize>,
        limit: usize,
        inside: bool,
    ) -> Option<Violation> {
        if run.len() <= limit {
            return None;
        }
        let first = ctx.line(run.start + limit);
        let last = ctx.line(run.end - 1);
        let (message, help) = if inside {
            (
                "Empty line inside entry".to_string(),
                "Remove empty lines between the properties of an entry",
            )
        } else {
            (
                "Multiple consecutive empty lines".to_string(),
                "Collapse consecutive empty lines",
            )
        };
        Some(
            self.violation(ctx, run.start + limit, message)
                .with_help(help)
                .with_fix(Fix::delete(first.start, last.full_end())),
        )
    }

    /// Checks a gap between two siblings that holds only empty lines.
    fn check_gap(
        &self,
        ctx: &FileContext<'_>,
        gap: Range<usize>,
        want: usize,
    ) -> Option<Violation> {
        let found = gap.len();
        if found == want {
            return None;
        }
        let message = format!(
            "Expected {want} blank line{} between entries, found {found}",
            if want == 1 { "" } else { "s" }
        );
        let fix = if found > want {
            let first = ctx.line(gap.start + want);
            let last = ctx.line(gap.end - 1);
            Fix::delete(first.start, last.full_end())
        } else {
            let before = ctx.line(gap.end - 1);
            Fix::insert(before.end(), before.ending.as_str().repeat(want - found))
        };
        let at = if found > want { gap.start + want } else { gap.end };
        Some(
            self.violation(ctx, at, message)
                .with_help(format!("Separate entries with {want} empty line(s)"))
                .with_fix(fix),
        )
    }

    /// Checks the header, property and help region of one sibling.
    fn check_entry_region(&self, ctx: &FileContext<'_>, entry: &Entry, out: &mut Vec<Violation>) {
        for run in empty_runs(ctx, entry.start..entry.header_end() + 1) {
            let in_help = entry
                .help
                .as_ref()
                .is_some_and(|h| run.start > h.keyword_line && run.end <= h.lines.end);
            let limit = if in_help || self.allow_inside_entries {
                self.max_consecutive
            } else {
                0
            };
            out.extend(self.check_run(ctx, run, limit, !in_help));
        }
    }
}

/// Runs of empty lines within `range`.
fn empty_runs(ctx: &FileContext<'_>, range: Range<usize>) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start = None;
    for index in range.clone() {
        match (ctx.line(index).is_empty(), start) {
            (true, None) => start = Some(index),
            (false, Some(s)) => {
                runs.push(s..index);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..range.end);
    }
    runs
}

impl Rule for BlankLines {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Controls empty lines inside and between entries"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }
}

impl SiblingRule for BlankLines {
    fn check_siblings(
        &self,
        ctx: &FileContext<'_>,
        parent: Option<&Entry>,
        siblings: &[Entry],
    ) -> RuleResult {
        let (scope_start, scope_end) = match parent {
            Some(p) => (p.header_end() + 1, p.closer.unwrap_or(p.end + 1)),
            None => (0, ctx.lines().len()),
        };
        let between = self
            .between_entries
            .filter(|_| parent.is_none() || !self.top_level_only);

        let mut violations = Vec::new();
        let mut cursor = scope_start;
        let mut previous: Option<&Entry> = None;

        for entry in siblings {
            let gap = cursor..entry.start;
            let all_empty = gap.clone().all(|i| ctx.line(i).is_empty());
            let sources = previous.is_some_and(|p| p.kind == EntryKind::Source)
                && entry.kind == EntryKind::Source;
            match (previous, between) {
                (Some(_), Some(want)) if all_empty && !sources => {
                    violations.extend(self.check_gap(ctx, gap, want));
                }
                _ => {
                    for run in empty_runs(ctx, gap) {
                        violations.extend(self.check_run(ctx, run, self.max_consecutive, false));
                    }
                }
            }
            self.check_entry_region(ctx, entry, &mut violations);
            cursor = entry.end + 1;
            previous = Some(entry);
        }

        for run in empty_runs(ctx, cursor..scope_end.max(cursor)) {
            violations.extend(self.check_run(ctx, run, self.max_consecutive, false));
        }

        Ok(violations)
    }
}
