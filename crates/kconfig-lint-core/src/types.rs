//! Core types for lint violations, fixes and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::str::FromStr;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

impl FromStr for Severity {
    type Err = crate::config::ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            _ => Err(crate::config::ConfigError::UnknownSeverity(s.to_string())),
        }
    }
}

/// Position of a violation inside a file.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
    /// Last line number covered (1-indexed).
    pub end_line: usize,
    /// Byte offset in file (for miette integration).
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a new location covering a single line.
    #[must_use]
    pub fn new(line: usize, column: usize) -> Self {
        Self {
            line,
            column,
            end_line: line,
            offset: 0,
            length: 0,
        }
    }

    /// Sets the byte offset and length for this location.
    #[must_use]
    pub fn with_span(mut self, offset: usize, length: usize) -> Self {
        self.offset = offset;
        self.length = length;
        self
    }

    /// Sets the last line covered by this location.
    #[must_use]
    pub fn with_end_line(mut self, end_line: usize) -> Self {
        self.end_line = end_line.max(self.line);
        self
    }
}

/// Replacement of the byte range `[start, end)` of a buffer.
///
/// An empty range is an insertion, an empty `content` a deletion.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fix {
    /// Start byte offset (inclusive).
    pub start: usize,
    /// End byte offset (exclusive).
    pub end: usize,
    /// Replacement text.
    pub content: String,
}

impl Fix {
    /// Replaces `[start, end)` with `content`.
    #[must_use]
    pub fn replace(start: usize, end: usize, content: impl Into<String>) -> Self {
        Self {
            start,
            end,
            content: content.into(),
        }
    }

    /// Deletes `[start, end)`.
    #[must_use]
    pub fn delete(start: usize, end: usize) -> Self {
        Self::replace(start, end, "")
    }

    /// Inserts `content` at `offset`.
    #[must_use]
    pub fn insert(offset: usize, content: impl Into<String>) -> Self {
        Self::replace(offset, offset, content)
    }

    /// True when the fix removes nothing.
    #[must_use]
    pub fn is_insertion(&self) -> bool {
        self.start == self.end
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "KL004").
    pub code: String,
    /// Rule name (e.g., "indentation").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional hint on how to resolve the violation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub help: Option<String>,
    /// Automatic fix, if the rule can produce one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fix: Option<Fix>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            location,
            message: message.into(),
            help: None,
            fix: None,
        }
    }

    /// Adds a help hint to this violation.
    #[must_use]
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// Attaches an automatic fix to this violation.
    #[must_use]
    pub fn with_fix(mut self, fix: Fix) -> Self {
        self.fix = Some(fix);
        self
    }

    /// True if the violation carries an automatic fix.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        self.fix.is_some()
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self, file: &str) -> String {
        let mut output = format!(
            "{} {} at {}:{}:{}\n  {}: {}\n",
            self.code,
            self.rule,
            file,
            self.location.line,
            self.location.column,
            self.severity,
            self.message,
        );
        if let Some(help) = &self.help {
            output.push_str(&format!("  = help: {help}\n"));
        }
        if self.fix.is_some() {
            output.push_str("  = fixable with --fix\n");
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}] {}",
            self.location.line, self.location.column, self.severity, self.rule, self.message
        )
    }
}

/// Converts a Violation to a miette Diagnostic for rich error display.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v.help.clone(),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: v.rule.clone(),
        }
    }
}

/// Outcome of checking (and possibly fixing) one file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FileReport {
    /// Path as given or discovered.
    pub path: PathBuf,
    /// Remaining violations, sorted by line then rule.
    pub violations: Vec<Violation>,
    /// Read or write failure, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Whether corrected text was written back.
    #[serde(default)]
    pub fixed: bool,
    /// Whether fixes conflicted, leaving the file untouched.
    #[serde(default)]
    pub conflicted: bool,
    /// File contents, kept for rich rendering.
    #[serde(skip)]
    pub source: Option<String>,
}

impl FileReport {
    /// Creates an empty report for `path`.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Creates a report for a file that could not be processed.
    #[must_use]
    pub fn failed(path: impl Into<PathBuf>, error: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            error: Some(error.into()),
            ..Self::default()
        }
    }
}

/// Result of a lint run over many files.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// Per-file reports, sorted by path.
    pub files: Vec<FileReport>,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of files examined, including those that failed.
    #[must_use]
    pub fn files_checked(&self) -> usize {
        self.files.len()
    }

    /// Iterates over all violations of all files.
    pub fn violations(&self) -> impl Iterator<Item = &Violation> {
        self.files.iter().flat_map(|f| f.violations.iter())
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }

    /// Number of files whose corrected text was written.
    #[must_use]
    pub fn files_fixed(&self) -> usize {
        self.files.iter().filter(|f| f.fixed).count()
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations().any(|v| v.severity >= severity)
    }

    /// True if any file failed to read or had conflicting fixes.
    #[must_use]
    pub fn has_failures(&self) -> bool {
        self.files.iter().any(|f| f.error.is_some() || f.conflicted)
    }

    /// Decides whether the run should fail under the given threshold.
    #[must_use]
    pub fn should_fail(&self, fail_on: Severity) -> bool {
        self.has_failures() || self.has_violations_at(fail_on)
    }

    /// Adds a file report, keeping reports sorted by path.
    pub fn push(&mut self, report: FileReport) {
        let at = self.files.partition_point(|f| f.path <= report.path);
        self.files.insert(at, report);
    }
}
