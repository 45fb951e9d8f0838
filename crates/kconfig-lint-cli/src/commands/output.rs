//! Shared output formatting for lint results.

use anyhow::Result;
use kconfig_lint_core::{FileReport, LintResult, Severity, Violation, ViolationDiagnostic};
use miette::{NamedSource, Report};
use serde::Serialize;
use std::fmt::{self, Write};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat, fix: bool) -> Result<()> {
    print!("{}", render(result, format, fix)?);
    Ok(())
}

/// Renders lint results in the specified format.
pub fn render(result: &LintResult, format: OutputFormat, fix: bool) -> Result<String> {
    let mut out = String::new();
    match format {
        OutputFormat::Text => render_text(&mut out, result, fix)?,
        OutputFormat::Compact => render_compact(&mut out, result)?,
        OutputFormat::Json => return render_json(result),
        OutputFormat::Fancy => render_fancy(&mut out, result, fix)?,
    }
    Ok(out)
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn render_text(out: &mut String, result: &LintResult, fix: bool) -> fmt::Result {
    for file in &result.files {
        let path = file.path.display();
        for violation in &file.violations {
            writeln!(
                out,
                "{} {} at {}:{}:{}",
                violation.code,
                violation.rule,
                path,
                violation.location.line,
                violation.location.column,
            )?;
            writeln!(
                out,
                "  {}: {}",
                severity_indicator(violation.severity),
                violation.message
            )?;
            if let Some(help) = &violation.help {
                writeln!(out, "  = help: {help}")?;
            }
            if !fix && violation.is_fixable() {
                writeln!(out, "  = fixable with --fix")?;
            }
            out.push('\n');
        }
        render_file_status(out, file)?;
    }
    render_summary(out, result, fix)
}

fn render_file_status(out: &mut String, file: &FileReport) -> fmt::Result {
    if let Some(error) = &file.error {
        writeln!(out, "\x1b[31m{}: {}\x1b[0m", file.path.display(), error)?;
    }
    if file.conflicted {
        writeln!(
            out,
            "\x1b[31m{}: conflicting fixes, file left unchanged\x1b[0m",
            file.path.display()
        )?;
    }
    Ok(())
}

fn render_summary(out: &mut String, result: &LintResult, fix: bool) -> fmt::Result {
    let (errors, warnings, infos) = result.count_by_severity();

    let summary_color = if errors > 0 || result.has_failures() {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    if fix {
        writeln!(out, "Formatted {} file(s)", result.files_fixed())?;
    }
    writeln!(
        out,
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color,
        errors,
        warnings,
        infos,
        result.files_checked()
    )
}

fn render_compact(out: &mut String, result: &LintResult) -> fmt::Result {
    for file in &result.files {
        for violation in &file.violations {
            writeln!(
                out,
                "{}:{}:{}: {} [{}] {}",
                file.path.display(),
                violation.location.line,
                violation.location.column,
                violation.severity,
                violation.code,
                violation.message,
            )?;
        }
        if let Some(error) = &file.error {
            writeln!(out, "{}: error [io] {}", file.path.display(), error)?;
        }
        if file.conflicted {
            writeln!(
                out,
                "{}: error [fix-conflict] conflicting fixes, file left unchanged",
                file.path.display()
            )?;
        }
    }
    Ok(())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    files: &'a [FileReport],
    summary: Summary,
}

#[derive(Serialize)]
struct Summary {
    files_checked: usize,
    files_fixed: usize,
    errors: usize,
    warnings: usize,
    infos: usize,
}

fn render_json(result: &LintResult) -> Result<String> {
    let (errors, warnings, infos) = result.count_by_severity();
    let report = JsonReport {
        files: &result.files,
        summary: Summary {
            files_checked: result.files_checked(),
            files_fixed: result.files_fixed(),
            errors,
            warnings,
            infos,
        },
    };
    let mut json = serde_json::to_string_pretty(&report)?;
    json.push('\n');
    Ok(json)
}

fn render_fancy(out: &mut String, result: &LintResult, fix: bool) -> fmt::Result {
    for file in &result.files {
        let name = file.path.display().to_string();
        for violation in &file.violations {
            writeln!(out, "{:?}", diagnostic(violation, &name, file.source.as_deref()))?;
        }
        render_file_status(out, file)?;
    }
    render_summary(out, result, fix)
}

fn diagnostic(violation: &Violation, name: &str, source: Option<&str>) -> Report {
    let report = Report::new(ViolationDiagnostic::from(violation));
    match source {
        Some(source) => report.with_source_code(NamedSource::new(name, source.to_string())),
        None => report,
    }
}
