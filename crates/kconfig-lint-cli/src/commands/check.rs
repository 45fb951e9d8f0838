//! Check command implementation.

use anyhow::{Context, Result};
use kconfig_lint_core::{Config, FileReport, LintResult, Linter};
use kconfig_lint_rules::builtin_registry;
use rayon::prelude::*;
use std::path::Path;
use tracing::{debug, info, warn};

use super::discover::Discovery;
use crate::{config_resolver::Settings, CheckArgs};

/// Runs the check command.
pub fn run(args: &CheckArgs, config_path: Option<&Path>) -> Result<()> {
    let settings = Settings::load(&args.paths, config_path)?;
    match &settings.origin {
        Some(path) => info!("Using config: {}", path.display()),
        None => debug!("No config file found; using preset defaults"),
    }

    let result = execute(args, &settings.config)?;

    super::output::print(&result, args.format, args.fix)?;

    if result.should_fail(settings.fail_on) {
        std::process::exit(1);
    }

    Ok(())
}

/// Checks (and with `--fix`, rewrites) every file named by `args`.
///
/// # Errors
///
/// Returns an error if the profile or the discovery patterns are invalid.
/// Per-file failures are recorded in the result instead.
pub fn execute(args: &CheckArgs, config: &Config) -> Result<LintResult> {
    let profile = super::profile::resolve(config, args.preset, args.rules.as_deref(), &args.style)?;
    let linter =
        Linter::from_profile(builtin_registry(), &profile).context("Failed to build linter")?;
    let discovery = Discovery::new(&config.files, &args.exclude)?;
    let found = discovery.collect(&args.paths);

    info!(
        "Checking {} file(s) with {} rule(s)",
        found.files.len(),
        linter.rule_count()
    );

    let reports: Vec<FileReport> = found
        .files
        .par_iter()
        .map(|path| process_file(&linter, path, args.fix))
        .collect();

    let mut result = LintResult::new();
    for report in found.missing.into_iter().chain(reports) {
        result.push(report);
    }
    Ok(result)
}

/// Runs the pipeline on one file.
///
/// In fix mode the corrected text is written back when it differs; on a fix
/// conflict the file is left untouched.
#[must_use]
pub fn process_file(linter: &Linter, path: &Path, fix: bool) -> FileReport {
    debug!("Linting {}", path.display());

    let text = match read_text(path) {
        Ok(text) => text,
        Err(err) => {
            warn!("Failed to read file {}: {}", path.display(), err);
            return FileReport::failed(path, format!("Failed to read file: {err}"));
        }
    };

    let mut report = FileReport::new(path);
    if !fix {
        report.violations = linter.check(&text);
        report.source = Some(text);
        return report;
    }

    let outcome = linter.fix(&text);
    report.violations = outcome.violations;
    match outcome.output {
        None => {
            warn!("Conflicting fixes in {}; file left unchanged", path.display());
            report.conflicted = true;
            report.source = Some(text);
        }
        Some(output) if output != text => {
            match std::fs::write(path, &output) {
                Ok(()) => {
                    debug!(
                        "Fixed {} ({} fix(es) in {} pass(es))",
                        path.display(),
                        outcome.fixes_applied,
                        outcome.passes
                    );
                    report.fixed = true;
                }
                Err(err) => {
                    warn!("Failed to write file {}: {}", path.display(), err);
                    report.error = Some(format!("Failed to write file: {err}"));
                }
            }
            report.source = Some(output);
        }
        Some(output) => report.source = Some(output),
    }
    report
}

fn read_text(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes).context("not valid UTF-8")
}
