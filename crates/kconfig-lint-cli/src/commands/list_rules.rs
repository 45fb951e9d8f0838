//! List rules command implementation.

use kconfig_lint_core::{
    FIX_CONFLICT, FIX_CONFLICT_CODE, INTERNAL_ERROR, INTERNAL_ERROR_CODE, UNMATCHED_CLOSER,
    UNMATCHED_CLOSER_CODE, UNTERMINATED_BLOCK, UNTERMINATED_BLOCK_CODE,
};
use kconfig_lint_rules::{builtin_registry, Preset};

/// Runs the list-rules command.
pub fn run() {
    print!("{}", render());
}

/// Renders the rule table.
#[must_use]
pub fn render() -> String {
    let mut out = String::from("Available rules:\n\n");
    out.push_str(&format!(
        "{:<7} {:<22} {:<8} {:<4} Description\n",
        "Code", "Name", "Scope", "Fix"
    ));
    out.push_str(&"-".repeat(80));
    out.push('\n');

    for rule in builtin_registry().iter() {
        out.push_str(&format!(
            "{:<7} {:<22} {:<8} {:<4} {}\n",
            rule.code,
            rule.name,
            rule.capability.to_string(),
            if rule.fixable { "yes" } else { "no" },
            rule.description
        ));
    }

    out.push_str("\nBuilt-in checks (always on):\n");
    for (code, name, what) in [
        (UNMATCHED_CLOSER_CODE, UNMATCHED_CLOSER, "closer without a matching opener"),
        (UNTERMINATED_BLOCK_CODE, UNTERMINATED_BLOCK, "menu, choice or if never closed"),
        (INTERNAL_ERROR_CODE, INTERNAL_ERROR, "a rule failed on this entry"),
        (FIX_CONFLICT_CODE, FIX_CONFLICT, "two fixes overlap; file left unchanged"),
    ] {
        out.push_str(&format!("{code:<7} {name:<22} {what}\n"));
    }

    out.push_str("\nPresets:\n");
    for preset in Preset::ALL {
        let profile = preset.profile();
        let enabled: Vec<&str> = builtin_registry()
            .iter()
            .filter(|d| profile.is_rule_enabled(d.name))
            .map(|d| d.code)
            .collect();
        let marker = if preset == Preset::default() {
            " (default)"
        } else {
            ""
        };
        out.push_str(&format!(
            "  {:<8} - {}{}\n",
            preset.name(),
            enabled.join(", "),
            marker
        ));
    }

    out.push_str("\nUse --rules to filter specific rules, e.g.:\n");
    out.push_str("  kconfig-lint check --rules indentation,help-indent\n");
    out.push_str("  kconfig-lint check --rules KL001,KL002\n");
    out
}
