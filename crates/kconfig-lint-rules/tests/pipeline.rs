//! End-to-end tests of the check and fix pipeline with the built-in rules.
//!
//! These run whole files through `Linter::from_profile` with the built-in
//! registry, the same way the CLI does.

use kconfig_lint_core::{FixOutcome, Linter, Severity, StyleProfile, Violation};
use kconfig_lint_rules::{builtin_registry, Preset};

const ZEPHYR_FIXTURE: &str = include_str!("fixtures/zephyr.Kconfig");
const ESPIDF_FIXTURE: &str = include_str!("fixtures/espidf.Kconfig");

fn linter(profile: &StyleProfile) -> Linter {
    Linter::from_profile(builtin_registry(), profile).expect("profile should build")
}

fn preset(preset: Preset) -> Linter {
    linter(&preset.profile())
}

fn rules_of(violations: &[Violation]) -> Vec<(usize, &str)> {
    violations
        .iter()
        .map(|v| (v.location.line, v.rule.as_str()))
        .collect()
}

fn fixed(outcome: &FixOutcome) -> &str {
    outcome.output.as_deref().expect("fixes should not conflict")
}

/// A file with problems for most rules, including a misplaced `help`.
const MESSY: &str = "menu \"Net\"
config NET_A
  bool \"A\"\x20\x20
  default y
help
\tHelp text here.



#comment
config NET_B
\tdepends on NET_A
\tint \"B\"
endmenu
";

fn everything(base: Preset) -> StyleProfile {
    let mut profile = base.profile();
    profile.set_enabled("blank-lines", true);
    profile.set_enabled("property-order", true);
    profile
}

// ── Reference scenarios ──

#[test]
fn help_text_with_tabs_under_space_style() {
    let text = "config FOO\n    bool \"Foo\"\n    help\n\t\tFirst line.\n\t\tSecond line.\n";
    let linter = preset(Preset::Espidf);

    let violations = linter.check(text);
    assert_eq!(rules_of(&violations), vec![(4, "help-indent"), (5, "help-indent")]);
    assert!(violations.iter().all(Violation::is_fixable));

    let outcome = linter.fix(text);
    assert_eq!(
        fixed(&outcome),
        "config FOO\n    bool \"Foo\"\n    help\n        First line.\n        Second line.\n"
    );
    assert_eq!(outcome.passes, 1);
    assert_eq!(outcome.fixes_applied, 2);
}

#[test]
fn blank_lines_between_entries_collapse() {
    let mut profile = Preset::Zephyr.profile();
    profile.set_enabled("blank-lines", true);
    profile.set_option("blank-lines", "between_entries", 1_i64);
    let linter = linter(&profile);

    let text = "config A\n\tbool \"A\"\n\n\n\nconfig B\n\tbool \"B\"\n";
    let violations = linter.check(text);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule, "blank-lines");
    assert_eq!(
        violations[0].message,
        "Expected 1 blank line between entries, found 3"
    );

    let outcome = linter.fix(text);
    assert_eq!(
        fixed(&outcome),
        "config A\n\tbool \"A\"\n\nconfig B\n\tbool \"B\"\n"
    );
}

#[test]
fn unterminated_if_is_reported_without_fix() {
    let text = "if SOMETHING\nconfig A\n\tbool\n";
    let linter = preset(Preset::Zephyr);

    let violations = linter.check(text);
    assert_eq!(rules_of(&violations), vec![(1, "unterminated-block")]);
    assert_eq!(violations[0].code, "KL101");
    assert_eq!(violations[0].severity, Severity::Error);
    assert!(violations[0].fix.is_none());

    let outcome = linter.fix(text);
    assert_eq!(fixed(&outcome), text);
    assert_eq!(outcome.violations.len(), 1);
    assert!(!outcome.is_changed(text));
}

#[test]
fn compliant_file_is_left_alone() {
    let linter = preset(Preset::Zephyr);
    assert!(linter.check(ZEPHYR_FIXTURE).is_empty());

    let outcome = linter.fix(ZEPHYR_FIXTURE);
    assert_eq!(fixed(&outcome), ZEPHYR_FIXTURE);
    assert_eq!(outcome.passes, 0);
    assert_eq!(outcome.fixes_applied, 0);
}

#[test]
fn stray_closer_does_not_stop_parsing() {
    let text = "config A\n\tbool\nendchoice\nconfig B\n\tbool\n    default y\n";
    let violations = preset(Preset::Zephyr).check(text);
    assert_eq!(
        rules_of(&violations),
        vec![(3, "unmatched-closer"), (6, "indentation")]
    );
    assert_eq!(violations[0].code, "KL100");
    assert_eq!(violations[0].message, "`endchoice` without matching `choice`");
}

// ── Fix properties ──

#[test]
fn fix_output_for_every_rule() {
    let outcome = linter(&everything(Preset::Zephyr)).fix(MESSY);
    assert_eq!(
        fixed(&outcome),
        "menu \"Net\"
config NET_A
\tbool \"A\"
\tdefault y
\thelp
\t  Help text here.

# comment
config NET_B
\tint \"B\"
\tdepends on NET_A
endmenu
"
    );
    assert!(outcome.violations.is_empty());
}

#[test]
fn fix_output_for_every_rule_nested() {
    let outcome = linter(&everything(Preset::Espidf)).fix(MESSY);
    assert_eq!(
        fixed(&outcome),
        "menu \"Net\"
    config NET_A
        bool \"A\"
        default y
        help
            Help text here.

# comment
    config NET_B
        int \"B\"
        depends on NET_A
endmenu
"
    );
}

#[test]
fn fixing_is_idempotent() {
    for base in Preset::ALL {
        let linter = linter(&everything(base));
        let first = linter.fix(MESSY);
        let once = fixed(&first);

        assert!(
            linter.check(once).iter().all(|v| !v.is_fixable()),
            "{base}: fixable violations left after fixing"
        );
        let second = linter.fix(once);
        assert_eq!(fixed(&second), once, "{base}: second fix changed the text");
        assert_eq!(second.passes, 0);
    }
}

#[test]
fn compliant_files_round_trip_byte_for_byte() {
    let cases = [
        (Preset::Zephyr, ZEPHYR_FIXTURE.to_string()),
        (Preset::Espidf, ESPIDF_FIXTURE.to_string()),
        (Preset::Zephyr, ZEPHYR_FIXTURE.replace('\n', "\r\n")),
        (Preset::Zephyr, ZEPHYR_FIXTURE.trim_end().to_string()),
    ];
    for (base, text) in cases {
        let linter = preset(base);
        assert!(linter.check(&text).is_empty(), "{base}: {text:?}");
        assert_eq!(fixed(&linter.fix(&text)), text);
    }
}

#[test]
fn fixes_keep_line_endings() {
    let text = "config A\r\n    bool \"A\"  \r\nconfig B\n    int\n";
    let outcome = preset(Preset::Zephyr).fix(text);
    assert_eq!(fixed(&outcome), "config A\r\n\tbool \"A\"\r\nconfig B\n\tint\n");
}

#[test]
fn results_are_deterministic() {
    let linter = linter(&everything(Preset::Espidf));
    assert_eq!(linter.check(MESSY), linter.check(MESSY));
    assert_eq!(linter.fix(MESSY), linter.fix(MESSY));
}

#[test]
fn violations_are_sorted_by_line_then_rule() {
    let violations = linter(&everything(Preset::Zephyr)).check(MESSY);
    let keys = rules_of(&violations);
    let mut sorted = keys.clone();
    sorted.sort_unstable();
    assert_eq!(keys, sorted);
    insta::assert_debug_snapshot!(keys, @r###"
    [
        (
            3,
            "indentation",
        ),
        (
            3,
            "trailing-whitespace",
        ),
        (
            4,
            "indentation",
        ),
        (
            5,
            "indentation",
        ),
        (
            6,
            "help-indent",
        ),
        (
            8,
            "blank-lines",
        ),
        (
            10,
            "comment-spacing",
        ),
        (
            12,
            "property-order",
        ),
        (
            13,
            "property-order",
        ),
    ]
    "###);
}

// ── Allow directives ──

#[test]
fn allow_directive_covers_next_line() {
    let text = "config A\n# kconfig-lint: allow(indentation) reason=\"vendored\"\n    bool \"A\"\n    default y\n";
    let linter = preset(Preset::Zephyr);

    let violations = linter.check(text);
    assert_eq!(rules_of(&violations), vec![(4, "indentation")]);

    let outcome = linter.fix(text);
    assert_eq!(
        fixed(&outcome),
        "config A\n# kconfig-lint: allow(indentation) reason=\"vendored\"\n    bool \"A\"\n\tdefault y\n"
    );
}

#[test]
fn allow_all_covers_every_rule() {
    let text = "# kconfig-lint: allow(all)\nconfig lower_name  \n";
    let mut profile = Preset::Zephyr.profile();
    profile.set_option("config-naming", "uppercase", true);
    assert!(linter(&profile).check(text).is_empty());
}

#[test]
fn allow_directive_for_other_rule_does_not_suppress() {
    let text = "# kconfig-lint: allow(line-length)\nconfig A  \n";
    let violations = preset(Preset::Zephyr).check(text);
    assert_eq!(rules_of(&violations), vec![(2, "trailing-whitespace")]);
}

// ── Profiles ──

#[test]
fn severity_override_applies() {
    let mut profile = Preset::Zephyr.profile();
    if let Some(config) = profile.rules.get_mut("trailing-whitespace") {
        config.severity = Some(Severity::Error);
    }
    let violations = linter(&profile).check("config A \n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].severity, Severity::Error);
}

#[test]
fn restricted_profile_runs_selected_rules_only() {
    let mut profile = Preset::Zephyr.profile();
    profile.restrict_to(&["trailing-whitespace"]);
    let linter = linter(&profile);
    assert_eq!(linter.rule_names().collect::<Vec<_>>(), vec!["trailing-whitespace"]);

    let violations = linter.check("config A \n    bool\n#x\n");
    assert_eq!(rules_of(&violations), vec![(1, "trailing-whitespace")]);
}

#[test]
fn invalid_option_fails_to_build() {
    let mut profile = Preset::Zephyr.profile();
    profile.set_option("line-length", "max", -1_i64);
    assert!(Linter::from_profile(builtin_registry(), &profile).is_err());
}
