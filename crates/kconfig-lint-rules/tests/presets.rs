//! Preset behavior on small, focused inputs.

use kconfig_lint_core::{Linter, StyleProfile, Violation};
use kconfig_lint_rules::{builtin_registry, Preset};

fn check(profile: &StyleProfile, text: &str) -> Vec<Violation> {
    Linter::from_profile(builtin_registry(), profile)
        .expect("profile should build")
        .check(text)
}

fn fix(profile: &StyleProfile, text: &str) -> String {
    Linter::from_profile(builtin_registry(), profile)
        .expect("profile should build")
        .fix(text)
        .output
        .expect("fixes should not conflict")
}

fn zephyr() -> StyleProfile {
    Preset::Zephyr.profile()
}

fn espidf() -> StyleProfile {
    Preset::Espidf.profile()
}

// ── Zephyr ──

#[test]
fn zephyr_valid_file() {
    let text = "config TEST\n\tbool \"Test option\"\n\tdefault y\n\thelp\n\t  This is a test option.\n";
    assert!(check(&zephyr(), text).is_empty());
}

#[test]
fn zephyr_trailing_whitespace() {
    let violations = check(&zephyr(), "config TEST\n\tbool \"Test\"   \n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule, "trailing-whitespace");
    assert_eq!(violations[0].location.line, 2);
}

#[test]
fn zephyr_long_line() {
    let text = format!("config TEST\n\tbool \"{}\"\n", "x".repeat(100));
    let violations = check(&zephyr(), &text);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule, "line-length");
    assert_eq!(violations[0].message, "Line exceeds 100 characters (108)");
    assert!(violations[0].fix.is_none());
}

#[test]
fn zephyr_spaces_instead_of_tabs() {
    let violations = check(&zephyr(), "config TEST\n    bool \"Test\"\n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, "Use tabs for indentation");
}

#[test]
fn zephyr_comment_without_space() {
    let violations = check(&zephyr(), "#Bad comment\n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule, "comment-spacing");
    assert_eq!(fix(&zephyr(), "#Bad comment\n"), "# Bad comment\n");
}

#[test]
fn zephyr_shallow_help_text() {
    let violations = check(
        &zephyr(),
        "config TEST\n\tbool \"Test\"\n\thelp\n\tWrong indentation.\n",
    );
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].rule, "help-indent");
}

#[test]
fn zephyr_formats_misindented_help() {
    let text = "config TEST\n\tbool \"Test\"\n  help\n   Help text.\n";
    assert_eq!(
        fix(&zephyr(), text),
        "config TEST\n\tbool \"Test\"\n\thelp\n\t  Help text.\n"
    );
}

#[test]
fn zephyr_keeps_nested_entries_flat() {
    let text = "menu \"Test\"\n    config TEST\n        bool \"Test\"\nendmenu\n";
    assert_eq!(
        fix(&zephyr(), text),
        "menu \"Test\"\nconfig TEST\n\tbool \"Test\"\nendmenu\n"
    );
}

// ── ESP-IDF ──

#[test]
fn espidf_valid_file() {
    let text = "menu \"Test\"\n    config TEST_OPTION\n        bool \"Test option\"\n        default y\n        help\n            This is a test option.\nendmenu\n";
    assert!(check(&espidf(), text).is_empty());
}

#[test]
fn espidf_lowercase_name() {
    let violations = check(&espidf(), "config LowercaseConfig\n    bool \"Test\"\n");
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].message,
        "Config name `LowercaseConfig` must be uppercase"
    );
}

#[test]
fn espidf_tabs_instead_of_spaces() {
    let violations = check(&espidf(), "config TEST\n\tbool \"Test\"\n");
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, "Use spaces for indentation");
}

#[test]
fn espidf_indent_not_multiple_of_width() {
    let violations = check(&espidf(), "config TEST\n  bool \"Test\"\n");
    assert_eq!(violations.len(), 1);
    assert_eq!(
        violations[0].message,
        "Indentation must be a multiple of 4 spaces"
    );
}

#[test]
fn espidf_indents_hierarchy() {
    let text = "menu \"Test\"\nconfig TEST\nbool \"Test\"\nendmenu\n";
    assert_eq!(
        fix(&espidf(), text),
        "menu \"Test\"\n    config TEST\n        bool \"Test\"\nendmenu\n"
    );
}

#[test]
fn espidf_short_prefix() {
    let violations = check(&espidf(), "config AB_TEST\n    bool \"Test\"\n");
    assert_eq!(violations.len(), 1);
    assert!(violations[0].message.contains("at least 3 characters"));
}

#[test]
fn espidf_name_without_prefix() {
    let violations = check(&espidf(), "config TESTING\n    bool \"Test\"\n");
    assert!(violations.iter().all(|v| !v.message.contains("prefix")));
}

// ── Shared ──

#[test]
fn empty_lines_kept_unless_consolidated() {
    let text = "config A\n\tbool \"A\"\n\n\nconfig B\n\tbool \"B\"\n";
    assert!(check(&zephyr(), text).is_empty());
    assert_eq!(fix(&zephyr(), text), text);

    let mut profile = zephyr();
    profile.set_enabled("blank-lines", true);
    let violations = check(&profile, text);
    assert_eq!(violations.len(), 1);
    assert_eq!(violations[0].message, "Multiple consecutive empty lines");
    assert_eq!(
        fix(&profile, text),
        "config A\n\tbool \"A\"\n\nconfig B\n\tbool \"B\"\n"
    );
}

#[test]
fn empty_file() {
    for preset in Preset::ALL {
        assert!(check(&preset.profile(), "").is_empty());
        assert_eq!(fix(&preset.profile(), ""), "");
    }
}

#[test]
fn presets_disagree_on_indentation() {
    let zephyr_style = "config TEST\n\tbool \"Test\"\n";
    let espidf_style = "config TEST\n    bool \"Test\"\n";
    assert!(check(&zephyr(), zephyr_style).is_empty());
    assert!(check(&espidf(), espidf_style).is_empty());
    assert_eq!(fix(&zephyr(), espidf_style), zephyr_style);
    assert_eq!(fix(&espidf(), zephyr_style), espidf_style);
}
