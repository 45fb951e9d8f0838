//! Integration tests: rules written against the public API, and structural
//! properties of the parser on realistic files.

use kconfig_lint_core::{
    parse, tokenize, Entry, EntryKind, EntryRule, FileContext, LineRole, Linter, Rule, RuleBox,
    RuleError, RuleResult, Severity, SiblingRule, Violation,
};
use std::collections::BTreeMap;

const NESTED: &str = "mainmenu \"Demo\"

menu \"Drivers\"

config DRIVERS
\tbool \"Drivers\"
\thelp
\t  Enable drivers.

if DRIVERS

choice DRIVER_MODE
\tprompt \"Mode\"

config DRIVER_MODE_A
\tbool \"A\"

config DRIVER_MODE_A
\tbool \"A again\"

endchoice

menu \"Empty\"
endmenu

endif # DRIVERS

source \"drivers/*/Kconfig\"

endmenu
";

struct NoEmptyMenus;

impl Rule for NoEmptyMenus {
    fn name(&self) -> &'static str {
        "no-empty-menus"
    }

    fn code(&self) -> &'static str {
        "KL050"
    }
}

impl EntryRule for NoEmptyMenus {
    fn check_entry(&self, ctx: &FileContext<'_>, entry: &Entry) -> RuleResult {
        if entry.kind == EntryKind::Menu && entry.children.is_empty() {
            return Ok(vec![Violation::new(
                self.code(),
                self.name(),
                Severity::Info,
                ctx.location(entry.start),
                "Menu has no entries",
            )]);
        }
        Ok(Vec::new())
    }
}

struct UniqueSiblings;

impl Rule for UniqueSiblings {
    fn name(&self) -> &'static str {
        "unique-siblings"
    }

    fn code(&self) -> &'static str {
        "KL051"
    }
}

impl SiblingRule for UniqueSiblings {
    fn check_siblings(
        &self,
        ctx: &FileContext<'_>,
        _parent: Option<&Entry>,
        siblings: &[Entry],
    ) -> RuleResult {
        let mut seen = BTreeMap::new();
        let mut violations = Vec::new();
        for entry in siblings.iter().filter(|e| e.kind.is_symbol()) {
            let Some(name) = entry.name.as_deref() else {
                continue;
            };
            if let Some(first) = seen.insert(name, entry.start) {
                violations.push(Violation::new(
                    self.code(),
                    self.name(),
                    self.default_severity(),
                    ctx.location(entry.start),
                    format!("`{name}` is already defined on line {}", first + 1),
                ));
            }
        }
        Ok(violations)
    }
}

struct RefusesChoices;

impl Rule for RefusesChoices {
    fn name(&self) -> &'static str {
        "refuses-choices"
    }

    fn code(&self) -> &'static str {
        "KL052"
    }
}

impl EntryRule for RefusesChoices {
    fn check_entry(&self, _ctx: &FileContext<'_>, entry: &Entry) -> RuleResult {
        if entry.kind == EntryKind::Choice {
            return Err(RuleError::Unsupported("choices are not supported".to_string()));
        }
        Ok(Vec::new())
    }
}

fn summary(violations: &[Violation]) -> Vec<(usize, &str)> {
    violations
        .iter()
        .map(|v| (v.location.line, v.rule.as_str()))
        .collect()
}

// ── Custom rules ──

#[test]
fn custom_entry_and_sibling_rules() {
    let linter = Linter::builder()
        .rule(RuleBox::entry(NoEmptyMenus))
        .rule(RuleBox::siblings(UniqueSiblings))
        .build();

    let violations = linter.check(NESTED);
    assert_eq!(
        summary(&violations),
        vec![(18, "unique-siblings"), (23, "no-empty-menus")]
    );
    assert_eq!(
        violations[0].message,
        "`DRIVER_MODE_A` is already defined on line 15"
    );
    assert_eq!(violations[1].severity, Severity::Info);
}

#[test]
fn failing_rule_is_isolated() {
    let linter = Linter::builder()
        .rule(RuleBox::entry(RefusesChoices))
        .rule(RuleBox::entry(NoEmptyMenus))
        .build();

    let violations = linter.check(NESTED);
    assert_eq!(
        summary(&violations),
        vec![(12, "internal-error"), (23, "no-empty-menus")]
    );
    assert_eq!(violations[0].code, "KL900");
    assert!(violations[0].message.contains("refuses-choices"));
}

#[test]
fn report_only_rules_leave_text_unchanged() {
    let linter = Linter::builder().rule(RuleBox::entry(NoEmptyMenus)).build();
    let outcome = linter.fix(NESTED);
    assert_eq!(outcome.output.as_deref(), Some(NESTED));
    assert_eq!(outcome.violations.len(), 1);
    assert_eq!(outcome.passes, 0);
}

// ── Structure ──

#[test]
fn every_line_has_exactly_one_owner() {
    let (tree, violations) = parse(tokenize(NESTED));
    assert!(violations.is_empty());
    assert_eq!(tree.render(), NESTED);

    let mut owners = vec![0_usize; tree.lines.len()];
    for entry in tree.walk() {
        for line in entry.start..=entry.header_end() {
            owners[line] += usize::from(!tree.lines[line].is_blank());
        }
        if let Some(closer) = entry.closer {
            owners[closer] += 1;
        }
    }
    for (index, count) in owners.iter().enumerate() {
        let expected = usize::from(!matches!(
            tree.role(index),
            LineRole::Blank | LineRole::Comment
        ));
        assert_eq!(*count, expected, "line {}", index + 1);
    }
}

#[test]
fn depths_follow_containers() {
    let (tree, _) = parse(tokenize(NESTED));
    let depths: Vec<(EntryKind, usize)> = tree.walk().map(|e| (e.kind, e.depth)).collect();
    assert_eq!(
        depths,
        vec![
            (EntryKind::MainMenu, 0),
            (EntryKind::Menu, 0),
            (EntryKind::Config, 1),
            (EntryKind::If, 1),
            (EntryKind::Choice, 2),
            (EntryKind::Config, 3),
            (EntryKind::Config, 3),
            (EntryKind::Menu, 2),
            (EntryKind::Source, 1),
        ]
    );
}

#[test]
fn broken_nesting_is_recovered() {
    let text = "menu \"A\"\nchoice\nconfig X\n\tbool\nendmenu\nendif\nconfig Y\n";
    let (tree, violations) = parse(tokenize(text));
    let found: Vec<(usize, &str)> = summary(&violations);
    assert_eq!(found, vec![(2, "unterminated-block"), (6, "unmatched-closer")]);
    assert_eq!(tree.render(), text);
    assert_eq!(tree.entries.last().and_then(|e| e.name.as_deref()), Some("Y"));
}
