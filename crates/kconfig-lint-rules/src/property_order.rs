//! Rule to enforce a canonical property order.
//!
//! # Rationale
//!
//! Entries are easier to scan when the type and prompt always come first and
//! dependencies always sit in the same place. The order is style data, given
//! as a list of property kinds.
//!
//! # Behavior
//!
//! Properties whose kind is listed in `order` must follow that order; equal
//! kinds keep their relative order. Unlisted properties stay where they are.
//! A property after the help text is reported without a fix.
//!
//! # Fix
//!
//! Moves line contents between the property slots. Each slot keeps its own
//! indentation and line ending, so the fix never touches expression text.
//!
//! # Configuration
//!
//! - `order`: Property kinds in their required order (see [`DEFAULT_ORDER`])

use kconfig_lint_core::{
    lex_line, ConfigError, Entry, EntryRule, FileContext, Fix, Property, PropertyKind, Rule,
    RuleConfig, RuleResult, Severity, SourceLine, Violation,
};

/// Rule code for property-order.
pub const CODE: &str = "KL007";

/// Rule name for property-order.
pub const NAME: &str = "property-order";

/// Order used when none is configured.
pub const DEFAULT_ORDER: [PropertyKind; 13] = [
    PropertyKind::Type,
    PropertyKind::DefType,
    PropertyKind::Prompt,
    PropertyKind::DependsOn,
    PropertyKind::VisibleIf,
    PropertyKind::Select,
    PropertyKind::Imply,
    PropertyKind::Default,
    PropertyKind::Range,
    PropertyKind::Option,
    PropertyKind::Modules,
    PropertyKind::Transitional,
    PropertyKind::Optional,
];

/// Enforces the order of property lines within an entry.
#[derive(Debug, Clone)]
pub struct PropertyOrder {
    order: Vec<PropertyKind>,
    severity: Severity,
}

impl Default for PropertyOrder {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyOrder {
    /// Creates a new rule with [`DEFAULT_ORDER`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            order: DEFAULT_ORDER.to_vec(),
            severity: Severity::Warning,
        }
    }

    /// Creates the rule from its configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if `order` names an unknown property kind.
    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        if !config.options.contains_key("order") {
            return Ok(Self::new());
        }
        let order = config
            .get_str_array("order")
            .iter()
            .map(|name| {
                PropertyKind::from_name(name).ok_or_else(|| ConfigError::InvalidOption {
                    rule: NAME.to_string(),
                    key: "order".to_string(),
                    message: format!("unknown property kind `{name}`"),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self::new().order(order))
    }

    /// Sets the required order.
    #[must_use]
    pub fn order(mut self, order: Vec<PropertyKind>) -> Self {
        self.order = order;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn rank(&self, kind: PropertyKind) -> Option<usize> {
        self.order.iter().position(|&k| k == kind)
    }
}

/// Keyword text of a property line, as written.
fn keyword<'a>(line: &SourceLine<'a>, kind: PropertyKind) -> &'a str {
    lex_line(line)
        .first()
        .map_or(kind.name(), |token| token.text(line))
}

impl Rule for PropertyOrder {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Enforces a canonical order of properties"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }
}

impl EntryRule for PropertyOrder {
    fn check_entry(&self, ctx: &FileContext<'_>, entry: &Entry) -> RuleResult {
        let help_line = entry.help.as_ref().map(|h| h.keyword_line);
        let (slots, after_help): (Vec<Property>, Vec<Property>) = entry
            .properties
            .iter()
            .copied()
            .partition(|p| help_line.map_or(true, |h| p.line < h));

        let mut violations = Vec::new();

        for property in after_help {
            let line = ctx.line(property.line);
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location(property.line),
                    format!(
                        "Property `{}` should come before the help text",
                        keyword(line, property.kind)
                    ),
                )
                .with_help("Move this line above `help`"),
            );
        }

        let ranked: Vec<&Property> = slots
            .iter()
            .filter(|p| self.rank(p.kind).is_some())
            .collect();
        let mut sorted = ranked.clone();
        sorted.sort_by_key(|p| self.rank(p.kind));

        for (current, wanted) in ranked.iter().zip(&sorted) {
            let slot = ctx.line(current.line);
            let source = ctx.line(wanted.line);
            if slot.content() == source.content() {
                continue;
            }
            let range = slot.content_range();
            violations.push(
                Violation::new(
                    CODE,
                    NAME,
                    self.severity,
                    ctx.location(current.line),
                    format!(
                        "Property `{}` is out of order; expected `{}` here",
                        keyword(slot, current.kind),
                        keyword(source, wanted.kind)
                    ),
                )
                .with_help(format!(
                    "Order properties as: {}",
                    self.order
                        .iter()
                        .map(|k| k.name())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
                .with_fix(Fix::replace(range.start, range.end, source.content())),
            );
        }

        Ok(violations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kconfig_lint_core::{apply_fixes, parse, tokenize};

    fn check_code(rule: &PropertyOrder, code: &str) -> Vec<Violation> {
        let (tree, _) = parse(tokenize(code));
        let ctx = FileContext::new(&tree);
        tree.walk()
            .flat_map(|entry| rule.check_entry(&ctx, entry).unwrap())
            .collect()
    }

    fn fix_code(rule: &PropertyOrder, code: &str) -> String {
        let fixes: Vec<Fix> = check_code(rule, code)
            .into_iter()
            .filter_map(|v| v.fix)
            .collect();
        apply_fixes(code, &fixes).unwrap()
    }

    #[test]
    fn test_swaps_slots() {
        let code = "config A\n\tdefault y\n\tbool \"A\"\n";
        let violations = check_code(&PropertyOrder::new(), code);
        assert_eq!(violations.len(), 2);
        assert_eq!(
            violations[0].message,
            "Property `default` is out of order; expected `bool` here"
        );
        assert_eq!(
            fix_code(&PropertyOrder::new(), code),
            "config A\n\tbool \"A\"\n\tdefault y\n"
        );
    }

    #[test]
    fn test_slots_keep_their_whitespace() {
        let code = "config A\n    depends on B \\\n\t\t&& C  \r\n\tbool\n";
        assert_eq!(
            fix_code(&PropertyOrder::new(), code),
            "config A\n    bool  \r\n\tdepends on B \\\n\t\t&& C\n"
        );
    }

    #[test]
    fn test_equal_kinds_are_stable() {
        let code = "config A\n\tdefault 2 if X\n\tint\n\tdefault 1\n";
        assert_eq!(
            fix_code(&PropertyOrder::new(), code),
            "config A\n\tint\n\tdefault 2 if X\n\tdefault 1\n"
        );
    }

    #[test]
    fn test_unlisted_kinds_stay_put() {
        let rule = PropertyOrder::new().order(vec![PropertyKind::Type, PropertyKind::Default]);
        let code = "config A\n\tdefault y\n\tselect B\n\tbool\n";
        assert_eq!(
            fix_code(&rule, code),
            "config A\n\tbool\n\tselect B\n\tdefault y\n"
        );
    }

    #[test]
    fn test_property_after_help() {
        let code = "config A\n\tbool\n\thelp\n\t  Text.\n\tdefault y\n";
        let violations = check_code(&PropertyOrder::new(), code);
        assert_eq!(violations.len(), 1);
        assert_eq!(
            violations[0].message,
            "Property `default` should come before the help text"
        );
        assert!(violations[0].fix.is_none());
    }

    #[test]
    fn test_ordered_entry() {
        let code = "config A\n\tbool \"A\"\n\tdepends on B\n\tselect C\n\tdefault y\n";
        assert!(check_code(&PropertyOrder::new(), code).is_empty());
    }

    #[test]
    fn test_from_config() {
        let config = RuleConfig::enabled().with("order", vec!["default", "type"]);
        let rule = PropertyOrder::from_config(&config).unwrap();
        assert!(check_code(&rule, "config A\n\tdefault y\n\tbool\n").is_empty());

        let config = RuleConfig::enabled().with("order", vec!["sideways"]);
        assert!(PropertyOrder::from_config(&config).is_err());
    }
}
