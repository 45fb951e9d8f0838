//! Static registry of the built-in rules.

use crate::{
    BlankLines, CommentSpacing, ConfigNaming, HelpIndent, Indentation, LineLength, PropertyOrder,
    TrailingWhitespace,
};
use kconfig_lint_core::{Capability, Registry, RuleBox, RuleDescriptor, Severity};
use std::sync::OnceLock;
use tracing::debug;

/// Returns the registry of built-in rules, in execution order.
///
/// Built on first use and read-only afterwards.
#[must_use]
pub fn builtin_registry() -> &'static Registry {
    static REGISTRY: OnceLock<Registry> = OnceLock::new();
    REGISTRY.get_or_init(|| {
        let registry = build_registry();
        debug!("Registered {} built-in rule(s)", registry.len());
        registry
    })
}

fn build_registry() -> Registry {
    Registry::new()
        .with(RuleDescriptor {
            name: crate::trailing_whitespace::NAME,
            code: crate::trailing_whitespace::CODE,
            description: "Forbids trailing spaces and tabs",
            capability: Capability::Lines,
            fixable: true,
            default_severity: Severity::Warning,
            build: |_| Ok(RuleBox::lines(TrailingWhitespace::new())),
        })
        .with(RuleDescriptor {
            name: crate::line_length::NAME,
            code: crate::line_length::CODE,
            description: "Limits the number of characters per line",
            capability: Capability::Lines,
            fixable: false,
            default_severity: Severity::Warning,
            build: |config| Ok(RuleBox::lines(LineLength::from_config(config)?)),
        })
        .with(RuleDescriptor {
            name: crate::comment_spacing::NAME,
            code: crate::comment_spacing::CODE,
            description: "Requires a space after `#` in comments",
            capability: Capability::Lines,
            fixable: true,
            default_severity: Severity::Warning,
            build: |_| Ok(RuleBox::lines(CommentSpacing::new())),
        })
        .with(RuleDescriptor {
            name: crate::indentation::NAME,
            code: crate::indentation::CODE,
            description: "Enforces the indentation of entries, properties and closers",
            capability: Capability::Entry,
            fixable: true,
            default_severity: Severity::Warning,
            build: |config| Ok(RuleBox::entry(Indentation::from_config(config)?)),
        })
        .with(RuleDescriptor {
            name: crate::help_indent::NAME,
            code: crate::help_indent::CODE,
            description: "Enforces the indentation of help text",
            capability: Capability::Entry,
            fixable: true,
            default_severity: Severity::Warning,
            build: |config| Ok(RuleBox::entry(HelpIndent::from_config(config)?)),
        })
        .with(RuleDescriptor {
            name: crate::blank_lines::NAME,
            code: crate::blank_lines::CODE,
            description: "Controls empty lines inside and between entries",
            capability: Capability::Siblings,
            fixable: true,
            default_severity: Severity::Warning,
            build: |config| Ok(RuleBox::siblings(BlankLines::from_config(config)?)),
        })
        .with(RuleDescriptor {
            name: crate::property_order::NAME,
            code: crate::property_order::CODE,
            description: "Enforces a canonical order of properties",
            capability: Capability::Entry,
            fixable: true,
            default_severity: Severity::Warning,
            build: |config| Ok(RuleBox::entry(PropertyOrder::from_config(config)?)),
        })
        .with(RuleDescriptor {
            name: crate::config_naming::NAME,
            code: crate::config_naming::CODE,
            description: "Enforces naming conventions for configuration symbols",
            capability: Capability::Entry,
            fixable: false,
            default_severity: Severity::Warning,
            build: |config| Ok(RuleBox::entry(ConfigNaming::from_config(config)?)),
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use kconfig_lint_core::RuleConfig;

    #[test]
    fn test_registry_order_and_codes() {
        let codes: Vec<_> = builtin_registry().iter().map(|d| d.code).collect();
        assert_eq!(
            codes,
            vec!["KL001", "KL002", "KL003", "KL004", "KL005", "KL006", "KL007", "KL008"]
        );
    }

    #[test]
    fn test_descriptors_match_rules() {
        for descriptor in builtin_registry().iter() {
            let rule = (descriptor.build)(&RuleConfig::enabled()).unwrap();
            assert_eq!(rule.name(), descriptor.name);
            assert_eq!(rule.code(), descriptor.code);
            assert_eq!(rule.capability(), descriptor.capability);
        }
    }

    #[test]
    fn test_invalid_parameters_are_rejected() {
        let descriptor = builtin_registry().get("line-length").unwrap();
        let config = RuleConfig::enabled().with("max", "long");
        assert!((descriptor.build)(&config).is_err());
    }
}
