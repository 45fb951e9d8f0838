//! Rule registry: metadata and constructors of available rules.

use crate::config::{ConfigError, RuleConfig};
use crate::rule::{Capability, RuleBox};
use crate::types::Severity;

/// Constructor of a rule from its configuration.
pub type RuleConstructor = fn(&RuleConfig) -> Result<RuleBox, ConfigError>;

/// Static description of a rule.
#[derive(Debug, Clone, Copy)]
pub struct RuleDescriptor {
    /// Kebab-case rule name.
    pub name: &'static str,
    /// Rule code (e.g., "KL004").
    pub code: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// What the rule inspects.
    pub capability: Capability,
    /// Whether violations carry fixes.
    pub fixable: bool,
    /// Severity used when the profile sets none.
    pub default_severity: Severity,
    /// Builds the rule from its configuration.
    pub build: RuleConstructor,
}

/// Ordered collection of rule descriptors.
///
/// Order is significant: the engine runs rules in registry order.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    descriptors: Vec<RuleDescriptor>,
}

impl Registry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a descriptor.
    #[must_use]
    pub fn with(mut self, descriptor: RuleDescriptor) -> Self {
        self.descriptors.push(descriptor);
        self
    }

    /// Iterates over descriptors in registry order.
    pub fn iter(&self) -> impl Iterator<Item = &RuleDescriptor> {
        self.descriptors.iter()
    }

    /// Number of registered rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    /// True if no rule is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Looks a rule up by name or code (codes match case-insensitively).
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RuleDescriptor> {
        self.descriptors
            .iter()
            .find(|d| d.name == key || d.code.eq_ignore_ascii_case(key))
    }

    /// Resolves a list of names or codes to rule names.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRule`] for the first key that matches no
    /// rule.
    pub fn resolve_names<'k>(
        &self,
        keys: impl IntoIterator<Item = &'k str>,
    ) -> Result<Vec<&'static str>, ConfigError> {
        keys.into_iter()
            .map(|key| {
                self.get(key.trim())
                    .map(|d| d.name)
                    .ok_or_else(|| ConfigError::UnknownRule(key.trim().to_string()))
            })
            .collect()
    }
}
