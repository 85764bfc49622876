//! Connectivity policy per node category
//!
//! Decides, for each category, whether a node must have incoming and
//! outgoing connections and how loudly a missing one is reported.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::types::NodeCategory;
use crate::validation::Severity;

/// How strongly one side of a node must be connected
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Requirement {
    /// Missing connection is an error
    Required,
    /// Missing connection is a warning
    Recommended,
    /// Missing connection is fine
    Exempt,
}

impl Requirement {
    /// Severity reported when the connection is missing, if any
    pub fn severity(&self) -> Option<Severity> {
        match self {
            Self::Required => Some(Severity::Error),
            Self::Recommended => Some(Severity::Warning),
            Self::Exempt => None,
        }
    }
}

/// Input and output requirements for one category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub input: Requirement,
    pub output: Requirement,
}

impl CategoryRule {
    pub const fn new(input: Requirement, output: Requirement) -> Self {
        Self { input, output }
    }

    /// Built-in rule for a category
    ///
    /// Sources need no input, terminal visualization/export nodes need no
    /// output, everything in between needs an input and should feed
    /// something downstream.
    pub fn default_for(category: NodeCategory) -> Self {
        use Requirement::*;

        match category {
            NodeCategory::Source => Self::new(Exempt, Recommended),
            NodeCategory::Transform | NodeCategory::Analysis | NodeCategory::Model => {
                Self::new(Required, Recommended)
            }
            NodeCategory::Visualization | NodeCategory::Export => Self::new(Required, Exempt),
        }
    }
}

/// Per-category connectivity overrides
///
/// Categories without an override use [`CategoryRule::default_for`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationPolicy {
    #[serde(default)]
    pub categories: BTreeMap<NodeCategory, CategoryRule>,
}

impl ValidationPolicy {
    /// Override the rule for one category
    pub fn with_rule(mut self, category: NodeCategory, rule: CategoryRule) -> Self {
        self.categories.insert(category, rule);
        self
    }

    /// Effective rule for a category
    pub fn rule(&self, category: NodeCategory) -> CategoryRule {
        self.categories
            .get(&category)
            .copied()
            .unwrap_or_else(|| CategoryRule::default_for(category))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules() {
        let policy = ValidationPolicy::default();
        assert_eq!(
            policy.rule(NodeCategory::Source),
            CategoryRule::new(Requirement::Exempt, Requirement::Recommended)
        );
        assert_eq!(policy.rule(NodeCategory::Export).output, Requirement::Exempt);
        assert_eq!(policy.rule(NodeCategory::Model).input, Requirement::Required);
    }

    #[test]
    fn test_override_replaces_default() {
        let policy = ValidationPolicy::default().with_rule(
            NodeCategory::Source,
            CategoryRule::new(Requirement::Exempt, Requirement::Exempt),
        );
        assert_eq!(policy.rule(NodeCategory::Source).output, Requirement::Exempt);
        assert_eq!(policy.rule(NodeCategory::Transform).input, Requirement::Required);
    }

    #[test]
    fn test_policy_from_json() {
        let policy: ValidationPolicy = serde_json::from_str(
            r#"{ "categories": { "model": { "input": "recommended", "output": "exempt" } } }"#,
        )
        .unwrap();
        assert_eq!(
            policy.rule(NodeCategory::Model),
            CategoryRule::new(Requirement::Recommended, Requirement::Exempt)
        );
    }

    #[test]
    fn test_requirement_severity() {
        assert_eq!(Requirement::Required.severity(), Some(Severity::Error));
        assert_eq!(Requirement::Recommended.severity(), Some(Severity::Warning));
        assert_eq!(Requirement::Exempt.severity(), None);
    }
}
