//! Rule registry and built-in rules.
//!
//! A [`RuleDefinition`] is stateless: key plus a constructor. Every
//! `analyze` call builds fresh rule instances from the request's
//! selection, so concurrent runs never share rule state.

mod debugger;
pub(crate) mod highlight;
pub(crate) mod metrics;
mod parameters;
mod regex_checks;
mod todos;

pub use highlight::HighlightCollector;
pub use metrics::MetricsCollector;

use once_cell::sync::Lazy;
use serde_json::Value;

use crate::visit::Rule;

/// Declarative description of one selectable rule.
pub struct RuleDefinition {
    /// Stable key used in `ruleSelection`.
    pub key: &'static str,
    /// Builds a fresh per-run instance from the rule's configuration.
    pub build: fn(&Value) -> Box<dyn Rule>,
}

static REGISTRY: Lazy<Vec<RuleDefinition>> = Lazy::new(|| {
    vec![
        RuleDefinition {
            key: regex_checks::KEY,
            build: regex_checks::build,
        },
        RuleDefinition {
            key: todos::KEY,
            build: todos::build,
        },
        RuleDefinition {
            key: debugger::KEY,
            build: debugger::build,
        },
        RuleDefinition {
            key: parameters::KEY,
            build: parameters::build,
        },
    ]
});

/// All registered rule definitions, in registration order.
pub fn registry() -> &'static [RuleDefinition] {
    &REGISTRY
}

/// Look up one definition by key.
pub fn definition(key: &str) -> Option<&'static RuleDefinition> {
    REGISTRY.iter().find(|d| d.key == key)
}

/// Keys of every registered rule, in registration order. Used by the CLI
/// when the orchestrator did not narrow the selection.
pub fn all_keys() -> Vec<&'static str> {
    REGISTRY.iter().map(|d| d.key).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_keys_are_unique() {
        let keys = all_keys();
        let mut deduped = keys.clone();
        deduped.sort_unstable();
        deduped.dedup();
        assert_eq!(keys.len(), deduped.len());
    }

    #[test]
    fn test_definition_lookup() {
        assert!(definition("no-empty-alternative").is_some());
        assert!(definition("no-such-rule").is_none());
    }
}
