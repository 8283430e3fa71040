use std::sync::Arc;

use tracing::warn;

use crate::rule::RuleModule;

/// Ordered collection of registered rules.
///
/// Iteration order is registration order, which makes lint output and
/// listener dispatch deterministic. Registering a rule whose id is
/// already present replaces the earlier one in place.
#[derive(Default, Clone)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn RuleModule>>,
}

impl RuleRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, rule: Arc<dyn RuleModule>) {
        let id = rule.meta().id;
        match self.rules.iter().position(|existing| existing.meta().id == id) {
            Some(index) => {
                warn!(rule = id, "rule id already registered, replacing");
                self.rules[index] = rule;
            }
            None => self.rules.push(rule),
        }
    }

    pub fn get(&self, id: &str) -> Option<&Arc<dyn RuleModule>> {
        self.rules.iter().find(|rule| rule.meta().id == id)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Arc<dyn RuleModule>> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|rule| rule.meta().id).collect()
    }
}

impl std::fmt::Debug for RuleRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleRegistry")
            .field("rules", &self.rule_ids())
            .finish()
    }
}
