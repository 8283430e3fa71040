//! Lint configuration: per-rule severity and options.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::diagnostic::Severity;
use crate::error::LinterError;
use crate::rule::RuleMeta;

/// One rule's entry in a config file.
///
/// Either a bare severity token (`"no-explicit-any": "error"`) or an
/// array whose first element is the severity and whose remaining
/// elements are rule options
/// (`"magic-numbers": ["warn", {"allow": [0, 1]}]`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RuleSetting {
    Severity(String),
    WithOptions(Vec<Value>),
}

/// A [`RuleSetting`] resolved to its parts.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedRule {
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl NormalizedRule {
    pub fn from_default(meta: &RuleMeta) -> Self {
        Self {
            severity: meta.default_severity,
            options: Vec::new(),
        }
    }
}

impl RuleSetting {
    /// Splits the setting into severity and options.
    ///
    /// Unknown severity tokens resolve to [`Severity::Off`], as does an
    /// options array whose first element is not a severity string.
    pub fn normalize(&self) -> NormalizedRule {
        match self {
            Self::Severity(token) => NormalizedRule {
                severity: Severity::parse_lenient(token),
                options: Vec::new(),
            },
            Self::WithOptions(values) => {
                let severity = match values.first() {
                    Some(Value::String(token)) => Severity::parse_lenient(token),
                    _ => {
                        tracing::warn!("rule options array missing severity, treating as off");
                        Severity::Off
                    }
                };
                NormalizedRule {
                    severity,
                    options: values.iter().skip(1).cloned().collect(),
                }
            }
        }
    }
}

/// Complete lint configuration.
///
/// Kept as a sorted map so iteration and serialization are stable.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LintConfig {
    #[serde(default)]
    pub rules: BTreeMap<String, RuleSetting>,
}

impl LintConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a config from its JSON document form.
    pub fn from_json(text: &str) -> Result<Self, LinterError> {
        serde_json::from_str(text).map_err(|err| LinterError::config(err.to_string()))
    }

    pub fn with_rule(mut self, id: impl Into<String>, setting: RuleSetting) -> Self {
        self.rules.insert(id.into(), setting);
        self
    }

    /// Overlays `other` on top of this config.
    ///
    /// Merging is shallow and per rule id: a rule present in `other`
    /// replaces the base entry entirely, options included. Options are
    /// never merged element-wise.
    pub fn merge(mut self, other: LintConfig) -> Self {
        self.rules.extend(other.rules);
        self
    }

    /// Resolves the effective severity and options for a rule.
    ///
    /// Rules absent from the config run at their default severity, so an
    /// empty config still lints with every registered rule.
    pub fn resolve(&self, meta: &RuleMeta) -> NormalizedRule {
        match self.rules.get(meta.id) {
            Some(setting) => setting.normalize(),
            None => NormalizedRule::from_default(meta),
        }
    }
}
