//! Built-in rules.
//!
//! Each module hosts one rule targeting a pattern typical of code that
//! was generated or pasted in a hurry: placeholder names, swallowed
//! errors, leftover debugging, stub bodies and the like.

use std::sync::Arc;

use driftlint_core::{LintConfig, RuleModule, RuleRegistry, RuleSetting, Severity};

mod console_log_debugging;
mod empty_catch_block;
mod empty_function_body;
mod generic_comment;
mod generic_variable_name;
mod hardcoded_credentials;
mod magic_numbers;
mod no_explicit_any;
mod unimplemented_error;

pub use console_log_debugging::ConsoleLogDebugging;
pub use empty_catch_block::EmptyCatchBlock;
pub use empty_function_body::EmptyFunctionBody;
pub use generic_comment::GenericComment;
pub use generic_variable_name::GenericVariableName;
pub use hardcoded_credentials::HardcodedCredentials;
pub use magic_numbers::MagicNumbers;
pub use no_explicit_any::NoExplicitAny;
pub use unimplemented_error::UnimplementedError;

/// A registry pre-loaded with every built-in rule at its default
/// severity.
pub fn builtin_registry() -> RuleRegistry {
    let mut registry = RuleRegistry::new();
    registry.register(Arc::new(NoExplicitAny::new()));
    registry.register(Arc::new(EmptyCatchBlock::new()));
    registry.register(Arc::new(HardcodedCredentials::new()));
    registry.register(Arc::new(ConsoleLogDebugging::new()));
    registry.register(Arc::new(EmptyFunctionBody::new()));
    registry.register(Arc::new(UnimplementedError::new()));
    registry.register(Arc::new(MagicNumbers::new()));
    registry.register(Arc::new(GenericComment::new()));
    registry.register(Arc::new(GenericVariableName::new()));
    registry
}

/// The default severity table as an explicit config layer.
///
/// An empty [`LintConfig`] already resolves to the same severities, this
/// exists so callers can serialize the defaults or use them as the base
/// layer under shared and local configs.
pub fn default_rule_config() -> LintConfig {
    let mut config = LintConfig::new();
    for rule in builtin_registry().iter() {
        let meta = rule.meta();
        config = config.with_rule(
            meta.id,
            RuleSetting::Severity(meta.default_severity.as_str().to_string()),
        );
    }
    config
}

/// A layer that raises every built-in rule to `error`.
///
/// Meant to be merged on top of [`default_rule_config`] for CI runs where
/// any finding should block.
pub fn strict_preset() -> LintConfig {
    let mut config = LintConfig::new();
    for rule in builtin_registry().iter() {
        config = config.with_rule(
            rule.meta().id,
            RuleSetting::Severity(Severity::Error.as_str().to_string()),
        );
    }
    config
}

/// A layer that keeps only the error-by-default rules, downgraded to
/// warnings, and switches the rest off.
pub fn relaxed_preset() -> LintConfig {
    let mut config = LintConfig::new();
    for rule in builtin_registry().iter() {
        let meta = rule.meta();
        let severity = match meta.default_severity {
            Severity::Error => Severity::Warn,
            _ => Severity::Off,
        };
        config = config.with_rule(
            meta.id,
            RuleSetting::Severity(severity.as_str().to_string()),
        );
    }
    config
}
