//! The driftlint engine: rule dispatch, diagnostics, configuration and
//! fix application.
//!
//! A [`Linter`] owns a [`RuleRegistry`] and a [`LintConfig`]. Per file it
//! parses the source, instantiates each enabled rule's listeners, walks
//! the tree exactly once dispatching events from a prebuilt index, and
//! collects the reported [`Diagnostic`]s into a [`LintResult`]. Fixes are
//! applied separately through [`fixer`], which verifies a batch before
//! any text changes.

mod batch;
mod config;
mod context;
mod diagnostic;
mod error;
pub mod fixer;
mod linter;
mod registry;
mod result;
mod rule;

pub use batch::{lint_files, lint_files_with_summary};
pub use config::{LintConfig, NormalizedRule, RuleSetting};
pub use context::{Report, RuleContext, RuleFixer, SuggestionDescriptor};
pub use diagnostic::{Diagnostic, Fix, FixList, Severity, Suggestion};
pub use error::LinterError;
pub use linter::{Linter, INTERNAL_RULE_ID, PARSE_ERROR_RULE_ID};
pub use registry::RuleRegistry;
pub use result::{LintResult, LintSummary};
pub use rule::{Event, NodeHandler, RuleListeners, RuleMeta, RuleModule};
