use driftlint_ast::NodeKind;
use driftlint_core::{Report, RuleListeners, RuleMeta, RuleModule, Severity};
use serde_json::Value;

/// Flags the `any` type. An explicit `any` throws away type checking and
/// is the most common shortcut in generated TypeScript; `unknown` keeps
/// the escape hatch while forcing a narrowing step.
pub struct NoExplicitAny {
    meta: RuleMeta,
}

impl NoExplicitAny {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                id: "no-explicit-any",
                description: "Disallow the `any` type",
                default_severity: Severity::Error,
                fixable: true,
                suggestions: false,
                messages: &[(
                    "unexpectedAny",
                    "Unexpected `any`. Use `unknown` and narrow the type instead",
                )],
            },
        }
    }
}

impl Default for NoExplicitAny {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleModule for NoExplicitAny {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create(&self, _options: &[Value]) -> RuleListeners {
        let mut listeners = RuleListeners::new();
        listeners.on_enter(NodeKind::PredefinedType, |ctx, node| {
            if ctx.tree().text(node) != "any" {
                return;
            }
            ctx.report(Report::new(node, "unexpectedAny").fix(move |fixer, fixes| {
                fixes.push(fixer.replace_text(node, "unknown"));
            }));
        });
        listeners
    }
}
