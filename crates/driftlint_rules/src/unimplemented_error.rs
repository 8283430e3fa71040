use driftlint_ast::NodeKind;
use driftlint_core::{Report, RuleListeners, RuleMeta, RuleModule, Severity};
use serde_json::Value;

const STUB_MARKERS: &[&str] = &[
    "not implemented",
    "unimplemented",
    "todo",
    "implement me",
    "placeholder",
    "fixme",
    "fix me",
];

/// Flags `throw new Error("not implemented")` style stubs.
pub struct UnimplementedError {
    meta: RuleMeta,
}

impl UnimplementedError {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                id: "unimplemented-error",
                description: "Disallow placeholder not-implemented throws",
                default_severity: Severity::Warn,
                fixable: false,
                suggestions: false,
                messages: &[(
                    "stubThrow",
                    "Placeholder throw ({{text}}). Finish the implementation",
                )],
            },
        }
    }
}

impl Default for UnimplementedError {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleModule for UnimplementedError {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create(&self, _options: &[Value]) -> RuleListeners {
        let mut listeners = RuleListeners::new();
        listeners.on_enter(NodeKind::ThrowStatement, |ctx, node| {
            let tree = ctx.tree();
            let Some(thrown) = tree
                .named_children(node)
                .find(|&child| tree.kind(child) == NodeKind::NewExpression)
            else {
                return;
            };
            let is_error_type = tree
                .child_by_field(thrown, "constructor")
                .is_some_and(|ctor| tree.text(ctor).ends_with("Error"));
            if !is_error_type {
                return;
            }
            let Some(arguments) = tree.child_by_field(thrown, "arguments") else {
                return;
            };
            let Some(message) = tree.named_children(arguments).next() else {
                return;
            };
            if !tree.kind(message).is_string_literal() {
                return;
            }
            let text = tree.text(message).to_lowercase();
            if STUB_MARKERS.iter().any(|marker| text.contains(marker)) {
                ctx.report(
                    Report::new(node, "stubThrow").data("text", tree.text(message)),
                );
            }
        });
        listeners
    }
}
