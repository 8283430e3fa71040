use driftlint_ast::NodeKind;
use driftlint_core::{Report, RuleListeners, RuleMeta, RuleModule, Severity};
use serde_json::Value;

const FUNCTION_KINDS: &[NodeKind] = &[
    NodeKind::FunctionDeclaration,
    NodeKind::FunctionExpression,
    NodeKind::ArrowFunction,
    NodeKind::MethodDefinition,
];

/// Flags functions whose body is an empty block or a bare `return;`, the
/// classic stubs left behind by scaffolding. A body holding only a
/// comment is considered an intentional no-op.
pub struct EmptyFunctionBody {
    meta: RuleMeta,
}

impl EmptyFunctionBody {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                id: "empty-function-body",
                description: "Disallow empty function bodies",
                default_severity: Severity::Warn,
                fixable: false,
                suggestions: false,
                messages: &[(
                    "emptyBody",
                    "Function body is empty. Implement it or document why it is a no-op",
                )],
            },
        }
    }
}

impl Default for EmptyFunctionBody {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleModule for EmptyFunctionBody {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create(&self, _options: &[Value]) -> RuleListeners {
        let mut listeners = RuleListeners::new();
        for &kind in FUNCTION_KINDS {
            listeners.on_enter(kind, |ctx, node| {
                let tree = ctx.tree();
                let Some(body) = tree.child_by_field(node, "body") else {
                    return;
                };
                // Arrow functions with expression bodies never match.
                if tree.kind(body) != NodeKind::StatementBlock {
                    return;
                }
                let statements: Vec<_> = tree.named_children(body).collect();
                let is_stub = match statements.as_slice() {
                    [] => true,
                    [only] => {
                        // `return;` with no value is as empty as {}.
                        tree.kind(*only) == NodeKind::ReturnStatement
                            && tree.named_children(*only).next().is_none()
                    }
                    _ => false,
                };
                if is_stub {
                    ctx.report(Report::new(node, "emptyBody").at(tree.span(body)));
                }
            });
        }
        listeners
    }
}
