use driftlint_ast::{NodeId, NodeKind, Span, SyntaxTree};
use driftlint_core::{Report, RuleListeners, RuleMeta, RuleModule, Severity, SuggestionDescriptor};
use serde_json::Value;

/// An expression statement calling `console.<anything>`.
fn is_console_statement(tree: &SyntaxTree, statement: NodeId) -> bool {
    if tree.kind(statement) != NodeKind::ExpressionStatement {
        return false;
    }
    let Some(call) = tree
        .named_children(statement)
        .find(|&child| tree.kind(child) == NodeKind::CallExpression)
    else {
        return false;
    };
    let Some(callee) = tree.child_by_field(call, "function") else {
        return false;
    };
    tree.kind(callee) == NodeKind::MemberExpression
        && tree
            .child_by_field(callee, "object")
            .is_some_and(|object| tree.text(object) == "console")
}

/// Flags `catch` blocks that swallow the error: an empty body, or a body
/// whose only statement dumps the error to the console and moves on.
///
/// A catch body containing only a comment is treated as a deliberate
/// decision and left alone.
pub struct EmptyCatchBlock {
    meta: RuleMeta,
}

impl EmptyCatchBlock {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                id: "empty-catch-block",
                description: "Disallow empty catch blocks",
                default_severity: Severity::Error,
                fixable: false,
                suggestions: true,
                messages: &[
                    (
                        "emptyCatch",
                        "Empty catch block silently swallows errors. Handle or rethrow",
                    ),
                    (
                        "logOnlyCatch",
                        "Catch block only logs the error. Handle or rethrow after logging",
                    ),
                    ("rethrow", "Rethrow the caught error"),
                ],
            },
        }
    }
}

impl Default for EmptyCatchBlock {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleModule for EmptyCatchBlock {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create(&self, _options: &[Value]) -> RuleListeners {
        let mut listeners = RuleListeners::new();
        listeners.on_enter(NodeKind::CatchClause, |ctx, node| {
            let tree = ctx.tree();
            let Some(body) = tree.child_by_field(node, "body") else {
                return;
            };
            // Comments are named children, so a commented body counts as
            // non-empty here.
            let statements: Vec<_> = tree.named_children(body).collect();
            let message_id = match statements.as_slice() {
                [] => "emptyCatch",
                [only] if is_console_statement(tree, *only) => "logOnlyCatch",
                _ => return,
            };

            let body_span = tree.span(body);
            let brace = Span::new(body_span.start, body_span.start + 1);

            let parameter = tree
                .child_by_field(node, "parameter")
                .filter(|&p| tree.kind(p) == NodeKind::Identifier)
                .map(|p| tree.text(p).to_string());

            let mut report = Report::new(node, message_id).at(brace);
            if let Some(name) = parameter.filter(|_| message_id == "emptyCatch") {
                report = report.suggest(SuggestionDescriptor::new("rethrow").fix(
                    move |fixer, fixes| {
                        fixes.push(fixer.replace_span(body_span, format!("{{ throw {name}; }}")));
                    },
                ));
            }
            ctx.report(report);
        });
        listeners
    }
}
