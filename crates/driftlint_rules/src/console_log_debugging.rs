use driftlint_ast::{NodeId, NodeKind, SyntaxTree};
use driftlint_core::{Report, RuleListeners, RuleMeta, RuleModule, Severity, SuggestionDescriptor};
use serde_json::Value;

const DEBUG_METHODS: &[&str] = &["log", "debug", "dir", "table"];

/// String payloads that only ever come from poking at a bug.
const DEBUG_MARKERS: &[&str] = &["here", "test", "wtf", "asdf", "debug", "???", "!!!"];

/// Flags `console.log` style calls that look like leftover debugging: a
/// marker string ("here", "----"), or a single bare variable dumped to
/// the console. Deliberate logging with a real message is left alone,
/// as are `console.warn` and `console.error`.
pub struct ConsoleLogDebugging {
    meta: RuleMeta,
}

impl ConsoleLogDebugging {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                id: "console-log-debugging",
                description: "Disallow leftover console debugging calls",
                default_severity: Severity::Warn,
                fixable: false,
                suggestions: true,
                messages: &[
                    (
                        "consoleCall",
                        "Leftover console.{{method}} debugging. Remove it or log a real message",
                    ),
                    ("removeCall", "Remove the console call"),
                ],
            },
        }
    }
}

impl Default for ConsoleLogDebugging {
    fn default() -> Self {
        Self::new()
    }
}

/// A run of three or more separator characters reads as a visual marker.
fn is_separator_run(text: &str) -> bool {
    text.len() >= 3 && text.chars().all(|c| "-=*#_~.".contains(c))
}

fn is_debug_marker(text: &str) -> bool {
    let normalized = text.trim().to_lowercase();
    DEBUG_MARKERS.contains(&normalized.as_str()) || is_separator_run(&normalized)
}

/// The inner text of a plain string literal, if that is what this is.
fn string_payload(tree: &SyntaxTree, node: NodeId) -> Option<&str> {
    if tree.kind(node) != NodeKind::String {
        return None;
    }
    tree.named_children(node)
        .find(|&child| tree.kind(child) == NodeKind::StringFragment)
        .map(|fragment| tree.text(fragment))
}

fn looks_like_debugging(tree: &SyntaxTree, arguments: NodeId) -> bool {
    let args: Vec<NodeId> = tree.named_children(arguments).collect();
    if args.len() == 1 && tree.kind(args[0]) == NodeKind::Identifier {
        return true;
    }
    args.iter()
        .any(|&arg| string_payload(tree, arg).is_some_and(is_debug_marker))
}

impl RuleModule for ConsoleLogDebugging {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create(&self, _options: &[Value]) -> RuleListeners {
        let mut listeners = RuleListeners::new();
        listeners.on_enter(NodeKind::CallExpression, |ctx, node| {
            let tree = ctx.tree();
            let Some(callee) = tree.child_by_field(node, "function") else {
                return;
            };
            if tree.kind(callee) != NodeKind::MemberExpression {
                return;
            }
            let Some(object) = tree.child_by_field(callee, "object") else {
                return;
            };
            if tree.kind(object) != NodeKind::Identifier || tree.text(object) != "console" {
                return;
            }
            let Some(property) = tree.child_by_field(callee, "property") else {
                return;
            };
            let method = tree.text(property);
            if !DEBUG_METHODS.contains(&method) {
                return;
            }
            let Some(arguments) = tree.child_by_field(node, "arguments") else {
                return;
            };
            if !looks_like_debugging(tree, arguments) {
                return;
            }

            // Removing the whole statement keeps the fix syntactically
            // sound; removing just the call would leave a stray semicolon.
            let statement = tree
                .parent(node)
                .filter(|&p| tree.kind(p) == NodeKind::ExpressionStatement);

            let mut report = Report::new(node, "consoleCall").data("method", method);
            if let Some(statement) = statement {
                report = report.suggest(SuggestionDescriptor::new("removeCall").fix(
                    move |fixer, fixes| {
                        fixes.push(fixer.remove(statement));
                    },
                ));
            }
            ctx.report(report);
        });
        listeners
    }
}
