use driftlint_ast::{NodeId, NodeKind, SyntaxTree};
use driftlint_core::{Report, RuleContext, RuleListeners, RuleMeta, RuleModule, Severity};
use serde_json::Value;

const SENSITIVE_MARKERS: &[&str] = &[
    "password",
    "passwd",
    "secret",
    "token",
    "apikey",
    "api_key",
    "credential",
    "private_key",
    "privatekey",
];

/// Flags string literals assigned to names that look like credentials.
///
/// Only plain string values count; reading from the environment or a
/// config object is fine.
pub struct HardcodedCredentials {
    meta: RuleMeta,
}

impl HardcodedCredentials {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                id: "hardcoded-credentials",
                description: "Disallow credentials embedded in source",
                default_severity: Severity::Error,
                fixable: false,
                suggestions: false,
                messages: &[(
                    "hardcoded",
                    "`{{name}}` looks like a hardcoded credential. Load it from the environment",
                )],
            },
        }
    }
}

impl Default for HardcodedCredentials {
    fn default() -> Self {
        Self::new()
    }
}

fn looks_sensitive(name: &str) -> bool {
    let lowered = name.to_lowercase();
    SENSITIVE_MARKERS.iter().any(|marker| lowered.contains(marker))
}

/// Obvious fill-me-in values that are not live credentials.
fn is_placeholder(value: &str) -> bool {
    let normalized = value.trim().to_lowercase();
    normalized.is_empty()
        || (normalized.starts_with('<') && normalized.ends_with('>'))
        || normalized.starts_with("your-")
        || normalized.starts_with("your_")
        || [
            "changeme",
            "change-me",
            "placeholder",
            "dummy",
            "example",
            "xxx",
            "todo",
            "***",
        ]
        .contains(&normalized.as_str())
}

/// A non-empty, non-placeholder plain string literal. Template strings
/// are skipped since they usually interpolate a real source.
fn is_literal_secret(tree: &SyntaxTree, value: NodeId) -> bool {
    if tree.kind(value) != NodeKind::String {
        return false;
    }
    tree.named_children(value)
        .find(|&child| tree.kind(child) == NodeKind::StringFragment)
        .is_some_and(|fragment| !is_placeholder(tree.text(fragment)))
}

fn check(ctx: &mut RuleContext<'_>, name_node: NodeId, value: NodeId) {
    let tree = ctx.tree();
    let name = tree.text(name_node);
    if looks_sensitive(name) && is_literal_secret(tree, value) {
        ctx.report(Report::new(value, "hardcoded").data("name", name));
    }
}

impl RuleModule for HardcodedCredentials {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create(&self, _options: &[Value]) -> RuleListeners {
        let mut listeners = RuleListeners::new();
        listeners.on_enter(NodeKind::VariableDeclarator, |ctx, node| {
            let tree = ctx.tree();
            let (Some(name_node), Some(value)) = (
                tree.child_by_field(node, "name"),
                tree.child_by_field(node, "value"),
            ) else {
                return;
            };
            if tree.kind(name_node) == NodeKind::Identifier {
                check(ctx, name_node, value);
            }
        });
        listeners.on_enter(NodeKind::Pair, |ctx, node| {
            let tree = ctx.tree();
            let (Some(key), Some(value)) = (
                tree.child_by_field(node, "key"),
                tree.child_by_field(node, "value"),
            ) else {
                return;
            };
            check(ctx, key, value);
        });
        listeners.on_enter(NodeKind::AssignmentExpression, |ctx, node| {
            let tree = ctx.tree();
            let (Some(left), Some(right)) = (
                tree.child_by_field(node, "left"),
                tree.child_by_field(node, "right"),
            ) else {
                return;
            };
            let name_node = match tree.kind(left) {
                NodeKind::Identifier => left,
                NodeKind::MemberExpression => match tree.child_by_field(left, "property") {
                    Some(property) => property,
                    None => return,
                },
                _ => return,
            };
            check(ctx, name_node, right);
        });
        listeners
    }
}
