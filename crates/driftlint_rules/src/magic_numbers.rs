use std::collections::HashSet;

use driftlint_ast::{NodeId, NodeKind, SyntaxTree};
use driftlint_core::{
    Report, RuleListeners, RuleMeta, RuleModule, Severity, SuggestionDescriptor,
};
use serde_json::Value;

/// Values common enough that naming them adds nothing.
const ALLOWED_VALUES: &[f64] = &[0.0, 1.0, -1.0, 2.0, 10.0, 100.0, 1000.0];

/// Flags numeric literals that carry meaning only the author knows, like
/// `setTimeout(cb, 5000)` or `status === 404`.
///
/// Numbers escape the rule when they initialize a SCREAMING_CASE
/// declarator (that is the named constant the rule asks for), index into
/// a collection, or sit inside an array literal.
///
/// Options: `{"allow": [404, 8080]}` adds values to the default allow
/// set.
pub struct MagicNumbers {
    meta: RuleMeta,
}

impl MagicNumbers {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                id: "magic-numbers",
                description: "Disallow unexplained numeric literals",
                default_severity: Severity::Warn,
                fixable: false,
                suggestions: true,
                messages: &[
                    (
                        "noMagic",
                        "Magic number {{value}} should be a named constant",
                    ),
                    ("extractConstant", "Extract {{value}} into a named constant"),
                ],
            },
        }
    }
}

impl Default for MagicNumbers {
    fn default() -> Self {
        Self::new()
    }
}

fn allowed_values(options: &[Value]) -> HashSet<u64> {
    let mut allowed: HashSet<u64> = ALLOWED_VALUES.iter().map(|v| v.to_bits()).collect();
    if let Some(values) = options
        .first()
        .and_then(|opt| opt.get("allow"))
        .and_then(Value::as_array)
    {
        allowed.extend(values.iter().filter_map(Value::as_f64).map(f64::to_bits));
    }
    allowed
}

/// True when the literal initializes a declarator whose name already
/// reads as a constant (`const HTTP_OK = 200`).
fn is_named_constant_value(tree: &SyntaxTree, node: NodeId) -> bool {
    let Some(declarator) = tree
        .parent(node)
        .filter(|&p| tree.kind(p) == NodeKind::VariableDeclarator)
    else {
        return false;
    };
    if tree.child_by_field(declarator, "value") != Some(node) {
        return false;
    }
    tree.child_by_field(declarator, "name")
        .filter(|&name| tree.kind(name) == NodeKind::Identifier)
        .is_some_and(|name| {
            let text = tree.text(name);
            text.chars().any(|c| c.is_ascii_uppercase())
                && text
                    .chars()
                    .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_')
        })
}

impl RuleModule for MagicNumbers {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create(&self, options: &[Value]) -> RuleListeners {
        let allowed = allowed_values(options);
        let mut listeners = RuleListeners::new();
        listeners.on_enter(NodeKind::Number, move |ctx, node| {
            let tree = ctx.tree();
            let text = tree.text(node);
            let Ok(value) = text.parse::<f64>() else {
                return;
            };
            if allowed.contains(&value.to_bits()) {
                return;
            }
            match tree.parent(node).map(|p| tree.kind(p)) {
                Some(NodeKind::Array) | Some(NodeKind::SubscriptExpression) => return,
                _ => {}
            }
            if is_named_constant_value(tree, node) {
                return;
            }

            ctx.report(
                Report::new(node, "noMagic")
                    .data("value", text)
                    .suggest(SuggestionDescriptor::new("extractConstant").data("value", text)),
            );
        });
        listeners
    }
}
