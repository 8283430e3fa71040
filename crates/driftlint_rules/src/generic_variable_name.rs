use std::collections::HashSet;

use driftlint_ast::NodeKind;
use driftlint_core::{Report, RuleListeners, RuleMeta, RuleModule, Severity};
use serde_json::Value;

const GENERIC_NAMES: &[&str] = &[
    "data", "data2", "temp", "tmp", "result", "res", "obj", "item", "val", "foo", "bar",
];

/// Flags variables with throwaway names like `data` or `temp`.
///
/// Options: `{"allow": ["data"]}` removes names from the default set.
pub struct GenericVariableName {
    meta: RuleMeta,
}

impl GenericVariableName {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                id: "generic-variable-name",
                description: "Disallow meaningless variable names",
                default_severity: Severity::Info,
                fixable: false,
                suggestions: false,
                messages: &[(
                    "genericName",
                    "Variable name `{{name}}` says nothing. Name it after what it holds",
                )],
            },
        }
    }
}

impl Default for GenericVariableName {
    fn default() -> Self {
        Self::new()
    }
}

fn allowed_names(options: &[Value]) -> HashSet<String> {
    options
        .first()
        .and_then(|opt| opt.get("allow"))
        .and_then(Value::as_array)
        .map(|names| {
            names
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}

impl RuleModule for GenericVariableName {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create(&self, options: &[Value]) -> RuleListeners {
        let allowed = allowed_names(options);
        let mut listeners = RuleListeners::new();
        listeners.on_enter(NodeKind::VariableDeclarator, move |ctx, node| {
            let tree = ctx.tree();
            let Some(name_node) = tree.child_by_field(node, "name") else {
                return;
            };
            if tree.kind(name_node) != NodeKind::Identifier {
                return;
            }
            let name = tree.text(name_node);
            if allowed.contains(name) {
                return;
            }
            if GENERIC_NAMES.contains(&name) {
                ctx.report(
                    Report::new(name_node, "genericName").data("name", name),
                );
            }
        });
        listeners
    }
}
