use driftlint_ast::NodeKind;
use driftlint_core::{Report, RuleListeners, RuleMeta, RuleModule, Severity};
use serde_json::Value;

/// Comment bodies that restate nothing. Compared after lowercasing and
/// stripping markers and trailing punctuation.
const FILLER_PHRASES: &[&str] = &[
    "helper function",
    "main logic",
    "main function",
    "do something",
    "does something",
    "handle error",
    "handle errors",
    "handle the error",
    "process data",
    "process the data",
    "update state",
    "loop through",
    "return result",
    "return the result",
    "your code here",
    "add code here",
    "code here",
    "logic here",
    "implementation",
    "initialize",
    "todo: implement",
    "todo: implement this",
    "todo implement",
    "implement this",
    "fix this",
];

/// Flags comments that carry no information, a telltale of generated
/// filler ("// helper function" above a helper function).
pub struct GenericComment {
    meta: RuleMeta,
}

impl GenericComment {
    pub fn new() -> Self {
        Self {
            meta: RuleMeta {
                id: "generic-comment",
                description: "Disallow comments that say nothing",
                default_severity: Severity::Warn,
                fixable: false,
                suggestions: false,
                messages: &[(
                    "fillerComment",
                    "Comment \"{{text}}\" adds no information. Delete it or say something specific",
                )],
            },
        }
    }
}

impl Default for GenericComment {
    fn default() -> Self {
        Self::new()
    }
}

/// Strips `//`, `/* */` and leading `*` decoration down to the body.
fn comment_body(raw: &str) -> String {
    let inner = raw
        .trim()
        .trim_start_matches("//")
        .trim_start_matches("/*")
        .trim_end_matches("*/");
    inner
        .lines()
        .map(|line| line.trim().trim_start_matches('*').trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_filler(body: &str) -> bool {
    let normalized = body
        .to_lowercase()
        .trim_end_matches(['.', '!', ':'])
        .trim()
        .to_string();
    FILLER_PHRASES.contains(&normalized.as_str())
}

impl RuleModule for GenericComment {
    fn meta(&self) -> &RuleMeta {
        &self.meta
    }

    fn create(&self, _options: &[Value]) -> RuleListeners {
        let mut listeners = RuleListeners::new();
        listeners.on_enter(NodeKind::Comment, |ctx, node| {
            let body = comment_body(ctx.tree().text(node));
            if is_filler(&body) {
                ctx.report(Report::new(node, "fillerComment").data("text", body.clone()));
            }
        });
        listeners
    }
}
