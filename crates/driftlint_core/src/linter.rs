//! The lint orchestrator: one traversal per file, all rules dispatched
//! from a prebuilt listener index.

use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::Path;

use tracing::{debug, error};

use driftlint_ast::{NodeId, NodeKind, Span, SyntaxTree};
use driftlint_parser::Parser;

use crate::config::LintConfig;
use crate::context::RuleContext;
use crate::diagnostic::{Diagnostic, Severity};
use crate::registry::RuleRegistry;
use crate::result::LintResult;
use crate::rule::{Event, NodeHandler};

/// Rule id stamped on diagnostics the engine fabricates for a file that
/// could not be parsed at all.
pub const PARSE_ERROR_RULE_ID: &str = "parse-error";

/// Rule id stamped on diagnostics the engine fabricates when a rule
/// panics.
pub const INTERNAL_RULE_ID: &str = "internal";

/// Drives the registered rules over source files.
pub struct Linter {
    registry: RuleRegistry,
    config: LintConfig,
}

/// One rule's state while a file is traversed.
struct RuleRun<'a> {
    rule_id: &'static str,
    ctx: RuleContext<'a>,
    handlers: Vec<(Event, NodeHandler)>,
    /// Set after a listener panic; no further listeners of this rule run
    /// for the rest of the file.
    poisoned: bool,
}

/// Listener lookup built once per file. Entries are `(rule, handler)`
/// index pairs in dispatch order.
#[derive(Default)]
struct DispatchIndex {
    enter: HashMap<NodeKind, Vec<(usize, usize)>>,
    exit: HashMap<NodeKind, Vec<(usize, usize)>>,
    any: Vec<(usize, usize)>,
}

enum Step {
    Enter(NodeId),
    Exit(NodeId),
}

impl Linter {
    pub fn new(registry: RuleRegistry, config: LintConfig) -> Self {
        for id in config.rules.keys() {
            if registry.get(id).is_none() {
                tracing::warn!(rule = %id, "config names an unknown rule, entry ignored");
            }
        }
        Self { registry, config }
    }

    pub fn registry(&self) -> &RuleRegistry {
        &self.registry
    }

    pub fn config(&self) -> &LintConfig {
        &self.config
    }

    /// Lints one file's source text.
    ///
    /// Never fails: unparseable input and panicking rules both surface as
    /// diagnostics on the result instead of errors.
    pub fn lint_source(&self, parser: &dyn Parser, path: &Path, source: &str) -> LintResult {
        let tree = match parser.parse(path, source) {
            Ok(tree) => tree,
            Err(err) => {
                debug!(path = %path.display(), %err, "parse failed");
                return LintResult::from_diagnostics(path, vec![parse_failure(path, &err)]);
            }
        };
        self.lint_tree(&tree, path)
    }

    /// Lints an already-parsed tree.
    pub fn lint_tree(&self, tree: &SyntaxTree, path: &Path) -> LintResult {
        let mut synthetic: Vec<Diagnostic> = Vec::new();
        let mut runs = self.instantiate_rules(tree, path, &mut synthetic);
        let index = build_index(&runs);

        let mut stack = vec![Step::Enter(tree.root())];
        while let Some(step) = stack.pop() {
            match step {
                Step::Enter(id) => {
                    let kind = tree.kind(id);
                    if let Some(entries) = index.enter.get(&kind) {
                        dispatch(&mut runs, entries, id, path, &mut synthetic);
                    }
                    dispatch(&mut runs, &index.any, id, path, &mut synthetic);

                    stack.push(Step::Exit(id));
                    let children: Vec<NodeId> = tree.named_children(id).collect();
                    for child in children.into_iter().rev() {
                        stack.push(Step::Enter(child));
                    }
                }
                Step::Exit(id) => {
                    if let Some(entries) = index.exit.get(&tree.kind(id)) {
                        dispatch(&mut runs, entries, id, path, &mut synthetic);
                    }
                }
            }
        }

        let mut diagnostics: Vec<Diagnostic> = Vec::new();
        for run in &mut runs {
            diagnostics.extend(run.ctx.take_diagnostics());
        }
        diagnostics.extend(synthetic);
        diagnostics.sort_by_key(|d| (d.span.start, d.span.end));

        LintResult::from_diagnostics(path, diagnostics)
    }

    /// Resolves config for every registered rule and calls `create` on the
    /// enabled ones. Rules at `off` are never instantiated; a panicking
    /// factory becomes a synthetic diagnostic.
    fn instantiate_rules<'a>(
        &'a self,
        tree: &'a SyntaxTree,
        path: &'a Path,
        synthetic: &mut Vec<Diagnostic>,
    ) -> Vec<RuleRun<'a>> {
        let mut runs = Vec::new();
        for rule in self.registry.iter() {
            let meta = rule.meta();
            let normalized = self.config.resolve(meta);
            if normalized.severity == Severity::Off {
                continue;
            }

            let options = normalized.options;
            let listeners =
                match catch_unwind(AssertUnwindSafe(|| rule.create(&options))) {
                    Ok(listeners) => listeners,
                    Err(payload) => {
                        error!(rule = meta.id, "rule factory panicked");
                        synthetic.push(rule_panic(path, meta.id, &payload));
                        continue;
                    }
                };
            if listeners.is_empty() {
                continue;
            }

            runs.push(RuleRun {
                rule_id: meta.id,
                ctx: RuleContext::new(tree, path, meta, normalized.severity, options),
                handlers: listeners.into_handlers(),
                poisoned: false,
            });
        }
        runs
    }
}

fn build_index(runs: &[RuleRun<'_>]) -> DispatchIndex {
    let mut index = DispatchIndex::default();
    for (rule_idx, run) in runs.iter().enumerate() {
        for (handler_idx, (event, _)) in run.handlers.iter().enumerate() {
            match event {
                Event::Enter(kind) => index
                    .enter
                    .entry(*kind)
                    .or_default()
                    .push((rule_idx, handler_idx)),
                Event::Exit(kind) => index
                    .exit
                    .entry(*kind)
                    .or_default()
                    .push((rule_idx, handler_idx)),
                Event::AnyNode => index.any.push((rule_idx, handler_idx)),
            }
        }
    }
    index
}

/// Runs the indexed handlers for one node, isolating panics per rule.
fn dispatch(
    runs: &mut [RuleRun<'_>],
    entries: &[(usize, usize)],
    node: NodeId,
    path: &Path,
    synthetic: &mut Vec<Diagnostic>,
) {
    for &(rule_idx, handler_idx) in entries {
        let run = &mut runs[rule_idx];
        if run.poisoned {
            continue;
        }
        let (_, handler) = &mut run.handlers[handler_idx];
        let ctx = &mut run.ctx;
        if let Err(payload) = catch_unwind(AssertUnwindSafe(|| handler(ctx, node))) {
            error!(rule = run.rule_id, "rule listener panicked");
            run.poisoned = true;
            synthetic.push(rule_panic(path, run.rule_id, &payload));
        }
    }
}

fn parse_failure(path: &Path, err: &driftlint_parser::ParseError) -> Diagnostic {
    Diagnostic::new(
        path,
        1,
        1,
        Span::empty(0),
        Severity::Error,
        PARSE_ERROR_RULE_ID,
        format!("File could not be parsed: {err}"),
    )
}

fn rule_panic(path: &Path, rule_id: &str, payload: &(dyn std::any::Any + Send)) -> Diagnostic {
    let detail = payload
        .downcast_ref::<&str>()
        .map(|s| (*s).to_string())
        .or_else(|| payload.downcast_ref::<String>().cloned())
        .unwrap_or_else(|| "unknown panic".to_string());
    Diagnostic::new(
        path,
        1,
        1,
        Span::empty(0),
        Severity::Error,
        INTERNAL_RULE_ID,
        format!("Rule '{rule_id}' crashed and was skipped: {detail}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RuleSetting;
    use crate::context::Report;
    use crate::rule::{RuleListeners, RuleMeta, RuleModule};
    use driftlint_parser::{ParseError, TypeScriptParser};
    use pretty_assertions::assert_eq;
    use serde_json::Value;
    use std::path::PathBuf;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Reports every call expression it enters.
    struct CallCounter {
        meta: RuleMeta,
        created: Arc<AtomicUsize>,
    }

    impl CallCounter {
        fn new(created: Arc<AtomicUsize>) -> Self {
            Self {
                meta: RuleMeta {
                    id: "call-counter",
                    description: "reports call expressions",
                    default_severity: Severity::Warn,
                    fixable: false,
                    suggestions: false,
                    messages: &[("call", "Call found")],
                },
                created,
            }
        }
    }

    impl RuleModule for CallCounter {
        fn meta(&self) -> &RuleMeta {
            &self.meta
        }

        fn create(&self, _options: &[Value]) -> RuleListeners {
            self.created.fetch_add(1, Ordering::SeqCst);
            let mut listeners = RuleListeners::new();
            listeners.on_enter(NodeKind::CallExpression, |ctx, node| {
                ctx.report(Report::new(node, "call"));
            });
            listeners
        }
    }

    /// Panics on the first call expression it sees.
    struct Panicky(RuleMeta);

    impl Panicky {
        fn new() -> Self {
            Self(RuleMeta {
                id: "panicky",
                description: "always panics",
                default_severity: Severity::Warn,
                fixable: false,
                suggestions: false,
                messages: &[],
            })
        }
    }

    impl RuleModule for Panicky {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }

        fn create(&self, _options: &[Value]) -> RuleListeners {
            let mut listeners = RuleListeners::new();
            listeners.on_enter(NodeKind::CallExpression, |_, _| {
                panic!("boom");
            });
            listeners
        }
    }

    /// A parser that always refuses to produce a tree.
    struct RefusingParser;

    impl Parser for RefusingParser {
        fn name(&self) -> &str {
            "refusing"
        }

        fn extensions(&self) -> &[&str] {
            &["ts"]
        }

        fn parse(&self, path: &Path, _source: &str) -> Result<SyntaxTree, ParseError> {
            Err(ParseError::failed(path))
        }
    }

    fn linter_with(rules: Vec<Arc<dyn RuleModule>>, config: LintConfig) -> Linter {
        let mut registry = RuleRegistry::new();
        for rule in rules {
            registry.register(rule);
        }
        Linter::new(registry, config)
    }

    #[test]
    fn test_reports_call_expressions() {
        let created = Arc::new(AtomicUsize::new(0));
        let linter = linter_with(
            vec![Arc::new(CallCounter::new(created.clone()))],
            LintConfig::new(),
        );
        let result = linter.lint_source(
            &TypeScriptParser::new(),
            &PathBuf::from("a.ts"),
            "f();\ng();\n",
        );
        assert_eq!(result.diagnostics.len(), 2);
        assert_eq!(result.warning_count, 2);
        assert_eq!(created.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_off_rule_is_never_instantiated() {
        let created = Arc::new(AtomicUsize::new(0));
        let config = LintConfig::new()
            .with_rule("call-counter", RuleSetting::Severity("off".to_string()));
        let linter = linter_with(vec![Arc::new(CallCounter::new(created.clone()))], config);

        let result =
            linter.lint_source(&TypeScriptParser::new(), &PathBuf::from("a.ts"), "f();\n");
        assert!(result.diagnostics.is_empty());
        assert_eq!(created.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_config_severity_overrides_default() {
        let created = Arc::new(AtomicUsize::new(0));
        let config = LintConfig::new()
            .with_rule("call-counter", RuleSetting::Severity("error".to_string()));
        let linter = linter_with(vec![Arc::new(CallCounter::new(created))], config);

        let result =
            linter.lint_source(&TypeScriptParser::new(), &PathBuf::from("a.ts"), "f();\n");
        assert_eq!(result.error_count, 1);
        assert_eq!(result.diagnostics[0].severity, Severity::Error);
    }

    #[test]
    fn test_parse_failure_becomes_diagnostic() {
        let linter = linter_with(vec![], LintConfig::new());
        let result = linter.lint_source(&RefusingParser, &PathBuf::from("a.ts"), "anything");

        assert_eq!(result.diagnostics.len(), 1);
        assert_eq!(result.error_count, 1);
        let diagnostic = &result.diagnostics[0];
        assert_eq!(diagnostic.rule_id, PARSE_ERROR_RULE_ID);
        assert_eq!((diagnostic.line, diagnostic.column), (1, 1));
    }

    #[test]
    fn test_panicking_rule_is_isolated() {
        let created = Arc::new(AtomicUsize::new(0));
        let linter = linter_with(
            vec![
                Arc::new(Panicky::new()),
                Arc::new(CallCounter::new(created)),
            ],
            LintConfig::new(),
        );
        let result = linter.lint_source(
            &TypeScriptParser::new(),
            &PathBuf::from("a.ts"),
            "f();\ng();\n",
        );

        let internal: Vec<_> = result
            .diagnostics
            .iter()
            .filter(|d| d.rule_id == INTERNAL_RULE_ID)
            .collect();
        // One synthetic diagnostic, not one per call expression.
        assert_eq!(internal.len(), 1);
        assert!(internal[0].message.contains("panicky"));

        // The healthy rule still reported both calls.
        let healthy = result
            .diagnostics
            .iter()
            .filter(|d| d.rule_id == "call-counter")
            .count();
        assert_eq!(healthy, 2);
    }

    #[test]
    fn test_diagnostics_sorted_by_span() {
        let created = Arc::new(AtomicUsize::new(0));
        let linter = linter_with(vec![Arc::new(CallCounter::new(created))], LintConfig::new());
        let result = linter.lint_source(
            &TypeScriptParser::new(),
            &PathBuf::from("a.ts"),
            "a();\nb();\nc();\n",
        );
        let starts: Vec<u32> = result.diagnostics.iter().map(|d| d.span.start).collect();
        let mut sorted = starts.clone();
        sorted.sort_unstable();
        assert_eq!(starts, sorted);
    }

    #[test]
    fn test_enter_and_exit_ordering() {
        struct OrderRule {
            meta: RuleMeta,
            log: Arc<std::sync::Mutex<Vec<&'static str>>>,
        }

        impl RuleModule for OrderRule {
            fn meta(&self) -> &RuleMeta {
                &self.meta
            }

            fn create(&self, _options: &[Value]) -> RuleListeners {
                let mut listeners = RuleListeners::new();
                let log = self.log.clone();
                listeners.on_enter(NodeKind::StatementBlock, move |_, _| {
                    log.lock().unwrap().push("enter-block");
                });
                let log = self.log.clone();
                listeners.on_exit(NodeKind::StatementBlock, move |_, _| {
                    log.lock().unwrap().push("exit-block");
                });
                let log = self.log.clone();
                listeners.on_enter(NodeKind::ReturnStatement, move |_, _| {
                    log.lock().unwrap().push("return");
                });
                listeners
            }
        }

        let log = Arc::new(std::sync::Mutex::new(Vec::new()));
        let rule = OrderRule {
            meta: RuleMeta {
                id: "order",
                description: "",
                default_severity: Severity::Warn,
                fixable: false,
                suggestions: false,
                messages: &[],
            },
            log: log.clone(),
        };
        let linter = linter_with(vec![Arc::new(rule)], LintConfig::new());
        linter.lint_source(
            &TypeScriptParser::new(),
            &PathBuf::from("a.ts"),
            "function f() { return 1; }\n",
        );

        assert_eq!(
            *log.lock().unwrap(),
            vec!["enter-block", "return", "exit-block"]
        );
    }
}
