//! End-to-end lint runs through the full pipeline: parse, dispatch the
//! built-in rules, collect diagnostics.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use serde_json::json;

use driftlint_ast::{NodeKind, SyntaxTree};
use driftlint_core::{
    lint_files_with_summary, LintConfig, Linter, Report, RuleListeners, RuleMeta, RuleModule,
    RuleSetting, Severity, INTERNAL_RULE_ID, PARSE_ERROR_RULE_ID,
};
use driftlint_parser::{ParseError, Parser, TypeScriptParser};
use driftlint_rules::builtin_registry;

fn lint(source: &str) -> driftlint_core::LintResult {
    Linter::new(builtin_registry(), LintConfig::new()).lint_source(
        &TypeScriptParser::new(),
        &PathBuf::from("sample.ts"),
        source,
    )
}

#[test]
fn test_messy_file_reports_each_smell_with_positions() {
    let source = "\
const password = \"hunter2\";
let data: any = load();
try {
  data.run();
} catch (e) {}
console.log(data);
";
    let result = lint(source);

    let mut findings: Vec<(&str, u32, u32)> = result
        .diagnostics
        .iter()
        .map(|d| (d.rule_id.as_str(), d.line, d.column))
        .collect();
    findings.sort();

    assert_eq!(
        findings,
        vec![
            ("console-log-debugging", 6, 1),
            ("empty-catch-block", 5, 13),
            ("generic-variable-name", 2, 5),
            ("hardcoded-credentials", 1, 18),
            ("no-explicit-any", 2, 11),
        ]
    );
    assert_eq!(result.error_count, 3);
    assert_eq!(result.warning_count, 1);
    assert_eq!(result.info_count, 1);
    assert_eq!(result.fixable_error_count, 1);
    assert_eq!(result.fixable_warning_count, 0);
}

#[test]
fn test_clean_file_is_quiet() {
    let source = "\
// Parses the retry header; the server sends seconds, not millis.
export function retryAfter(header: string): number {
  const seconds = Number.parseInt(header, 10);
  return Number.isNaN(seconds) ? 0 : seconds * 1000;
}
";
    let result = lint(source);
    assert_eq!(result.diagnostics, vec![]);
}

#[test]
fn test_config_disables_and_reranks_rules() {
    let config = LintConfig::new()
        .with_rule("no-explicit-any", RuleSetting::Severity("off".to_string()))
        .with_rule(
            "generic-variable-name",
            RuleSetting::Severity("error".to_string()),
        );
    let linter = Linter::new(builtin_registry(), config);
    let result = linter.lint_source(
        &TypeScriptParser::new(),
        &PathBuf::from("sample.ts"),
        "let data: any = 1;\n",
    );

    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].rule_id, "generic-variable-name");
    assert_eq!(result.diagnostics[0].severity, Severity::Error);
}

#[test]
fn test_config_layers_merge_last_wins() {
    let base = LintConfig::new()
        .with_rule(
            "generic-variable-name",
            RuleSetting::WithOptions(vec![json!("info"), json!({"allow": ["data"]})]),
        )
        .with_rule("console-log-debugging", RuleSetting::Severity("off".to_string()));
    let overlay = LintConfig::new().with_rule(
        "generic-variable-name",
        RuleSetting::Severity("warn".to_string()),
    );
    let merged = base.merge(overlay);

    let linter = Linter::new(builtin_registry(), merged);
    let result = linter.lint_source(
        &TypeScriptParser::new(),
        &PathBuf::from("sample.ts"),
        "const data = 1;\nconsole.log(data);\n",
    );

    // The overlay replaced the whole entry, so the allow list is gone and
    // `data` is reported again, now as a warning.
    assert_eq!(result.diagnostics.len(), 1);
    assert_eq!(result.diagnostics[0].rule_id, "generic-variable-name");
    assert_eq!(result.diagnostics[0].severity, Severity::Warn);
}

#[test]
fn test_unparseable_file_yields_single_parse_diagnostic() {
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

    let linter = Linter::new(builtin_registry(), LintConfig::new());
    let result = linter.lint_source(&RefusingParser, &PathBuf::from("broken.ts"), "whatever");

    assert_eq!(result.diagnostics.len(), 1);
    let diagnostic = &result.diagnostics[0];
    assert_eq!(diagnostic.rule_id, PARSE_ERROR_RULE_ID);
    assert_eq!(diagnostic.severity, Severity::Error);
    assert_eq!((diagnostic.line, diagnostic.column), (1, 1));
    assert_eq!(result.error_count, 1);
}

#[test]
fn test_partial_parse_still_lints_the_good_parts() {
    // The garbage line produces error nodes; the any annotation after it
    // is still reported.
    let source = "const = = ;\nlet v: any = 1;\n";
    let result = lint(source);
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.rule_id == "no-explicit-any"));
}

#[test]
fn test_panicking_rule_does_not_take_down_builtins() {
    struct Crashy(RuleMeta);

    impl RuleModule for Crashy {
        fn meta(&self) -> &RuleMeta {
            &self.0
        }

        fn create(&self, _options: &[serde_json::Value]) -> RuleListeners {
            let mut listeners = RuleListeners::new();
            listeners.on_enter(NodeKind::Program, |_, _| panic!("boom"));
            listeners
        }
    }

    let mut registry = builtin_registry();
    registry.register(Arc::new(Crashy(RuleMeta {
        id: "crashy",
        description: "",
        default_severity: Severity::Warn,
        fixable: false,
        suggestions: false,
        messages: &[],
    })));

    let linter = Linter::new(registry, LintConfig::new());
    let result = linter.lint_source(
        &TypeScriptParser::new(),
        &PathBuf::from("sample.ts"),
        "let v: any = 1;\n",
    );

    let internal: Vec<_> = result
        .diagnostics
        .iter()
        .filter(|d| d.rule_id == INTERNAL_RULE_ID)
        .collect();
    assert_eq!(internal.len(), 1);
    assert!(internal[0].message.contains("crashy"));
    assert!(result
        .diagnostics
        .iter()
        .any(|d| d.rule_id == "no-explicit-any"));
}

#[test]
fn test_off_rule_is_never_invoked() {
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct Counting {
        meta: RuleMeta,
        created: Arc<AtomicUsize>,
        called: Arc<AtomicUsize>,
    }

    impl RuleModule for Counting {
        fn meta(&self) -> &RuleMeta {
            &self.meta
        }

        fn create(&self, _options: &[serde_json::Value]) -> RuleListeners {
            self.created.fetch_add(1, Ordering::SeqCst);
            let called = Arc::clone(&self.called);
            let mut listeners = RuleListeners::new();
            listeners.on_any(move |_, _| {
                called.fetch_add(1, Ordering::SeqCst);
            });
            listeners
        }
    }

    let created = Arc::new(AtomicUsize::new(0));
    let called = Arc::new(AtomicUsize::new(0));
    let mut registry = builtin_registry();
    registry.register(Arc::new(Counting {
        meta: RuleMeta {
            id: "counting",
            description: "",
            default_severity: Severity::Warn,
            fixable: false,
            suggestions: false,
            messages: &[],
        },
        created: Arc::clone(&created),
        called: Arc::clone(&called),
    }));

    let config =
        LintConfig::new().with_rule("counting", RuleSetting::Severity("off".to_string()));
    let linter = Linter::new(registry, config);
    linter.lint_source(
        &TypeScriptParser::new(),
        &PathBuf::from("sample.ts"),
        "let v: any = 1;\n",
    );

    assert_eq!(created.load(Ordering::SeqCst), 0);
    assert_eq!(called.load(Ordering::SeqCst), 0);
}

#[test]
fn test_linting_is_deterministic() {
    let source = "let data: any = 1;\nconsole.log(data);\n";
    let first = lint(source);
    let second = lint(source);
    assert_eq!(first.diagnostics, second.diagnostics);
}

#[test]
fn test_batch_run_over_directory() {
    let dir = tempfile::tempdir().unwrap();
    let clean = dir.path().join("clean.ts");
    let messy = dir.path().join("messy.ts");
    std::fs::write(&clean, "export const ONE = 1;\n").unwrap();
    std::fs::write(&messy, "let v: any = 1;\nconsole.log(v);\n").unwrap();

    let linter = Linter::new(builtin_registry(), LintConfig::new());
    let (results, summary) = lint_files_with_summary(
        &linter,
        &TypeScriptParser::new(),
        &[clean.clone(), messy.clone()],
    )
    .unwrap();

    assert_eq!(results.len(), 2);
    assert_eq!(results[0].file, clean);
    assert!(results[0].diagnostics.is_empty());
    assert_eq!(results[1].diagnostics.len(), 2);
    assert_eq!(summary.file_count, 2);
    assert_eq!(summary.error_count, 1);
    assert_eq!(summary.warning_count, 1);
    assert!(summary.has_blocking_errors());
}
