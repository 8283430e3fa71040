//! Fix application properties exercised through the real rules.

use std::path::PathBuf;

use pretty_assertions::assert_eq;

use driftlint_ast::Span;
use driftlint_core::fixer::{apply_fixes, apply_fixes_safely, validate_fixes, FixError};
use driftlint_core::{Fix, LintConfig, Linter};
use driftlint_parser::TypeScriptParser;
use driftlint_rules::builtin_registry;

fn lint(source: &str) -> driftlint_core::LintResult {
    Linter::new(builtin_registry(), LintConfig::new()).lint_source(
        &TypeScriptParser::new(),
        &PathBuf::from("sample.ts"),
        source,
    )
}

#[test]
fn test_disjoint_fixes_are_order_independent() {
    let source = "function f(a: any, b: any): any { return a; }\n";
    let result = lint(source);
    let fixes: Vec<Fix> = result.diagnostics.iter().filter_map(|d| d.fix.clone()).collect();
    assert_eq!(fixes.len(), 3);

    let mut reversed = fixes.clone();
    reversed.reverse();
    let forward = apply_fixes(source, &fixes);
    let backward = apply_fixes(source, &reversed);

    assert_eq!(
        forward,
        "function f(a: unknown, b: unknown): unknown { return a; }\n"
    );
    assert_eq!(forward, backward);
}

#[test]
fn test_overlapping_batch_is_rejected_wholesale() {
    let parser = TypeScriptParser::new();
    let source = "let alpha = 1;\n";
    let fixes = vec![
        Fix::new(Span::new(4, 9), "beta"),
        Fix::new(Span::new(6, 11), "gamma"),
    ];

    let err = validate_fixes(source, &fixes, &parser, &PathBuf::from("sample.ts")).unwrap_err();
    assert!(matches!(err, FixError::Overlap { .. }));

    // Nothing was applied; the source string is untouched by validation.
    assert_eq!(source, "let alpha = 1;\n");
}

#[test]
fn test_fixed_output_does_not_retrigger_the_rule() {
    let parser = TypeScriptParser::new();
    let path = PathBuf::from("sample.ts");
    let source = "let v: any = load();\nlet w: any = load();\n";

    let result = lint(source);
    let fixed = apply_fixes_safely(source, &result.diagnostics, &parser, &path).unwrap();
    assert_eq!(fixed, "let v: unknown = load();\nlet w: unknown = load();\n");

    let again = lint(&fixed);
    assert!(again
        .diagnostics
        .iter()
        .all(|d| d.rule_id != "no-explicit-any"));
}

#[test]
fn test_fix_application_is_idempotent() {
    let parser = TypeScriptParser::new();
    let path = PathBuf::from("sample.ts");
    let source = "let v: any = 1;\n";

    let first = apply_fixes_safely(source, &lint(source).diagnostics, &parser, &path).unwrap();
    // A second round finds nothing fixable, so the text settles.
    assert!(apply_fixes_safely(&first, &lint(&first).diagnostics, &parser, &path).is_none());
}

#[test]
fn test_unfixable_diagnostics_leave_no_output() {
    let parser = TypeScriptParser::new();
    let path = PathBuf::from("sample.ts");
    let source = "console.log(state);\n";

    let result = lint(source);
    assert_eq!(result.diagnostics.len(), 1);
    assert!(apply_fixes_safely(source, &result.diagnostics, &parser, &path).is_none());
}

#[test]
fn test_validation_reparses_candidate_output() {
    let parser = TypeScriptParser::new();
    // Replacing the declaration keyword with garbage still parses under
    // an error-tolerant grammar, so validation relies on span checks
    // first; this test pins the happy path.
    let source = "let v: any = 1;\n";
    let fixes = vec![Fix::new(Span::new(7, 10), "unknown")];
    let fixed =
        validate_fixes(source, &fixes, &parser, &PathBuf::from("sample.ts")).unwrap();
    assert_eq!(fixed, "let v: unknown = 1;\n");
}
