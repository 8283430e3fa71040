//! Remote findings folded into a regular lint run: provider call with
//! retry, content-hash caching, conversion into engine diagnostics.

use std::path::PathBuf;
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;

use pretty_assertions::assert_eq;

use driftlint_core::{LintConfig, Linter, Severity};
use driftlint_parser::TypeScriptParser;
use driftlint_remote::{
    analyze_with_cache, AnalysisCache, RemoteError, RemoteFinding, RemoteProvider, RetryPolicy,
    SourceSample, REMOTE_SUGGESTION_ID,
};
use driftlint_rules::builtin_registry;

/// Flags line 2 of every sample and counts how often it is asked.
struct StubProvider {
    calls: AtomicU32,
    fail_first: u32,
}

impl StubProvider {
    fn new() -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_first: 0,
        }
    }

    fn flaky(fail_first: u32) -> Self {
        Self {
            calls: AtomicU32::new(0),
            fail_first,
        }
    }
}

impl RemoteProvider for StubProvider {
    fn name(&self) -> &str {
        "stub"
    }

    fn analyze(&self, _sample: &SourceSample) -> Result<Vec<RemoteFinding>, RemoteError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call < self.fail_first {
            return Err(RemoteError::transient("throttled"));
        }
        Ok(vec![RemoteFinding {
            line: 2,
            column: 1,
            severity: "nitpick".to_string(),
            rule_id: "remote/unclear-logic".to_string(),
            message: "Control flow is hard to follow".to_string(),
            suggestion: Some("Extract the branch into a named function".to_string()),
        }])
    }
}

fn quick_policy() -> RetryPolicy {
    RetryPolicy {
        max_attempts: 3,
        initial_delay: Duration::ZERO,
        max_delay: Duration::ZERO,
    }
}

#[test]
fn test_remote_findings_join_local_diagnostics() {
    let source = "let data: any = load();\nrun(data);\n";
    let path = PathBuf::from("sample.ts");

    let linter = Linter::new(builtin_registry(), LintConfig::new());
    let mut result = linter.lint_source(&TypeScriptParser::new(), &path, source);

    let provider = StubProvider::new();
    let mut cache = AnalysisCache::ephemeral();
    let samples = vec![SourceSample::new(&path, source)];
    let remote =
        analyze_with_cache(&provider, &quick_policy(), &mut cache, &samples).unwrap();

    assert_eq!(remote.len(), 1);
    let finding = &remote[0];
    // Unknown provider severity stays visible as a warning.
    assert_eq!(finding.severity, Severity::Warn);
    assert_eq!((finding.line, finding.column), (2, 1));
    // Line 2 starts right after the 24-byte first line.
    assert_eq!(finding.span.start, 24);
    assert_eq!(finding.suggestions[0].message_id, REMOTE_SUGGESTION_ID);

    result.diagnostics.extend(remote);
    let rule_ids: Vec<&str> = result
        .diagnostics
        .iter()
        .map(|d| d.rule_id.as_str())
        .collect();
    assert!(rule_ids.contains(&"no-explicit-any"));
    assert!(rule_ids.contains(&"remote/unclear-logic"));
}

#[test]
fn test_transient_provider_failure_recovers_after_retries() {
    let provider = StubProvider::flaky(2);
    let mut cache = AnalysisCache::ephemeral();
    let samples = vec![SourceSample::new("a.ts", "run();\nrun();\n")];

    let remote =
        analyze_with_cache(&provider, &quick_policy(), &mut cache, &samples).unwrap();
    assert_eq!(remote.len(), 1);
    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_exhausted_retries_surface_as_error_not_empty_result() {
    let provider = StubProvider::flaky(10);
    let mut cache = AnalysisCache::ephemeral();
    let samples = vec![SourceSample::new("a.ts", "run();\n")];

    let err = analyze_with_cache(&provider, &quick_policy(), &mut cache, &samples)
        .unwrap_err();
    assert!(err.is_transient());
    assert_eq!(provider.calls.load(Ordering::SeqCst), 3);
}

#[test]
fn test_persisted_cache_skips_the_provider_on_rerun() {
    let dir = tempfile::tempdir().unwrap();
    let cache_path = dir.path().join("analysis-cache.json");
    let samples = vec![SourceSample::new("a.ts", "run();\nrun();\n")];

    let provider = StubProvider::new();
    let mut cache = AnalysisCache::load(&cache_path).unwrap();
    analyze_with_cache(&provider, &quick_policy(), &mut cache, &samples).unwrap();
    cache.save().unwrap();
    assert_eq!(provider.calls.load(Ordering::SeqCst), 1);

    let rerun_provider = StubProvider::new();
    let mut reloaded = AnalysisCache::load(&cache_path).unwrap();
    let remote =
        analyze_with_cache(&rerun_provider, &quick_policy(), &mut reloaded, &samples).unwrap();

    assert_eq!(remote.len(), 1);
    assert_eq!(rerun_provider.calls.load(Ordering::SeqCst), 0);
}
