//! Remote analysis: sends source samples to an external provider and
//! folds its findings into regular diagnostics.
//!
//! Provider calls go through a [`RetryPolicy`] and results are cached by
//! content hash in an [`AnalysisCache`], so unchanged files never hit the
//! network twice.

mod backoff;
mod cache;
mod error;
mod provider;

use tracing::debug;

use driftlint_core::Diagnostic;

pub use backoff::RetryPolicy;
pub use cache::AnalysisCache;
pub use error::RemoteError;
pub use provider::{RemoteFinding, RemoteProvider, SourceSample, REMOTE_SUGGESTION_ID};

/// Analyzes every sample, serving unchanged content from the cache.
///
/// The cache is updated in memory as misses resolve; callers persist it
/// with [`AnalysisCache::save`] once the run is over. Fails on the first
/// provider error that survives retrying.
pub fn analyze_with_cache(
    provider: &dyn RemoteProvider,
    policy: &RetryPolicy,
    cache: &mut AnalysisCache,
    samples: &[SourceSample],
) -> Result<Vec<Diagnostic>, RemoteError> {
    let mut diagnostics = Vec::new();
    for sample in samples {
        let hash = sample.content_hash();
        let findings = match cache.get(&hash) {
            Some(findings) => {
                debug!(path = %sample.path.display(), "remote cache hit");
                findings.to_vec()
            }
            None => {
                let findings = policy.run(|| provider.analyze(sample))?;
                cache.insert(hash, findings.clone());
                findings
            }
        };
        diagnostics.extend(
            findings
                .into_iter()
                .map(|finding| finding.into_diagnostic(sample)),
        );
    }
    Ok(diagnostics)
}
