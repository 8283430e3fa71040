//! Content-addressed cache of provider results.
//!
//! Keyed by the blake3 hash of the sampled source, so an edit anywhere
//! in a file invalidates its entry while renames stay hits.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::RemoteError;
use crate::provider::RemoteFinding;

/// Bumped whenever the on-disk shape changes; a mismatched file is
/// discarded, not migrated.
const CACHE_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct CacheFile {
    version: u32,
    entries: HashMap<String, Vec<RemoteFinding>>,
}

/// Persistent findings cache backed by one JSON file.
#[derive(Debug)]
pub struct AnalysisCache {
    path: PathBuf,
    entries: HashMap<String, Vec<RemoteFinding>>,
}

impl AnalysisCache {
    /// Opens the cache at `path`, starting empty when the file is absent
    /// or from an older version.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, RemoteError> {
        let path = path.into();
        let entries = match std::fs::read_to_string(&path) {
            Ok(raw) => {
                let file: CacheFile = serde_json::from_str(&raw).map_err(|source| {
                    RemoteError::CacheCorrupt {
                        path: path.clone(),
                        source,
                    }
                })?;
                if file.version == CACHE_VERSION {
                    file.entries
                } else {
                    warn!(
                        found = file.version,
                        expected = CACHE_VERSION,
                        "discarding cache from another version"
                    );
                    HashMap::new()
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => HashMap::new(),
            Err(source) => {
                return Err(RemoteError::CacheIo {
                    path,
                    source,
                })
            }
        };
        debug!(path = %path.display(), entries = entries.len(), "cache loaded");
        Ok(Self { path, entries })
    }

    /// In-memory only, for tests and `--no-cache` runs.
    pub fn ephemeral() -> Self {
        Self {
            path: PathBuf::new(),
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, hash: &str) -> Option<&[RemoteFinding]> {
        self.entries.get(hash).map(Vec::as_slice)
    }

    pub fn insert(&mut self, hash: impl Into<String>, findings: Vec<RemoteFinding>) {
        self.entries.insert(hash.into(), findings);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes the cache back. A no-op for ephemeral caches.
    pub fn save(&self) -> Result<(), RemoteError> {
        if self.path.as_os_str().is_empty() {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|source| RemoteError::CacheIo {
                    path: self.path.clone(),
                    source,
                })?;
            }
        }
        let file = CacheFile {
            version: CACHE_VERSION,
            entries: self.entries.clone(),
        };
        let raw = serde_json::to_string_pretty(&file).map_err(|source| {
            RemoteError::CacheCorrupt {
                path: self.path.clone(),
                source,
            }
        })?;
        std::fs::write(&self.path, raw).map_err(|source| RemoteError::CacheIo {
            path: self.path.clone(),
            source,
        })
    }
}
