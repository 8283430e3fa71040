use std::path::PathBuf;
use thiserror::Error;

/// Errors from remote analysis.
#[derive(Debug, Error)]
pub enum RemoteError {
    /// The provider failed in a way worth retrying (timeouts, throttling,
    /// connection resets).
    #[error("transient provider failure: {message}")]
    Transient { message: String },

    /// The provider rejected the request outright; retrying is pointless.
    #[error("provider failure: {message}")]
    Fatal { message: String },

    /// Cache file could not be read or written.
    #[error("cache io error at {path}: {source}")]
    CacheIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Cache file exists but does not deserialize.
    #[error("cache at {path} is corrupt: {source}")]
    CacheCorrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl RemoteError {
    pub fn transient(message: impl Into<String>) -> Self {
        Self::Transient {
            message: message.into(),
        }
    }

    pub fn fatal(message: impl Into<String>) -> Self {
        Self::Fatal {
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, Self::Transient { .. })
    }
}
