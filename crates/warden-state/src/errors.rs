//! State-store error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors from the state store and task document reader.
#[derive(Debug, Error)]
pub enum StateError {
    /// A store operation was invoked before `load()` completed once.
    #[error("session state not loaded; call load() first")]
    NotLoaded,

    /// Filesystem failure outside the defined fail-open cases.
    #[error("state I/O error on {path}: {source}")]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A document that could not be scanned as YAML at all.
    ///
    /// A document that scans but has an unexpected shape is *not* an
    /// error: the store substitutes the empty default and the task
    /// reader skips the file.
    #[error("malformed YAML in {path}: {source}")]
    Yaml {
        /// Path of the offending document.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },
}

/// Convenience alias for state operations.
pub type Result<T> = std::result::Result<T, StateError>;
