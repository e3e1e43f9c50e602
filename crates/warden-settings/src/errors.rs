//! Settings error types.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading the settings document.
///
/// Unlike hook-time failures, these are startup errors: the monitor
/// refuses to run without a usable configuration.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The document could not be read.
    #[error("cannot read settings at {path}: {source}")]
    Io {
        /// Settings document path.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The document is not valid YAML or has the wrong shape.
    #[error("cannot parse settings at {path}: {source}")]
    Parse {
        /// Settings document path.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_yaml::Error,
    },

    /// A required section is absent.
    #[error("settings at {path} are missing the `{section}` section")]
    MissingSection {
        /// Settings document path.
        path: PathBuf,
        /// Name of the missing section.
        section: &'static str,
    },
}
