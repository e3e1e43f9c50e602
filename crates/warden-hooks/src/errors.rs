//! Hook error types.

use thiserror::Error;

/// Errors that can occur inside a hook handler.
///
/// These never reach the driver: each handler converts its own failures
/// to an allow decision at its boundary, and the registry does the same
/// for anything that escapes.
#[derive(Debug, Error)]
pub enum HookError {
    /// State store or task document failure.
    #[error(transparent)]
    State(#[from] warden_state::StateError),

    /// Anything else a handler wants to surface.
    #[error("{0}")]
    Internal(String),
}
