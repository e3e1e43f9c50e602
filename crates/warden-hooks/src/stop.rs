//! The turn-end snapshot.
//!
//! Persists session state when the driver signals the end of a turn.
//! Persisting can itself be observed as a turn-ending action by the
//! driver, so the handler is guarded against re-entry: the caller holds a
//! [`TurnContext`] token, and a nested invocation returns allow without
//! touching the store.

use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tracing::{debug, error};

use warden_state::StateStore;

use crate::errors::HookError;
use crate::handler::HookHandler;
use crate::types::{HookContext, HookResponse, HookType};

// ─────────────────────────────────────────────────────────────────────────────
// Turn context token
// ─────────────────────────────────────────────────────────────────────────────

/// Re-entrancy token for the turn-end snapshot.
///
/// Held by the caller and shared with the handler; the snapshot is "in
/// progress" exactly while a [`TurnGuard`] is alive. The guard clears the
/// flag on drop, covering every exit path.
#[derive(Debug, Default)]
pub struct TurnContext {
    active: AtomicBool,
}

impl TurnContext {
    /// Create an inactive token.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a snapshot is currently in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.active.load(Ordering::Acquire)
    }

    /// Try to enter the snapshot section. `None` means re-entry.
    fn enter(&self) -> Option<TurnGuard<'_>> {
        self.active
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| TurnGuard { context: self })
    }
}

/// RAII guard clearing the turn flag on drop.
struct TurnGuard<'a> {
    context: &'a TurnContext,
}

impl Drop for TurnGuard<'_> {
    fn drop(&mut self) {
        self.context.active.store(false, Ordering::Release);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Handler
// ─────────────────────────────────────────────────────────────────────────────

/// Handler consuming `Stop` events. Never blocks.
#[derive(Debug)]
pub struct TurnSnapshot {
    state_file: PathBuf,
    turn: Arc<TurnContext>,
}

impl TurnSnapshot {
    /// Snapshot handler over the given state document, guarded by `turn`.
    #[must_use]
    pub fn new(state_file: impl Into<PathBuf>, turn: Arc<TurnContext>) -> Self {
        Self {
            state_file: state_file.into(),
            turn,
        }
    }

    /// Refresh-then-persist: reload from disk so mutations made by other
    /// handlers earlier in the turn are captured, then overwrite.
    async fn snapshot(&self) -> Result<(), HookError> {
        let mut store = StateStore::new(&self.state_file);
        store.load().await?;
        store.save().await?;
        Ok(())
    }
}

#[async_trait]
impl HookHandler for TurnSnapshot {
    fn name(&self) -> &str {
        "turn_snapshot"
    }

    fn hook_type(&self) -> HookType {
        HookType::Stop
    }

    async fn handle(&self, _context: &HookContext) -> Result<HookResponse, HookError> {
        let Some(_guard) = self.turn.enter() else {
            debug!("turn snapshot already in progress; allowing re-entry");
            return Ok(HookResponse::allow());
        };

        if let Err(e) = self.snapshot().await {
            error!(error = %e, "turn-end snapshot failed; allowing (fail-open)");
        }
        Ok(HookResponse::allow())
        // _guard drops here, clearing the flag on success and failure alike.
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[tokio::test]
    async fn snapshot_writes_document() {
        let dir = TempDir::new().unwrap();
        let state_file = dir.path().join("session_state.yaml");
        let handler = TurnSnapshot::new(&state_file, Arc::new(TurnContext::new()));

        let response = handler.handle(&HookContext::Stop).await.unwrap();
        assert_eq!(response, HookResponse::allow());
        assert!(state_file.exists());
    }

    #[tokio::test]
    async fn reentrant_invocation_skips_the_store() {
        let dir = TempDir::new().unwrap();
        let state_file = dir.path().join("session_state.yaml");
        let turn = Arc::new(TurnContext::new());
        let handler = TurnSnapshot::new(&state_file, Arc::clone(&turn));

        // Simulate re-entry: the outer invocation is still in progress.
        let outer = turn.enter().unwrap();
        let response = handler.handle(&HookContext::Stop).await.unwrap();
        assert_eq!(response, HookResponse::allow());
        // The nested call must not have read or written the document.
        assert!(!state_file.exists());
        drop(outer);

        // With the outer section done, the snapshot proceeds.
        let _ = handler.handle(&HookContext::Stop).await.unwrap();
        assert!(state_file.exists());
    }

    #[tokio::test]
    async fn flag_clears_after_failure() {
        let dir = TempDir::new().unwrap();
        // Point the state file at a directory to force a read failure.
        let state_file = dir.path().to_path_buf();
        let turn = Arc::new(TurnContext::new());
        let handler = TurnSnapshot::new(&state_file, Arc::clone(&turn));

        let response = handler.handle(&HookContext::Stop).await.unwrap();
        assert_eq!(response, HookResponse::allow());
        assert!(!turn.is_active());
    }

    #[test]
    fn guard_clears_on_drop() {
        let turn = TurnContext::new();
        let guard = turn.enter().unwrap();
        assert!(turn.is_active());
        assert!(turn.enter().is_none());
        drop(guard);
        assert!(!turn.is_active());
    }
}
