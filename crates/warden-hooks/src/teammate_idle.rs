//! The idle gate.
//!
//! A teammate may only go idle when it holds no unresolved tasks.
//! Otherwise the gate blocks with a reason enumerating the outstanding
//! task identifiers, in assignment order, so the driver can steer the
//! teammate back to work.

use std::path::PathBuf;

use async_trait::async_trait;
use tracing::{error, warn};

use warden_state::StateStore;

use crate::errors::HookError;
use crate::handler::HookHandler;
use crate::types::{HookContext, HookResponse, HookType};

/// Gate consuming `TeammateIdle` events.
#[derive(Debug)]
pub struct IdleGate {
    state_file: PathBuf,
}

impl IdleGate {
    /// Gate over the given state document.
    #[must_use]
    pub fn new(state_file: impl Into<PathBuf>) -> Self {
        Self {
            state_file: state_file.into(),
        }
    }

    async fn check(&self, teammate_id: &str) -> Result<HookResponse, HookError> {
        let mut store = StateStore::new(&self.state_file);
        store.load().await?;

        let pending = store.pending_tasks_for(teammate_id)?;
        if !pending.is_empty() {
            return Ok(HookResponse::block(format!(
                "Teammate has unfinished tasks: {}",
                pending.join(", ")
            )));
        }

        store.increment_idle_count(teammate_id)?;
        store.save().await?;
        Ok(HookResponse::allow())
    }
}

#[async_trait]
impl HookHandler for IdleGate {
    fn name(&self) -> &str {
        "idle_gate"
    }

    fn hook_type(&self) -> HookType {
        HookType::TeammateIdle
    }

    async fn handle(&self, context: &HookContext) -> Result<HookResponse, HookError> {
        let HookContext::TeammateIdle { teammate_id } = context else {
            return Ok(HookResponse::allow());
        };

        let Some(teammate_id) = teammate_id.as_deref() else {
            warn!("idle event without teammate_id; allowing");
            return Ok(HookResponse::allow());
        };

        match self.check(teammate_id).await {
            Ok(response) => Ok(response),
            Err(e) => {
                error!(teammate_id, error = %e, "idle check failed; allowing (fail-open)");
                Ok(HookResponse::allow())
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
