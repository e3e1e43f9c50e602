//! The task-completion gate.
//!
//! Validates a claimed task completion against the task's acceptance
//! criteria before the completion is allowed to stand. Every criterion
//! must appear verbatim as a substring of the rendered result; the first
//! criterion that fails determines the block reason.
//!
//! Fail-open branches, in order: no `task_id` on the event; no criteria
//! declared for the task (unvalidatable tasks must not become a permanent
//! block); any infrastructure failure while loading state or task
//! documents.

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use warden_state::{StateStore, TaskDocs};

use crate::errors::HookError;
use crate::handler::HookHandler;
use crate::types::{HookContext, HookResponse, HookType};

/// Gate consuming `TaskCompleted` events.
#[derive(Debug)]
pub struct TaskCompletionGate {
    state_file: PathBuf,
    docs: TaskDocs,
}

impl TaskCompletionGate {
    /// Gate over the given state document and task directory.
    #[must_use]
    pub fn new(state_file: impl Into<PathBuf>, docs: TaskDocs) -> Self {
        Self {
            state_file: state_file.into(),
            docs,
        }
    }

    /// Run the validation state machine: load state, fetch criteria,
    /// check containment, and on success mark the task completed and
    /// persist.
    async fn validate(
        &self,
        task_id: &str,
        result: Option<&Value>,
    ) -> Result<HookResponse, HookError> {
        let mut store = StateStore::new(&self.state_file);
        store.load().await?;

        let criteria = self.docs.acceptance_criteria(task_id).await?;

        if criteria.is_empty() {
            debug!(task_id, "no acceptance criteria declared; allowing completion");
            store.mark_task_completed(task_id)?;
            store.save().await?;
            return Ok(HookResponse::allow());
        }

        let rendered = result.map(render_result);
        for criterion in &criteria {
            let Some(text) = rendered.as_deref() else {
                return Ok(HookResponse::block(format!(
                    "Criterion not met: \"{criterion}\". Result is empty or undefined."
                )));
            };
            if !text.contains(criterion.as_str()) {
                return Ok(HookResponse::block(format!(
                    "Criterion not met: \"{criterion}\". Expected to find this in result, but not found."
                )));
            }
        }

        store.mark_task_completed(task_id)?;
        store.save().await?;
        info!(task_id, "all criteria met; task marked completed");
        Ok(HookResponse::allow())
    }
}

/// Render a completion result for substring matching.
///
/// Strings are used verbatim. Any other JSON value is serialized with
/// `serde_json::to_string`: compact separators, object keys in
/// serde_json's default (lexicographically sorted) map order. Criteria
/// that must match inside structured results should quote fragments of
/// that canonical form.
fn render_result(result: &Value) -> String {
    match result {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[async_trait]
impl HookHandler for TaskCompletionGate {
    fn name(&self) -> &str {
        "task_completion_gate"
    }

    fn hook_type(&self) -> HookType {
        HookType::TaskCompleted
    }

    async fn handle(&self, context: &HookContext) -> Result<HookResponse, HookError> {
        let HookContext::TaskCompleted { task_id, result } = context else {
            return Ok(HookResponse::allow());
        };

        let Some(task_id) = task_id.as_deref() else {
            warn!("task completion event without task_id; allowing");
            return Ok(HookResponse::allow());
        };

        // An explicit JSON null counts as an absent result.
        let result = result.as_ref().filter(|v| !v.is_null());

        match self.validate(task_id, result).await {
            Ok(response) => Ok(response),
            Err(e) => {
                error!(task_id, error = %e, "completion validation failed; allowing (fail-open)");
                Ok(HookResponse::allow())
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
