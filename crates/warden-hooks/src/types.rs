//! Core types for the hook system.
//!
//! Defines hook types, invocation contexts, and the decision value
//! returned to the driver. Context fields mirror the driver's snake_case
//! JSON payloads; absent fields deserialize to `None` rather than failing,
//! so a sloppy driver payload degrades to a fail-open decision instead of
//! a parse error.

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ─────────────────────────────────────────────────────────────────────────────
// Hook types
// ─────────────────────────────────────────────────────────────────────────────

/// Lifecycle hook points exposed to the external driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HookType {
    /// A teammate claims a task is complete. Can block.
    TaskCompleted,
    /// A teammate is about to go idle. Can block.
    TeammateIdle,
    /// The current turn is ending. Never blocks.
    Stop,
    /// A tool invocation finished. Never blocks.
    PostToolUse,
}

impl HookType {
    /// Returns all hook type variants.
    #[must_use]
    pub fn all() -> &'static [HookType] {
        &[
            Self::TaskCompleted,
            Self::TeammateIdle,
            Self::Stop,
            Self::PostToolUse,
        ]
    }
}

impl std::fmt::Display for HookType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskCompleted => write!(f, "TaskCompleted"),
            Self::TeammateIdle => write!(f, "TeammateIdle"),
            Self::Stop => write!(f, "Stop"),
            Self::PostToolUse => write!(f, "PostToolUse"),
        }
    }
}

/// How a handler executes relative to the driver's flow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HookExecutionMode {
    /// Runs synchronously; the driver waits for the decision.
    #[default]
    Blocking,
    /// Returns immediately; real work happens off the caller's path.
    /// Only the audit appender declares this, and it merely enqueues.
    Background,
}

// ─────────────────────────────────────────────────────────────────────────────
// Hook contexts
// ─────────────────────────────────────────────────────────────────────────────

/// Hook invocation payload — one variant per [`HookType`].
#[derive(Debug, Clone, PartialEq)]
pub enum HookContext {
    /// A teammate reports `task_id` done with an optional free-form result.
    TaskCompleted {
        /// Task being completed.
        task_id: Option<String>,
        /// Completion result: a string, a structured value, or absent.
        result: Option<Value>,
    },
    /// A teammate is about to idle.
    TeammateIdle {
        /// The idling teammate.
        teammate_id: Option<String>,
    },
    /// The turn is ending. No payload.
    Stop,
    /// A tool invocation finished.
    PostToolUse {
        /// Tool that ran.
        tool_name: Option<String>,
        /// Tool input payload.
        tool_input: Option<Value>,
        /// Tool output payload.
        tool_output: Option<Value>,
        /// Driver-supplied timestamp; defaults to now when absent.
        timestamp: Option<String>,
    },
}

#[derive(Debug, Default, Deserialize)]
struct TaskCompletedInput {
    task_id: Option<String>,
    result: Option<Value>,
}

#[derive(Debug, Default, Deserialize)]
struct TeammateIdleInput {
    teammate_id: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct PostToolUseInput {
    tool_name: Option<String>,
    tool_input: Option<Value>,
    tool_output: Option<Value>,
    timestamp: Option<String>,
}

impl HookContext {
    /// Which hook point this context belongs to.
    #[must_use]
    pub fn hook_type(&self) -> HookType {
        match self {
            Self::TaskCompleted { .. } => HookType::TaskCompleted,
            Self::TeammateIdle { .. } => HookType::TeammateIdle,
            Self::Stop => HookType::Stop,
            Self::PostToolUse { .. } => HookType::PostToolUse,
        }
    }

    /// Build a context from a raw driver input payload.
    ///
    /// Tolerant by design: unknown fields are ignored and a payload that
    /// does not deserialize at all is treated as empty, leaving the
    /// handler to take its fail-open path.
    #[must_use]
    pub fn from_input(hook: HookType, input: Value) -> Self {
        match hook {
            HookType::TaskCompleted => {
                let input: TaskCompletedInput =
                    serde_json::from_value(input).unwrap_or_default();
                Self::TaskCompleted {
                    task_id: input.task_id,
                    result: input.result,
                }
            }
            HookType::TeammateIdle => {
                let input: TeammateIdleInput =
                    serde_json::from_value(input).unwrap_or_default();
                Self::TeammateIdle {
                    teammate_id: input.teammate_id,
                }
            }
            HookType::Stop => Self::Stop,
            HookType::PostToolUse => {
                let input: PostToolUseInput =
                    serde_json::from_value(input).unwrap_or_default();
                Self::PostToolUse {
                    tool_name: input.tool_name,
                    tool_input: input.tool_input,
                    tool_output: input.tool_output,
                    timestamp: input.timestamp,
                }
            }
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Hook responses
// ─────────────────────────────────────────────────────────────────────────────

/// Block marker in the wire response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Decision {
    /// The operation is blocked.
    Block,
}

/// Decision returned to the driver.
///
/// Allow serializes to `{}`; block serializes to
/// `{"decision":"block","reason":"…"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HookResponse {
    /// Set only when blocking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub decision: Option<Decision>,
    /// Human-readable reason; set only when blocking.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl HookResponse {
    /// The operation may proceed.
    #[must_use]
    pub fn allow() -> Self {
        Self {
            decision: None,
            reason: None,
        }
    }

    /// Block the operation with a reason.
    #[must_use]
    pub fn block(reason: impl Into<String>) -> Self {
        Self {
            decision: Some(Decision::Block),
            reason: Some(reason.into()),
        }
    }

    /// Whether this response blocks the operation.
    #[must_use]
    pub fn is_blocked(&self) -> bool {
        self.decision == Some(Decision::Block)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
