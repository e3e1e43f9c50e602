//! Driver message and state-event types.
//!
//! Two type families, mirroring the boundary between the external
//! conversation driver and the session store:
//!
//! - **[`AgentMessage`]**: the loosely-typed message the driver emits.
//!   Every field is optional; drivers disagree about which fields they
//!   attach to which message kinds.
//! - **[`StateEvent`]**: the normalized tagged variant the store applies.
//!   Constructed only through [`StateEvent::from_message`], so actor
//!   resolution lives in exactly one place.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// AgentMessage — raw driver messages
// ─────────────────────────────────────────────────────────────────────────────

/// A message emitted by the external conversation driver.
///
/// Unknown fields are ignored on deserialization; absent fields stay
/// `None`. Interpretation of the message happens downstream: bookkeeping
/// fields feed [`StateEvent::from_message`], cost fields feed
/// [`CostTracker::track`](crate::cost::CostTracker::track).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct AgentMessage {
    /// Message kind (`task_assigned`, `task_completed`, `idle`, ...).
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// Sender identifier.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// Explicit teammate identifier. Preferred over `from` when both are set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teammate_id: Option<String>,
    /// Task identifier, for task-related message kinds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub task_id: Option<String>,
    /// Cost reported for this turn, in USD.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_cost_usd: Option<f64>,
    /// Duration reported for this turn, in milliseconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,
}

/// Message kind strings recognized by [`StateEvent::from_message`].
mod kinds {
    pub const TASK_ASSIGNED: &str = "task_assigned";
    pub const TASK_COMPLETED: &str = "task_completed";
    pub const IDLE: &str = "idle";
}

// ─────────────────────────────────────────────────────────────────────────────
// StateEvent — normalized bookkeeping events
// ─────────────────────────────────────────────────────────────────────────────

/// A normalized bookkeeping event applied to session state.
///
/// Every variant carries the resolved actor: the store auto-creates the
/// actor's teammate record on first reference, so an event without an
/// actor cannot exist.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum StateEvent {
    /// A task was handed to a teammate.
    Assigned {
        /// Teammate receiving the task.
        teammate: String,
        /// Task identifier.
        task: String,
    },
    /// A teammate reported one of its tasks finished.
    Completed {
        /// Teammate reporting completion.
        teammate: String,
        /// Task identifier.
        task: String,
    },
    /// A teammate went idle.
    Idle {
        /// Teammate that idled.
        teammate: String,
    },
}

impl StateEvent {
    /// Normalize a raw driver message into a state event.
    ///
    /// The actor is resolved from `teammate_id`, falling back to `from`.
    /// Returns `None` (a deliberate store no-op) for unrecognized or
    /// absent kinds, messages without a resolvable actor, and task
    /// messages without a `task_id`.
    #[must_use]
    pub fn from_message(msg: &AgentMessage) -> Option<Self> {
        let actor = msg.teammate_id.as_deref().or(msg.from.as_deref())?;
        match msg.kind.as_deref()? {
            kinds::TASK_ASSIGNED => Some(Self::Assigned {
                teammate: actor.to_string(),
                task: msg.task_id.clone()?,
            }),
            kinds::TASK_COMPLETED => Some(Self::Completed {
                teammate: actor.to_string(),
                task: msg.task_id.clone()?,
            }),
            kinds::IDLE => Some(Self::Idle {
                teammate: actor.to_string(),
            }),
            _ => None,
        }
    }

    /// The actor this event belongs to.
    #[must_use]
    pub fn teammate(&self) -> &str {
        match self {
            Self::Assigned { teammate, .. }
            | Self::Completed { teammate, .. }
            | Self::Idle { teammate } => teammate,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(kind: &str) -> AgentMessage {
        AgentMessage {
            kind: Some(kind.to_string()),
            ..AgentMessage::default()
        }
    }

    #[test]
    fn assignment_prefers_teammate_id_over_from() {
        let mut m = msg("task_assigned");
        m.from = Some("sender".into());
        m.teammate_id = Some("worker-1".into());
        m.task_id = Some("t1".into());

        let event = StateEvent::from_message(&m).unwrap();
        assert_eq!(
            event,
            StateEvent::Assigned {
                teammate: "worker-1".into(),
                task: "t1".into()
            }
        );
    }

    #[test]
    fn assignment_falls_back_to_from() {
        let mut m = msg("task_assigned");
        m.from = Some("worker-2".into());
        m.task_id = Some("t9".into());

        let event = StateEvent::from_message(&m).unwrap();
        assert_eq!(event.teammate(), "worker-2");
    }

    #[test]
    fn message_without_actor_is_dropped() {
        let mut m = msg("idle");
        m.task_id = Some("t1".into());
        assert_eq!(StateEvent::from_message(&m), None);
    }

    #[test]
    fn unrecognized_kind_is_dropped() {
        let mut m = msg("heartbeat");
        m.from = Some("worker-1".into());
        assert_eq!(StateEvent::from_message(&m), None);
    }

    #[test]
    fn task_message_without_task_id_is_dropped() {
        let mut m = msg("task_completed");
        m.from = Some("worker-1".into());
        assert_eq!(StateEvent::from_message(&m), None);
    }

    #[test]
    fn idle_needs_no_task_id() {
        let mut m = msg("idle");
        m.teammate_id = Some("worker-3".into());
        assert_eq!(
            StateEvent::from_message(&m),
            Some(StateEvent::Idle {
                teammate: "worker-3".into()
            })
        );
    }

    #[test]
    fn deserialize_ignores_unknown_fields() {
        let m: AgentMessage = serde_json::from_str(
            r#"{"type":"idle","from":"w","content":"hello","turn":3}"#,
        )
        .unwrap();
        assert_eq!(m.kind.as_deref(), Some("idle"));
        assert_eq!(m.from.as_deref(), Some("w"));
    }
}
