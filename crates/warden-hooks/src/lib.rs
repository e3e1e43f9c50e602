//! # warden-hooks
//!
//! Lifecycle hook handlers for the warden monitor.
//!
//! The external conversation driver fires hooks at defined points of the
//! supervised session:
//!
//! | Hook | Handler | Decision |
//! |------|---------|----------|
//! | `TaskCompleted` | [`TaskCompletionGate`](task_completed::TaskCompletionGate) | blocks completion until acceptance criteria match |
//! | `TeammateIdle` | [`IdleGate`](teammate_idle::IdleGate) | blocks idling while tasks are outstanding |
//! | `Stop` | [`TurnSnapshot`](stop::TurnSnapshot) | persists state at turn end, never blocks |
//! | `PostToolUse` | [`AuditLogger`](audit::AuditLogger) | appends an audit record, never blocks |
//!
//! ## Fail-Open
//!
//! The monitor is a supervisory add-on: its own malfunction must never
//! stall the supervised workflow. Infrastructure failures inside any
//! handler are logged and converted to an allow decision; only domain
//! validation failures ("criterion not met", "tasks outstanding") surface
//! as blocks.

#![deny(unsafe_code)]

pub mod audit;
pub mod errors;
pub mod handler;
pub mod registry;
pub mod stop;
pub mod task_completed;
pub mod teammate_idle;
pub mod types;

pub use audit::AuditLogger;
pub use errors::HookError;
pub use handler::HookHandler;
pub use registry::HookRegistry;
pub use stop::{TurnContext, TurnSnapshot};
pub use task_completed::TaskCompletionGate;
pub use teammate_idle::IdleGate;
pub use types::{HookContext, HookExecutionMode, HookResponse, HookType};
