//! Hook handler trait.
//!
//! Defines the [`HookHandler`] trait the four monitor handlers implement.
//! Handlers are registered with the [`HookRegistry`](crate::registry::HookRegistry),
//! which dispatches contexts to them and enforces the fail-open contract.

use async_trait::async_trait;

use crate::errors::HookError;
use crate::types::{HookContext, HookExecutionMode, HookResponse, HookType};

/// A lifecycle hook handler.
///
/// Implementations inspect the context and return a [`HookResponse`]
/// deciding whether the driver's operation proceeds.
///
/// # Fail-Open
///
/// Errors returned from [`handle`](HookHandler::handle) are caught by the
/// registry, logged, and treated as allow. Handlers with internal
/// fail-open branches (all four monitor handlers) convert their own
/// failures before returning, so an `Err` here is a last resort.
///
/// # Execution Mode
///
/// Handlers declaring [`HookExecutionMode::Background`] must do their real
/// work off the caller's path and return immediately; the driver may
/// overlap such calls with other activity.
#[async_trait]
pub trait HookHandler: Send + Sync {
    /// Unique name for this handler, used in logs.
    fn name(&self) -> &str;

    /// Which lifecycle event this handler responds to.
    fn hook_type(&self) -> HookType;

    /// Preferred execution mode. Default: blocking.
    fn execution_mode(&self) -> HookExecutionMode {
        HookExecutionMode::Blocking
    }

    /// Execute the handler with the given context.
    async fn handle(&self, context: &HookContext) -> Result<HookResponse, HookError>;
}
