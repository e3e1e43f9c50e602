//! Hook registry and dispatch.
//!
//! Maintains the registered [`HookHandler`] instances per [`HookType`]
//! and dispatches incoming contexts to them. The registry is where the
//! fail-open contract is enforced for anything a handler lets escape.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::handler::HookHandler;
use crate::types::{HookContext, HookResponse, HookType};

/// Registry of lifecycle hook handlers.
///
/// Handlers are bucketed by [`HookType`] and run in registration order.
#[derive(Default)]
pub struct HookRegistry {
    hooks: HashMap<HookType, Vec<Arc<dyn HookHandler>>>,
}

impl HookRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            hooks: HashMap::new(),
        }
    }

    /// Register a hook handler.
    ///
    /// A handler with the same name already registered for the same type
    /// is replaced.
    pub fn register(&mut self, handler: Arc<dyn HookHandler>) {
        let hook_type = handler.hook_type();
        let name = handler.name().to_string();

        let handlers = self.hooks.entry(hook_type).or_default();
        handlers.retain(|h| h.name() != name);

        debug!(name = %name, hook_type = %hook_type, "registering hook");
        handlers.push(handler);
    }

    /// Dispatch a context to every matching handler, in registration
    /// order. The first block decision wins; handler errors are logged
    /// and treated as allow.
    pub async fn dispatch(&self, context: &HookContext) -> HookResponse {
        let Some(handlers) = self.hooks.get(&context.hook_type()) else {
            return HookResponse::allow();
        };

        for handler in handlers {
            match handler.handle(context).await {
                Ok(response) if response.is_blocked() => {
                    debug!(
                        handler = handler.name(),
                        reason = response.reason.as_deref().unwrap_or(""),
                        "hook blocked"
                    );
                    return response;
                }
                Ok(_) => {}
                Err(e) => {
                    warn!(
                        handler = handler.name(),
                        error = %e,
                        "hook handler failed; continuing (fail-open)"
                    );
                }
            }
        }
        HookResponse::allow()
    }

    /// Names of all registered handlers, for the startup summary.
    #[must_use]
    pub fn handler_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .hooks
            .values()
            .flatten()
            .map(|h| h.name().to_string())
            .collect();
        names.sort();
        names
    }

    /// Total number of registered handlers.
    #[must_use]
    pub fn count(&self) -> usize {
        self.hooks.values().map(Vec::len).sum()
    }
}

impl std::fmt::Debug for HookRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookRegistry")
            .field("hook_count", &self.count())
            .finish()
    }
}
