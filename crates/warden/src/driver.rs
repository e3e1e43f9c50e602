//! The driver event loop.
//!
//! The external conversation driver connects over stdio: each input line
//! is one JSON event. Hook invocations look like
//!
//! ```json
//! {"type":"hook","hook":"TaskCompleted","input":{"task_id":"t1","result":"..."}}
//! ```
//!
//! and are answered with one line of decision JSON (`{}` to allow,
//! `{"decision":"block","reason":"…"}` to block). Every other object is a
//! driver message (`type` is the message kind, e.g. `task_assigned`) fed
//! to the cost tracker and, normalized, to the in-memory state store.
//! Malformed lines are logged and skipped; a chatty driver must not kill
//! the monitor.

use serde::Deserialize;
use serde_json::Value;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, warn};

use warden_core::cost::CostTracker;
use warden_core::events::{AgentMessage, StateEvent};
use warden_hooks::{HookContext, HookRegistry, HookType};
use warden_state::StateStore;

/// One parsed driver input line.
#[derive(Debug)]
pub enum DriverEvent {
    /// A hook invocation expecting a decision in response.
    Hook(HookContext),
    /// A driver message; no response is written.
    Message(AgentMessage),
}

#[derive(Debug, Deserialize)]
struct HookEnvelope {
    hook: HookType,
    #[serde(default)]
    input: Value,
}

/// Parse one input line into a [`DriverEvent`].
///
/// A line whose `type` is `"hook"` is a hook invocation; anything else
/// that parses as an object is a driver message.
pub fn parse_line(line: &str) -> Result<DriverEvent, serde_json::Error> {
    let value: Value = serde_json::from_str(line)?;
    if value.get("type").and_then(Value::as_str) == Some("hook") {
        let envelope: HookEnvelope = serde_json::from_value(value)?;
        Ok(DriverEvent::Hook(HookContext::from_input(
            envelope.hook,
            envelope.input,
        )))
    } else {
        Ok(DriverEvent::Message(serde_json::from_value(value)?))
    }
}

/// Everything the loop reads and mutates.
pub struct Monitor {
    /// Registered hook handlers.
    pub registry: HookRegistry,
    /// In-memory session state, already loaded. Saved once at EOF;
    /// the hook handlers persist their own mutations as they go.
    pub store: StateStore,
    /// Session cost accumulator.
    pub costs: CostTracker,
}

/// Run the driver loop until EOF on `input`.
///
/// Hook decisions are written to `output`, one line each, flushed per
/// decision so the driver never stalls on buffering.
pub async fn run_loop<R, W>(monitor: &mut Monitor, input: R, mut output: W) -> anyhow::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Ok(DriverEvent::Hook(context)) => {
                debug!(hook = %context.hook_type(), "dispatching hook");
                let response = monitor.registry.dispatch(&context).await;
                let mut json = serde_json::to_string(&response)?;
                json.push('\n');
                output.write_all(json.as_bytes()).await?;
                output.flush().await?;
            }
            Ok(DriverEvent::Message(message)) => {
                monitor.costs.track(&message);
                if let Some(event) = StateEvent::from_message(&message) {
                    if let Err(e) = monitor.store.apply(&event) {
                        warn!(error = %e, "could not apply driver message to state");
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "malformed driver line; skipped");
            }
        }
    }
    Ok(())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
