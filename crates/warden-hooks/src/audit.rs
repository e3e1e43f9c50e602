//! The audit appender.
//!
//! Records every tool invocation to a day-partitioned append-only log,
//! one JSON record per line. The handler itself only builds the record
//! and enqueues it on a bounded channel; a spawned writer task owns the
//! file I/O and guarantees per-file append ordering. Nothing here can
//! block or fail the caller: a full queue drops the record with a
//! warning, and write failures are logged and swallowed.

use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::warn;

use crate::errors::HookError;
use crate::handler::HookHandler;
use crate::types::{HookContext, HookExecutionMode, HookResponse, HookType};

/// One audit record per tool invocation.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// RFC 3339 timestamp; the driver's if supplied, otherwise now.
    pub timestamp: String,
    /// Tool that ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Tool input payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_input: Option<Value>,
    /// Tool output payload.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_output: Option<Value>,
}

/// Handler consuming `PostToolUse` events. Always allows.
#[derive(Debug)]
pub struct AuditLogger {
    tx: mpsc::Sender<AuditRecord>,
}

impl AuditLogger {
    /// Spawn the writer task over `log_dir` and return the handler plus
    /// the writer's join handle.
    ///
    /// The handle completes once every sender clone is dropped and the
    /// queue has drained; await it at shutdown to flush trailing records.
    #[must_use]
    pub fn spawn(log_dir: impl Into<PathBuf>, capacity: usize) -> (Self, JoinHandle<()>) {
        let (tx, rx) = mpsc::channel(capacity);
        let handle = tokio::spawn(write_loop(log_dir.into(), rx));
        (Self { tx }, handle)
    }
}

async fn write_loop(dir: PathBuf, mut rx: mpsc::Receiver<AuditRecord>) {
    while let Some(record) = rx.recv().await {
        if let Err(e) = append(&dir, &record).await {
            warn!(error = %e, "audit append failed; record dropped");
        }
    }
}

/// Append one record to today's log file, creating directory and file on
/// demand.
async fn append(dir: &Path, record: &AuditRecord) -> io::Result<()> {
    let file = dir.join(format!("audit_{}.jsonl", Utc::now().format("%Y%m%d")));

    fs::create_dir_all(dir).await?;

    let mut line = serde_json::to_string(record).map_err(io::Error::other)?;
    line.push('\n');

    let mut out = fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(&file)
        .await?;
    out.write_all(line.as_bytes()).await
}

#[async_trait]
impl HookHandler for AuditLogger {
    fn name(&self) -> &str {
        "audit_logger"
    }

    fn hook_type(&self) -> HookType {
        HookType::PostToolUse
    }

    fn execution_mode(&self) -> HookExecutionMode {
        HookExecutionMode::Background
    }

    async fn handle(&self, context: &HookContext) -> Result<HookResponse, HookError> {
        let HookContext::PostToolUse {
            tool_name,
            tool_input,
            tool_output,
            timestamp,
        } = context
        else {
            return Ok(HookResponse::allow());
        };

        let record = AuditRecord {
            timestamp: timestamp
                .clone()
                .unwrap_or_else(|| Utc::now().to_rfc3339()),
            tool_name: tool_name.clone(),
            tool_input: tool_input.clone(),
            tool_output: tool_output.clone(),
        };

        if let Err(e) = self.tx.try_send(record) {
            warn!(error = %e, "audit queue full or closed; record dropped");
        }
        Ok(HookResponse::allow())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    fn tool_ctx(timestamp: Option<&str>) -> HookContext {
        HookContext::PostToolUse {
            tool_name: Some("Bash".into()),
            tool_input: Some(json!({"command": "ls"})),
            tool_output: Some(json!("ok")),
            timestamp: timestamp.map(String::from),
        }
    }

    async fn todays_log(dir: &Path) -> String {
        let file = dir.join(format!("audit_{}.jsonl", Utc::now().format("%Y%m%d")));
        fs::read_to_string(file).await.unwrap()
    }

    #[tokio::test]
    async fn appends_one_line_per_record() {
        let dir = TempDir::new().unwrap();
        let (logger, writer) = AuditLogger::spawn(dir.path(), 16);

        let first = logger.handle(&tool_ctx(Some("2026-08-07T00:00:00Z"))).await.unwrap();
        let second = logger.handle(&tool_ctx(Some("2026-08-07T00:00:01Z"))).await.unwrap();
        assert_eq!(first, HookResponse::allow());
        assert_eq!(second, HookResponse::allow());

        drop(logger);
        writer.await.unwrap();

        let text = todays_log(dir.path()).await;
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);

        let record: AuditRecord = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(record.timestamp, "2026-08-07T00:00:00Z");
        assert_eq!(record.tool_name.as_deref(), Some("Bash"));
        assert_eq!(record.tool_input, Some(json!({"command": "ls"})));
    }

    #[tokio::test]
    async fn missing_timestamp_defaults_to_now() {
        let dir = TempDir::new().unwrap();
        let (logger, writer) = AuditLogger::spawn(dir.path(), 16);

        let _ = logger.handle(&tool_ctx(None)).await.unwrap();
        drop(logger);
        writer.await.unwrap();

        let text = todays_log(dir.path()).await;
        let record: AuditRecord = serde_json::from_str(text.lines().next().unwrap()).unwrap();
        assert!(!record.timestamp.is_empty());
    }

    #[tokio::test]
    async fn unwritable_directory_still_allows() {
        // Use a file as the "directory" so create_dir_all fails in the writer.
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "file").await.unwrap();

        let (logger, writer) = AuditLogger::spawn(&blocker, 16);
        let response = logger.handle(&tool_ctx(None)).await.unwrap();
        assert_eq!(response, HookResponse::allow());

        drop(logger);
        writer.await.unwrap();
    }

    #[tokio::test]
    async fn full_queue_drops_but_allows() {
        let dir = TempDir::new().unwrap();
        let (tx, rx) = mpsc::channel(1);
        // Keep the receiver parked so the queue stays full.
        let logger = AuditLogger { tx };
        let _ = logger.handle(&tool_ctx(None)).await.unwrap();
        let response = logger.handle(&tool_ctx(None)).await.unwrap();
        assert_eq!(response, HookResponse::allow());
        drop(rx);
    }
}
