//! The `warden` binary: monitoring harness for multi-agent work sessions.
//!
//! Startup sequence: load the settings document, load the lead agent's
//! instruction text, load (or initialize) the session-state document,
//! register the four lifecycle hooks, then hand stdio to the driver loop.
//! `--dry-run` stops after registration, exiting 0 once the configuration
//! is known-good.
//!
//! Stdout belongs to the hook RPC; all diagnostics go to stderr via
//! `tracing`.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, bail};
use clap::Parser;
use tokio::io::BufReader;
use tracing::info;
use tracing_subscriber::EnvFilter;

use warden::driver::{Monitor, run_loop};
use warden_core::cost::CostTracker;
use warden_hooks::{
    AuditLogger, HookRegistry, IdleGate, TaskCompletionGate, TurnContext, TurnSnapshot,
};
use warden_settings::load_settings_from_path;
use warden_state::{StateStore, TaskDocs};

/// Capacity of the audit queue between the hook and its writer task.
const AUDIT_QUEUE_CAPACITY: usize = 256;

#[derive(Debug, Parser)]
#[command(name = "warden", version, about = "Monitoring harness for multi-agent work sessions")]
struct Cli {
    /// Settings document.
    #[arg(long, default_value = "config/settings.yaml")]
    config: PathBuf,

    /// Instruction text for the lead agent.
    #[arg(long, default_value = "instructions/lead.md")]
    instructions: PathBuf,

    /// Validate configuration and exit without starting the session loop.
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = load_settings_from_path(&cli.config).context("loading settings")?;
    let Some(teams) = settings.agent_teams else {
        // The loader rejects this already; keep the invariant visible.
        bail!("settings have no agent_teams section");
    };
    info!(
        lead = %teams.lead.agent_id,
        model = %teams.lead.model,
        teammates = teams.teammates.len(),
        "team configured"
    );

    let instructions = tokio::fs::read_to_string(&cli.instructions)
        .await
        .with_context(|| format!("loading instructions from {}", cli.instructions.display()))?;
    info!(bytes = instructions.len(), "instructions loaded");

    let mut store = StateStore::new(&teams.monitor.state_file);
    store.load().await.context("loading session state")?;
    info!(path = %teams.monitor.state_file.display(), "session state loaded");

    let docs = match &teams.monitor.tasks_dir {
        Some(dir) => TaskDocs::new(dir),
        None => TaskDocs::for_state_path(&teams.monitor.state_file),
    };

    let turn = Arc::new(TurnContext::new());
    let (audit, audit_writer) = AuditLogger::spawn(&teams.monitor.log_dir, AUDIT_QUEUE_CAPACITY);

    let mut registry = HookRegistry::new();
    registry.register(Arc::new(TaskCompletionGate::new(
        &teams.monitor.state_file,
        docs,
    )));
    registry.register(Arc::new(IdleGate::new(&teams.monitor.state_file)));
    registry.register(Arc::new(TurnSnapshot::new(
        &teams.monitor.state_file,
        Arc::clone(&turn),
    )));
    registry.register(Arc::new(audit));
    info!(hooks = ?registry.handler_names(), "hooks registered");

    if cli.dry_run {
        info!("dry run: configuration loaded; exiting without starting the session loop");
        return Ok(());
    }

    let mut monitor = Monitor {
        registry,
        store,
        costs: CostTracker::new(),
    };

    let stdin = BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    run_loop(&mut monitor, stdin, stdout)
        .await
        .context("driver loop")?;

    // EOF from the driver: persist the final state and the cost summary.
    monitor.store.save().await.context("saving final state")?;
    let summary = monitor.costs.summary();
    monitor
        .costs
        .write_to(&teams.monitor.log_dir.join("cost_summary.json"))
        .await
        .context("writing cost summary")?;
    info!(
        total_cost_usd = summary.total_cost_usd,
        num_turns = summary.num_turns,
        "session ended"
    );

    // Dropping the monitor drops the registry and with it the audit
    // sender; the writer drains the queue and exits.
    drop(monitor);
    audit_writer.await.context("audit writer")?;

    Ok(())
}
