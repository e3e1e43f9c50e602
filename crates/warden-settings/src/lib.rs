//! # warden-settings
//!
//! Settings loading for the warden monitor.
//!
//! The monitor is configured by a single YAML document whose
//! `agent_teams` section names the lead agent, the teammates, and the
//! monitor's file locations:
//!
//! ```yaml
//! agent_teams:
//!   enabled: true
//!   lead:
//!     agent_id: lead-1
//!     model: opus
//!     effort: high
//!     delegate_mode: true
//!   monitor:
//!     state_file: queue/hq/session_state.yaml
//!   teammates:
//!     - agent_id: worker-1
//!       model: sonnet
//! ```
//!
//! A missing `agent_teams` section is a startup error; the monitor has
//! nothing to supervise without it.

#![deny(unsafe_code)]

pub mod errors;
pub mod types;

pub use errors::SettingsError;
pub use types::{
    AgentTeamsSettings, LeadSettings, MonitorSettings, TeammateSettings, WardenSettings,
};

use std::fs;
use std::path::Path;

use tracing::debug;

/// Load and validate the settings document at `path`.
pub fn load_settings_from_path(path: &Path) -> Result<WardenSettings, SettingsError> {
    let text = fs::read_to_string(path).map_err(|source| SettingsError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let settings: WardenSettings =
        serde_yaml::from_str(&text).map_err(|source| SettingsError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    if settings.agent_teams.is_none() {
        return Err(SettingsError::MissingSection {
            path: path.to_path_buf(),
            section: "agent_teams",
        });
    }

    debug!(path = %path.display(), "settings loaded");
    Ok(settings)
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    use super::*;

    const FULL: &str = "\
agent_teams:
  enabled: true
  lead:
    agent_id: lead-1
    model: opus
    effort: high
    delegate_mode: true
  monitor:
    state_file: queue/hq/session_state.yaml
    tasks_dir: queue/tasks
  teammates:
    - agent_id: worker-1
      model: sonnet
    - agent_id: worker-2
      model: sonnet
";

    fn write(dir: &TempDir, content: &str) -> std::path::PathBuf {
        let path = dir.path().join("settings.yaml");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn loads_full_document() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, FULL);

        let settings = load_settings_from_path(&path).unwrap();
        let teams = settings.agent_teams.unwrap();
        assert!(teams.enabled);
        assert_eq!(teams.lead.agent_id, "lead-1");
        assert_eq!(teams.teammates.len(), 2);
        assert_eq!(
            teams.monitor.state_file.to_str(),
            Some("queue/hq/session_state.yaml")
        );
        assert_eq!(teams.monitor.tasks_dir.as_ref().unwrap().to_str(), Some("queue/tasks"));
    }

    #[test]
    fn missing_section_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = write(&dir, "something_else: true\n");

        assert_matches!(
            load_settings_from_path(&path),
            Err(SettingsError::MissingSection { section: "agent_teams", .. })
        );
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        assert_matches!(
            load_settings_from_path(&dir.path().join("nope.yaml")),
            Err(SettingsError::Io { .. })
        );
    }

    #[test]
    fn optional_monitor_paths_default() {
        let dir = TempDir::new().unwrap();
        let path = write(
            &dir,
            "\
agent_teams:
  enabled: true
  lead:
    agent_id: l
    model: m
    effort: low
    delegate_mode: false
  monitor:
    state_file: state.yaml
  teammates: []
",
        );

        let settings = load_settings_from_path(&path).unwrap();
        let monitor = settings.agent_teams.unwrap().monitor;
        assert!(monitor.tasks_dir.is_none());
        assert_eq!(monitor.log_dir.to_str(), Some("logs/monitor"));
    }
}
