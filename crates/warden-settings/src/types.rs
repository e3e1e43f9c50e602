//! Settings type definitions.
//!
//! Field names are snake_case, matching the YAML document as authored by
//! operators. Optional monitor paths carry defaults so a minimal document
//! still configures a working monitor.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root settings document.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct WardenSettings {
    /// The multi-agent team being supervised. Required at startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent_teams: Option<AgentTeamsSettings>,
}

/// The `agent_teams` section.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AgentTeamsSettings {
    /// Whether team supervision is switched on.
    #[serde(default)]
    pub enabled: bool,
    /// The lead agent driving the session.
    pub lead: LeadSettings,
    /// Monitor file locations.
    pub monitor: MonitorSettings,
    /// The supervised teammates.
    #[serde(default)]
    pub teammates: Vec<TeammateSettings>,
}

/// Lead agent configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LeadSettings {
    /// Lead agent identifier.
    pub agent_id: String,
    /// Model the lead runs on.
    pub model: String,
    /// Reasoning effort requested for the lead.
    pub effort: String,
    /// Whether the lead delegates rather than working directly.
    #[serde(default)]
    pub delegate_mode: bool,
}

/// Monitor file locations.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonitorSettings {
    /// Path of the session-state document.
    pub state_file: PathBuf,
    /// Task-document directory. Absent means the conventional location,
    /// `../tasks` relative to the state document's directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tasks_dir: Option<PathBuf>,
    /// Directory for audit logs and the cost summary.
    #[serde(default = "default_log_dir")]
    pub log_dir: PathBuf,
}

/// One supervised teammate.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TeammateSettings {
    /// Teammate agent identifier.
    pub agent_id: String,
    /// Model the teammate runs on.
    pub model: String,
}

fn default_log_dir() -> PathBuf {
    PathBuf::from("logs/monitor")
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_has_no_team() {
        let settings: WardenSettings = serde_yaml::from_str("{}").unwrap();
        assert!(settings.agent_teams.is_none());
    }

    #[test]
    fn teammates_default_to_empty() {
        let teams: AgentTeamsSettings = serde_yaml::from_str(
            "\
enabled: true
lead:
  agent_id: l
  model: m
  effort: low
monitor:
  state_file: s.yaml
",
        )
        .unwrap();
        assert!(teams.teammates.is_empty());
        assert!(!teams.lead.delegate_mode);
    }
}
