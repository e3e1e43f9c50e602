//! Persisted session-state document types.
//!
//! Wire format is the snake_case YAML document described in the monitor's
//! operating docs: a top-level `teammates` sequence of
//! `{id, tasks: [string...], idle_count: integer}` objects. Fields carry
//! `#[serde(default)]` so partially-written documents still load.

use serde::{Deserialize, Serialize};

/// Durable snapshot of all teammates' pending tasks and idle counters.
///
/// INVARIANT: no two records share an `id`. All record access goes through
/// the lookup methods here, which preserve that invariant; the `teammates`
/// field stays public for serialization and read-only traversal.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    /// One record per teammate, in first-reference order.
    #[serde(default)]
    pub teammates: Vec<TeammateRecord>,
}

/// Bookkeeping for a single teammate.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TeammateRecord {
    /// Opaque teammate identifier.
    pub id: String,
    /// Assigned, unresolved task identifiers in assignment order.
    /// Never contains duplicates or completed tasks.
    #[serde(default)]
    pub tasks: Vec<String>,
    /// Number of idle events observed for this teammate.
    #[serde(default)]
    pub idle_count: u64,
}

impl TeammateRecord {
    /// Create an empty record for `id`.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tasks: Vec::new(),
            idle_count: 0,
        }
    }
}

impl SessionState {
    /// Find a teammate record by id.
    #[must_use]
    pub fn teammate(&self, id: &str) -> Option<&TeammateRecord> {
        self.teammates.iter().find(|t| t.id == id)
    }

    /// Find a teammate record by id, mutably.
    pub fn teammate_mut(&mut self, id: &str) -> Option<&mut TeammateRecord> {
        self.teammates.iter_mut().find(|t| t.id == id)
    }

    /// Get the record for `id`, creating an empty one on first reference.
    pub fn teammate_entry(&mut self, id: &str) -> &mut TeammateRecord {
        if let Some(idx) = self.teammates.iter().position(|t| t.id == id) {
            &mut self.teammates[idx]
        } else {
            self.teammates.push(TeammateRecord::new(id));
            self.teammates.last_mut().expect("record just pushed")
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entry_creates_once() {
        let mut state = SessionState::default();
        state.teammate_entry("a").tasks.push("t1".into());
        state.teammate_entry("a").tasks.push("t2".into());

        assert_eq!(state.teammates.len(), 1);
        assert_eq!(state.teammate("a").unwrap().tasks, vec!["t1", "t2"]);
    }

    #[test]
    fn yaml_roundtrip_matches_wire_shape() {
        let mut state = SessionState::default();
        let rec = state.teammate_entry("worker-1");
        rec.tasks.push("t1".into());
        rec.idle_count = 2;

        let yaml = serde_yaml::to_string(&state).unwrap();
        assert!(yaml.contains("teammates:"));
        assert!(yaml.contains("id: worker-1"));
        assert!(yaml.contains("idle_count: 2"));

        let back: SessionState = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(back, state);
    }

    #[test]
    fn partial_document_loads_with_defaults() {
        let state: SessionState =
            serde_yaml::from_str("teammates:\n  - id: solo\n").unwrap();
        let rec = state.teammate("solo").unwrap();
        assert!(rec.tasks.is_empty());
        assert_eq!(rec.idle_count, 0);
    }
}
