//! Per-session cost accounting.
//!
//! The driver attaches `total_cost_usd` and `duration_ms` to result
//! messages; [`CostTracker`] folds them into running totals. Pure
//! arithmetic; the only invariant is that totals never shrink.

use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::events::AgentMessage;

/// Rolling cost and duration accumulator fed from driver messages.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CostTracker {
    total_cost_usd: f64,
    total_duration_ms: u64,
    num_turns: u64,
}

/// Snapshot of accumulated session cost.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    /// Total cost across all turns, in USD.
    pub total_cost_usd: f64,
    /// Total wall-clock duration across all turns, in milliseconds.
    pub total_duration_ms: u64,
    /// Number of messages observed.
    pub num_turns: u64,
    /// `total_cost_usd / num_turns`, or 0 when no turns were observed.
    pub avg_cost_per_turn: f64,
}

impl CostTracker {
    /// Create a tracker with zeroed totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one driver message into the totals.
    ///
    /// Messages without cost fields still count as a turn, matching how
    /// the driver reports: most messages carry no cost, result messages
    /// carry the accumulated figures.
    pub fn track(&mut self, msg: &AgentMessage) {
        if let Some(cost) = msg.total_cost_usd {
            self.total_cost_usd += cost;
        }
        if let Some(ms) = msg.duration_ms {
            self.total_duration_ms += ms;
        }
        self.num_turns += 1;
    }

    /// Current totals.
    #[must_use]
    pub fn summary(&self) -> CostSummary {
        CostSummary {
            total_cost_usd: self.total_cost_usd,
            total_duration_ms: self.total_duration_ms,
            num_turns: self.num_turns,
            avg_cost_per_turn: if self.num_turns > 0 {
                self.total_cost_usd / self.num_turns as f64
            } else {
                0.0
            },
        }
    }

    /// Write the summary to `path` as pretty-printed JSON.
    pub async fn write_to(&self, path: &Path) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.summary()).map_err(io::Error::other)?;
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(path, json).await
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn cost_msg(cost: f64, ms: u64) -> AgentMessage {
        AgentMessage {
            total_cost_usd: Some(cost),
            duration_ms: Some(ms),
            ..AgentMessage::default()
        }
    }

    #[test]
    fn accumulates_across_messages() {
        let mut tracker = CostTracker::new();
        tracker.track(&cost_msg(0.5, 1000));
        tracker.track(&cost_msg(0.25, 500));
        tracker.track(&AgentMessage::default());

        let summary = tracker.summary();
        assert!((summary.total_cost_usd - 0.75).abs() < f64::EPSILON);
        assert_eq!(summary.total_duration_ms, 1500);
        assert_eq!(summary.num_turns, 3);
        assert!((summary.avg_cost_per_turn - 0.25).abs() < f64::EPSILON);
    }

    #[test]
    fn empty_tracker_has_zero_average() {
        let summary = CostTracker::new().summary();
        assert_eq!(summary.num_turns, 0);
        assert!((summary.avg_cost_per_turn - 0.0).abs() < f64::EPSILON);
    }

    #[tokio::test]
    async fn writes_summary_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("logs").join("cost_summary.json");

        let mut tracker = CostTracker::new();
        tracker.track(&cost_msg(1.0, 2000));
        tracker.write_to(&path).await.unwrap();

        let text = tokio::fs::read_to_string(&path).await.unwrap();
        let parsed: CostSummary = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, tracker.summary());
    }
}
