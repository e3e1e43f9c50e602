//! Task-document reader.
//!
//! Tasks are defined in per-task YAML documents sitting in a task
//! directory. Each document carries a `task` section with a `task_id`,
//! a free-text `description` (optionally containing a checklist), and an
//! optional explicit `acceptance_criteria` field.
//!
//! Lookups are uncached on purpose: every call re-scans the directory, so
//! task documents can be added or edited mid-session without restarting
//! the monitor.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tokio::fs;
use tracing::trace;

use crate::errors::{Result, StateError};

/// Matches checklist lines `- [ ] text` and `- [x] text`, capturing the
/// text after the checkbox marker. Checked state is irrelevant.
static CHECKBOX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*-\s+\[\s*[x ]?\s*\]\s+(.+)$").expect("valid pattern"));

// ─────────────────────────────────────────────────────────────────────────────
// Document types
// ─────────────────────────────────────────────────────────────────────────────

/// A task document: a single `task` section.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskDocument {
    /// The task definition.
    pub task: TaskSpec,
}

/// A task definition as authored in a task document.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    /// Task identifier looked up by the completion gate.
    pub task_id: String,
    /// Free text, optionally containing `- [ ]` checklist lines.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Explicit acceptance criteria. Takes priority over the checklist.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub acceptance_criteria: Option<Criteria>,
}

/// Explicit criteria: a bare string is a single-element sequence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Criteria {
    /// A single criterion written as a bare string.
    One(String),
    /// A sequence of criteria.
    Many(Vec<String>),
}

impl Criteria {
    /// Normalize into a list.
    #[must_use]
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            Self::One(s) => vec![s.clone()],
            Self::Many(v) => v.clone(),
        }
    }
}

impl TaskSpec {
    /// Extract this task's acceptance criteria.
    ///
    /// The explicit `acceptance_criteria` field wins; otherwise checklist
    /// lines of the description are taken in document order, trimmed,
    /// checked or not.
    #[must_use]
    pub fn criteria(&self) -> Vec<String> {
        if let Some(explicit) = &self.acceptance_criteria {
            return explicit.to_vec();
        }
        let Some(description) = &self.description else {
            return Vec::new();
        };
        description
            .lines()
            .filter_map(|line| CHECKBOX.captures(line))
            .map(|caps| caps[1].trim().to_string())
            .collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Directory reader
// ─────────────────────────────────────────────────────────────────────────────

/// Reader over a directory of task documents.
#[derive(Clone, Debug)]
pub struct TaskDocs {
    dir: PathBuf,
}

impl TaskDocs {
    /// Reader over an explicitly configured task directory.
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Reader over the conventional location: `../tasks` relative to the
    /// state document's directory.
    #[must_use]
    pub fn for_state_path(state_path: &Path) -> Self {
        let dir = state_path
            .parent()
            .map_or_else(|| PathBuf::from("../tasks"), |p| p.join("../tasks"));
        Self { dir }
    }

    /// The directory being scanned.
    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Acceptance criteria for `task_id`.
    ///
    /// Scans every `.yaml` document in the task directory in listing order
    /// (unspecified; not a tie-breaker) and returns the criteria of the
    /// first document whose `task.task_id` matches. A missing directory or
    /// no matching document yields an empty sequence, the fail-open
    /// signal for the completion gate. Documents that parse to an
    /// unexpected shape are skipped; documents that do not scan at all
    /// propagate as errors.
    pub async fn acceptance_criteria(&self, task_id: &str) -> Result<Vec<String>> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StateError::Io {
                    path: self.dir.clone(),
                    source,
                });
            }
        };

        while let Some(entry) = entries.next_entry().await.map_err(|source| StateError::Io {
            path: self.dir.clone(),
            source,
        })? {
            let path = entry.path();
            if path.extension().and_then(|e| e.to_str()) != Some("yaml") {
                continue;
            }

            let text = fs::read_to_string(&path)
                .await
                .map_err(|source| StateError::Io {
                    path: path.clone(),
                    source,
                })?;
            let value: serde_yaml::Value =
                serde_yaml::from_str(&text).map_err(|source| StateError::Yaml {
                    path: path.clone(),
                    source,
                })?;
            let Ok(doc) = serde_yaml::from_value::<TaskDocument>(value) else {
                trace!(path = %path.display(), "not a task document, skipping");
                continue;
            };

            if doc.task.task_id == task_id {
                return Ok(doc.task.criteria());
            }
        }

        Ok(Vec::new())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;
    use tempfile::TempDir;

    use super::*;

    async fn write_doc(dir: &TempDir, name: &str, content: &str) {
        fs::write(dir.path().join(name), content).await.unwrap();
    }

    #[test]
    fn checklist_extraction_ignores_checked_state() {
        let spec = TaskSpec {
            task_id: "t".into(),
            description: Some("- [ ] a\n- [x] b\n- [ ] c".into()),
            acceptance_criteria: None,
        };
        assert_eq!(spec.criteria(), ["a", "b", "c"]);
    }

    #[test]
    fn checklist_skips_plain_lines() {
        let spec = TaskSpec {
            task_id: "t".into(),
            description: Some("Intro paragraph.\n- not a checkbox\n- [ ] real one\n".into()),
            acceptance_criteria: None,
        };
        assert_eq!(spec.criteria(), ["real one"]);
    }

    #[test]
    fn explicit_criteria_take_priority() {
        let spec = TaskSpec {
            task_id: "t".into(),
            description: Some("- [ ] from checklist".into()),
            acceptance_criteria: Some(Criteria::Many(vec!["explicit".into()])),
        };
        assert_eq!(spec.criteria(), ["explicit"]);
    }

    #[test]
    fn bare_string_criteria_is_single_element() {
        let doc: TaskDocument = serde_yaml::from_str(
            "task:\n  task_id: t1\n  acceptance_criteria: All tests passed\n",
        )
        .unwrap();
        assert_eq!(doc.task.criteria(), ["All tests passed"]);
    }

    #[tokio::test]
    async fn missing_directory_yields_empty() {
        let docs = TaskDocs::new("/nonexistent/tasks");
        assert!(docs.acceptance_criteria("t1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn no_matching_document_yields_empty() {
        let dir = TempDir::new().unwrap();
        write_doc(&dir, "other.yaml", "task:\n  task_id: other\n").await;

        let docs = TaskDocs::new(dir.path());
        assert!(docs.acceptance_criteria("t1").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn finds_matching_document_among_many() {
        let dir = TempDir::new().unwrap();
        write_doc(&dir, "a.yaml", "task:\n  task_id: other\n").await;
        write_doc(
            &dir,
            "b.yaml",
            "task:\n  task_id: t1\n  description: |\n    - [ ] first\n    - [x] second\n",
        )
        .await;
        write_doc(&dir, "notes.txt", "not yaml at all {{{").await;

        let docs = TaskDocs::new(dir.path());
        assert_eq!(
            docs.acceptance_criteria("t1").await.unwrap(),
            ["first", "second"]
        );
    }

    #[tokio::test]
    async fn shapeless_documents_are_skipped() {
        let dir = TempDir::new().unwrap();
        write_doc(&dir, "stray.yaml", "just_a_key: value\n").await;
        write_doc(
            &dir,
            "real.yaml",
            "task:\n  task_id: t1\n  acceptance_criteria:\n    - done\n",
        )
        .await;

        let docs = TaskDocs::new(dir.path());
        assert_eq!(docs.acceptance_criteria("t1").await.unwrap(), ["done"]);
    }

    #[tokio::test]
    async fn unscannable_yaml_propagates() {
        let dir = TempDir::new().unwrap();
        write_doc(&dir, "broken.yaml", "task: [unclosed\n").await;

        let docs = TaskDocs::new(dir.path());
        assert_matches!(
            docs.acceptance_criteria("t1").await,
            Err(StateError::Yaml { .. })
        );
    }

    #[tokio::test]
    async fn matching_task_without_criteria_yields_empty() {
        let dir = TempDir::new().unwrap();
        write_doc(
            &dir,
            "bare.yaml",
            "task:\n  task_id: t1\n  description: no checklist here\n",
        )
        .await;

        let docs = TaskDocs::new(dir.path());
        assert!(docs.acceptance_criteria("t1").await.unwrap().is_empty());
    }

    #[test]
    fn conventional_location_is_sibling_tasks_dir() {
        let docs = TaskDocs::for_state_path(Path::new("/work/queue/hq/session_state.yaml"));
        assert_eq!(docs.dir(), Path::new("/work/queue/hq/../tasks"));
    }
}
