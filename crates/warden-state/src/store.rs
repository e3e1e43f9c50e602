//! The [`StateStore`], single in-process owner of session state.
//!
//! Load/save are whole-file YAML operations: `load()` replaces the
//! in-memory state from disk, `save()` rewrites the document from memory.
//! Between the two, the in-memory state is authoritative. Mutations are
//! pure (no implicit persistence); callers decide when a snapshot is
//! worth a write.

use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;
use tracing::debug;

use warden_core::events::StateEvent;

use crate::errors::{Result, StateError};
use crate::types::SessionState;

/// Session-state store backed by a YAML document.
///
/// All operations except [`load`](Self::load) fail with
/// [`StateError::NotLoaded`] until `load()` has completed at least once.
/// The store assumes a single active writer for the process lifetime;
/// persistence is last-write-wins.
#[derive(Debug)]
pub struct StateStore {
    path: PathBuf,
    state: Option<SessionState>,
}

impl StateStore {
    /// Create a store for the document at `path`. Nothing is read yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            state: None,
        }
    }

    /// Path of the backing document.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted document into memory.
    ///
    /// A missing file initializes the empty state: resuming a session and
    /// starting a fresh one are the same code path. A document that scans
    /// as YAML but has no usable structure (empty, null, scalar, wrong
    /// types) also yields the empty state. A document that does not scan
    /// at all, or any other read failure, propagates.
    pub async fn load(&mut self) -> Result<()> {
        let text = match fs::read_to_string(&self.path).await {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state document, starting empty");
                self.state = Some(SessionState::default());
                return Ok(());
            }
            Err(source) => {
                return Err(StateError::Io {
                    path: self.path.clone(),
                    source,
                });
            }
        };

        let value: serde_yaml::Value =
            serde_yaml::from_str(&text).map_err(|source| StateError::Yaml {
                path: self.path.clone(),
                source,
            })?;
        self.state = Some(serde_yaml::from_value(value).unwrap_or_default());
        Ok(())
    }

    /// Serialize the in-memory state back to the document, fully
    /// overwriting prior content. Creates the parent directory if needed.
    pub async fn save(&self) -> Result<()> {
        let state = self.state()?;
        let text = serde_yaml::to_string(state).map_err(|source| StateError::Yaml {
            path: self.path.clone(),
            source,
        })?;

        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|source| StateError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
        }
        fs::write(&self.path, text)
            .await
            .map_err(|source| StateError::Io {
                path: self.path.clone(),
                source,
            })
    }

    /// Apply a normalized bookkeeping event.
    ///
    /// The actor's record is created on first reference. Assignment is
    /// idempotent (a task already held is not appended twice); completion
    /// removes the task from the actor's list; idle increments the
    /// counter.
    pub fn apply(&mut self, event: &StateEvent) -> Result<()> {
        let state = self.state_mut()?;
        match event {
            StateEvent::Assigned { teammate, task } => {
                let record = state.teammate_entry(teammate);
                if !record.tasks.contains(task) {
                    record.tasks.push(task.clone());
                }
            }
            StateEvent::Completed { teammate, task } => {
                state.teammate_entry(teammate).tasks.retain(|t| t != task);
            }
            StateEvent::Idle { teammate } => {
                state.teammate_entry(teammate).idle_count += 1;
            }
        }
        Ok(())
    }

    /// Remove `task_id` from every teammate's pending list.
    ///
    /// Deliberately owner-agnostic: a task can be completed without
    /// knowing which teammate held it.
    pub fn mark_task_completed(&mut self, task_id: &str) -> Result<()> {
        let state = self.state_mut()?;
        for record in &mut state.teammates {
            record.tasks.retain(|t| t != task_id);
        }
        Ok(())
    }

    /// Pending task ids for `id`, in assignment order.
    ///
    /// Unknown teammates yield an empty slice; a read never creates a
    /// record.
    pub fn pending_tasks_for(&self, id: &str) -> Result<&[String]> {
        Ok(self
            .state()?
            .teammate(id)
            .map_or(&[][..], |t| t.tasks.as_slice()))
    }

    /// Increment the idle counter for `id`, creating the record if absent.
    ///
    /// Pure mutation; callers persist separately if durability is wanted.
    pub fn increment_idle_count(&mut self, id: &str) -> Result<()> {
        self.state_mut()?.teammate_entry(id).idle_count += 1;
        Ok(())
    }

    /// Immutable view of the loaded state.
    pub fn state(&self) -> Result<&SessionState> {
        self.state.as_ref().ok_or(StateError::NotLoaded)
    }

    fn state_mut(&mut self) -> Result<&mut SessionState> {
        self.state.as_mut().ok_or(StateError::NotLoaded)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
