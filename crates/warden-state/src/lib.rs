//! # warden-state
//!
//! Session-state bookkeeping for the warden monitor.
//!
//! - **[`types`]**: the persisted [`SessionState`](types::SessionState) /
//!   [`TeammateRecord`](types::TeammateRecord) document shape.
//! - **[`store`]**: [`StateStore`](store::StateStore), the single in-process
//!   owner of session state with whole-file YAML load/save.
//! - **[`tasks`]**: [`TaskDocs`](tasks::TaskDocs), the uncached task-document
//!   reader that extracts acceptance criteria.
//!
//! ## Persistence Model
//!
//! The in-memory state is the source of truth while the process runs; the
//! YAML document is a cold copy, rewritten in full on every save. There is
//! no locking and no optimistic concurrency check; a single active writer
//! is assumed for the process lifetime, and concurrent external mutation of
//! the document is undefined.

#![deny(unsafe_code)]

pub mod errors;
pub mod store;
pub mod tasks;
pub mod types;

pub use errors::{Result, StateError};
pub use store::StateStore;
pub use tasks::TaskDocs;
pub use types::{SessionState, TeammateRecord};
