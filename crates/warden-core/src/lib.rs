//! # warden-core
//!
//! Foundation types for the warden monitoring harness.
//!
//! - **Driver messages**: [`events::AgentMessage`], the loosely-typed JSON
//!   message the external conversation driver emits.
//! - **State events**: [`events::StateEvent`], the normalized tagged variant
//!   consumed by the session store, with the one normalization point
//!   [`events::StateEvent::from_message`].
//! - **Cost accounting**: [`cost::CostTracker`], a per-session accumulator
//!   of cost and duration reported on driver messages.
//!
//! ## Crate Position
//!
//! Foundation crate. Depended on by all other warden crates.

#![deny(unsafe_code)]

pub mod cost;
pub mod events;
