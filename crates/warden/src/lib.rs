//! Shared library modules for the `warden` binary and its tests.
//!
//! The `warden` binary (`main.rs`) wires settings, session state, and the
//! hook registry together, then hands control to the driver loop exposed
//! here.

#![deny(unsafe_code)]

pub mod driver;
