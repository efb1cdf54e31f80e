//! Shared models and helpers used by every `sonar` crate.
//!
//! * **[`network`]**: scan targets, port ranges and per-port results.
//! * **[`system`]**: facts about the local machine and the port used to collect them.
//! * **[`config`]**: presentation flags and the per-run scan configuration.
//! * **[`error`]**: input validation errors.

pub mod config;
pub mod error;
pub mod logging;
pub mod network;
pub mod system;
