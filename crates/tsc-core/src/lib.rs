//! `tsc-core` - foundational types for traffic-signal policy evaluation.
//!
//! This crate is a dependency of every other `tsc-*` crate and has no `tsc-*`
//! dependencies of its own.
//!
//! # What lives here
//!
//! | Module          | Contents                                              |
//! |-----------------|-------------------------------------------------------|
//! | [`ids`]         | `LaneId`, `SignalId`, `VehicleId`                     |
//! | [`pollutant`]   | `Pollutant` enum and its output column names          |
//! | [`time`]        | `Tick`, `TickRange`                                   |
//! | [`config`]      | `EvalConfig`, `OutputFormat`                          |
//! | [`error`]       | `CoreError`, `CoreResult`                             |

pub mod config;
pub mod error;
pub mod ids;
pub mod pollutant;
pub mod time;

#[cfg(test)]
mod tests;

// ── Re-exports ────────────────────────────────────────────────────────────────

pub use config::{EvalConfig, MAX_EPISODE_TICKS, OutputFormat, artifact_stem};
pub use error::{CoreError, CoreResult};
pub use ids::{LaneId, SignalId, VehicleId};
pub use pollutant::Pollutant;
pub use time::{Tick, TickRange};
