//! `tsc-traffic` - the seams between the evaluation loop and its external
//! collaborators.
//!
//! # Crate layout
//!
//! | Module        | Contents                                                      |
//! |---------------|---------------------------------------------------------------|
//! | [`query`]     | `TrafficQuery` - read-only simulator query surface            |
//! | [`env`]       | `Environment`, `Observation`, `Action`, `StepOutcome`         |
//! | [`policy`]    | `Policy` - observation → action                               |
//! | [`scripted`]  | `ScriptedTraffic`, `ScriptedEnv` - in-memory test doubles     |
//! | [`error`]     | `TrafficError`, `TrafficResult<T>`                            |
//!
//! # Design notes
//!
//! The environment owns the simulator.  The evaluation loop only ever holds
//! `&E::Traffic` between steps, so the borrow checker enforces that
//! telemetry reads cannot mutate simulation state.

pub mod env;
pub mod error;
pub mod policy;
pub mod query;
pub mod scripted;

#[cfg(test)]
mod tests;

pub use env::{Action, Environment, Observation, StepOutcome};
pub use error::{TrafficError, TrafficResult};
pub use policy::Policy;
pub use query::TrafficQuery;
pub use scripted::{ScriptedLane, ScriptedEnv, ScriptedTraffic, ScriptedSignal, ScriptedVehicle};
