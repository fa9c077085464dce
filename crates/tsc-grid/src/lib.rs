//! `tsc-grid` - a synthetic signalised grid the evaluation loop can drive
//! end-to-end without an external simulator process.
//!
//! | Module        | Contents                                                  |
//! |---------------|-----------------------------------------------------------|
//! | [`spec`]      | `GridSpec` - layout, demand and signal timing             |
//! | [`grid`]      | `QueueGrid` - the simulator; implements `TrafficQuery`    |
//! | [`env`]       | `GridEnv` - the `Environment` adapter, one agent per signal |
//! | [`vehicle`]   | Vehicle state and per-type emission factors               |
//!
//! The model is deliberately coarse: single-lane approaches, FIFO queues and
//! per-second Bernoulli arrivals.  It reproduces the shape of the telemetry a
//! microscopic simulator reports (vehicle ids and types per lane, pollutant
//! readings, waiting and halting counts, signal phase and state strings), not
//! its fidelity.

pub mod env;
pub mod grid;
pub mod spec;
pub mod vehicle;

#[cfg(test)]
mod tests;

pub use env::{GridEnv, LANE_CAPACITY, OBSERVATION_WIDTH};
pub use grid::{Approach, GREEN_PHASES, QueueGrid};
pub use spec::GridSpec;
