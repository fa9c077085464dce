//! The `TrafficQuery` trait - read-only view of a running simulation.

use tsc_core::{LaneId, Pollutant, SignalId, VehicleId};

use crate::TrafficResult;

/// The simulator's per-entity query surface.
///
/// Every method takes `&self`: the evaluation loop reads telemetry between
/// steps but never advances or edits the simulation.  Only the owning
/// [`Environment`][crate::Environment] mutates it, through `step`/`reset`.
/// Backends that talk to an external process over a socket keep the
/// connection behind interior mutability.
///
/// Values are the simulator's "last step" readings, i.e. they describe the
/// state reached by the most recent `step`.
pub trait TrafficQuery {
    /// Lanes controlled by `signal`, in link order.  May contain repeats
    /// when several links share an incoming lane.
    fn controlled_lanes(&self, signal: &SignalId) -> TrafficResult<Vec<LaneId>>;

    /// Vehicles currently on `lane`.
    fn lane_vehicle_ids(&self, lane: &LaneId) -> TrafficResult<Vec<VehicleId>>;

    /// Vehicle type id, e.g. `"passenger"`, `"bus"`, `"bicycle"`.
    fn vehicle_type(&self, vehicle: &VehicleId) -> TrafficResult<String>;

    /// Current speed in m/s.
    fn vehicle_speed(&self, vehicle: &VehicleId) -> TrafficResult<f64>;

    /// Emission of `pollutant` on `lane` during the last step (mg).
    fn lane_emission(&self, lane: &LaneId, pollutant: Pollutant) -> TrafficResult<f64>;

    /// Fuel consumed on `lane` during the last step (ml).
    fn lane_fuel_consumption(&self, lane: &LaneId) -> TrafficResult<f64>;

    /// Noise emitted on `lane` during the last step (dBA).
    fn lane_noise(&self, lane: &LaneId) -> TrafficResult<f64>;

    /// Summed waiting time of vehicles on `lane` (s).
    fn lane_waiting_time(&self, lane: &LaneId) -> TrafficResult<f64>;

    /// Vehicles on `lane` whose speed is below the halting threshold.
    fn lane_halting_count(&self, lane: &LaneId) -> TrafficResult<u32>;

    /// Index of the current phase in the signal's program.
    fn signal_phase(&self, signal: &SignalId) -> TrafficResult<u32>;

    /// Total duration of the current phase (s).
    fn signal_phase_duration(&self, signal: &SignalId) -> TrafficResult<f64>;

    /// Raw red/yellow/green state string, one character per link.
    fn signal_state(&self, signal: &SignalId) -> TrafficResult<String>;
}
