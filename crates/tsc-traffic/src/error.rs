use thiserror::Error;

use tsc_core::{LaneId, SignalId, VehicleId};

/// Errors raised by a simulator handle, an environment adapter, or a policy.
///
/// None of these are retried by the evaluation loop; each aborts the run.
#[derive(Debug, Error)]
pub enum TrafficError {
    #[error("unknown lane {0}")]
    UnknownLane(LaneId),

    #[error("unknown signal {0}")]
    UnknownSignal(SignalId),

    #[error("unknown vehicle {0}")]
    UnknownVehicle(VehicleId),

    #[error("action has {got} entries but the environment controls {expected} agents")]
    ActionShape { expected: usize, got: usize },

    #[error("observation has {got} rows but the policy expects {expected}")]
    ObservationShape { expected: usize, got: usize },

    #[error("environment stepped before reset")]
    NotReset,

    #[error("simulator connection error: {0}")]
    Connection(String),

    #[error("policy error: {0}")]
    Policy(String),
}

pub type TrafficResult<T> = Result<T, TrafficError>;
