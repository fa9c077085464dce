//! The `Policy` trait.

use crate::{Action, Observation, TrafficResult};

/// Maps a batched observation to one action per agent.
///
/// `deterministic = true` requests the evaluation-mode action (no
/// exploration noise).  Implementations that are inherently deterministic
/// may ignore the flag.
pub trait Policy {
    fn predict(&mut self, observation: &Observation, deterministic: bool) -> TrafficResult<Action>;

    /// Called when the environment is reset.  Default: no-op.
    fn on_reset(&mut self) {}
}

impl<P: Policy + ?Sized> Policy for Box<P> {
    fn predict(&mut self, observation: &Observation, deterministic: bool) -> TrafficResult<Action> {
        (**self).predict(observation, deterministic)
    }

    fn on_reset(&mut self) {
        (**self).on_reset()
    }
}
