//! The fixed-time baseline.

use tsc_traffic::{Action, Observation, Policy, TrafficResult};

/// Cycles every agent through `num_phases` phases, holding each for
/// `hold_steps` decisions.  All agents switch in lockstep.
///
/// Ignores the observation contents (only its agent count is used) and the
/// `deterministic` flag.
#[derive(Clone, Debug)]
pub struct FixedCyclePolicy {
    pub hold_steps: u32,
    pub num_phases: u32,
    step:           u64,
}

impl FixedCyclePolicy {
    /// `hold_steps` and `num_phases` are clamped to at least 1.
    pub fn new(hold_steps: u32, num_phases: u32) -> Self {
        Self { hold_steps: hold_steps.max(1), num_phases: num_phases.max(1), step: 0 }
    }

    /// The phase every agent receives on the next `predict`.
    pub fn current_phase(&self) -> u32 {
        ((self.step / self.hold_steps as u64) % self.num_phases as u64) as u32
    }
}

impl Policy for FixedCyclePolicy {
    fn predict(&mut self, observation: &Observation, _deterministic: bool) -> TrafficResult<Action> {
        let phase = self.current_phase();
        self.step += 1;
        Ok(Action(vec![phase; observation.agents()]))
    }

    fn on_reset(&mut self) {
        self.step = 0;
    }
}
