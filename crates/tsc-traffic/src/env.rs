//! Environment adapter trait and the values crossing it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use tsc_core::TickRange;

use crate::{TrafficQuery, TrafficResult};

/// A batched observation: one feature row per controlled agent (signal).
///
/// Rows are padded to a common width by the environment so a single policy
/// can serve every agent.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Observation {
    pub rows: Vec<Vec<f32>>,
}

impl Observation {
    pub fn new(rows: Vec<Vec<f32>>) -> Self {
        Self { rows }
    }

    /// Number of agents in the batch.
    #[inline]
    pub fn agents(&self) -> usize {
        self.rows.len()
    }
}

/// One discrete phase choice per agent, in the same order as the
/// observation rows.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Action(pub Vec<u32>);

impl Action {
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }
}

/// What one `step` returns.
#[derive(Clone, Debug, Default)]
pub struct StepOutcome {
    pub observation: Observation,
    /// Per-agent reward for the step just taken.
    pub rewards: Vec<f64>,
    /// `true` once the environment considers the episode over.
    pub done: bool,
    /// Free-form scalar diagnostics (e.g. `system_total_waiting_time`).
    pub info: BTreeMap<String, f64>,
}

impl StepOutcome {
    /// Sum of the per-agent rewards.
    pub fn total_reward(&self) -> f64 {
        self.rewards.iter().sum()
    }
}

/// Step/reset interface wrapping a simulator.
///
/// The environment owns the simulator and is the only component allowed to
/// advance it.  [`traffic`][Self::traffic] hands out a shared reference so
/// callers can read telemetry between steps.
pub trait Environment {
    type Traffic: TrafficQuery;

    /// Restore the initial state and return the first observation.
    fn reset(&mut self) -> TrafficResult<Observation>;

    /// Apply `action` and advance simulated time by one decision interval.
    fn step(&mut self, action: &Action) -> TrafficResult<StepOutcome>;

    /// Read-only handle on the underlying simulator.
    fn traffic(&self) -> &Self::Traffic;

    /// The decision horizon this environment was configured with.
    fn horizon(&self) -> TickRange;

    /// Number of agents (controlled signals) per observation batch.
    fn num_agents(&self) -> usize;

    /// Release the simulator.  Default: nothing to release.
    fn close(&mut self) -> TrafficResult<()> {
        Ok(())
    }
}
