//! `GridEnv` - the [`Environment`] adapter around [`QueueGrid`].

use std::collections::BTreeMap;

use tracing::debug;

use tsc_core::TickRange;
use tsc_traffic::{Action, Environment, Observation, StepOutcome, TrafficError, TrafficResult};

use crate::GridSpec;
use crate::grid::{GREEN_PHASES, QueueGrid};

/// Vehicles per lane that map to a density of 1.0.
pub const LANE_CAPACITY: f64 = 20.0;

/// Observation row width: green one-hot (2), min-green flag (1),
/// per-approach density (4), per-approach queue (4).
pub const OBSERVATION_WIDTH: usize = 2 + 1 + 4 + 4;

/// Waiting-time reward scale (seconds per reward unit).
const REWARD_SCALE: f64 = 100.0;

/// Multi-agent environment over a synthetic grid.  One agent per signal.
///
/// Every `reset` rebuilds the grid empty at `horizon.start`, seeded with
/// `spec.seed + episode`, so consecutive episodes see different but
/// reproducible demand.
pub struct GridEnv {
    spec:         GridSpec,
    horizon:      TickRange,
    grid:         QueueGrid,
    episode:      u64,
    ready:        bool,
    last_waiting: Vec<f64>,
}

impl GridEnv {
    pub fn new(spec: GridSpec, horizon: TickRange) -> Self {
        let grid = QueueGrid::new(&spec, spec.seed, horizon.start.0);
        let n = spec.intersections();
        Self {
            spec,
            horizon,
            grid,
            episode: 0,
            ready: false,
            last_waiting: vec![0.0; n],
        }
    }

    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Episodes started so far.
    pub fn episodes(&self) -> u64 {
        self.episode
    }

    fn observe(&self) -> Observation {
        let rows = (0..self.grid.signals.len())
            .map(|i| {
                let s = &self.grid.signals[i];
                let mut row = Vec::with_capacity(OBSERVATION_WIDTH);
                for g in 0..GREEN_PHASES {
                    row.push(if s.green == g { 1.0 } else { 0.0 });
                }
                row.push(if self.grid.can_switch(i) { 1.0 } else { 0.0 });
                let counts = self.grid.approach_counts(i);
                row.extend(counts.iter().map(|&(_, total)| (total as f64 / LANE_CAPACITY).min(1.0) as f32));
                row.extend(counts.iter().map(|&(queued, _)| (queued as f64 / LANE_CAPACITY).min(1.0) as f32));
                row
            })
            .collect();
        Observation::new(rows)
    }

    fn waiting_per_signal(&self) -> Vec<f64> {
        (0..self.grid.signals.len()).map(|i| self.grid.signal_waiting_time(i)).collect()
    }
}

impl Environment for GridEnv {
    type Traffic = QueueGrid;

    fn reset(&mut self) -> TrafficResult<Observation> {
        let seed = self.spec.seed.wrapping_add(self.episode);
        self.grid = QueueGrid::new(&self.spec, seed, self.horizon.start.0);
        self.last_waiting = vec![0.0; self.grid.signals.len()];
        self.episode += 1;
        self.ready = true;
        debug!(episode = self.episode - 1, seed, signals = self.grid.signals.len(), "grid reset");
        Ok(self.observe())
    }

    fn step(&mut self, action: &Action) -> TrafficResult<StepOutcome> {
        if !self.ready {
            return Err(TrafficError::NotReset);
        }
        let n = self.grid.signals.len();
        if action.len() != n {
            return Err(TrafficError::ActionShape { expected: n, got: action.len() });
        }
        if let Some(&bad) = action.as_slice().iter().find(|&&a| a >= GREEN_PHASES) {
            return Err(TrafficError::Policy(format!(
                "phase {bad} out of range (expected < {GREEN_PHASES})"
            )));
        }

        for (i, &green) in action.as_slice().iter().enumerate() {
            self.grid.request_green(i, green);
        }
        self.grid.advance(self.horizon.delta);

        let waiting = self.waiting_per_signal();
        let rewards = waiting
            .iter()
            .zip(&self.last_waiting)
            .map(|(now, before)| (before - now) / REWARD_SCALE)
            .collect();
        self.last_waiting = waiting;

        let total_waiting: f64 = self.last_waiting.iter().sum();
        let mut info = BTreeMap::new();
        info.insert("system_total_waiting_time".to_owned(), total_waiting);
        info.insert("system_total_vehicles".to_owned(), self.grid.vehicle_count() as f64);
        info.insert("system_total_departed".to_owned(), self.grid.departed as f64);

        Ok(StepOutcome {
            observation: self.observe(),
            rewards,
            done: self.grid.time >= self.horizon.end.0,
            info,
        })
    }

    fn traffic(&self) -> &QueueGrid {
        &self.grid
    }

    fn horizon(&self) -> TickRange {
        self.horizon
    }

    fn num_agents(&self) -> usize {
        self.spec.intersections()
    }
}
