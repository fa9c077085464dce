//! A scripted, in-memory simulator for exercising the evaluation loop
//! without a live simulator process.
//!
//! [`ScriptedTraffic`] is a plain snapshot of everything the
//! [`TrafficQuery`] surface can report.  [`ScriptedEnv`] replays a sequence
//! of such snapshots: `reset` restores the initial one and the `k`-th `step`
//! (0-based) exposes `frames[k]`.  When the script runs out, the last frame
//! stays visible.
//!
//! ```rust,ignore
//! let mut t = ScriptedTraffic::new();
//! t.add_signal("tls_1", ["L1", "L2"]);
//! t.place_vehicle("L1", "v1", "passenger", 8.5);
//! let env = ScriptedEnv::new(t.clone(), vec![t], TickRange::new(0, 10, 5)?);
//! ```

use std::collections::{BTreeMap, HashMap};

use tsc_core::{LaneId, Pollutant, SignalId, TickRange, VehicleId};

use crate::{
    Action, Environment, Observation, StepOutcome, TrafficError, TrafficQuery, TrafficResult,
};

// ── Snapshot data ─────────────────────────────────────────────────────────────

/// Per-lane readings.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptedLane {
    pub vehicles:  Vec<VehicleId>,
    /// Indexed by [`Pollutant::index`].
    pub emissions: [f64; 5],
    pub fuel:      f64,
    pub noise:     f64,
    pub waiting:   f64,
    pub halting:   u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ScriptedVehicle {
    pub type_id: String,
    pub speed:   f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptedSignal {
    pub lanes:          Vec<LaneId>,
    pub phase:          u32,
    pub phase_duration: f64,
    pub state:          String,
}

/// A complete, queryable simulator snapshot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ScriptedTraffic {
    pub signals:  BTreeMap<SignalId, ScriptedSignal>,
    pub lanes:    BTreeMap<LaneId, ScriptedLane>,
    pub vehicles: HashMap<VehicleId, ScriptedVehicle>,
}

impl ScriptedTraffic {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `signal` controlling `lanes`.  Lanes are created empty if
    /// they do not exist yet.
    pub fn add_signal<I, L>(&mut self, signal: &str, lanes: I) -> &mut Self
    where
        I: IntoIterator<Item = L>,
        L: Into<LaneId>,
    {
        let lanes: Vec<LaneId> = lanes.into_iter().map(Into::into).collect();
        for lane in &lanes {
            self.lanes.entry(lane.clone()).or_default();
        }
        self.signals.insert(
            SignalId::new(signal),
            ScriptedSignal { lanes, phase: 0, phase_duration: 30.0, state: "GGrr".into() },
        );
        self
    }

    /// Set the phase readings of an existing signal.
    pub fn set_signal_phase(&mut self, signal: &str, phase: u32, duration: f64, state: &str) -> &mut Self {
        if let Some(s) = self.signals.get_mut(&SignalId::new(signal)) {
            s.phase = phase;
            s.phase_duration = duration;
            s.state = state.to_owned();
        }
        self
    }

    /// Put a vehicle on `lane` (creating the lane if needed).
    pub fn place_vehicle(&mut self, lane: &str, vehicle: &str, type_id: &str, speed: f64) -> &mut Self {
        let vid = VehicleId::new(vehicle);
        self.lanes.entry(LaneId::new(lane)).or_default().vehicles.push(vid.clone());
        self.vehicles.insert(vid, ScriptedVehicle { type_id: type_id.to_owned(), speed });
        self
    }

    /// Mutable access to a lane's readings, creating it if needed.
    pub fn lane_mut(&mut self, lane: &str) -> &mut ScriptedLane {
        self.lanes.entry(LaneId::new(lane)).or_default()
    }

    /// Remove every vehicle and zero all lane readings.
    pub fn clear_traffic(&mut self) {
        self.vehicles.clear();
        for reading in self.lanes.values_mut() {
            *reading = ScriptedLane::default();
        }
    }

    fn lane(&self, lane: &LaneId) -> TrafficResult<&ScriptedLane> {
        self.lanes.get(lane).ok_or_else(|| TrafficError::UnknownLane(lane.clone()))
    }

    fn signal(&self, signal: &SignalId) -> TrafficResult<&ScriptedSignal> {
        self.signals.get(signal).ok_or_else(|| TrafficError::UnknownSignal(signal.clone()))
    }

    fn vehicle(&self, vehicle: &VehicleId) -> TrafficResult<&ScriptedVehicle> {
        self.vehicles.get(vehicle).ok_or_else(|| TrafficError::UnknownVehicle(vehicle.clone()))
    }

    fn total_waiting(&self) -> f64 {
        self.lanes.values().map(|l| l.waiting).sum()
    }
}

impl TrafficQuery for ScriptedTraffic {
    fn controlled_lanes(&self, signal: &SignalId) -> TrafficResult<Vec<LaneId>> {
        Ok(self.signal(signal)?.lanes.clone())
    }

    fn lane_vehicle_ids(&self, lane: &LaneId) -> TrafficResult<Vec<VehicleId>> {
        Ok(self.lane(lane)?.vehicles.clone())
    }

    fn vehicle_type(&self, vehicle: &VehicleId) -> TrafficResult<String> {
        Ok(self.vehicle(vehicle)?.type_id.clone())
    }

    fn vehicle_speed(&self, vehicle: &VehicleId) -> TrafficResult<f64> {
        Ok(self.vehicle(vehicle)?.speed)
    }

    fn lane_emission(&self, lane: &LaneId, pollutant: Pollutant) -> TrafficResult<f64> {
        Ok(self.lane(lane)?.emissions[pollutant.index()])
    }

    fn lane_fuel_consumption(&self, lane: &LaneId) -> TrafficResult<f64> {
        Ok(self.lane(lane)?.fuel)
    }

    fn lane_noise(&self, lane: &LaneId) -> TrafficResult<f64> {
        Ok(self.lane(lane)?.noise)
    }

    fn lane_waiting_time(&self, lane: &LaneId) -> TrafficResult<f64> {
        Ok(self.lane(lane)?.waiting)
    }

    fn lane_halting_count(&self, lane: &LaneId) -> TrafficResult<u32> {
        Ok(self.lane(lane)?.halting)
    }

    fn signal_phase(&self, signal: &SignalId) -> TrafficResult<u32> {
        Ok(self.signal(signal)?.phase)
    }

    fn signal_phase_duration(&self, signal: &SignalId) -> TrafficResult<f64> {
        Ok(self.signal(signal)?.phase_duration)
    }

    fn signal_state(&self, signal: &SignalId) -> TrafficResult<String> {
        Ok(self.signal(signal)?.state.clone())
    }
}

// ── ScriptedEnv ───────────────────────────────────────────────────────────────

/// An [`Environment`] that replays a fixed list of [`ScriptedTraffic`]
/// frames and records every call made against it.
pub struct ScriptedEnv {
    initial:     ScriptedTraffic,
    frames:      Vec<ScriptedTraffic>,
    current:     ScriptedTraffic,
    horizon:     TickRange,
    num_agents:  usize,
    cursor:      usize,
    ready:       bool,
    fail_at:     Option<usize>,
    done_at:     Option<usize>,

    /// Number of `reset` calls so far.
    pub resets:  usize,
    /// Number of successful `step` calls across all episodes.
    pub steps:   usize,
    /// Every action received, in call order.
    pub actions: Vec<Action>,
    pub closed:  bool,
}

impl ScriptedEnv {
    /// One agent per signal in `initial`.
    pub fn new(initial: ScriptedTraffic, frames: Vec<ScriptedTraffic>, horizon: TickRange) -> Self {
        let num_agents = initial.signals.len();
        Self {
            current: initial.clone(),
            initial,
            frames,
            horizon,
            num_agents,
            cursor: 0,
            ready: false,
            fail_at: None,
            done_at: None,
            resets: 0,
            steps: 0,
            actions: Vec::new(),
            closed: false,
        }
    }

    /// Make the `k`-th step of every episode (0-based) fail with a
    /// connection error.
    pub fn fail_at_step(mut self, k: usize) -> Self {
        self.fail_at = Some(k);
        self
    }

    /// Report `done = true` from the `k`-th step of every episode onwards.
    pub fn done_at_step(mut self, k: usize) -> Self {
        self.done_at = Some(k);
        self
    }

    fn observe(&self) -> Observation {
        let vehicles = self.current.vehicles.len() as f32;
        Observation::new(vec![vec![self.cursor as f32, vehicles]; self.num_agents])
    }
}

impl Environment for ScriptedEnv {
    type Traffic = ScriptedTraffic;

    fn reset(&mut self) -> TrafficResult<Observation> {
        self.current = self.initial.clone();
        self.cursor = 0;
        self.ready = true;
        self.resets += 1;
        Ok(self.observe())
    }

    fn step(&mut self, action: &Action) -> TrafficResult<StepOutcome> {
        if !self.ready {
            return Err(TrafficError::NotReset);
        }
        if action.len() != self.num_agents {
            return Err(TrafficError::ActionShape { expected: self.num_agents, got: action.len() });
        }
        if self.fail_at == Some(self.cursor) {
            return Err(TrafficError::Connection(format!("scripted failure at step {}", self.cursor)));
        }

        let before = self.current.total_waiting();
        if let Some(frame) = self.frames.get(self.cursor).or(self.frames.last()) {
            self.current = frame.clone();
        }
        let done = self.done_at.is_some_and(|k| self.cursor >= k);
        self.cursor += 1;
        self.steps += 1;
        self.actions.push(action.clone());

        let after = self.current.total_waiting();
        let reward = (before - after) / self.num_agents.max(1) as f64;
        let mut info = BTreeMap::new();
        info.insert("system_total_waiting_time".to_owned(), after);

        Ok(StepOutcome {
            observation: self.observe(),
            rewards: vec![reward; self.num_agents],
            done,
            info,
        })
    }

    fn traffic(&self) -> &ScriptedTraffic {
        &self.current
    }

    fn horizon(&self) -> TickRange {
        self.horizon
    }

    fn num_agents(&self) -> usize {
        self.num_agents
    }

    fn close(&mut self) -> TrafficResult<()> {
        self.closed = true;
        Ok(())
    }
}
