//! `QueueGrid` - a one-second-resolution queueing model of a signalised grid.
//!
//! # Model
//!
//! Every intersection has four single-lane approaches (N, S, E, W).  Each
//! approach feeds two signal links (through + turn), so a signal's
//! controlled-lane list names every approach twice, the way a real network
//! reports one lane per link.
//!
//! Per simulated second:
//!
//! ```text
//!   ① Signals  - advance phase timers; finish yellow → next green.
//!   ② Move     - approaching vehicles close in on the stop line; queued
//!                vehicles on a green approach discharge at
//!                `discharge_per_second`, entering the downstream
//!                intersection's approach or leaving the grid.
//!   ③ Arrive   - boundary lanes spawn vehicles with `arrival_rate`.
//!   ④ Measure  - per-lane exhaust, waiting and halting readings describe
//!                the second just simulated.
//! ```
//!
//! Phase program per signal (index → state string):
//!
//! | Phase | Meaning   | State      |
//! |-------|-----------|------------|
//! | 0     | NS green  | `GGGGrrrr` |
//! | 1     | NS yellow | `yyyyrrrr` |
//! | 2     | EW green  | `rrrrGGGG` |
//! | 3     | EW yellow | `rrrryyyy` |

use std::collections::{HashMap, VecDeque};

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

use tsc_core::{LaneId, Pollutant, SignalId, VehicleId};
use tsc_traffic::{TrafficError, TrafficQuery, TrafficResult};

use crate::GridSpec;
use crate::vehicle::{Vehicle, combine_noise, cruise_speed, exhaust};

/// Number of selectable green phases (NS, EW).
pub const GREEN_PHASES: u32 = 2;

// ── Approach ──────────────────────────────────────────────────────────────────

/// Side of the intersection a lane arrives from.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Approach {
    North,
    South,
    East,
    West,
}

impl Approach {
    pub const ALL: [Approach; 4] = [Approach::North, Approach::South, Approach::East, Approach::West];

    fn suffix(self) -> &'static str {
        match self {
            Approach::North => "N",
            Approach::South => "S",
            Approach::East  => "E",
            Approach::West  => "W",
        }
    }

    /// The green phase (0 = NS, 1 = EW) serving this approach.
    #[inline]
    pub fn green(self) -> u32 {
        match self {
            Approach::North | Approach::South => 0,
            Approach::East | Approach::West   => 1,
        }
    }
}

// ── Signal ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Signal {
    pub id:            SignalId,
    /// Current (or, during yellow, outgoing) green: 0 = NS, 1 = EW.
    pub green:         u32,
    pub yellow:        bool,
    pub time_in_phase: u64,
    pending:           u32,
    /// Lane index per approach, in [`Approach::ALL`] order.
    lanes:             [usize; 4],
}

impl Signal {
    /// Program phase index (see module docs).
    #[inline]
    pub fn phase(&self) -> u32 {
        self.green * 2 + self.yellow as u32
    }

    pub fn state(&self) -> String {
        let (ns, ew) = match (self.green, self.yellow) {
            (0, false) => ('G', 'r'),
            (0, true)  => ('y', 'r'),
            (_, false) => ('r', 'G'),
            (_, true)  => ('r', 'y'),
        };
        let mut s = String::with_capacity(8);
        s.extend(std::iter::repeat_n(ns, 4));
        s.extend(std::iter::repeat_n(ew, 4));
        s
    }

    #[inline]
    fn serves(&self, approach: Approach) -> bool {
        !self.yellow && self.green == approach.green()
    }
}

// ── Lane ──────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Lane {
    id:        LaneId,
    approach:  Approach,
    signal:    usize,
    /// Downstream lane entered after crossing; `None` leaves the grid.
    next:      Option<usize>,
    boundary:  bool,
    /// Front = closest to the stop line.
    vehicles:  VecDeque<VehicleId>,
    credit:    f64,
    emissions: [f64; 5],
    fuel:      f64,
    noise:     f64,
}

// ── QueueGrid ─────────────────────────────────────────────────────────────────

/// The grid simulator.  Owned and advanced by [`GridEnv`][crate::GridEnv];
/// everything else only reads it through [`TrafficQuery`].
pub struct QueueGrid {
    spec:          GridSpec,
    /// Current simulated second.
    pub time:      u64,
    pub signals:   Vec<Signal>,
    lanes:         Vec<Lane>,
    vehicles:      HashMap<VehicleId, Vehicle>,
    signal_index:  HashMap<SignalId, usize>,
    lane_index:    HashMap<LaneId, usize>,
    rng:           SmallRng,
    next_vehicle:  u64,
    /// Vehicles that have left the grid since construction.
    pub departed:  u64,
}

impl QueueGrid {
    /// Build an empty grid starting at simulated second `start`.
    pub fn new(spec: &GridSpec, seed: u64, start: u64) -> Self {
        let n = spec.intersections();
        let mut signals = Vec::with_capacity(n);
        let mut lanes = Vec::with_capacity(n * 4);

        for i in 0..n {
            let id = SignalId::new(format!("tls_{}", spec.first_signal_id as usize + i));
            let mut lane_ids = [0usize; 4];
            for (k, approach) in Approach::ALL.into_iter().enumerate() {
                lane_ids[k] = lanes.len();
                lanes.push(Lane {
                    id:        LaneId::new(format!("{id}_{}_0", approach.suffix())),
                    approach,
                    signal:    i,
                    next:      None,
                    boundary:  false,
                    vehicles:  VecDeque::new(),
                    credit:    0.0,
                    emissions: [0.0; 5],
                    fuel:      0.0,
                    noise:     0.0,
                });
            }
            signals.push(Signal {
                id,
                green: 0,
                yellow: false,
                time_in_phase: 0,
                pending: 0,
                lanes: lane_ids,
            });
        }

        // Wire each approach to the downstream intersection in its direction
        // of travel.  Lanes with no upstream intersection are entry points.
        let (rows, cols) = (spec.rows as isize, spec.cols as isize);
        let at = |r: isize, c: isize| -> Option<usize> {
            (r >= 0 && r < rows && c >= 0 && c < cols).then(|| (r * cols + c) as usize)
        };
        for i in 0..n {
            let (r, c) = ((i / spec.cols) as isize, (i % spec.cols) as isize);
            for (k, approach) in Approach::ALL.into_iter().enumerate() {
                let (down, up) = match approach {
                    Approach::North => (at(r + 1, c), at(r - 1, c)),
                    Approach::South => (at(r - 1, c), at(r + 1, c)),
                    Approach::West  => (at(r, c + 1), at(r, c - 1)),
                    Approach::East  => (at(r, c - 1), at(r, c + 1)),
                };
                let lane = signals[i].lanes[k];
                lanes[lane].next = down.map(|j| signals[j].lanes[k]);
                lanes[lane].boundary = up.is_none();
            }
        }

        let signal_index = signals.iter().enumerate().map(|(i, s)| (s.id.clone(), i)).collect();
        let lane_index = lanes.iter().enumerate().map(|(i, l)| (l.id.clone(), i)).collect();

        Self {
            spec: spec.clone(),
            time: start,
            signals,
            lanes,
            vehicles: HashMap::new(),
            signal_index,
            lane_index,
            rng: SmallRng::seed_from_u64(seed),
            next_vehicle: 0,
            departed: 0,
        }
    }

    pub fn signal_ids(&self) -> Vec<SignalId> {
        self.signals.iter().map(|s| s.id.clone()).collect()
    }

    pub fn vehicle_count(&self) -> usize {
        self.vehicles.len()
    }

    /// Request green phase `green` (0 = NS, 1 = EW) at signal `idx`.
    ///
    /// Ignored while the signal is yellow or before `min_green` has elapsed.
    /// A change of green always passes through `yellow_time` seconds of yellow.
    pub fn request_green(&mut self, idx: usize, green: u32) {
        let min_green = self.spec.min_green;
        let s = &mut self.signals[idx];
        if s.yellow || green == s.green || s.time_in_phase < min_green {
            return;
        }
        s.yellow = true;
        s.pending = green % GREEN_PHASES;
        s.time_in_phase = 0;
    }

    /// `true` when signal `idx` may switch green on the next request.
    pub fn can_switch(&self, idx: usize) -> bool {
        let s = &self.signals[idx];
        !s.yellow && s.time_in_phase >= self.spec.min_green
    }

    /// Vehicles queued at the stop line of lane `lane`.
    fn queued(&self, lane: usize) -> usize {
        self.lanes[lane]
            .vehicles
            .iter()
            .filter(|v| self.vehicles.get(*v).is_some_and(Vehicle::at_stop_line))
            .count()
    }

    /// Per-approach `(queued, total)` vehicle counts of signal `idx`.
    pub fn approach_counts(&self, idx: usize) -> [(usize, usize); 4] {
        let s = &self.signals[idx];
        let mut out = [(0, 0); 4];
        for (k, &lane) in s.lanes.iter().enumerate() {
            out[k] = (self.queued(lane), self.lanes[lane].vehicles.len());
        }
        out
    }

    /// Summed waiting time over all lanes of signal `idx`.
    pub fn signal_waiting_time(&self, idx: usize) -> f64 {
        self.signals[idx].lanes.iter().map(|&l| self.lane_waiting(l)).sum()
    }

    fn lane_waiting(&self, lane: usize) -> f64 {
        self.lanes[lane]
            .vehicles
            .iter()
            .filter_map(|v| self.vehicles.get(v))
            .map(|v| v.waiting)
            .sum()
    }

    /// Advance the simulation by `secs` seconds.
    pub fn advance(&mut self, secs: u64) {
        for _ in 0..secs {
            self.advance_second();
        }
    }

    fn advance_second(&mut self) {
        // ① Signals
        let yellow_time = self.spec.yellow_time;
        for s in &mut self.signals {
            s.time_in_phase += 1;
            if s.yellow && s.time_in_phase >= yellow_time {
                s.yellow = false;
                s.green = s.pending;
                s.time_in_phase = 0;
            }
        }

        // ② Move
        let mut transfers: Vec<(usize, VehicleId)> = Vec::new();
        for li in 0..self.lanes.len() {
            let green = self.signals[self.lanes[li].signal].serves(self.lanes[li].approach);
            let lane = &mut self.lanes[li];
            if green {
                lane.credit += self.spec.discharge_per_second;
            } else {
                lane.credit = 0.0;
            }

            let mut blocked = false;
            let mut discharged = 0usize;
            for vid in lane.vehicles.iter() {
                let Some(v) = self.vehicles.get_mut(vid) else { continue };
                if v.approach_left > 0 {
                    v.approach_left -= 1;
                    v.speed = v.cruise_speed;
                } else if green && !blocked && lane.credit >= 1.0 {
                    lane.credit -= 1.0;
                    discharged += 1;
                    v.speed = v.cruise_speed;
                    continue;
                } else {
                    v.speed = 0.0;
                    v.waiting += 1.0;
                }
                blocked = true;
            }
            if green {
                lane.credit = lane.credit.min(1.0);
            }

            for _ in 0..discharged {
                if let Some(vid) = lane.vehicles.pop_front() {
                    match lane.next {
                        Some(next) => transfers.push((next, vid)),
                        None => {
                            self.vehicles.remove(&vid);
                            self.departed += 1;
                        }
                    }
                }
            }
        }
        for (lane, vid) in transfers {
            if let Some(v) = self.vehicles.get_mut(&vid) {
                v.approach_left = self.spec.approach_secs;
                v.waiting = 0.0;
            }
            self.lanes[lane].vehicles.push_back(vid);
        }

        // ③ Arrive
        for li in 0..self.lanes.len() {
            if self.lanes[li].boundary && self.rng.gen_bool(self.spec.arrival_rate.clamp(0.0, 1.0)) {
                self.spawn(li);
            }
        }

        // ④ Measure
        for li in 0..self.lanes.len() {
            let mut emissions = [0.0; 5];
            let mut fuel = 0.0;
            let mut levels = Vec::with_capacity(self.lanes[li].vehicles.len());
            for vid in &self.lanes[li].vehicles {
                if let Some(v) = self.vehicles.get(vid) {
                    let e = exhaust(v);
                    for p in Pollutant::ALL {
                        emissions[p.index()] += e.emissions[p.index()];
                    }
                    fuel += e.fuel;
                    levels.push(e.noise);
                }
            }
            let lane = &mut self.lanes[li];
            lane.emissions = emissions;
            lane.fuel = fuel;
            lane.noise = combine_noise(levels);
        }

        self.time += 1;
    }

    fn spawn(&mut self, lane: usize) {
        let type_id = self.pick_type();
        let jitter: f64 = self.rng.gen_range(0.9..1.1);
        let cruise = cruise_speed(&type_id) * jitter;
        let id = VehicleId::new(format!("veh_{}", self.next_vehicle));
        self.next_vehicle += 1;

        self.vehicles.insert(id.clone(), Vehicle {
            id:            id.clone(),
            type_id,
            cruise_speed:  cruise,
            speed:         cruise,
            waiting:       0.0,
            approach_left: self.spec.approach_secs,
        });
        self.lanes[lane].vehicles.push_back(id);
    }

    fn pick_type(&mut self) -> String {
        let total: f64 = self.spec.vehicle_mix.iter().map(|(_, w)| w.max(0.0)).sum();
        if total <= 0.0 {
            return "passenger".into();
        }
        let mut x = self.rng.gen_range(0.0..total);
        for (t, w) in &self.spec.vehicle_mix {
            let w = w.max(0.0);
            if x < w {
                return t.clone();
            }
            x -= w;
        }
        self.spec.vehicle_mix.last().map(|(t, _)| t.clone()).unwrap_or_else(|| "passenger".into())
    }

    // ── Lookup helpers ────────────────────────────────────────────────────

    fn lane(&self, lane: &LaneId) -> TrafficResult<&Lane> {
        self.lane_index
            .get(lane)
            .map(|&i| &self.lanes[i])
            .ok_or_else(|| TrafficError::UnknownLane(lane.clone()))
    }

    fn lane_idx(&self, lane: &LaneId) -> TrafficResult<usize> {
        self.lane_index.get(lane).copied().ok_or_else(|| TrafficError::UnknownLane(lane.clone()))
    }

    fn signal(&self, signal: &SignalId) -> TrafficResult<&Signal> {
        self.signal_index
            .get(signal)
            .map(|&i| &self.signals[i])
            .ok_or_else(|| TrafficError::UnknownSignal(signal.clone()))
    }

    fn vehicle(&self, vehicle: &VehicleId) -> TrafficResult<&Vehicle> {
        self.vehicles.get(vehicle).ok_or_else(|| TrafficError::UnknownVehicle(vehicle.clone()))
    }
}

impl TrafficQuery for QueueGrid {
    fn controlled_lanes(&self, signal: &SignalId) -> TrafficResult<Vec<LaneId>> {
        let s = self.signal(signal)?;
        Ok(s.lanes
            .iter()
            .flat_map(|&l| [self.lanes[l].id.clone(), self.lanes[l].id.clone()])
            .collect())
    }

    fn lane_vehicle_ids(&self, lane: &LaneId) -> TrafficResult<Vec<VehicleId>> {
        Ok(self.lane(lane)?.vehicles.iter().cloned().collect())
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
        Ok(self.lane_waiting(self.lane_idx(lane)?))
    }

    fn lane_halting_count(&self, lane: &LaneId) -> TrafficResult<u32> {
        let l = self.lane(lane)?;
        Ok(l.vehicles
            .iter()
            .filter(|v| self.vehicles.get(*v).is_some_and(Vehicle::is_halting))
            .count() as u32)
    }

    fn signal_phase(&self, signal: &SignalId) -> TrafficResult<u32> {
        Ok(self.signal(signal)?.phase())
    }

    fn signal_phase_duration(&self, signal: &SignalId) -> TrafficResult<f64> {
        let s = self.signal(signal)?;
        let secs = if s.yellow { self.spec.yellow_time } else { self.spec.max_green };
        Ok(secs as f64)
    }

    fn signal_state(&self, signal: &SignalId) -> TrafficResult<String> {
        Ok(self.signal(signal)?.state())
    }
}
