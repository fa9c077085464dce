//! Tests for the grid simulator and its environment adapter.

use tsc_core::{LaneId, Pollutant, SignalId, TickRange};
use tsc_traffic::{Action, Environment, TrafficError, TrafficQuery};

use crate::{GridEnv, GridSpec, OBSERVATION_WIDTH, QueueGrid};

fn saturated() -> GridSpec {
    GridSpec { arrival_rate: 1.0, ..GridSpec::default() }
}

fn empty() -> GridSpec {
    GridSpec { arrival_rate: 0.0, ..GridSpec::default() }
}

fn lane(s: &str) -> LaneId {
    LaneId::new(s)
}

fn sig(s: &str) -> SignalId {
    SignalId::new(s)
}

#[cfg(test)]
mod layout_tests {
    use super::*;

    #[test]
    fn default_corridor_signal_ids() {
        let g = QueueGrid::new(&GridSpec::default(), 1, 0);
        assert_eq!(g.signal_ids(), [sig("tls_159"), sig("tls_160"), sig("tls_161")]);
    }

    #[test]
    fn controlled_lanes_repeat_per_link() {
        let g = QueueGrid::new(&GridSpec::default(), 1, 0);
        let lanes = g.controlled_lanes(&sig("tls_160")).unwrap();
        assert_eq!(lanes.len(), 8);
        assert_eq!(lanes[0], lane("tls_160_N_0"));
        assert_eq!(lanes[1], lane("tls_160_N_0"));
        assert_eq!(lanes[7], lane("tls_160_W_0"));
    }

    #[test]
    fn unknown_ids_error() {
        let g = QueueGrid::new(&GridSpec::default(), 1, 0);
        assert!(matches!(g.signal_state(&sig("tls_1")), Err(TrafficError::UnknownSignal(_))));
        assert!(matches!(g.lane_noise(&lane("nope")), Err(TrafficError::UnknownLane(_))));
    }
}

#[cfg(test)]
mod signal_tests {
    use super::*;

    #[test]
    fn starts_north_south_green() {
        let g = QueueGrid::new(&empty(), 1, 0);
        let s = sig("tls_159");
        assert_eq!(g.signal_phase(&s).unwrap(), 0);
        assert_eq!(g.signal_state(&s).unwrap(), "GGGGrrrr");
        assert_eq!(g.signal_phase_duration(&s).unwrap(), 60.0);
    }

    #[test]
    fn switch_ignored_before_min_green() {
        let mut g = QueueGrid::new(&empty(), 1, 0);
        g.advance(2);
        g.request_green(0, 1);
        assert_eq!(g.signal_phase(&sig("tls_159")).unwrap(), 0);
        assert!(!g.can_switch(0));
    }

    #[test]
    fn switch_passes_through_yellow() {
        let mut g = QueueGrid::new(&empty(), 1, 0);
        let s = sig("tls_159");
        g.advance(5);
        g.request_green(0, 1);
        assert_eq!(g.signal_phase(&s).unwrap(), 1);
        assert_eq!(g.signal_state(&s).unwrap(), "yyyyrrrr");
        assert_eq!(g.signal_phase_duration(&s).unwrap(), 4.0);

        g.advance(3);
        assert_eq!(g.signal_phase(&s).unwrap(), 1);
        g.advance(1);
        assert_eq!(g.signal_phase(&s).unwrap(), 2);
        assert_eq!(g.signal_state(&s).unwrap(), "rrrrGGGG");

        // Other signals untouched.
        assert_eq!(g.signal_phase(&sig("tls_160")).unwrap(), 0);
    }
}

#[cfg(test)]
mod flow_tests {
    use super::*;

    #[test]
    fn empty_grid_reads_zero() {
        let mut g = QueueGrid::new(&empty(), 1, 0);
        g.advance(30);
        let l = lane("tls_159_W_0");
        assert!(g.lane_vehicle_ids(&l).unwrap().is_empty());
        assert_eq!(g.lane_emission(&l, Pollutant::CO2).unwrap(), 0.0);
        assert_eq!(g.lane_noise(&l).unwrap(), 0.0);
        assert_eq!(g.lane_waiting_time(&l).unwrap(), 0.0);
        assert_eq!(g.lane_halting_count(&l).unwrap(), 0);
        assert_eq!(g.time, 30);
    }

    #[test]
    fn red_approach_queues_and_waits() {
        let mut g = QueueGrid::new(&saturated(), 7, 0);
        g.advance(20);
        let l = lane("tls_159_W_0");
        assert_eq!(g.lane_vehicle_ids(&l).unwrap().len(), 20);
        assert!(g.lane_halting_count(&l).unwrap() > 0);
        assert!(g.lane_waiting_time(&l).unwrap() > 0.0);
        assert!(g.lane_emission(&l, Pollutant::CO2).unwrap() > 0.0);
        assert!(g.lane_noise(&l).unwrap() > 0.0);
    }

    #[test]
    fn interior_lane_only_fed_by_upstream() {
        let mut g = QueueGrid::new(&saturated(), 7, 0);
        g.advance(40);
        // tls_160 west approach has an upstream neighbour and is red.
        assert!(g.lane_vehicle_ids(&lane("tls_160_W_0")).unwrap().is_empty());

        for i in 0..3 {
            g.request_green(i, 1);
        }
        g.advance(40);
        assert!(!g.lane_vehicle_ids(&lane("tls_160_W_0")).unwrap().is_empty());
    }

    #[test]
    fn green_exit_lanes_depart() {
        let mut g = QueueGrid::new(&saturated(), 7, 0);
        g.advance(40);
        assert!(g.departed > 0);
    }

    #[test]
    fn halting_vehicles_report_zero_speed() {
        let mut g = QueueGrid::new(&saturated(), 7, 0);
        g.advance(20);
        let ids = g.lane_vehicle_ids(&lane("tls_159_W_0")).unwrap();
        let front = g.vehicle_speed(&ids[0]).unwrap();
        let back = g.vehicle_speed(&ids[ids.len() - 1]).unwrap();
        assert_eq!(front, 0.0);
        assert!(back > 0.0);
    }

    #[test]
    fn same_seed_same_traffic() {
        let mut a = QueueGrid::new(&GridSpec::default(), 3, 0);
        let mut b = QueueGrid::new(&GridSpec::default(), 3, 0);
        a.advance(200);
        b.advance(200);
        for s in a.signal_ids() {
            for l in a.controlled_lanes(&s).unwrap() {
                let va = a.lane_vehicle_ids(&l).unwrap();
                assert_eq!(va, b.lane_vehicle_ids(&l).unwrap());
                for v in &va {
                    assert_eq!(a.vehicle_type(v).unwrap(), b.vehicle_type(v).unwrap());
                }
            }
        }
    }
}

#[cfg(test)]
mod vehicle_tests {
    use tsc_core::VehicleId;

    use crate::vehicle::{Vehicle, combine_noise, exhaust};

    fn vehicle(type_id: &str, speed: f64) -> Vehicle {
        Vehicle {
            id: VehicleId::new("v"),
            type_id: type_id.into(),
            cruise_speed: 13.9,
            speed,
            waiting: 0.0,
            approach_left: 0,
        }
    }

    #[test]
    fn bicycles_emit_nothing() {
        let e = exhaust(&vehicle("bicycle", 5.0));
        assert!(e.emissions.iter().all(|&x| x == 0.0));
        assert_eq!(e.fuel, 0.0);
    }

    #[test]
    fn idling_emits_less_than_moving() {
        let idle = exhaust(&vehicle("passenger", 0.0));
        let moving = exhaust(&vehicle("passenger", 10.0));
        assert!(idle.emissions[0] < moving.emissions[0]);
        assert!(idle.noise < moving.noise);
    }

    #[test]
    fn noise_combines_energetically() {
        assert_eq!(combine_noise(Vec::<f64>::new()), 0.0);
        let two = combine_noise([60.0, 60.0]);
        assert!((two - 63.0103).abs() < 1e-3);
    }
}

#[cfg(test)]
mod env_tests {
    use super::*;

    fn env(spec: GridSpec) -> GridEnv {
        GridEnv::new(spec, TickRange::new(0, 20, 5).unwrap())
    }

    #[test]
    fn step_before_reset_errors() {
        let mut e = env(empty());
        assert!(matches!(e.step(&Action(vec![0, 0, 0])), Err(TrafficError::NotReset)));
    }

    #[test]
    fn action_shape_checked() {
        let mut e = env(empty());
        e.reset().unwrap();
        let err = e.step(&Action(vec![0])).unwrap_err();
        assert!(matches!(err, TrafficError::ActionShape { expected: 3, got: 1 }));
    }

    #[test]
    fn out_of_range_phase_rejected() {
        let mut e = env(empty());
        e.reset().unwrap();
        assert!(matches!(e.step(&Action(vec![0, 2, 0])), Err(TrafficError::Policy(_))));
    }

    #[test]
    fn observation_shape() {
        let mut e = env(empty());
        let obs = e.reset().unwrap();
        assert_eq!(obs.agents(), 3);
        assert!(obs.rows.iter().all(|r| r.len() == OBSERVATION_WIDTH));
        assert_eq!(&obs.rows[0][..2], &[1.0, 0.0]);
        assert_eq!(e.num_agents(), 3);
    }

    #[test]
    fn done_at_horizon_end() {
        let mut e = env(empty());
        e.reset().unwrap();
        let dones: Vec<bool> = (0..4).map(|_| e.step(&Action(vec![0; 3])).unwrap().done).collect();
        assert_eq!(dones, [false, false, false, true]);
        assert_eq!(e.traffic().time, 20);
    }

    #[test]
    fn reset_rewinds_clock_and_counts_episodes() {
        let mut e = env(saturated());
        e.reset().unwrap();
        e.step(&Action(vec![0; 3])).unwrap();
        e.reset().unwrap();
        assert_eq!(e.traffic().time, 0);
        assert_eq!(e.traffic().vehicle_count(), 0);
        assert_eq!(e.episodes(), 2);
    }

    #[test]
    fn queueing_yields_negative_reward() {
        let mut e = env(saturated());
        e.reset().unwrap();
        let mut last = None;
        for _ in 0..4 {
            last = Some(e.step(&Action(vec![0; 3])).unwrap());
        }
        let out = last.unwrap();
        assert_eq!(out.rewards.len(), 3);
        assert!(out.total_reward() < 0.0);
        assert!(out.info["system_total_waiting_time"] > 0.0);
    }
}
