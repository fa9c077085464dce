//! Tests for the scripted simulator and environment.

use tsc_core::{LaneId, Pollutant, SignalId, TickRange, VehicleId};

use crate::{Action, Environment, ScriptedEnv, ScriptedTraffic, TrafficError, TrafficQuery};

fn two_lane_signal() -> ScriptedTraffic {
    let mut t = ScriptedTraffic::new();
    t.add_signal("tls_1", ["L1", "L2"]);
    t
}

#[cfg(test)]
mod query_tests {
    use super::*;

    #[test]
    fn controlled_lanes_in_order() {
        let t = two_lane_signal();
        let lanes = t.controlled_lanes(&SignalId::new("tls_1")).unwrap();
        assert_eq!(lanes, [LaneId::new("L1"), LaneId::new("L2")]);
    }

    #[test]
    fn vehicle_readings() {
        let mut t = two_lane_signal();
        t.place_vehicle("L1", "v1", "bus", 4.5);
        assert_eq!(t.lane_vehicle_ids(&LaneId::new("L1")).unwrap(), [VehicleId::new("v1")]);
        assert_eq!(t.vehicle_type(&VehicleId::new("v1")).unwrap(), "bus");
        assert_eq!(t.vehicle_speed(&VehicleId::new("v1")).unwrap(), 4.5);
    }

    #[test]
    fn lane_emissions_by_pollutant() {
        let mut t = two_lane_signal();
        t.lane_mut("L2").emissions[Pollutant::NOx.index()] = 1.25;
        assert_eq!(t.lane_emission(&LaneId::new("L2"), Pollutant::NOx).unwrap(), 1.25);
        assert_eq!(t.lane_emission(&LaneId::new("L2"), Pollutant::CO2).unwrap(), 0.0);
    }

    #[test]
    fn unknown_ids_error() {
        let t = two_lane_signal();
        assert!(matches!(t.lane_noise(&LaneId::new("nope")), Err(TrafficError::UnknownLane(_))));
        assert!(matches!(t.signal_phase(&SignalId::new("nope")), Err(TrafficError::UnknownSignal(_))));
        assert!(matches!(t.vehicle_speed(&VehicleId::new("nope")), Err(TrafficError::UnknownVehicle(_))));
    }

    #[test]
    fn signal_phase_readings() {
        let mut t = two_lane_signal();
        t.set_signal_phase("tls_1", 2, 4.0, "yyrr");
        let s = SignalId::new("tls_1");
        assert_eq!(t.signal_phase(&s).unwrap(), 2);
        assert_eq!(t.signal_phase_duration(&s).unwrap(), 4.0);
        assert_eq!(t.signal_state(&s).unwrap(), "yyrr");
    }

    #[test]
    fn clear_traffic_keeps_topology() {
        let mut t = two_lane_signal();
        t.place_vehicle("L1", "v1", "car", 1.0);
        t.lane_mut("L1").halting = 3;
        t.clear_traffic();
        assert!(t.vehicles.is_empty());
        assert_eq!(t.lane_halting_count(&LaneId::new("L1")).unwrap(), 0);
        assert_eq!(t.controlled_lanes(&SignalId::new("tls_1")).unwrap().len(), 2);
    }
}

#[cfg(test)]
mod env_tests {
    use super::*;

    fn horizon() -> TickRange {
        TickRange::new(0, 20, 5).unwrap()
    }

    #[test]
    fn step_before_reset_errors() {
        let mut env = ScriptedEnv::new(two_lane_signal(), vec![], horizon());
        assert!(matches!(env.step(&Action(vec![0])), Err(TrafficError::NotReset)));
    }

    #[test]
    fn frames_replayed_and_rewound() {
        let initial = two_lane_signal();
        let mut busy = initial.clone();
        busy.place_vehicle("L1", "v1", "car", 3.0);

        let mut env = ScriptedEnv::new(initial, vec![busy], horizon());
        env.reset().unwrap();
        assert!(env.traffic().vehicles.is_empty());

        env.step(&Action(vec![1])).unwrap();
        assert_eq!(env.traffic().vehicles.len(), 1);

        // Script exhausted: last frame persists.
        env.step(&Action(vec![1])).unwrap();
        assert_eq!(env.traffic().vehicles.len(), 1);

        env.reset().unwrap();
        assert!(env.traffic().vehicles.is_empty());
        assert_eq!(env.resets, 2);
        assert_eq!(env.steps, 2);
    }

    #[test]
    fn action_shape_checked() {
        let mut env = ScriptedEnv::new(two_lane_signal(), vec![], horizon());
        env.reset().unwrap();
        let err = env.step(&Action(vec![0, 1])).unwrap_err();
        assert!(matches!(err, TrafficError::ActionShape { expected: 1, got: 2 }));
    }

    #[test]
    fn scripted_failure() {
        let mut env = ScriptedEnv::new(two_lane_signal(), vec![], horizon()).fail_at_step(1);
        env.reset().unwrap();
        env.step(&Action(vec![0])).unwrap();
        assert!(matches!(env.step(&Action(vec![0])), Err(TrafficError::Connection(_))));
    }

    #[test]
    fn reward_is_waiting_time_drop() {
        let mut initial = two_lane_signal();
        initial.lane_mut("L1").waiting = 10.0;
        let mut next = initial.clone();
        next.lane_mut("L1").waiting = 4.0;

        let mut env = ScriptedEnv::new(initial, vec![next], horizon());
        env.reset().unwrap();
        let out = env.step(&Action(vec![0])).unwrap();
        assert_eq!(out.rewards, [6.0]);
        assert_eq!(out.info["system_total_waiting_time"], 4.0);
    }

    #[test]
    fn done_flag_from_step() {
        let mut env = ScriptedEnv::new(two_lane_signal(), vec![], horizon()).done_at_step(1);
        env.reset().unwrap();
        assert!(!env.step(&Action(vec![0])).unwrap().done);
        assert!(env.step(&Action(vec![0])).unwrap().done);
    }
}
