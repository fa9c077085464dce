//! Tests for the fixed-cycle and linear policies.

use tsc_traffic::{Observation, Policy, TrafficError};

use crate::{FixedCyclePolicy, LinearArtifact, LinearPolicy, PolicyError, argmax};

fn obs(rows: Vec<Vec<f32>>) -> Observation {
    Observation::new(rows)
}

#[cfg(test)]
mod fixed_tests {
    use super::*;

    #[test]
    fn holds_then_advances() {
        let mut p = FixedCyclePolicy::new(2, 2);
        let o = obs(vec![vec![0.0]; 3]);
        let phases: Vec<u32> = (0..6).map(|_| p.predict(&o, true).unwrap().0[0]).collect();
        assert_eq!(phases, [0, 0, 1, 1, 0, 0]);
    }

    #[test]
    fn one_entry_per_agent() {
        let mut p = FixedCyclePolicy::new(1, 4);
        let a = p.predict(&obs(vec![vec![]; 5]), false).unwrap();
        assert_eq!(a.0, vec![0; 5]);
    }

    #[test]
    fn reset_restarts_cycle() {
        let mut p = FixedCyclePolicy::new(1, 3);
        let o = obs(vec![vec![0.0]]);
        p.predict(&o, true).unwrap();
        p.predict(&o, true).unwrap();
        assert_eq!(p.current_phase(), 2);
        p.on_reset();
        assert_eq!(p.current_phase(), 0);
    }

    #[test]
    fn zero_hold_clamped() {
        let p = FixedCyclePolicy::new(0, 0);
        assert_eq!((p.hold_steps, p.num_phases), (1, 1));
    }
}

#[cfg(test)]
mod linear_tests {
    use std::io::Write;

    use super::*;

    fn two_phase() -> LinearArtifact {
        // Phase 0 scores the first feature, phase 1 the second.
        LinearArtifact {
            weights:    vec![vec![1.0, 0.0], vec![0.0, 1.0]],
            bias:       vec![0.0, 0.0],
            num_phases: 2,
        }
    }

    #[test]
    fn argmax_prefers_lowest_on_tie() {
        assert_eq!(argmax(&[1.0, 3.0, 3.0]), 1);
        assert_eq!(argmax(&[2.0, 2.0]), 0);
    }

    #[test]
    fn deterministic_picks_highest_score() {
        let mut p = LinearPolicy::new(two_phase(), 1).unwrap();
        let a = p.predict(&obs(vec![vec![0.9, 0.1], vec![0.2, 0.7]]), true).unwrap();
        assert_eq!(a.0, [0, 1]);
    }

    #[test]
    fn bias_breaks_symmetry() {
        let mut art = two_phase();
        art.bias = vec![0.0, 0.5];
        let mut p = LinearPolicy::new(art, 1).unwrap();
        assert_eq!(p.predict(&obs(vec![vec![0.3, 0.0]]), true).unwrap().0, [1]);
    }

    #[test]
    fn stochastic_is_seeded() {
        let o = obs(vec![vec![0.5, 0.5]; 4]);
        let mut a = LinearPolicy::new(two_phase(), 9).unwrap();
        let mut b = LinearPolicy::new(two_phase(), 9).unwrap();
        for _ in 0..10 {
            assert_eq!(a.predict(&o, false).unwrap(), b.predict(&o, false).unwrap());
        }
    }

    #[test]
    fn stochastic_follows_dominant_score() {
        let mut art = two_phase();
        art.bias = vec![0.0, 50.0];
        let mut p = LinearPolicy::new(art, 3).unwrap();
        let a = p.predict(&obs(vec![vec![0.0, 0.0]; 8]), false).unwrap();
        assert!(a.0.iter().all(|&x| x == 1));
    }

    #[test]
    fn row_width_mismatch_errors() {
        let mut p = LinearPolicy::new(two_phase(), 1).unwrap();
        let err = p.predict(&obs(vec![vec![1.0, 2.0, 3.0]]), true).unwrap_err();
        assert!(matches!(err, TrafficError::Policy(_)));
    }

    #[test]
    fn artifact_dimension_checks() {
        let mut art = two_phase();
        art.bias.pop();
        assert!(matches!(LinearPolicy::new(art, 0), Err(PolicyError::Artifact(_))));

        let mut art = two_phase();
        art.weights[1].push(1.0);
        assert!(matches!(LinearPolicy::new(art, 0), Err(PolicyError::Artifact(_))));

        let mut art = two_phase();
        art.num_phases = 3;
        assert!(matches!(LinearPolicy::new(art, 0), Err(PolicyError::Artifact(_))));
    }

    #[test]
    fn loads_from_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, r#"{{"weights": [[1.0], [2.0]], "bias": [0.0, 0.0], "num_phases": 2}}"#).unwrap();
        let p = LinearPolicy::load(f.path(), 0).unwrap();
        assert_eq!(p.input_width(), 1);
        assert_eq!(p.num_phases(), 2);
    }

    #[test]
    fn malformed_json_errors() {
        assert!(matches!(LinearPolicy::from_json_str("{", 0), Err(PolicyError::Json(_))));
    }
}
