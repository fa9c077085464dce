//! A linear scoring policy loaded from a JSON artifact.
//!
//! # Artifact format
//!
//! ```json
//! { "weights": [[0.1, -0.3, ...], [...]], "bias": [0.0, 0.5], "num_phases": 2 }
//! ```
//!
//! `weights` has one row per phase, each as wide as an observation row.
//! For every agent the policy computes `scores = W · obs + b` and then either
//! takes the argmax (deterministic mode, lowest index on ties) or samples a
//! phase from `softmax(scores)`.

use std::path::Path;

use rand::SeedableRng;
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::SmallRng;
use serde::{Deserialize, Serialize};
use tracing::debug;

use tsc_traffic::{Action, Observation, Policy, TrafficError, TrafficResult};

use crate::{PolicyError, PolicyResult};

/// The on-disk form of a [`LinearPolicy`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LinearArtifact {
    pub weights:    Vec<Vec<f32>>,
    pub bias:       Vec<f32>,
    pub num_phases: usize,
}

impl LinearArtifact {
    /// Check that the weight matrix is `num_phases × width` with `width > 0`
    /// and the bias has `num_phases` entries.
    pub fn validate(&self) -> PolicyResult<usize> {
        if self.num_phases == 0 {
            return Err(PolicyError::Artifact("num_phases must be positive".into()));
        }
        if self.weights.len() != self.num_phases {
            return Err(PolicyError::Artifact(format!(
                "{} weight rows for {} phases",
                self.weights.len(),
                self.num_phases
            )));
        }
        if self.bias.len() != self.num_phases {
            return Err(PolicyError::Artifact(format!(
                "{} bias entries for {} phases",
                self.bias.len(),
                self.num_phases
            )));
        }
        let width = self.weights[0].len();
        if width == 0 {
            return Err(PolicyError::Artifact("weight rows are empty".into()));
        }
        if let Some((i, row)) = self.weights.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(PolicyError::Artifact(format!(
                "weight row {i} has width {} (expected {width})",
                row.len()
            )));
        }
        Ok(width)
    }
}

pub struct LinearPolicy {
    artifact: LinearArtifact,
    width:    usize,
    rng:      SmallRng,
}

impl LinearPolicy {
    /// Build from an in-memory artifact.  `seed` drives stochastic sampling.
    pub fn new(artifact: LinearArtifact, seed: u64) -> PolicyResult<Self> {
        let width = artifact.validate()?;
        Ok(Self { artifact, width, rng: SmallRng::seed_from_u64(seed) })
    }

    pub fn from_json_str(s: &str, seed: u64) -> PolicyResult<Self> {
        Self::new(serde_json::from_str(s)?, seed)
    }

    pub fn load(path: &Path, seed: u64) -> PolicyResult<Self> {
        let text = std::fs::read_to_string(path)?;
        let policy = Self::from_json_str(&text, seed)?;
        debug!(
            path = %path.display(),
            phases = policy.artifact.num_phases,
            width = policy.width,
            "loaded linear policy"
        );
        Ok(policy)
    }

    /// Observation row width the weights expect.
    pub fn input_width(&self) -> usize {
        self.width
    }

    pub fn num_phases(&self) -> usize {
        self.artifact.num_phases
    }

    /// `W · row + b`.
    pub fn scores(&self, row: &[f32]) -> TrafficResult<Vec<f32>> {
        if row.len() != self.width {
            return Err(TrafficError::Policy(format!(
                "observation row has width {} but the policy expects {}",
                row.len(),
                self.width
            )));
        }
        Ok(self
            .artifact
            .weights
            .iter()
            .zip(&self.artifact.bias)
            .map(|(w, b)| w.iter().zip(row).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect())
    }

    fn sample(&mut self, scores: &[f32]) -> TrafficResult<u32> {
        let max = scores.iter().copied().fold(f32::NEG_INFINITY, f32::max);
        let weights: Vec<f64> = scores.iter().map(|&s| ((s - max) as f64).exp()).collect();
        let dist = WeightedIndex::new(&weights)
            .map_err(|e| TrafficError::Policy(format!("cannot sample phase: {e}")))?;
        Ok(dist.sample(&mut self.rng) as u32)
    }
}

/// Index of the largest score; the lowest index wins ties.
pub fn argmax(scores: &[f32]) -> u32 {
    let mut best = 0;
    for (i, &s) in scores.iter().enumerate() {
        if s > scores[best] {
            best = i;
        }
    }
    best as u32
}

impl Policy for LinearPolicy {
    fn predict(&mut self, observation: &Observation, deterministic: bool) -> TrafficResult<Action> {
        let mut phases = Vec::with_capacity(observation.agents());
        for row in &observation.rows {
            let scores = self.scores(row)?;
            let phase = if deterministic { argmax(&scores) } else { self.sample(&scores)? };
            phases.push(phase);
        }
        Ok(Action(phases))
    }
}
