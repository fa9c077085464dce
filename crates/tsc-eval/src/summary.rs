//! Per-episode aggregates.

use std::collections::BTreeMap;

use tsc_core::Pollutant;
use tsc_output::{EpisodeSummaryRow, StepRecord};
use tsc_traffic::StepOutcome;

/// What one finished episode looked like.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub episode:            usize,
    /// Rows recorded (equals the horizon's tick count on success).
    pub ticks:              u64,
    /// Sum of all per-agent rewards over the episode.
    pub total_reward:       f64,
    pub mean_vehicles:      f64,
    pub peak_vehicles:      u32,
    pub total_co2:          f64,
    pub total_waiting_time: f64,
    pub mean_avg_speed:     f64,
    /// Steps on which the environment reported `done` before the last tick.
    pub early_done_steps:   u64,
    /// The `info` map of the final step.
    pub final_info:         BTreeMap<String, f64>,
}

impl EpisodeSummary {
    /// The scalar part, as written by a [`TableWriter`][tsc_output::TableWriter].
    pub fn row(&self) -> EpisodeSummaryRow {
        EpisodeSummaryRow {
            episode:            self.episode,
            ticks:              self.ticks,
            total_reward:       self.total_reward,
            mean_vehicles:      self.mean_vehicles,
            peak_vehicles:      self.peak_vehicles,
            total_co2:          self.total_co2,
            total_waiting_time: self.total_waiting_time,
            mean_avg_speed:     self.mean_avg_speed,
            early_done_steps:   self.early_done_steps,
        }
    }
}

/// Running totals folded over an episode's steps.
#[derive(Debug, Default)]
pub(crate) struct SummaryAccumulator {
    episode:      usize,
    ticks:        u64,
    reward:       f64,
    vehicles:     u64,
    peak:         u32,
    co2:          f64,
    waiting:      f64,
    speed:        f64,
    early_done:   u64,
    final_info:   BTreeMap<String, f64>,
}

impl SummaryAccumulator {
    pub(crate) fn new(episode: usize) -> Self {
        Self { episode, ..Self::default() }
    }

    pub(crate) fn record(&mut self, record: &StepRecord, outcome: &StepOutcome, early_done: bool) {
        self.ticks += 1;
        self.reward += outcome.total_reward();
        self.vehicles += record.num_vehicles as u64;
        self.peak = self.peak.max(record.num_vehicles);
        self.co2 += record.emission(Pollutant::CO2);
        self.waiting += record.waiting_time;
        self.speed += record.avg_speed;
        if early_done {
            self.early_done += 1;
        }
        self.final_info.clone_from(&outcome.info);
    }

    pub(crate) fn finish(self) -> EpisodeSummary {
        let n = self.ticks.max(1) as f64;
        EpisodeSummary {
            episode:            self.episode,
            ticks:              self.ticks,
            total_reward:       self.reward,
            mean_vehicles:      self.vehicles as f64 / n,
            peak_vehicles:      self.peak,
            total_co2:          self.co2,
            total_waiting_time: self.waiting,
            mean_avg_speed:     self.speed / n,
            early_done_steps:   self.early_done,
            final_info:         self.final_info,
        }
    }
}
