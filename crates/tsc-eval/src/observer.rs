//! Evaluation observer trait for progress reporting.

use std::collections::BTreeSet;

use tracing::{debug, info};

use tsc_core::{LaneId, Tick};
use tsc_output::StepRecord;
use tsc_traffic::StepOutcome;

use crate::EpisodeSummary;

/// Callbacks invoked by [`EpisodeRunner::run`][crate::EpisodeRunner::run].
///
/// All methods have no-op defaults.  Observers only watch: they cannot
/// alter the table being recorded or stop the run.
pub trait EvalObserver {
    /// After `reset` and lane derivation, before the first tick.
    fn on_episode_start(&mut self, _episode: usize, _lanes: &BTreeSet<LaneId>) {}

    /// After each tick's row has been assembled.
    fn on_step(&mut self, _episode: usize, _tick: Tick, _record: &StepRecord, _outcome: &StepOutcome) {}

    /// After the episode's table has been handed to the writer.
    fn on_episode_end(&mut self, _summary: &EpisodeSummary) {}

    /// Once, after the writer has been finished.
    fn on_run_end(&mut self, _summaries: &[EpisodeSummary]) {}
}

/// An [`EvalObserver`] that does nothing.
pub struct NoopObserver;

impl EvalObserver for NoopObserver {}

/// Logs progress through `tracing`: a `debug!` line every `interval` ticks
/// and an `info!` line per episode.
pub struct LogObserver {
    /// Ticks between progress lines.  Zero disables them.
    pub interval: u64,
    seen:         u64,
}

impl LogObserver {
    pub fn new(interval: u64) -> Self {
        Self { interval, seen: 0 }
    }
}

impl EvalObserver for LogObserver {
    fn on_episode_start(&mut self, episode: usize, lanes: &BTreeSet<LaneId>) {
        self.seen = 0;
        info!(episode, lanes = lanes.len(), "episode started");
    }

    fn on_step(&mut self, episode: usize, tick: Tick, record: &StepRecord, outcome: &StepOutcome) {
        self.seen += 1;
        if self.interval > 0 && self.seen.is_multiple_of(self.interval) {
            debug!(
                episode,
                tick = tick.0,
                vehicles = record.num_vehicles,
                halting = record.halting,
                reward = outcome.total_reward(),
                "progress"
            );
        }
    }

    fn on_episode_end(&mut self, s: &EpisodeSummary) {
        info!(
            episode = s.episode,
            ticks = s.ticks,
            reward = s.total_reward,
            mean_vehicles = s.mean_vehicles,
            total_co2 = s.total_co2,
            waiting = s.total_waiting_time,
            "episode finished"
        );
    }

    fn on_run_end(&mut self, summaries: &[EpisodeSummary]) {
        info!(episodes = summaries.len(), "evaluation finished");
    }
}
