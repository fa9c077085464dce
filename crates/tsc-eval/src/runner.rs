//! The `EpisodeRunner` and its episode loop.

use tracing::{debug, info, warn};

use tsc_core::{SignalId, TickRange};
use tsc_output::{EpisodeTable, TableWriter};
use tsc_traffic::{Environment, Policy};

use crate::summary::SummaryAccumulator;
use crate::{EpisodeSummary, EvalObserver, EvalResult, collect_step_record, monitored_lanes};

/// Drives a [`Policy`] through an [`Environment`] for a fixed number of
/// episodes and records one [`EpisodeTable`] per episode.
///
/// Per episode:
///
/// ```text
///   reset → derive monitored lanes
///   for tick in range:
///       predict → step → collect telemetry → append row
///   write table → write summary
/// ```
///
/// The environment's `done` flag never shortens an episode: the tick range
/// alone decides its length.  Every error aborts the run.
///
/// Create via [`EvalBuilder`][crate::EvalBuilder].
pub struct EpisodeRunner<E: Environment, P: Policy> {
    pub(crate) env:           E,
    pub(crate) policy:        P,
    pub(crate) episodes:      usize,
    pub(crate) signals:       Vec<SignalId>,
    pub(crate) range:         TickRange,
    pub(crate) deterministic: bool,
}

impl<E: Environment, P: Policy> EpisodeRunner<E, P> {
    /// Run every episode, handing each finished table and summary to
    /// `writer`, then finish the writer.
    pub fn run<W, O>(&mut self, writer: &mut W, observer: &mut O) -> EvalResult<Vec<EpisodeSummary>>
    where
        W: TableWriter + ?Sized,
        O: EvalObserver + ?Sized,
    {
        info!(
            episodes = self.episodes,
            signals = self.signals.len(),
            horizon = %self.range,
            ticks = self.range.len(),
            "starting evaluation"
        );

        let mut summaries = Vec::with_capacity(self.episodes);
        for episode in 0..self.episodes {
            let summary = self.run_episode(episode, writer, observer)?;
            writer.write_summary(&summary.row())?;
            summaries.push(summary);
        }
        writer.finish()?;

        observer.on_run_end(&summaries);
        Ok(summaries)
    }

    fn run_episode<W, O>(&mut self, episode: usize, writer: &mut W, observer: &mut O) -> EvalResult<EpisodeSummary>
    where
        W: TableWriter + ?Sized,
        O: EvalObserver + ?Sized,
    {
        let mut observation = self.env.reset()?;
        self.policy.on_reset();

        // Fixed for the whole episode.
        let lanes = monitored_lanes(self.env.traffic(), &self.signals)?;
        debug!(episode, lanes = lanes.len(), "monitored lanes derived");
        observer.on_episode_start(episode, &lanes);

        let mut table = EpisodeTable::new(episode, self.signals.clone(), self.range);
        let mut acc = SummaryAccumulator::new(episode);
        let mut warned = false;

        for tick in self.range.iter() {
            let action = self.policy.predict(&observation, self.deterministic)?;
            let outcome = self.env.step(&action)?;
            let record = collect_step_record(self.env.traffic(), &lanes, &self.signals, tick, &action)?;

            let early = outcome.done && tick.offset(self.range.delta) < self.range.end;
            if early && !warned {
                warn!(episode, tick = tick.0, "environment reported done before the horizon; continuing");
                warned = true;
            }

            acc.record(&record, &outcome, early);
            observer.on_step(episode, tick, &record, &outcome);
            table.push(record)?;
            observation = outcome.observation;
        }

        writer.write_episode(&table)?;
        let summary = acc.finish();
        observer.on_episode_end(&summary);
        Ok(summary)
    }

    /// Release the environment.
    pub fn close(&mut self) -> EvalResult<()> {
        self.env.close()?;
        Ok(())
    }

    pub fn env(&self) -> &E {
        &self.env
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub fn range(&self) -> TickRange {
        self.range
    }

    pub fn signals(&self) -> &[SignalId] {
        &self.signals
    }
}
