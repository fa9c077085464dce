//! Plain data row types written by output backends.

use tsc_core::{Pollutant, SignalId, TickRange};

use crate::{OutputError, OutputResult};

/// Most rows an [`EpisodeTable`] reserves up front; longer episodes grow.
const PREALLOC_ROWS: u64 = 1 << 16;

/// Phase readings of one monitored signal at one tick.
#[derive(Debug, Clone, PartialEq)]
pub struct SignalReading {
    pub phase:          u32,
    pub phase_duration: f64,
    /// Raw red/yellow/green state string, e.g. `"GGrrGGrr"`.
    pub state:          String,
}

/// Telemetry sampled over the monitored lanes at one tick.
///
/// Field order matches the output column order.
#[derive(Debug, Clone, PartialEq)]
pub struct StepRecord {
    pub tick:             u64,
    pub num_vehicles:     u32,
    /// One entry per vehicle; `len() == num_vehicles`.
    pub vehicle_types:    Vec<String>,
    /// Mean vehicle speed (m/s); exactly 0.0 when `num_vehicles == 0`.
    pub avg_speed:        f64,
    /// Summed lane emissions, indexed by [`Pollutant::index`].
    pub emissions:        [f64; 5],
    pub fuel_consumption: f64,
    pub noise:            f64,
    pub waiting_time:     f64,
    pub halting:          u32,
    pub actions:          Vec<u32>,
    /// One reading per monitored signal, in the table's signal order.
    pub signals:          Vec<SignalReading>,
}

impl StepRecord {
    #[inline]
    pub fn emission(&self, pollutant: Pollutant) -> f64 {
        self.emissions[pollutant.index()]
    }
}

// ── EpisodeTable ──────────────────────────────────────────────────────────────

/// The ordered step records of one episode.
///
/// Rows can only be appended, and only at the next expected tick, so a
/// finished table is gap-free and strictly increasing by the range's delta.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeTable {
    pub episode: usize,
    pub signals: Vec<SignalId>,
    range:       TickRange,
    rows:        Vec<StepRecord>,
}

impl EpisodeTable {
    pub fn new(episode: usize, signals: Vec<SignalId>, range: TickRange) -> Self {
        Self {
            episode,
            signals,
            range,
            rows: Vec::with_capacity(range.len().min(PREALLOC_ROWS) as usize),
        }
    }

    /// Tick the next appended row must carry.
    #[inline]
    pub fn next_tick(&self) -> u64 {
        (self.rows.len() as u64)
            .saturating_mul(self.range.delta)
            .saturating_add(self.range.start.0)
    }

    /// Append a row after checking the table invariants.
    pub fn push(&mut self, row: StepRecord) -> OutputResult<()> {
        let expected = self.next_tick();
        if row.tick != expected || row.tick >= self.range.end.0 {
            return Err(OutputError::TickOrder { episode: self.episode, expected, got: row.tick });
        }
        if row.vehicle_types.len() != row.num_vehicles as usize {
            return Err(OutputError::VehicleTypeMismatch {
                tick:  row.tick,
                count: row.num_vehicles,
                types: row.vehicle_types.len(),
            });
        }
        if row.signals.len() != self.signals.len() {
            return Err(OutputError::SignalCountMismatch {
                tick:     row.tick,
                expected: self.signals.len(),
                got:      row.signals.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn rows(&self) -> &[StepRecord] {
        &self.rows
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn range(&self) -> TickRange {
        self.range
    }

    /// `true` once every tick of the range has a row.
    pub fn is_complete(&self) -> bool {
        self.rows.len() as u64 == self.range.len()
    }
}

// ── EpisodeSummaryRow ─────────────────────────────────────────────────────────

/// Aggregate statistics for one finished episode.
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummaryRow {
    pub episode:            usize,
    pub ticks:              u64,
    pub total_reward:       f64,
    pub mean_vehicles:      f64,
    pub peak_vehicles:      u32,
    pub total_co2:          f64,
    pub total_waiting_time: f64,
    pub mean_avg_speed:     f64,
    /// Steps on which the environment reported `done` before the horizon ended.
    pub early_done_steps:   u64,
}
