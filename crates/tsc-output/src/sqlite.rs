//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `{run_name}.db` file in the configured output directory
//! with three tables:
//!
//! - `step_records`      - the fixed columns, keyed by `(episode, tick)`.
//! - `signal_readings`   - the per-signal block, one row per signal per tick.
//! - `episode_summaries` - one row per episode.
//!
//! Each episode is inserted in a single transaction.  Opening the writer
//! clears any rows left by an earlier run with the same name, the same way
//! the file backends truncate their artifacts.

use std::path::Path;

use rusqlite::{Connection, params};
use tracing::info;

use tsc_core::Pollutant;

use crate::writer::TableWriter;
use crate::{EpisodeSummaryRow, EpisodeTable, OutputResult};

/// Writes episode tables to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `{run_name}.db` in `dir`, initialise the schema and
    /// discard rows from any previous run.
    pub fn new(dir: &Path, run_name: &str) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!("{run_name}.db"));
        let conn = Connection::open(&path)?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS step_records (
                 episode                INTEGER NOT NULL,
                 tick                   INTEGER NOT NULL,
                 num_vehicles           INTEGER NOT NULL,
                 vehicle_types          TEXT    NOT NULL,
                 avg_speed              REAL    NOT NULL,
                 localCO2Emission       REAL    NOT NULL,
                 localCOEmission        REAL    NOT NULL,
                 localHCEmission        REAL    NOT NULL,
                 localPMxEmission       REAL    NOT NULL,
                 localNOxEmission       REAL    NOT NULL,
                 local_fuel_consumption REAL    NOT NULL,
                 localNoiseEmission     REAL    NOT NULL,
                 localWaitingTime       REAL    NOT NULL,
                 localStoppedVehicles   INTEGER NOT NULL,
                 actions                TEXT    NOT NULL,
                 PRIMARY KEY (episode, tick)
             );
             CREATE TABLE IF NOT EXISTS signal_readings (
                 episode        INTEGER NOT NULL,
                 tick           INTEGER NOT NULL,
                 signal_id      TEXT    NOT NULL,
                 phase          INTEGER NOT NULL,
                 phase_duration REAL    NOT NULL,
                 state          TEXT    NOT NULL
             );
             CREATE TABLE IF NOT EXISTS episode_summaries (
                 episode            INTEGER PRIMARY KEY,
                 ticks              INTEGER NOT NULL,
                 total_reward       REAL    NOT NULL,
                 mean_vehicles      REAL    NOT NULL,
                 peak_vehicles      INTEGER NOT NULL,
                 total_co2          REAL    NOT NULL,
                 total_waiting_time REAL    NOT NULL,
                 mean_avg_speed     REAL    NOT NULL,
                 early_done_steps   INTEGER NOT NULL
             );",
        )?;

        let tx = conn.unchecked_transaction()?;
        let mut cleared = 0;
        for table in ["step_records", "signal_readings", "episode_summaries"] {
            cleared += tx.execute(&format!("DELETE FROM {table}"), [])?;
        }
        tx.commit()?;
        if cleared > 0 {
            info!(path = %path.display(), rows = cleared, "cleared previous run");
        }

        Ok(Self { conn, finished: false })
    }
}

impl TableWriter for SqliteWriter {
    fn write_episode(&mut self, table: &EpisodeTable) -> OutputResult<()> {
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut step_stmt = tx.prepare_cached(
                "INSERT INTO step_records VALUES \
                 (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
            )?;
            let mut signal_stmt = tx.prepare_cached(
                "INSERT INTO signal_readings \
                 (episode, tick, signal_id, phase, phase_duration, state) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            let episode = table.episode as i64;

            for row in table.rows() {
                step_stmt.execute(params![
                    episode,
                    row.tick as i64,
                    row.num_vehicles,
                    serde_json::to_string(&row.vehicle_types)?,
                    row.avg_speed,
                    row.emission(Pollutant::CO2),
                    row.emission(Pollutant::CO),
                    row.emission(Pollutant::HC),
                    row.emission(Pollutant::PMx),
                    row.emission(Pollutant::NOx),
                    row.fuel_consumption,
                    row.noise,
                    row.waiting_time,
                    row.halting,
                    serde_json::to_string(&row.actions)?,
                ])?;
                for (signal, reading) in table.signals.iter().zip(&row.signals) {
                    signal_stmt.execute(params![
                        episode,
                        row.tick as i64,
                        signal.as_str(),
                        reading.phase,
                        reading.phase_duration,
                        reading.state,
                    ])?;
                }
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_summary(&mut self, row: &EpisodeSummaryRow) -> OutputResult<()> {
        self.conn.execute(
            "INSERT INTO episode_summaries VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            params![
                row.episode as i64,
                row.ticks as i64,
                row.total_reward,
                row.mean_vehicles,
                row.peak_vehicles,
                row.total_co2,
                row.total_waiting_time,
                row.mean_avg_speed,
                row.early_done_steps as i64,
            ],
        )?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn.execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
