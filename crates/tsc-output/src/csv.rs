//! CSV output backend.
//!
//! Creates, in the configured output directory:
//! - `{run_name}_df_{episode}.csv` - one file per episode, written whole
//!   when the episode finishes.
//! - `{run_name}_summary.csv` - one row per episode, opened on first use.
//!   A per-run file, not one of the per-episode artifacts.

use std::fs::File;
use std::path::{Path, PathBuf};

use csv::Writer;
use tracing::debug;

use tsc_core::artifact_stem;

use crate::schema::{SUMMARY_COLUMNS, columns, record_cells, summary_cells};
use crate::writer::TableWriter;
use crate::{EpisodeSummaryRow, EpisodeTable, OutputResult};

/// Writes each episode table to its own CSV file.
pub struct CsvWriter {
    dir:      PathBuf,
    run_name: String,
    summary:  Option<Writer<File>>,
    finished: bool,
}

impl CsvWriter {
    /// Create `dir` if needed.  No file is opened until the first write.
    pub fn new(dir: &Path, run_name: &str) -> OutputResult<Self> {
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            dir:      dir.to_path_buf(),
            run_name: run_name.to_owned(),
            summary:  None,
            finished: false,
        })
    }

    /// Path of episode `episode`'s table.
    pub fn episode_path(&self, episode: usize) -> PathBuf {
        self.dir.join(format!("{}.csv", artifact_stem(&self.run_name, episode)))
    }

    pub fn summary_path(&self) -> PathBuf {
        self.dir.join(format!("{}_summary.csv", self.run_name))
    }
}

impl TableWriter for CsvWriter {
    fn write_episode(&mut self, table: &EpisodeTable) -> OutputResult<()> {
        let path = self.episode_path(table.episode);
        let mut w = Writer::from_path(&path)?;
        w.write_record(columns(&table.signals))?;
        for row in table.rows() {
            w.write_record(record_cells(row)?)?;
        }
        w.flush()?;
        debug!(path = %path.display(), rows = table.len(), "wrote episode table");
        Ok(())
    }

    fn write_summary(&mut self, row: &EpisodeSummaryRow) -> OutputResult<()> {
        if self.summary.is_none() {
            let mut w = Writer::from_path(self.summary_path())?;
            w.write_record(SUMMARY_COLUMNS)?;
            self.summary = Some(w);
        }
        if let Some(w) = self.summary.as_mut() {
            w.write_record(summary_cells(row))?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        if let Some(w) = self.summary.as_mut() {
            w.flush()?;
        }
        Ok(())
    }
}
