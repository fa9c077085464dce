//! The `TableWriter` trait implemented by all backend writers.

use crate::{EpisodeSummaryRow, EpisodeTable, OutputResult};

/// Trait implemented by CSV, SQLite, Parquet, and in-memory writers.
///
/// Every error is returned to the caller; the evaluation loop treats any
/// write failure as fatal.
pub trait TableWriter {
    /// Persist one finished episode table.  Called exactly once per episode,
    /// after its last tick.
    fn write_episode(&mut self, table: &EpisodeTable) -> OutputResult<()>;

    /// Persist one episode's summary row.
    fn write_summary(&mut self, row: &EpisodeSummaryRow) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent; safe to call more than once.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<W: TableWriter + ?Sized> TableWriter for Box<W> {
    fn write_episode(&mut self, table: &EpisodeTable) -> OutputResult<()> {
        (**self).write_episode(table)
    }

    fn write_summary(&mut self, row: &EpisodeSummaryRow) -> OutputResult<()> {
        (**self).write_summary(row)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}
