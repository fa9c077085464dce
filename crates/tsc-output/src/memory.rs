//! In-memory backend.  Keeps every table it is handed; used by tests and
//! by callers that post-process results without touching disk.

use crate::writer::TableWriter;
use crate::{EpisodeSummaryRow, EpisodeTable, OutputResult};

#[derive(Debug, Default)]
pub struct MemoryWriter {
    pub tables:    Vec<EpisodeTable>,
    pub summaries: Vec<EpisodeSummaryRow>,
    pub finished:  bool,
}

impl MemoryWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TableWriter for MemoryWriter {
    fn write_episode(&mut self, table: &EpisodeTable) -> OutputResult<()> {
        self.tables.push(table.clone());
        Ok(())
    }

    fn write_summary(&mut self, row: &EpisodeSummaryRow) -> OutputResult<()> {
        self.summaries.push(row.clone());
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        self.finished = true;
        Ok(())
    }
}
