//! `tsc-output` - per-episode step tables and their writers.
//!
//! Three file backends are provided behind Cargo features:
//!
//! | Feature   | Backend     | Files created                                         |
//! |-----------|-------------|-------------------------------------------------------|
//! | *(none)*  | CSV         | `{run}_df_{i}.csv` per episode, `{run}_summary.csv`   |
//! | `sqlite`  | SQLite      | `{run}.db`                                            |
//! | `parquet` | Parquet     | `{run}_df_{i}.parquet` per episode, `{run}_summary.parquet` |
//!
//! All backends implement [`TableWriter`].  [`MemoryWriter`] keeps tables
//! in memory instead.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tsc_output::{CsvWriter, TableWriter};
//!
//! let mut writer = CsvWriter::new(Path::new("./output"), "ppo_eval")?;
//! writer.write_episode(&table)?;
//! writer.finish()?;
//! ```

pub mod csv;
pub mod error;
pub mod memory;
pub mod row;
pub mod schema;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use memory::MemoryWriter;
pub use row::{EpisodeSummaryRow, EpisodeTable, SignalReading, StepRecord};
pub use schema::{FIXED_COLUMNS, SUMMARY_COLUMNS, columns};
pub use writer::TableWriter;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
