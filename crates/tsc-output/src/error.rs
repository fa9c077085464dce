//! Error types for tsc-output.

use thiserror::Error;

/// Errors that can occur when building or writing episode tables.
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV write error: {0}")]
    Csv(#[from] csv::Error),

    #[error("list cell encoding error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("episode {episode}: expected tick {expected}, got {got}")]
    TickOrder { episode: usize, expected: u64, got: u64 },

    #[error("tick {tick}: {types} vehicle types recorded for {count} vehicles")]
    VehicleTypeMismatch { tick: u64, count: u32, types: usize },

    #[error("tick {tick}: {got} signal readings for {expected} monitored signals")]
    SignalCountMismatch { tick: u64, expected: usize, got: usize },

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "parquet")]
    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[cfg(feature = "parquet")]
    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
}

/// Alias for `Result<T, OutputError>`.
pub type OutputResult<T> = Result<T, OutputError>;
