//! Evaluation run configuration.
//!
//! Loaded from a JSON file by the application crate and passed explicitly to
//! every constructor; nothing in the workspace builds an environment or loads
//! a policy at module scope.
//!
//! ```json
//! {
//!   "episodes": 5,
//!   "output_dir": "output/evaluation/emission",
//!   "run_name": "combined_emission_200",
//!   "signals": ["tls_159", "tls_160", "tls_161"],
//!   "begin_time": 25200,
//!   "num_seconds": 9000,
//!   "delta_time": 5,
//!   "policy_path": "policies/combined_emission_200.json"
//! }
//! ```
//!
//! Missing fields take the defaults of [`EvalConfig::default`].

use std::collections::HashSet;
use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult, SignalId, TickRange};

/// Upper bound on decision ticks per episode (one week at one-second steps).
pub const MAX_EPISODE_TICKS: u64 = 7 * 24 * 3_600;

// ── OutputFormat ──────────────────────────────────────────────────────────────

/// Which table backend receives the per-episode tables.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Csv,
    Sqlite,
    Parquet,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            OutputFormat::Csv     => "csv",
            OutputFormat::Sqlite  => "sqlite",
            OutputFormat::Parquet => "parquet",
        })
    }
}

impl std::str::FromStr for OutputFormat {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv"     => Ok(OutputFormat::Csv),
            "sqlite"  => Ok(OutputFormat::Sqlite),
            "parquet" => Ok(OutputFormat::Parquet),
            other => Err(CoreError::Config(format!(
                "unknown output format {other:?}: expected csv, sqlite, or parquet"
            ))),
        }
    }
}

// ── EvalConfig ────────────────────────────────────────────────────────────────

/// Top-level evaluation configuration.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvalConfig {
    /// Number of evaluation episodes.  Zero is allowed and produces nothing.
    pub episodes: usize,

    /// Directory receiving the output artifacts.  Created if missing.
    pub output_dir: PathBuf,

    /// Artifact prefix: episode `i` is written as `{run_name}_df_{i}.*`.
    pub run_name: String,

    /// Traffic signals whose controlled lanes and phases are monitored.
    pub signals: Vec<SignalId>,

    /// Simulated second at which each episode starts.
    pub begin_time: u64,

    /// Simulated seconds per episode.
    pub num_seconds: u64,

    /// Simulated seconds between consecutive policy decisions.
    pub delta_time: u64,

    /// Policy artifact.  `None` selects the fixed-cycle baseline.
    pub policy_path: Option<PathBuf>,

    /// Master seed for the environment and any stochastic policy.
    pub seed: u64,

    pub output_format: OutputFormat,

    /// Emit a progress log line every N ticks.  0 disables progress lines.
    pub log_interval_ticks: u64,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            episodes:           5,
            output_dir:         PathBuf::from("output/evaluation"),
            run_name:           "eval".into(),
            signals:            vec!["tls_159".into(), "tls_160".into(), "tls_161".into()],
            begin_time:         25_200,
            num_seconds:        9_000,
            delta_time:         5,
            policy_path:        None,
            seed:               42,
            output_format:      OutputFormat::Csv,
            log_interval_ticks: 360,
        }
    }
}

impl EvalConfig {
    /// Parse and validate a JSON config file.
    pub fn load_json(path: &Path) -> CoreResult<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Like [`load_json`][Self::load_json] but from an in-memory string.
    pub fn from_json_str(text: &str) -> CoreResult<Self> {
        let config: EvalConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty JSON (used to write a template config).
    pub fn to_json_string(&self) -> CoreResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the runner relies on.
    pub fn validate(&self) -> CoreResult<()> {
        if self.delta_time == 0 {
            return Err(CoreError::Config("delta_time must be positive".into()));
        }
        if self.signals.is_empty() {
            return Err(CoreError::Config("at least one monitored signal is required".into()));
        }
        let mut seen = HashSet::with_capacity(self.signals.len());
        for s in &self.signals {
            if !seen.insert(s) {
                return Err(CoreError::Config(format!("duplicate monitored signal {s}")));
            }
        }
        if self.run_name.trim().is_empty() {
            return Err(CoreError::Config("run_name must not be empty".into()));
        }
        let ticks = self.tick_range()?.len();
        if ticks > MAX_EPISODE_TICKS {
            return Err(CoreError::Config(format!(
                "horizon of {ticks} ticks exceeds the limit of {MAX_EPISODE_TICKS}"
            )));
        }
        Ok(())
    }

    /// The decision horizon `[begin_time, begin_time + num_seconds)`.
    pub fn tick_range(&self) -> CoreResult<TickRange> {
        let end = self.begin_time.checked_add(self.num_seconds).ok_or_else(|| {
            CoreError::Config(format!(
                "begin_time {} + num_seconds {} overflows",
                self.begin_time, self.num_seconds
            ))
        })?;
        TickRange::new(self.begin_time, end, self.delta_time)
    }

    /// File stem of episode `episode`'s table, e.g. `combined_emission_200_df_3`.
    pub fn artifact_stem(&self, episode: usize) -> String {
        artifact_stem(&self.run_name, episode)
    }
}

/// File stem shared by every backend: `{run_name}_df_{episode}`.
pub fn artifact_stem(run_name: &str, episode: usize) -> String {
    format!("{run_name}_df_{episode}")
}
