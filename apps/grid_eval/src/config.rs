//! Application configuration: the evaluation settings plus the grid layout.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use tsc_core::EvalConfig;
use tsc_grid::GridSpec;

/// Contents of the `--config` JSON file.
///
/// The evaluation fields sit at the top level; the grid layout lives under
/// `"grid"`.  `grid.seed` is replaced by the top-level `seed` at startup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    #[serde(flatten)]
    pub eval: EvalConfig,

    pub grid: GridSpec,

    /// Decisions each phase is held for by the fixed-cycle baseline.
    pub fixed_hold_steps: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            eval:             EvalConfig::default(),
            grid:             GridSpec::default(),
            fixed_hold_steps: 6,
        }
    }
}

impl AppConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    pub fn write_template(path: &Path) -> Result<()> {
        let text = serde_json::to_string_pretty(&AppConfig::default())?;
        std::fs::write(path, text + "\n")
            .with_context(|| format!("writing config template {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use tsc_core::{OutputFormat, SignalId};

    use super::*;

    #[test]
    fn template_round_trips() {
        let text = serde_json::to_string_pretty(&AppConfig::default()).unwrap();
        let back = AppConfig::from_json_str(&text).unwrap();
        assert_eq!(back.eval, EvalConfig::default());
        assert_eq!(back.grid.vehicle_mix.len(), 5);
        assert_eq!(back.grid.yellow_time, 4);
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let c = AppConfig::from_json_str(
            r#"{ "episodes": 2, "output_format": "sqlite", "grid": { "cols": 1, "first_signal_id": 7 } }"#,
        )
        .unwrap();
        assert_eq!(c.eval.episodes, 2);
        assert_eq!(c.eval.output_format, OutputFormat::Sqlite);
        assert_eq!(c.eval.delta_time, 5);
        assert_eq!(c.eval.signals[0], SignalId::new("tls_159"));
        assert_eq!((c.grid.rows, c.grid.cols, c.grid.first_signal_id), (1, 1, 7));
        assert_eq!(c.grid.min_green, GridSpec::default().min_green);
        assert_eq!(c.fixed_hold_steps, 6);
    }
}
