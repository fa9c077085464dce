//! grid_eval - evaluate a signal-control policy on the synthetic grid.
//!
//! Runs the configured number of episodes over `[begin_time, begin_time +
//! num_seconds)` and writes one telemetry table per episode
//! (`{run_name}_df_{i}.csv` by default) plus a per-episode summary.
//!
//! ```text
//! grid_eval --config run.json --episodes 5 --format parquet
//! grid_eval --write-default-config run.json
//! RUST_LOG=debug grid_eval --policy policy.json
//! ```

mod config;

use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tsc_core::{EvalConfig, OutputFormat};
use tsc_eval::{EpisodeSummary, EvalBuilder, LogObserver};
use tsc_grid::{GREEN_PHASES, GridEnv};
use tsc_output::{CsvWriter, ParquetWriter, SqliteWriter, TableWriter};
use tsc_policy::{FixedCyclePolicy, LinearPolicy};
use tsc_traffic::Policy;

use config::AppConfig;

/// Command-line arguments.  Every flag overrides the matching config field.
#[derive(Parser, Debug)]
#[command(name = "grid_eval", about = "Evaluate a traffic-signal policy on a synthetic grid")]
struct Cli {
    /// JSON config file.  Defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long)]
    episodes: Option<usize>,

    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Artifact prefix (`{run_name}_df_{i}`).
    #[arg(long)]
    run_name: Option<String>,

    /// csv, sqlite or parquet.
    #[arg(long)]
    format: Option<OutputFormat>,

    /// Linear policy artifact (JSON).  Without one the fixed-cycle baseline runs.
    #[arg(long)]
    policy: Option<PathBuf>,

    #[arg(long)]
    seed: Option<u64>,

    /// Sample actions instead of taking the argmax.
    #[arg(long)]
    stochastic: bool,

    /// Write the default config to PATH and exit.
    #[arg(long, value_name = "PATH")]
    write_default_config: Option<PathBuf>,
}

impl Cli {
    fn apply(&self, eval: &mut EvalConfig) {
        if let Some(n) = self.episodes {
            eval.episodes = n;
        }
        if let Some(dir) = &self.output_dir {
            eval.output_dir = dir.clone();
        }
        if let Some(name) = &self.run_name {
            eval.run_name = name.clone();
        }
        if let Some(format) = self.format {
            eval.output_format = format;
        }
        if let Some(path) = &self.policy {
            eval.policy_path = Some(path.clone());
        }
        if let Some(seed) = self.seed {
            eval.seed = seed;
        }
    }
}

fn make_writer(format: OutputFormat, dir: &Path, run_name: &str) -> Result<Box<dyn TableWriter>> {
    Ok(match format {
        OutputFormat::Csv     => Box::new(CsvWriter::new(dir, run_name)?),
        OutputFormat::Sqlite  => Box::new(SqliteWriter::new(dir, run_name)?),
        OutputFormat::Parquet => Box::new(ParquetWriter::new(dir, run_name)?),
    })
}

fn make_policy(config: &AppConfig) -> Result<Box<dyn Policy>> {
    Ok(match &config.eval.policy_path {
        Some(path) => Box::new(LinearPolicy::load(path, config.eval.seed)?),
        None => Box::new(FixedCyclePolicy::new(config.fixed_hold_steps, GREEN_PHASES)),
    })
}

fn print_summaries(summaries: &[EpisodeSummary]) {
    println!();
    println!(
        "{:>7} {:>6} {:>12} {:>10} {:>6} {:>14} {:>12} {:>9} {:>6}",
        "episode", "ticks", "reward", "mean_veh", "peak", "co2_mg", "waiting_s", "speed", "early"
    );
    for s in summaries {
        println!(
            "{:>7} {:>6} {:>12.3} {:>10.2} {:>6} {:>14.1} {:>12.1} {:>9.2} {:>6}",
            s.episode,
            s.ticks,
            s.total_reward,
            s.mean_vehicles,
            s.peak_vehicles,
            s.total_co2,
            s.total_waiting_time,
            s.mean_avg_speed,
            s.early_done_steps,
        );
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Some(path) = &cli.write_default_config {
        AppConfig::write_template(path)?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    // 1. Configuration.
    let mut config = match &cli.config {
        Some(path) => AppConfig::load(path)?,
        None => AppConfig::default(),
    };
    cli.apply(&mut config.eval);
    config.eval.validate()?;
    config.grid.seed = config.eval.seed;
    let eval = &config.eval;

    println!("=== grid_eval ===");
    println!(
        "Episodes: {}  |  Signals: {}  |  Horizon: {}s from t={}s, step {}s",
        eval.episodes,
        eval.signals.len(),
        eval.num_seconds,
        eval.begin_time,
        eval.delta_time
    );

    // 2. Environment, policy, writer.
    let env = GridEnv::new(config.grid.clone(), eval.tick_range()?);
    let policy = make_policy(&config)?;
    let mut writer = make_writer(eval.output_format, &eval.output_dir, &eval.run_name)?;
    let policy_label = match &eval.policy_path {
        Some(p) => p.display().to_string(),
        None => "fixed-cycle".to_owned(),
    };
    info!(
        policy = %policy_label,
        format = %eval.output_format,
        output_dir = %eval.output_dir.display(),
        "configured"
    );

    // 3. Run.
    let mut runner = EvalBuilder::from_config(eval, env, policy)?
        .deterministic(!cli.stochastic)
        .build()?;
    let mut observer = LogObserver::new(eval.log_interval_ticks);

    let t0 = Instant::now();
    let summaries = runner.run(writer.as_mut(), &mut observer)?;
    runner.close()?;

    print_summaries(&summaries);
    println!();
    println!(
        "Done in {:.2}s, artifacts in {}",
        t0.elapsed().as_secs_f64(),
        eval.output_dir.display()
    );
    Ok(())
}
