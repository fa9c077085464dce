//! `tsc-eval` - the episodic evaluation loop.
//!
//! ```text
//! for episode in 0..N:
//!   ① Reset    - Environment::reset, Policy::on_reset.
//!   ② Lanes    - union of the monitored signals' controlled lanes,
//!                derived once and kept for the whole episode.
//!   ③ Ticks    - for tick in start..end step delta:
//!                  predict (deterministic) → step → query telemetry
//!                  → append one StepRecord.
//!   ④ Persist  - TableWriter::write_episode, then write_summary.
//! TableWriter::finish
//! ```
//!
//! | Module        | Contents                                              |
//! |---------------|-------------------------------------------------------|
//! | [`lanes`]     | `monitored_lanes`                                     |
//! | [`telemetry`] | `collect_step_record`                                 |
//! | [`runner`]    | `EpisodeRunner`                                       |
//! | [`builder`]   | `EvalBuilder`                                         |
//! | [`observer`]  | `EvalObserver`, `NoopObserver`, `LogObserver`         |
//! | [`summary`]   | `EpisodeSummary`                                      |
//! | [`error`]     | `EvalError`, `EvalResult<T>`                          |
//!
//! # Quick-start
//!
//! ```rust,ignore
//! use tsc_eval::{EvalBuilder, LogObserver};
//! use tsc_output::CsvWriter;
//!
//! let mut runner = EvalBuilder::from_config(&config, env, policy)?.build()?;
//! let mut writer = CsvWriter::new(&config.output_dir, &config.run_name)?;
//! let summaries = runner.run(&mut writer, &mut LogObserver::new(360))?;
//! ```

pub mod builder;
pub mod error;
pub mod lanes;
pub mod observer;
pub mod runner;
pub mod summary;
pub mod telemetry;


pub use builder::EvalBuilder;
pub use error::{EvalError, EvalResult};
pub use lanes::monitored_lanes;
pub use observer::{EvalObserver, LogObserver, NoopObserver};
pub use runner::EpisodeRunner;
pub use summary::EpisodeSummary;
pub use telemetry::collect_step_record;
