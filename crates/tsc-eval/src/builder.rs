//! Fluent builder for constructing an [`EpisodeRunner`].

use std::collections::HashSet;

use tsc_core::{EvalConfig, SignalId, TickRange};
use tsc_traffic::{Environment, Policy, TrafficQuery};

use crate::{EpisodeRunner, EvalError, EvalResult};

/// Fluent builder for [`EpisodeRunner<E, P>`].
///
/// # Optional inputs (have defaults)
///
/// | Method                | Default                          |
/// |-----------------------|----------------------------------|
/// | `.episodes(n)`        | 1                                |
/// | `.range(r)`           | `env.horizon()`                  |
/// | `.deterministic(b)`   | `true`                           |
///
/// `.signals(v)` is required.
///
/// # Example
///
/// ```rust,ignore
/// let mut runner = EvalBuilder::new(env, policy)
///     .episodes(5)
///     .signals(vec![SignalId::new("tls_159")])
///     .build()?;
/// runner.run(&mut writer, &mut NoopObserver)?;
/// ```
pub struct EvalBuilder<E: Environment, P: Policy> {
    env:           E,
    policy:        P,
    episodes:      usize,
    signals:       Vec<SignalId>,
    range:         Option<TickRange>,
    deterministic: bool,
}

impl<E: Environment, P: Policy> EvalBuilder<E, P> {
    pub fn new(env: E, policy: P) -> Self {
        Self {
            env,
            policy,
            episodes:      1,
            signals:       Vec::new(),
            range:         None,
            deterministic: true,
        }
    }

    /// Take episodes, signals and horizon from `config`.
    pub fn from_config(config: &EvalConfig, env: E, policy: P) -> EvalResult<Self> {
        Ok(Self::new(env, policy)
            .episodes(config.episodes)
            .signals(config.signals.clone())
            .range(config.tick_range()?))
    }

    pub fn episodes(mut self, n: usize) -> Self {
        self.episodes = n;
        self
    }

    /// Signals whose lanes are monitored and whose phases are recorded, in
    /// output column order.
    pub fn signals(mut self, signals: Vec<SignalId>) -> Self {
        self.signals = signals;
        self
    }

    /// Tick range to walk.  Must equal the environment's horizon.
    pub fn range(mut self, range: TickRange) -> Self {
        self.range = Some(range);
        self
    }

    /// Evaluation mode passed to [`Policy::predict`].
    pub fn deterministic(mut self, deterministic: bool) -> Self {
        self.deterministic = deterministic;
        self
    }

    /// Validate inputs and return a ready-to-run [`EpisodeRunner`].
    pub fn build(self) -> EvalResult<EpisodeRunner<E, P>> {
        if self.signals.is_empty() {
            return Err(EvalError::Config("no monitored signals".into()));
        }
        let mut seen = HashSet::new();
        if let Some(dup) = self.signals.iter().find(|s| !seen.insert(*s)) {
            return Err(EvalError::Config(format!("signal {dup} listed twice")));
        }

        let horizon = self.env.horizon();
        let range = self.range.unwrap_or(horizon);
        if range != horizon {
            return Err(EvalError::HorizonMismatch { configured: range, environment: horizon });
        }

        // Unknown signals fail here rather than mid-episode.
        let traffic = self.env.traffic();
        for signal in &self.signals {
            traffic.controlled_lanes(signal)?;
        }

        Ok(EpisodeRunner {
            env:           self.env,
            policy:        self.policy,
            episodes:      self.episodes,
            signals:       self.signals,
            range,
            deterministic: self.deterministic,
        })
    }
}
