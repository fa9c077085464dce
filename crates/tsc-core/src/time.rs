//! Evaluation time model.
//!
//! # Design
//!
//! The environment adapter advances simulated time by a fixed number of
//! seconds (`delta`) per decision step.  A `Tick` is the simulated second at
//! which a decision is taken and telemetry is sampled.  A `TickRange` is the
//! half-open horizon `[start, end)` walked in steps of `delta`:
//!
//!   ticks = start, start + delta, start + 2·delta, …  (all < end)
//!
//! When `end - start` is a multiple of `delta` the number of ticks is exactly
//! `(end - start) / delta`; otherwise the last partial step is still taken.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::{CoreError, CoreResult};

// ── Tick ─────────────────────────────────────────────────────────────────────

/// A simulated time in whole seconds since the simulator's epoch.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug, Default, Serialize, Deserialize)]
pub struct Tick(pub u64);

impl Tick {
    /// Return the tick `secs` seconds after `self`, saturating at `u64::MAX`.
    #[inline]
    pub fn offset(self, secs: u64) -> Tick {
        Tick(self.0.saturating_add(secs))
    }
}

impl std::ops::Sub for Tick {
    type Output = u64;
    #[inline]
    fn sub(self, rhs: Tick) -> u64 {
        self.0 - rhs.0
    }
}

impl fmt::Display for Tick {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t={}s", self.0)
    }
}

// ── TickRange ────────────────────────────────────────────────────────────────

/// The half-open decision horizon of one episode.
#[derive(Copy, Clone, PartialEq, Eq, Debug, Serialize, Deserialize)]
pub struct TickRange {
    pub start: Tick,
    pub end:   Tick,
    /// Simulated seconds between consecutive decisions.  Always > 0.
    pub delta: u64,
}

impl TickRange {
    /// Validate and build a range.
    pub fn new(start: u64, end: u64, delta: u64) -> CoreResult<Self> {
        if delta == 0 {
            return Err(CoreError::Config("tick delta must be positive".into()));
        }
        if end < start {
            return Err(CoreError::Config(format!(
                "tick range end {end} precedes start {start}"
            )));
        }
        Ok(Self { start: Tick(start), end: Tick(end), delta })
    }

    /// Number of ticks in the range (rounds up a trailing partial step).
    #[inline]
    pub fn len(&self) -> u64 {
        (self.end - self.start).div_ceil(self.delta)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate the ticks in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = Tick> + use<> {
        let delta = self.delta;
        (self.start.0..self.end.0).step_by(delta as usize).map(Tick)
    }
}

impl fmt::Display for TickRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}) step {}s", self.start.0, self.end.0, self.delta)
    }
}
