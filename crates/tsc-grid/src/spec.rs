//! Grid layout and traffic-demand parameters.

/// Shape and demand of a synthetic signalised grid.
///
/// Intersections are laid out row-major and named `tls_{first_signal_id + i}`.
/// The defaults describe a single corridor of three intersections
/// (`tls_159`, `tls_160`, `tls_161`).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GridSpec {
    pub rows: usize,
    pub cols: usize,
    pub first_signal_id: u32,

    /// Probability per second that a vehicle enters each boundary lane.
    pub arrival_rate: f64,

    /// Vehicles per second leaving a queue on green.
    pub discharge_per_second: f64,

    /// Seconds from entering a lane to reaching the stop line.
    pub approach_secs: u32,

    pub min_green: u64,
    pub max_green: u64,
    pub yellow_time: u64,

    /// Relative frequencies of vehicle types among arrivals.
    pub vehicle_mix: Vec<(String, f64)>,

    pub seed: u64,
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            rows:                 1,
            cols:                 3,
            first_signal_id:      159,
            arrival_rate:         0.12,
            discharge_per_second: 0.5,
            approach_secs:        12,
            min_green:            5,
            max_green:            60,
            yellow_time:          4,
            vehicle_mix: vec![
                ("passenger".into(),  0.80),
                ("truck".into(),      0.08),
                ("bus".into(),        0.05),
                ("motorcycle".into(), 0.04),
                ("bicycle".into(),    0.03),
            ],
            seed: 42,
        }
    }
}

impl GridSpec {
    #[inline]
    pub fn intersections(&self) -> usize {
        self.rows * self.cols
    }
}
