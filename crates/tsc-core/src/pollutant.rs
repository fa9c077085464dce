//! Per-lane emission categories reported by the simulator.

use std::fmt;

use serde::{Deserialize, Serialize};

/// The five exhaust pollutants queried per lane.
///
/// Fuel consumption and noise are separate queries and are not part of this
/// enum.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Pollutant {
    CO2,
    CO,
    HC,
    PMx,
    NOx,
}

impl Pollutant {
    /// All pollutants in output column order.
    pub const ALL: [Pollutant; 5] = [
        Pollutant::CO2,
        Pollutant::CO,
        Pollutant::HC,
        Pollutant::PMx,
        Pollutant::NOx,
    ];

    /// Position of this pollutant in [`ALL`][Self::ALL].
    #[inline]
    pub fn index(self) -> usize {
        self as usize
    }

    /// Name of the aggregated output column, e.g. `localCO2Emission`.
    pub const fn column_name(self) -> &'static str {
        match self {
            Pollutant::CO2 => "localCO2Emission",
            Pollutant::CO  => "localCOEmission",
            Pollutant::HC  => "localHCEmission",
            Pollutant::PMx => "localPMxEmission",
            Pollutant::NOx => "localNOxEmission",
        }
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Pollutant::CO2 => "CO2",
            Pollutant::CO  => "CO",
            Pollutant::HC  => "HC",
            Pollutant::PMx => "PMx",
            Pollutant::NOx => "NOx",
        };
        f.write_str(s)
    }
}
