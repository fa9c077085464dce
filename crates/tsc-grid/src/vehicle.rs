//! Vehicle state and per-type emission factors.

use tsc_core::{Pollutant, VehicleId};

/// Speed below which a vehicle counts as halting (m/s).
pub const HALTING_SPEED: f64 = 0.1;

#[derive(Clone, Debug)]
pub struct Vehicle {
    pub id:            VehicleId,
    pub type_id:       String,
    pub cruise_speed:  f64,
    pub speed:         f64,
    /// Accumulated seconds spent halting on the current lane.
    pub waiting:       f64,
    /// Seconds until the vehicle reaches the stop line.
    pub approach_left: u32,
}

impl Vehicle {
    #[inline]
    pub fn at_stop_line(&self) -> bool {
        self.approach_left == 0
    }

    #[inline]
    pub fn is_halting(&self) -> bool {
        self.speed < HALTING_SPEED
    }
}

/// Per-second exhaust of one vehicle.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Exhaust {
    /// mg/s, indexed by [`Pollutant::index`].
    pub emissions: [f64; 5],
    /// ml/s
    pub fuel:      f64,
    /// dBA
    pub noise:     f64,
}

// Passenger-car reference values: (moving, idling).
const CO2:  (f64, f64) = (2_600.0, 1_150.0);
const CO:   (f64, f64) = (14.0,    7.5);
const HC:   (f64, f64) = (0.45,    0.30);
const PMX:  (f64, f64) = (0.060,   0.025);
const NOX:  (f64, f64) = (1.15,    0.55);
const FUEL: (f64, f64) = (1.10,    0.49);
const NOISE: (f64, f64) = (66.0,   55.0);

/// Multiplier applied to the passenger-car reference.
fn type_scale(type_id: &str) -> f64 {
    match type_id {
        "truck"      => 3.5,
        "bus"        => 3.0,
        "motorcycle" => 0.5,
        "bicycle"    => 0.0,
        _            => 1.0,
    }
}

/// Nominal cruise speed by vehicle type (m/s).
pub fn cruise_speed(type_id: &str) -> f64 {
    match type_id {
        "truck" | "bus" => 11.1,
        "bicycle"       => 5.0,
        _               => 13.9,
    }
}

/// Exhaust emitted by `vehicle` during one second.
pub fn exhaust(vehicle: &Vehicle) -> Exhaust {
    let scale = type_scale(&vehicle.type_id);
    let pick = |(moving, idle): (f64, f64)| if vehicle.is_halting() { idle } else { moving };

    let mut emissions = [0.0; 5];
    emissions[Pollutant::CO2.index()] = pick(CO2) * scale;
    emissions[Pollutant::CO.index()]  = pick(CO) * scale;
    emissions[Pollutant::HC.index()]  = pick(HC) * scale;
    emissions[Pollutant::PMx.index()] = pick(PMX) * scale;
    emissions[Pollutant::NOx.index()] = pick(NOX) * scale;

    // Bicycles make (almost) no engine noise but still roll.
    let noise = if scale == 0.0 { 35.0 } else { pick(NOISE) + 10.0 * scale.log10() };

    Exhaust { emissions, fuel: pick(FUEL) * scale, noise }
}

/// Energetic sum of sound levels in dBA.  0.0 for an empty lane.
pub fn combine_noise(levels: impl IntoIterator<Item = f64>) -> f64 {
    let energy: f64 = levels.into_iter().map(|l| 10f64.powf(l / 10.0)).sum();
    if energy <= 0.0 { 0.0 } else { 10.0 * energy.log10() }
}
