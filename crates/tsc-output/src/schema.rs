//! Column layout shared by every backend.
//!
//! ```text
//! tick, num_vehicles, vehicle_types, avg_speed,
//! localCO2Emission, localCOEmission, localHCEmission, localPMxEmission, localNOxEmission,
//! local_fuel_consumption, localNoiseEmission, localWaitingTime, localStoppedVehicles, actions,
//! <signal>_phase, <signal>_phase_duration, <signal>_state      (per monitored signal)
//! ```
//!
//! `vehicle_types` and `actions` hold lists; text backends encode them as
//! JSON arrays (`["passenger","bus"]`, `[1,0,2]`).

use tsc_core::{Pollutant, SignalId};

use crate::{EpisodeSummaryRow, OutputResult, StepRecord};

/// The fixed leading columns, before the per-signal block.
pub const FIXED_COLUMNS: [&str; 14] = [
    "tick",
    "num_vehicles",
    "vehicle_types",
    "avg_speed",
    Pollutant::CO2.column_name(),
    Pollutant::CO.column_name(),
    Pollutant::HC.column_name(),
    Pollutant::PMx.column_name(),
    Pollutant::NOx.column_name(),
    "local_fuel_consumption",
    "localNoiseEmission",
    "localWaitingTime",
    "localStoppedVehicles",
    "actions",
];

pub const SUMMARY_COLUMNS: [&str; 9] = [
    "episode",
    "ticks",
    "total_reward",
    "mean_vehicles",
    "peak_vehicles",
    "total_co2",
    "total_waiting_time",
    "mean_avg_speed",
    "early_done_steps",
];

/// Full header for a table monitoring `signals`.
pub fn columns(signals: &[SignalId]) -> Vec<String> {
    let mut cols: Vec<String> = FIXED_COLUMNS.iter().map(|c| (*c).to_owned()).collect();
    cols.reserve(signals.len() * 3);
    for s in signals {
        cols.push(format!("{s}_phase"));
        cols.push(format!("{s}_phase_duration"));
        cols.push(format!("{s}_state"));
    }
    cols
}

/// Render a row as text cells, in [`columns`] order.
pub fn record_cells(row: &StepRecord) -> OutputResult<Vec<String>> {
    let mut cells = Vec::with_capacity(FIXED_COLUMNS.len() + row.signals.len() * 3);
    cells.push(row.tick.to_string());
    cells.push(row.num_vehicles.to_string());
    cells.push(serde_json::to_string(&row.vehicle_types)?);
    cells.push(row.avg_speed.to_string());
    for p in Pollutant::ALL {
        cells.push(row.emission(p).to_string());
    }
    cells.push(row.fuel_consumption.to_string());
    cells.push(row.noise.to_string());
    cells.push(row.waiting_time.to_string());
    cells.push(row.halting.to_string());
    cells.push(serde_json::to_string(&row.actions)?);
    for s in &row.signals {
        cells.push(s.phase.to_string());
        cells.push(s.phase_duration.to_string());
        cells.push(s.state.clone());
    }
    Ok(cells)
}

pub fn summary_cells(row: &EpisodeSummaryRow) -> Vec<String> {
    vec![
        row.episode.to_string(),
        row.ticks.to_string(),
        row.total_reward.to_string(),
        row.mean_vehicles.to_string(),
        row.peak_vehicles.to_string(),
        row.total_co2.to_string(),
        row.total_waiting_time.to_string(),
        row.mean_avg_speed.to_string(),
        row.early_done_steps.to_string(),
    ]
}
