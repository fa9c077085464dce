//! Per-tick telemetry collection.

use std::collections::BTreeSet;

use tsc_core::{LaneId, Pollutant, SignalId, Tick};
use tsc_output::{SignalReading, StepRecord};
use tsc_traffic::{Action, TrafficQuery, TrafficResult};

/// Query `traffic` for one row of telemetry over `lanes` and `signals`.
///
/// Vehicles are listed lane by lane in `lanes` order.  Lane aggregates are
/// plain sums; `avg_speed` is the mean over listed vehicles and exactly 0.0
/// when there are none.  Any query failure is returned as is.
pub fn collect_step_record<T>(
    traffic: &T,
    lanes:   &BTreeSet<LaneId>,
    signals: &[SignalId],
    tick:    Tick,
    action:  &Action,
) -> TrafficResult<StepRecord>
where
    T: TrafficQuery + ?Sized,
{
    let mut vehicle_types = Vec::new();
    let mut speed_sum = 0.0;
    let mut emissions = [0.0; 5];
    let mut fuel_consumption = 0.0;
    let mut noise = 0.0;
    let mut waiting_time = 0.0;
    let mut halting = 0u32;

    for lane in lanes {
        for vehicle in traffic.lane_vehicle_ids(lane)? {
            vehicle_types.push(traffic.vehicle_type(&vehicle)?);
            speed_sum += traffic.vehicle_speed(&vehicle)?;
        }
        for p in Pollutant::ALL {
            emissions[p.index()] += traffic.lane_emission(lane, p)?;
        }
        fuel_consumption += traffic.lane_fuel_consumption(lane)?;
        noise += traffic.lane_noise(lane)?;
        waiting_time += traffic.lane_waiting_time(lane)?;
        halting += traffic.lane_halting_count(lane)?;
    }

    let num_vehicles = vehicle_types.len() as u32;
    let avg_speed = if num_vehicles == 0 { 0.0 } else { speed_sum / num_vehicles as f64 };

    let signals = signals
        .iter()
        .map(|s| {
            Ok(SignalReading {
                phase:          traffic.signal_phase(s)?,
                phase_duration: traffic.signal_phase_duration(s)?,
                state:          traffic.signal_state(s)?,
            })
        })
        .collect::<TrafficResult<Vec<_>>>()?;

    Ok(StepRecord {
        tick: tick.0,
        num_vehicles,
        vehicle_types,
        avg_speed,
        emissions,
        fuel_consumption,
        noise,
        waiting_time,
        halting,
        actions: action.0.clone(),
        signals,
    })
}
