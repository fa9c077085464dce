//! Monitored-lane derivation.

use std::collections::BTreeSet;

use tsc_core::{LaneId, SignalId};
use tsc_traffic::{TrafficQuery, TrafficResult};

/// The deduplicated union of the lanes controlled by `signals`.
///
/// A signal typically reports the same lane once per link, and neighbouring
/// signals may share lanes; both collapse here.  The result does not depend
/// on the order of `signals`.
pub fn monitored_lanes<T>(traffic: &T, signals: &[SignalId]) -> TrafficResult<BTreeSet<LaneId>>
where
    T: TrafficQuery + ?Sized,
{
    let mut lanes = BTreeSet::new();
    for signal in signals {
        lanes.extend(traffic.controlled_lanes(signal)?);
    }
    Ok(lanes)
}
