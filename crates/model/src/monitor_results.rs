use schemars::JsonSchema;
use serde::Serialize;

use crate::{ObservedStopTime, TripDeviation};

/// Everything one poll produced for one vehicle. This is the bundle the bus
/// publisher sends as JSON on the results subject.
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct VehicleMonitorResults {
    pub vehicle_id: String,
    pub observed_stop_times: Vec<ObservedStopTime>,
    pub trip_deviations: Vec<TripDeviation>,
}

impl VehicleMonitorResults {
    pub fn new<S: Into<String>>(vehicle_id: S) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            observed_stop_times: vec![],
            trip_deviations: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.observed_stop_times.is_empty() && self.trip_deviations.is_empty()
    }
}
