use std::sync::Arc;

use model::{StopTimeInstance, TripInstance};

/// The monitor's stop-relative view of one vehicle, rebuilt from every
/// usable position snapshot. The position holds a refcounted handle to the
/// trip it was resolved against; trips themselves are owned by the trip
/// cache.
#[derive(Debug, Clone)]
pub struct TripStopPosition {
    pub data_set_id: i64,

    pub vehicle_id: String,

    pub trip: Arc<TripInstance>,

    /// Index into `trip.stop_times` of the stop the vehicle is at or last
    /// passed.
    pub previous_index: usize,

    /// Index of the stop being approached. Equals `previous_index` only at
    /// the trip's final stop.
    pub next_index: usize,

    /// The snapshot reported STOPPED_AT.
    pub at_previous_stop: bool,

    /// An earlier snapshot placed the vehicle at or before the previous
    /// stop, so traversals starting there may be claimed as observed.
    pub witnessed_previous_stop: bool,

    /// Timestamp of the snapshot this position was resolved from, seconds
    /// since the unix epoch.
    pub last_timestamp: i64,

    pub latitude: Option<f32>,

    pub longitude: Option<f32>,

    /// Seconds against the schedule at this position, positive = early.
    pub delay: i64,

    /// Shape distance at the vehicle, when GPS snapping succeeded. Lies
    /// between the previous and next stops' shape distances.
    pub trip_distance_position: Option<f64>,

    /// Schedule seconds the vehicle has progressed past the previous stop,
    /// 0 when unknown.
    pub scheduled_seconds_from_last_stop: i64,

    /// Portion of the elapsed time since the prior position attributed to
    /// travel past the previous stop, 0 when unknown.
    pub observed_seconds_to_travel_to_position: i64,
}

impl TripStopPosition {
    pub fn previous_sti(&self) -> &StopTimeInstance {
        &self.trip.stop_times[self.previous_index]
    }

    pub fn next_sti(&self) -> &StopTimeInstance {
        &self.trip.stop_times[self.next_index]
    }

    pub fn at_final_stop(&self) -> bool {
        self.previous_index == self.next_index
    }
}
