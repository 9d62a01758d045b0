//! Schedule and snapshot builders shared by the monitor tests.

use std::sync::Arc;

use model::{
    ShapePoint, StopTimeInstance, TripInstance, VehiclePosition, VehicleStopStatus,
};

use crate::trip_stop_position::TripStopPosition;

/// Builds a trip instance from `(sequence, stop id, arrival, departure,
/// shape distance)` tuples and `(lat, lng, shape distance)` shape points.
pub fn trip<S: AsRef<str>>(
    trip_id: &str,
    block_id: Option<&str>,
    start_time: i64,
    stops: &[(u32, S, i64, i64, Option<f64>)],
    shape: &[(f64, f64, f64)],
) -> Arc<TripInstance> {
    let stop_times: Vec<StopTimeInstance> = stops
        .iter()
        .enumerate()
        .map(
            |(index, (sequence, stop_id, arrival, departure, shape_dist))| {
                StopTimeInstance {
                    trip_id: trip_id.to_owned(),
                    stop_id: stop_id.as_ref().to_owned(),
                    stop_sequence: *sequence,
                    arrival_time: *arrival,
                    departure_time: *departure,
                    shape_dist_traveled: *shape_dist,
                    first_stop: index == 0,
                }
            },
        )
        .collect();
    let shape_points: Vec<ShapePoint> = shape
        .iter()
        .map(|(latitude, longitude, shape_dist_traveled)| ShapePoint {
            latitude: *latitude,
            longitude: *longitude,
            shape_dist_traveled: *shape_dist_traveled,
        })
        .collect();
    let trip_distance = shape_points
        .last()
        .map(|point| point.shape_dist_traveled)
        .or_else(|| {
            stop_times
                .last()
                .and_then(|stop_time| stop_time.shape_dist_traveled)
        })
        .unwrap_or(0.0);

    Arc::new(TripInstance {
        data_set_id: 1,
        trip_id: trip_id.to_owned(),
        route_id: "100".to_owned(),
        service_id: "weekday".to_owned(),
        block_id: block_id.map(|block_id| block_id.to_owned()),
        start_time,
        trip_distance,
        stop_times,
        shape_points,
    })
}

pub fn three_stop_trip() -> Arc<TripInstance> {
    trip(
        "t-1",
        Some("b-1"),
        3600,
        &[
            (1, "s-1", 1_000_000, 1_000_000, None),
            (2, "s-2", 1_000_060, 1_000_060, None),
            (3, "s-3", 1_000_120, 1_000_120, None),
        ],
        &[],
    )
}

pub fn five_stop_trip() -> Arc<TripInstance> {
    trip(
        "t-1",
        Some("b-1"),
        3600,
        &[
            (1, "s-1", 1_000_000, 1_000_000, None),
            (2, "s-2", 1_000_060, 1_000_060, None),
            (3, "s-3", 1_000_120, 1_000_120, None),
            (4, "s-4", 1_000_180, 1_000_180, None),
            (5, "s-5", 1_000_240, 1_000_240, None),
        ],
        &[],
    )
}

pub fn position(
    vehicle_id: &str,
    trip_id: &str,
    stop_sequence: u32,
    stop_status: VehicleStopStatus,
    timestamp: i64,
) -> VehiclePosition {
    VehiclePosition {
        vehicle_id: vehicle_id.to_owned(),
        timestamp,
        trip_id: Some(trip_id.to_owned()),
        route_id: Some("100".to_owned()),
        latitude: None,
        longitude: None,
        bearing: None,
        stop_status,
        stop_sequence: Some(stop_sequence),
        stop_id: None,
    }
}

/// A bare stop-relative position for component tests that do not want to go
/// through the transition resolver.
pub fn stop_position(
    trip: &Arc<TripInstance>,
    previous_index: usize,
    at_previous_stop: bool,
    witnessed_previous_stop: bool,
    last_timestamp: i64,
) -> TripStopPosition {
    let next_index = (previous_index + 1).min(trip.stop_times.len() - 1);
    TripStopPosition {
        data_set_id: trip.data_set_id,
        vehicle_id: "1".to_owned(),
        trip: Arc::clone(trip),
        previous_index,
        next_index,
        at_previous_stop,
        witnessed_previous_stop,
        last_timestamp,
        latitude: None,
        longitude: None,
        delay: 0,
        trip_distance_position: None,
        scheduled_seconds_from_last_stop: 0,
        observed_seconds_to_travel_to_position: 0,
    }
}
