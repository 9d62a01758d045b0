use model::{StopTimeInstance, TripInstance};
use utility::geo;

/// Shape distances are kept in feet, GPS math happens in meters.
const METERS_TO_FEET: f64 = 3.281;

/// A fix further than this from every candidate shape segment is treated as
/// noise rather than snapped.
const MAX_SNAP_DISTANCE_METERS: f64 = 200.0;

/// Resolves the shape distance traveled at the vehicle from its GPS fix and
/// the slice of the trip polyline between the previous and next stops.
/// Returns `None` when the position cannot be refined: no fix, no shape
/// distances on the stops, no shape points, or the fix too far off the
/// polyline.
pub fn resolve_trip_distance(
    trip: &TripInstance,
    previous: &StopTimeInstance,
    next: &StopTimeInstance,
    at_previous_stop: bool,
    latitude: Option<f32>,
    longitude: Option<f32>,
) -> Option<f64> {
    let from_distance = previous.shape_dist_traveled?;
    let to_distance = next.shape_dist_traveled?;
    let latitude = latitude? as f64;
    let longitude = longitude? as f64;
    if trip.shape_points.is_empty() {
        return None;
    }

    // A vehicle dwelling at a stop snaps to the stop itself; GPS drift
    // around a dwell would otherwise read as movement.
    if at_previous_stop {
        return Some(from_distance);
    }

    let candidates: Vec<_> = trip
        .shape_points
        .iter()
        .filter(|point| {
            point.shape_dist_traveled >= from_distance
                && point.shape_dist_traveled <= to_distance
        })
        .collect();

    let mut nearest: Option<(f64, f64)> = None;
    for segment in candidates.windows(2) {
        let (start, end) = (segment[0], segment[1]);
        let (snap_lat, snap_lng) = geo::nearest_on_segment(
            start.latitude,
            start.longitude,
            end.latitude,
            end.longitude,
            latitude,
            longitude,
        );
        let separation = geo::distance_meters(latitude, longitude, snap_lat, snap_lng);
        if nearest.map_or(true, |(best, _)| separation < best) {
            let along = geo::distance_meters(
                start.latitude,
                start.longitude,
                snap_lat,
                snap_lng,
            ) * METERS_TO_FEET
                + start.shape_dist_traveled;
            nearest = Some((separation, along));
        }
    }

    let (separation, along) = nearest?;
    if separation > MAX_SNAP_DISTANCE_METERS {
        return None;
    }
    Some(along.min(to_distance))
}
