use std::sync::Arc;

use model::{TripInstance, VehiclePosition, VehicleStopStatus};

use crate::trip_distance::resolve_trip_distance;
use crate::trip_stop_position::TripStopPosition;

#[derive(Debug)]
pub enum TransitionError {
    /// The snapshot's stop sequence precedes every scheduled stop of the
    /// trip, so there is nothing to compare against.
    UnknownStop { trip_id: String, stop_sequence: u32 },
}

/// Resolves a new stop-relative position for a vehicle from a raw snapshot,
/// the trip it is performing, and the monitor's prior position (if any).
///
/// The caller guarantees the snapshot carries a trip id and a stop sequence
/// and reports a known stop status.
pub fn resolve_position(
    trip: &Arc<TripInstance>,
    prior: Option<&TripStopPosition>,
    position: &VehiclePosition,
    stop_sequence: u32,
) -> Result<TripStopPosition, TransitionError> {
    // The reported sequence need not be listed; the last stop at or before
    // it stands in.
    let located = trip.stop_index_at_or_before(stop_sequence).ok_or_else(|| {
        TransitionError::UnknownStop {
            trip_id: trip.trip_id.clone(),
            stop_sequence,
        }
    })?;

    // A vehicle in transit toward the located stop is still on the segment
    // leaving the stop before it.
    let previous_index =
        if position.stop_status == VehicleStopStatus::InTransitTo && located > 0 {
            located - 1
        } else {
            located
        };
    let next_index = (previous_index + 1).min(trip.stop_times.len() - 1);

    let at_previous_stop = position.stop_status == VehicleStopStatus::StoppedAt;
    let witnessed_previous_stop = at_previous_stop
        || witnessed_previous_stop(&trip.trip_id, stop_sequence, prior);

    let previous = &trip.stop_times[previous_index];
    let next = &trip.stop_times[next_index];

    let trip_distance_position = resolve_trip_distance(
        trip,
        previous,
        next,
        at_previous_stop,
        position.latitude,
        position.longitude,
    );

    let mut scheduled_seconds_from_last_stop = 0i64;
    let mut observed_seconds_to_travel_to_position = 0i64;
    if let (Some(prior), Some(distance_position)) = (prior, trip_distance_position) {
        if let (Some(from_distance), Some(to_distance)) =
            (previous.shape_dist_traveled, next.shape_dist_traveled)
        {
            let span = to_distance - from_distance;
            if span > 0.0 {
                let percent_between_stops =
                    ((distance_position - from_distance) / span).clamp(0.0, 1.0);
                let schedule_time_between_stops =
                    next.arrival_time - previous.departure_time;
                scheduled_seconds_from_last_stop = (schedule_time_between_stops
                    as f64
                    * percent_between_stops)
                    .round() as i64;

                // schedule seconds elapsed between the prior position and
                // this one; splits the observed elapsed time
                // proportionally
                let total_scheduled_length_traveled = (previous.arrival_time
                    - prior.previous_sti().arrival_time
                    - prior.scheduled_seconds_from_last_stop)
                    + scheduled_seconds_from_last_stop;
                if total_scheduled_length_traveled > 0 {
                    let elapsed = position.timestamp - prior.last_timestamp;
                    observed_seconds_to_travel_to_position = (elapsed as f64
                        * scheduled_seconds_from_last_stop as f64
                        / total_scheduled_length_traveled as f64)
                        .round() as i64;
                }
            }
        }
    }

    let delay = previous.departure_time + scheduled_seconds_from_last_stop
        - position.timestamp;

    Ok(TripStopPosition {
        data_set_id: trip.data_set_id,
        vehicle_id: position.vehicle_id.clone(),
        trip: Arc::clone(trip),
        previous_index,
        next_index,
        at_previous_stop,
        witnessed_previous_stop,
        last_timestamp: position.timestamp,
        latitude: position.latitude,
        longitude: position.longitude,
        delay,
        trip_distance_position,
        scheduled_seconds_from_last_stop,
        observed_seconds_to_travel_to_position,
    })
}

/// Whether an earlier position is evidence that the vehicle was at or before
/// the stop referenced by `stop_sequence`: the prior position was on another
/// trip, or behind the reported sequence, or dwelling at the same stop.
fn witnessed_previous_stop(
    trip_id: &str,
    stop_sequence: u32,
    prior: Option<&TripStopPosition>,
) -> bool {
    let Some(prior) = prior else {
        return false;
    };
    if prior.trip.trip_id != trip_id {
        return true;
    }
    let prior_sequence = prior.previous_sti().stop_sequence;
    if prior_sequence < stop_sequence {
        return true;
    }
    prior_sequence == stop_sequence && prior.at_previous_stop
}
