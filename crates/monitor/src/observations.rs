use model::{ObservedStopTime, StopTimeInstance};

use crate::stop_pairs::StopTimePair;
use crate::trip_stop_position::TripStopPosition;

/// Builds one observed stop time per traversed pair, splitting the elapsed
/// time between the two positions across the pairs in proportion to their
/// scheduled lengths. Returned in chronological order.
pub fn build_observations(
    last: &TripStopPosition,
    new: &TripStopPosition,
    pairs: &[StopTimePair],
) -> Vec<ObservedStopTime> {
    let Some(first_stop) = pairs.first().map(|pair| &pair.from) else {
        return vec![];
    };
    let final_stop = &pairs[pairs.len() - 1].to;
    let total_scheduled = final_stop.arrival_time - first_stop.arrival_time;

    // back out the travel already attributed to moving past the new
    // position's previous stop; what remains ends at that stop
    let mut observed_time =
        new.last_timestamp - new.observed_seconds_to_travel_to_position;

    let mut assumed_start_time = last.last_timestamp;
    if first_stop.first_stop && last.last_timestamp <= first_stop.departure_time {
        // the vehicle was seen dwelling at the trip's first stop ahead of
        // schedule; it did not leave earlier than it had to
        if new.delay > 0 {
            assumed_start_time = observed_time - total_scheduled;
        } else {
            assumed_start_time = observed_time - total_scheduled + new.delay;
        }
    }
    let total_travel = observed_time - assumed_start_time;

    let mut reversed: Vec<ObservedStopTime> = Vec::with_capacity(pairs.len());
    for (index, pair) in pairs.iter().enumerate().rev() {
        let segment_scheduled = pair.to.arrival_time - pair.from.arrival_time;
        let mut travel_seconds = if segment_scheduled <= 0 || total_scheduled <= 0 {
            0
        } else {
            (segment_scheduled as f64 / total_scheduled as f64
                * total_travel as f64)
                .round() as i64
        };
        // fractional travel past the last position's stop was already
        // counted toward its pair
        if index == 0 && pair.from.same_stop_event(last.previous_sti()) {
            travel_seconds += last.scheduled_seconds_from_last_stop;
        }

        reversed.push(ObservedStopTime {
            route_id: pair.trip.route_id.clone(),
            stop_id: pair.from.stop_id.clone(),
            next_stop_id: pair.to.stop_id.clone(),
            observed_at_stop: observed_at(&pair.from, last, new),
            observed_at_next_stop: observed_at(&pair.to, last, new),
            observed_time,
            travel_seconds,
            scheduled_seconds: Some(segment_scheduled),
            vehicle_id: new.vehicle_id.clone(),
            trip_id: pair.trip.trip_id.clone(),
            data_set_id: new.data_set_id,
            created_at: None,
        });
        observed_time -= travel_seconds;
    }
    reversed.reverse();
    reversed
}

/// A stop was observed when one of the two positions stood at it.
fn observed_at(
    stop: &StopTimeInstance,
    last: &TripStopPosition,
    new: &TripStopPosition,
) -> bool {
    (last.at_previous_stop && stop.same_stop_event(last.previous_sti()))
        || (new.at_previous_stop && stop.same_stop_event(new.previous_sti()))
}
