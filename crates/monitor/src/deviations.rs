use std::collections::HashMap;
use std::sync::Arc;

use itertools::Itertools;
use model::{TripDeviation, TripInstance};

use crate::trip_stop_position::TripStopPosition;

/// Projects a stop-relative position onto the vehicle's block: one deviation
/// for the trip being performed, and one for every later trip on the same
/// block, with negative progress measuring the distance still to cover
/// before that trip begins. Emits nothing when the position has no resolved
/// trip distance.
pub fn build_trip_deviations(
    position: &TripStopPosition,
    loaded_trips: &HashMap<String, Arc<TripInstance>>,
) -> Vec<TripDeviation> {
    let Some(trip_distance_position) = position.trip_distance_position else {
        return vec![];
    };
    let trip = &position.trip;

    let mut deviations = vec![deviation_for(position, trip, trip_distance_position)];

    let successors = loaded_trips
        .values()
        .filter(|candidate| {
            candidate.trip_id != trip.trip_id
                && candidate.same_block(trip)
                && candidate.start_time > trip.start_time
        })
        .sorted_by_key(|candidate| candidate.start_time);

    // each hop away accrues another copy of what remains of the trip being
    // driven
    let remaining = trip.trip_distance - trip_distance_position;
    let mut distance_to_next_trip = remaining;
    for successor in successors {
        deviations.push(deviation_for(position, successor, -distance_to_next_trip));
        distance_to_next_trip += remaining;
    }
    deviations
}

fn deviation_for(
    position: &TripStopPosition,
    trip: &Arc<TripInstance>,
    trip_progress: f64,
) -> TripDeviation {
    TripDeviation {
        deviation_timestamp: position.last_timestamp,
        trip_progress,
        data_set_id: position.data_set_id,
        trip_id: trip.trip_id.clone(),
        vehicle_id: position.vehicle_id.clone(),
        at_stop: position.at_previous_stop,
        delay: position.delay,
        route_id: trip.route_id.clone(),
        created_at: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    fn loaded(trips: &[&Arc<TripInstance>]) -> HashMap<String, Arc<TripInstance>> {
        trips
            .iter()
            .map(|trip| (trip.trip_id.clone(), Arc::clone(trip)))
            .collect()
    }

    #[test]
    fn unresolved_trip_distance_emits_nothing() {
        let trip = fixtures::five_stop_trip();
        let position = fixtures::stop_position(&trip, 1, false, true, 1_000_070);
        assert!(build_trip_deviations(&position, &loaded(&[&trip])).is_empty());
    }

    #[test]
    fn current_trip_reports_covered_distance() {
        let trip = fixtures::trip(
            "t-1",
            Some("b-1"),
            3600,
            &[
                (1, "s-1", 1_000_000, 1_000_000, Some(0.0)),
                (2, "s-2", 1_000_060, 1_000_060, Some(4000.0)),
            ],
            &[(45.0, -122.0, 0.0), (45.01, -122.0, 4000.0)],
        );
        let mut position = fixtures::stop_position(&trip, 0, false, true, 1_000_030);
        position.trip_distance_position = Some(1500.0);
        position.delay = -45;

        let deviations = build_trip_deviations(&position, &loaded(&[&trip]));
        assert_eq!(deviations.len(), 1);
        assert_eq!(deviations[0].trip_id, "t-1");
        assert_eq!(deviations[0].trip_progress, 1500.0);
        assert_eq!(deviations[0].delay, -45);
        assert_eq!(deviations[0].deviation_timestamp, 1_000_030);
    }

    #[test]
    fn later_block_trips_get_negative_accruing_progress() {
        let current = fixtures::trip(
            "t-1",
            Some("b-1"),
            3600,
            &[
                (1, "s-1", 1_000_000, 1_000_000, Some(0.0)),
                (2, "s-2", 1_000_060, 1_000_060, Some(4000.0)),
            ],
            &[(45.0, -122.0, 0.0), (45.01, -122.0, 4000.0)],
        );
        let second = fixtures::trip(
            "t-2",
            Some("b-1"),
            7200,
            &[(1, "s-2", 1_003_600, 1_003_600, None), (2, "s-1", 1_003_660, 1_003_660, None)],
            &[],
        );
        let third = fixtures::trip(
            "t-3",
            Some("b-1"),
            10800,
            &[(1, "s-1", 1_007_200, 1_007_200, None), (2, "s-2", 1_007_260, 1_007_260, None)],
            &[],
        );
        let other_block = fixtures::trip(
            "t-9",
            Some("b-9"),
            7200,
            &[(1, "s-1", 1_003_600, 1_003_600, None), (2, "s-2", 1_003_660, 1_003_660, None)],
            &[],
        );

        let mut position =
            fixtures::stop_position(&current, 0, false, true, 1_000_030);
        position.trip_distance_position = Some(1500.0);

        let deviations = build_trip_deviations(
            &position,
            &loaded(&[&current, &third, &second, &other_block]),
        );
        assert_eq!(deviations.len(), 3);
        assert_eq!(deviations[0].trip_id, "t-1");
        assert_eq!(deviations[0].trip_progress, 1500.0);
        assert_eq!(deviations[1].trip_id, "t-2");
        assert_eq!(deviations[1].trip_progress, -2500.0);
        assert_eq!(deviations[2].trip_id, "t-3");
        assert_eq!(deviations[2].trip_progress, -5000.0);
    }
}
