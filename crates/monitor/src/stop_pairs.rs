use std::sync::Arc;

use model::{StopTimeInstance, TripInstance};

use crate::trip_stop_position::TripStopPosition;

/// One consecutive pair of scheduled stops the vehicle traversed.
#[derive(Debug, Clone)]
pub struct StopTimePair {
    pub from: StopTimeInstance,
    pub to: StopTimeInstance,
    pub trip: Arc<TripInstance>,
}

#[derive(Debug)]
pub enum PairError {
    /// The two positions are on different trips that do not share a block,
    /// so no traversal between them can be reconstructed.
    UnrelatedTrips {
        last_trip_id: String,
        current_trip_id: String,
    },
}

/// Enumerates the consecutive stop pairs the vehicle must have traversed
/// between two stop-relative positions, in order. Spans the boundary between
/// two trips of the same block when the positions disagree on the trip.
/// Empty when the positions enclose no full pair.
pub fn enumerate_pairs(
    last: &TripStopPosition,
    current: &TripStopPosition,
) -> Result<Vec<StopTimePair>, PairError> {
    let mut from_sequence = last.previous_sti().stop_sequence;
    if !last.witnessed_previous_stop {
        // without evidence the vehicle was ever at or before that stop, the
        // segment leaving it cannot be claimed as observed
        from_sequence += 1;
    }

    if last.trip.trip_id == current.trip.trip_id {
        return Ok(pairs_within(
            &last.trip,
            from_sequence,
            Some(current.previous_sti().stop_sequence),
        ));
    }

    if !last.trip.same_block(&current.trip) {
        return Err(PairError::UnrelatedTrips {
            last_trip_id: last.trip.trip_id.clone(),
            current_trip_id: current.trip.trip_id.clone(),
        });
    }

    // block transition: finish the last trip, then run up the current one
    let mut pairs = pairs_within(&last.trip, from_sequence, None);
    pairs.extend(pairs_within(
        &current.trip,
        0,
        Some(current.previous_sti().stop_sequence),
    ));
    Ok(pairs)
}

fn pairs_within(
    trip: &Arc<TripInstance>,
    from_sequence: u32,
    up_to_sequence: Option<u32>,
) -> Vec<StopTimePair> {
    let mut pairs = vec![];
    for window in trip.stop_times.windows(2) {
        let (from, to) = (&window[0], &window[1]);
        if from.stop_sequence < from_sequence {
            continue;
        }
        if let Some(upper) = up_to_sequence {
            if to.stop_sequence > upper {
                break;
            }
        }
        pairs.push(StopTimePair {
            from: from.clone(),
            to: to.clone(),
            trip: Arc::clone(trip),
        });
    }
    pairs
}
