/// One scheduled stop on a concrete trip instance. Arrival and departure are
/// absolute instants (seconds since the unix epoch), derived by adding the
/// GTFS seconds-since-service-midnight to the service date.
#[derive(Debug, Clone, PartialEq)]
pub struct StopTimeInstance {
    pub trip_id: String,

    pub stop_id: String,

    /// Increases along the trip but need not be contiguous.
    pub stop_sequence: u32,

    pub arrival_time: i64,

    pub departure_time: i64,

    /// Cumulative distance along the trip polyline, in the same units as
    /// the shape points (feet). Monotonic nondecreasing when present.
    pub shape_dist_traveled: Option<f64>,

    /// True only for the trip's first scheduled stop.
    pub first_stop: bool,
}

impl StopTimeInstance {
    /// Two instances describe the same scheduled stop event when they agree
    /// on trip and sequence.
    pub fn same_stop_event(&self, other: &StopTimeInstance) -> bool {
        self.trip_id == other.trip_id && self.stop_sequence == other.stop_sequence
    }
}

/// A vertex of the trip polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct ShapePoint {
    pub latitude: f64,
    pub longitude: f64,
    /// Cumulative distance from the start of the shape, in feet.
    pub shape_dist_traveled: f64,
}

/// A concrete run of a trip on a service date, with its ordered stop times
/// and polyline.
#[derive(Debug, Clone, PartialEq)]
pub struct TripInstance {
    /// Identifies the schedule data set this instance was built from.
    pub data_set_id: i64,

    pub trip_id: String,

    pub route_id: String,

    pub service_id: String,

    /// Trips performed back-to-back by one vehicle share a block id.
    pub block_id: Option<String>,

    /// Scheduled start, in seconds since service midnight. Orders trips
    /// within a block.
    pub start_time: i64,

    /// Total length of the trip polyline, in feet.
    pub trip_distance: f64,

    pub stop_times: Vec<StopTimeInstance>,

    pub shape_points: Vec<ShapePoint>,
}

impl TripInstance {
    /// Index of the last stop time whose sequence is at or before
    /// `stop_sequence`, or `None` when the sequence precedes every stop of
    /// the trip.
    pub fn stop_index_at_or_before(&self, stop_sequence: u32) -> Option<usize> {
        let mut found = None;
        for (index, stop_time) in self.stop_times.iter().enumerate() {
            if stop_time.stop_sequence <= stop_sequence {
                found = Some(index);
            } else {
                break;
            }
        }
        found
    }

    pub fn get_stop_time_by_sequence(
        &self,
        stop_sequence: u32,
    ) -> Option<&StopTimeInstance> {
        self.stop_times
            .iter()
            .find(|stop_time| stop_time.stop_sequence == stop_sequence)
    }

    pub fn same_block(&self, other: &TripInstance) -> bool {
        match (&self.block_id, &other.block_id) {
            (Some(lhs), Some(rhs)) => lhs == rhs,
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trip_with_sequences(sequences: &[u32]) -> TripInstance {
        TripInstance {
            data_set_id: 1,
            trip_id: "t-1".to_owned(),
            route_id: "100".to_owned(),
            service_id: "weekday".to_owned(),
            block_id: Some("b-1".to_owned()),
            start_time: 0,
            trip_distance: 0.0,
            stop_times: sequences
                .iter()
                .enumerate()
                .map(|(index, sequence)| StopTimeInstance {
                    trip_id: "t-1".to_owned(),
                    stop_id: format!("s-{}", sequence),
                    stop_sequence: *sequence,
                    arrival_time: index as i64 * 60,
                    departure_time: index as i64 * 60,
                    shape_dist_traveled: None,
                    first_stop: index == 0,
                })
                .collect(),
            shape_points: vec![],
        }
    }

    #[test]
    fn finds_the_stop_at_or_before_a_sparse_sequence() {
        let trip = trip_with_sequences(&[1, 5, 9]);
        assert_eq!(trip.stop_index_at_or_before(0), None);
        assert_eq!(trip.stop_index_at_or_before(1), Some(0));
        assert_eq!(trip.stop_index_at_or_before(7), Some(1));
        assert_eq!(trip.stop_index_at_or_before(20), Some(2));
    }

    #[test]
    fn looks_up_stop_times_by_exact_sequence() {
        let trip = trip_with_sequences(&[1, 5, 9]);
        assert_eq!(
            trip.get_stop_time_by_sequence(5).map(|stop| stop.stop_id.as_str()),
            Some("s-5")
        );
        assert!(trip.get_stop_time_by_sequence(6).is_none());
    }

    #[test]
    fn blocks_match_only_when_both_are_known() {
        let lhs = trip_with_sequences(&[1, 2]);
        let mut rhs = trip_with_sequences(&[1, 2]);
        assert!(lhs.same_block(&rhs));
        rhs.block_id = None;
        assert!(!lhs.same_block(&rhs));
    }
}
