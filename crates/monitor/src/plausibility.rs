use crate::stop_pairs::StopTimePair;

/// The observed elapsed time cannot be squared with the schedule of the
/// traversed pairs.
#[derive(Debug)]
pub struct ImplausibleMovement {
    pub scheduled_seconds: i64,
    pub elapsed_seconds: i64,
}

/// Checks that traversing `pairs` in `to_timestamp - from_timestamp` seconds
/// is believable. `early_tolerance` is the minimum accepted ratio of
/// observed to scheduled time: a vehicle does not cover a 100-second
/// schedule segment in 5 seconds.
pub fn check_movement(
    pairs: &[StopTimePair],
    from_timestamp: i64,
    to_timestamp: i64,
    early_tolerance: f64,
) -> Result<(), ImplausibleMovement> {
    if pairs.is_empty() {
        return Ok(());
    }

    let elapsed_seconds = to_timestamp - from_timestamp;
    let mut scheduled_seconds = 0i64;
    let mut last_pair_start = i64::MIN;
    for pair in pairs {
        // pairs must begin in schedule order
        if pair.from.arrival_time < last_pair_start {
            return Err(ImplausibleMovement {
                scheduled_seconds,
                elapsed_seconds,
            });
        }
        last_pair_start = pair.from.arrival_time;
        scheduled_seconds += pair.to.arrival_time - pair.from.arrival_time;
    }

    if scheduled_seconds < 0 {
        return Err(ImplausibleMovement {
            scheduled_seconds,
            elapsed_seconds,
        });
    }
    if scheduled_seconds == 0 {
        if early_tolerance > 0.0 {
            return Err(ImplausibleMovement {
                scheduled_seconds,
                elapsed_seconds,
            });
        }
        return Ok(());
    }

    let ratio = elapsed_seconds as f64 / scheduled_seconds as f64;
    if ratio >= early_tolerance {
        Ok(())
    } else {
        Err(ImplausibleMovement {
            scheduled_seconds,
            elapsed_seconds,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::stop_pairs::enumerate_pairs;

    fn pairs_over(
        last_index: usize,
        current_index: usize,
    ) -> Vec<StopTimePair> {
        let trip = fixtures::five_stop_trip();
        let last = fixtures::stop_position(&trip, last_index, true, true, 0);
        let current = fixtures::stop_position(&trip, current_index, true, true, 0);
        enumerate_pairs(&last, &current).unwrap()
    }

    #[test]
    fn no_pairs_is_always_plausible() {
        assert!(check_movement(&[], 1_000_000, 1_000_001, 0.1).is_ok());
    }

    #[test]
    fn reasonable_elapsed_time_is_plausible() {
        // 120 seconds scheduled over two pairs
        let pairs = pairs_over(0, 2);
        assert!(check_movement(&pairs, 1_000_000, 1_000_100, 0.1).is_ok());
    }

    #[test]
    fn unreasonably_fast_movement_is_rejected() {
        let pairs = pairs_over(0, 2);
        let rejected = check_movement(&pairs, 1_000_000, 1_000_005, 0.1);
        let why = rejected.unwrap_err();
        assert_eq!(why.scheduled_seconds, 120);
        assert_eq!(why.elapsed_seconds, 5);
    }

    #[test]
    fn tolerance_scales_the_acceptance_floor() {
        let pairs = pairs_over(0, 2);
        // 30 of 120 scheduled seconds: ratio 0.25
        assert!(check_movement(&pairs, 1_000_000, 1_000_030, 0.2).is_ok());
        assert!(check_movement(&pairs, 1_000_000, 1_000_030, 0.3).is_err());
    }

    #[test]
    fn pairs_out_of_schedule_order_are_rejected() {
        let mut shuffled = pairs_over(0, 2);
        shuffled.swap(0, 1);
        assert!(check_movement(&shuffled, 1_000_000, 1_000_100, 0.1).is_err());
    }

    #[test]
    fn zero_schedule_with_positive_tolerance_is_rejected() {
        let trip = fixtures::trip(
            "t-1",
            None,
            0,
            &[
                (1, "s-1", 1_000_000, 1_000_000, None),
                (2, "s-2", 1_000_000, 1_000_000, None),
            ],
            &[],
        );
        let last = fixtures::stop_position(&trip, 0, true, true, 1_000_000);
        let current = fixtures::stop_position(&trip, 1, true, true, 1_000_010);
        let pairs = enumerate_pairs(&last, &current).unwrap();
        assert!(check_movement(&pairs, 1_000_000, 1_000_010, 0.1).is_err());
        assert!(check_movement(&pairs, 1_000_000, 1_000_010, 0.0).is_ok());
    }
}
