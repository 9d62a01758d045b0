use std::sync::Arc;

use model::{ObservedStopTime, TripInstance, VehiclePosition};

use crate::observations::build_observations;
use crate::plausibility::check_movement;
use crate::stop_pairs::enumerate_pairs;
use crate::transition::resolve_position;
use crate::trip_stop_position::TripStopPosition;

/// Multiple backend servers may report the same fix with slightly different
/// timestamps.
const DUPLICATE_TIMESTAMP_SKEW_SECONDS: i64 = 2;

/// Tracks one vehicle across polls. Owns the vehicle's last snapshot and
/// stop-relative position and decides, for every new snapshot, whether the
/// vehicle advanced, stalled, or needs a fresh anchor.
pub struct VehicleMonitor {
    vehicle_id: String,
    early_tolerance: f64,
    expire_position_seconds: i64,
    last_position: Option<VehiclePosition>,
    last_stop_position: Option<TripStopPosition>,
}

impl VehicleMonitor {
    pub fn new<S: Into<String>>(
        vehicle_id: S,
        early_tolerance: f64,
        expire_position_seconds: i64,
    ) -> Self {
        Self {
            vehicle_id: vehicle_id.into(),
            early_tolerance,
            expire_position_seconds,
            last_position: None,
            last_stop_position: None,
        }
    }

    pub fn vehicle_id(&self) -> &str {
        &self.vehicle_id
    }

    pub fn last_stop_position(&self) -> Option<&TripStopPosition> {
        self.last_stop_position.as_ref()
    }

    /// Feeds one snapshot to the monitor. Returns the resolved stop-relative
    /// position (when one could be resolved) and the observations the
    /// snapshot completed. Observations for a stop pair are produced at most
    /// once per trip run; any doubt about the vehicle's position drops the
    /// prior state so the next snapshot re-anchors.
    pub fn new_position(
        &mut self,
        position: &VehiclePosition,
        trip: Option<&Arc<TripInstance>>,
    ) -> (Option<TripStopPosition>, Vec<ObservedStopTime>) {
        if self.is_duplicate(position) {
            return (None, vec![]);
        }

        let usable = position.trip_id.is_some()
            && position.stop_sequence.is_some()
            && position.stop_status.is_known();
        if !usable {
            self.last_position = Some(position.clone());
            self.last_stop_position = None;
            return (None, vec![]);
        }
        let Some(stop_sequence) = position.stop_sequence else {
            return (None, vec![]);
        };

        // schedule cache miss: keep state, the trip may load next poll
        let Some(trip) = trip else {
            return (None, vec![]);
        };

        let resolved =
            match resolve_position(trip, self.last_stop_position.as_ref(), position, stop_sequence)
            {
                Ok(resolved) => resolved,
                Err(why) => {
                    log::warn!(
                        "vehicle {}: could not resolve stop position: {:?}",
                        self.vehicle_id,
                        why
                    );
                    self.last_position = Some(position.clone());
                    self.last_stop_position = None;
                    return (None, vec![]);
                }
            };
        self.last_position = Some(position.clone());

        let Some(previous) = self.last_stop_position.clone() else {
            self.last_stop_position = Some(resolved.clone());
            return (Some(resolved), vec![]);
        };

        let advance = should_advance(&previous, &resolved);
        let first_stop_dwell = !advance
            && previous.previous_sti().stop_sequence
                == resolved.previous_sti().stop_sequence
            && resolved.at_previous_stop
            && resolved.previous_sti().first_stop;

        // a stale anchor would smear the elapsed time over far too many
        // stops
        if resolved.last_timestamp - previous.last_timestamp
            > self.expire_position_seconds
        {
            self.last_stop_position = Some(resolved.clone());
            return (Some(resolved), vec![]);
        }

        if !advance {
            if first_stop_dwell {
                // keep the dwell anchor on the latest fix at the first stop
                self.last_stop_position = Some(resolved.clone());
            }
            return (Some(resolved), vec![]);
        }

        let pairs = match enumerate_pairs(&previous, &resolved) {
            Ok(pairs) => pairs,
            Err(why) => {
                log::warn!(
                    "vehicle {}: could not enumerate stop pairs: {:?}",
                    self.vehicle_id,
                    why
                );
                return (Some(resolved), vec![]);
            }
        };

        if let Err(why) = check_movement(
            &pairs,
            previous.last_timestamp,
            resolved.last_timestamp,
            self.early_tolerance,
        ) {
            log::warn!(
                "vehicle {}: implausible movement, {} scheduled seconds covered in {}",
                self.vehicle_id,
                why.scheduled_seconds,
                why.elapsed_seconds
            );
            self.last_stop_position = None;
            return (Some(resolved), vec![]);
        }

        let observations = if pairs.is_empty() {
            vec![]
        } else {
            build_observations(&previous, &resolved, &pairs)
        };
        self.last_stop_position = Some(resolved.clone());
        (Some(resolved), observations)
    }

    fn is_duplicate(&self, position: &VehiclePosition) -> bool {
        let Some(last) = &self.last_position else {
            return false;
        };
        last.vehicle_id == position.vehicle_id
            && last.stop_status == position.stop_status
            && last.stop_sequence == position.stop_sequence
            && last.latitude == position.latitude
            && last.longitude == position.longitude
            && (position.timestamp - last.timestamp).abs()
                <= DUPLICATE_TIMESTAMP_SKEW_SECONDS
    }
}

/// A new position advances the vehicle when it moved to a later trip, a
/// later stop, or came to rest at the stop it was approaching.
fn should_advance(old: &TripStopPosition, new: &TripStopPosition) -> bool {
    if old.trip.trip_id != new.trip.trip_id {
        return true;
    }
    let old_sequence = old.previous_sti().stop_sequence;
    let new_sequence = new.previous_sti().stop_sequence;
    if new_sequence > old_sequence {
        return true;
    }
    new_sequence == old_sequence && !old.at_previous_stop && new.at_previous_stop
}
