//! The per-vehicle monitor: turns a sparse, noisy time series of vehicle
//! positions into stop-to-stop travel time observations and block-wide trip
//! deviations, by comparing each position against the schedule of the trip
//! the vehicle is performing.

pub mod collection;
pub mod deviations;
pub mod observations;
pub mod plausibility;
pub mod schedule_store;
pub mod stop_pairs;
pub mod transition;
pub mod trip_cache;
pub mod trip_distance;
pub mod trip_stop_position;
pub mod vehicle_monitor;

pub use collection::MonitorCollection;
pub use schedule_store::{ScheduleError, ScheduleStore, TripInstanceBatch};
pub use trip_cache::TripCache;
pub use trip_stop_position::TripStopPosition;
pub use vehicle_monitor::VehicleMonitor;

#[cfg(test)]
pub(crate) mod fixtures;
