use std::collections::{HashMap, HashSet};
use std::error::Error;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Local};
use model::{DateTimeRange, TripInstance};

/// Result of asking the store for a set of trip instances. Ids the store
/// does not know are `missing`; ids whose schedule slice does not intersect
/// the requested window are `out_of_range`.
#[derive(Debug, Default)]
pub struct TripInstanceBatch {
    pub by_id: HashMap<String, Arc<TripInstance>>,
    pub missing: Vec<String>,
    pub out_of_range: Vec<String>,
}

#[derive(Debug)]
pub enum ScheduleError {
    Other(Box<dyn Error + Send + Sync>),
}

impl ScheduleError {
    pub fn other<E: Error + Send + Sync + 'static>(why: E) -> Self {
        Self::Other(Box::new(why))
    }
}

/// What the monitor needs from the schedule: which trips are scheduled to be
/// active in a window, and fully assembled trip instances for a set of trip
/// ids.
#[async_trait]
pub trait ScheduleStore {
    async fn active_scheduled_trip_ids(
        &self,
        now: DateTime<Local>,
        window: &DateTimeRange<Local>,
    ) -> Result<HashSet<String>, ScheduleError>;

    async fn load_trip_instances(
        &self,
        now: DateTime<Local>,
        window: &DateTimeRange<Local>,
        trip_ids: &[String],
    ) -> Result<TripInstanceBatch, ScheduleError>;
}
