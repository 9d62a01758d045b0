use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Local};
use model::{DateTimeRange, TripInstance, VehiclePosition};

use crate::schedule_store::{ScheduleError, ScheduleStore};

/// Time-bounded cache of loaded trip instances. Refreshes the set of
/// relevant trip ids from the schedule store on a fixed cadence, loads
/// whatever the current positions reference on top, and drops trips nothing
/// requires anymore.
pub struct TripCache {
    scheduled_reload_every: Duration,
    relevant_window: Duration,
    load_slack: Duration,
    last_scheduled_load: Option<DateTime<Local>>,
    required_trip_ids: HashSet<String>,
    loaded_trips: HashMap<String, Arc<TripInstance>>,
    reported_unavailable: HashSet<String>,
}

impl TripCache {
    pub fn new() -> Self {
        Self {
            scheduled_reload_every: Duration::minutes(5),
            relevant_window: Duration::hours(1),
            load_slack: Duration::hours(8),
            last_scheduled_load: None,
            required_trip_ids: HashSet::new(),
            loaded_trips: HashMap::new(),
            reported_unavailable: HashSet::new(),
        }
    }

    pub fn get(&self, trip_id: &str) -> Option<&Arc<TripInstance>> {
        self.loaded_trips.get(trip_id)
    }

    pub fn trips(&self) -> &HashMap<String, Arc<TripInstance>> {
        &self.loaded_trips
    }

    /// Ensures every trip the upcoming schedule or the current positions
    /// reference is loaded, evicting trips no longer required.
    pub async fn load_relevant_trips<S>(
        &mut self,
        store: &S,
        now: DateTime<Local>,
        positions: &[VehiclePosition],
    ) -> Result<(), ScheduleError>
    where
        S: ScheduleStore,
    {
        let reload_due = self
            .last_scheduled_load
            .map_or(true, |last| now > last + self.scheduled_reload_every);
        if reload_due {
            let window = DateTimeRange::new(
                now,
                now + self.scheduled_reload_every + self.relevant_window,
            );
            self.required_trip_ids =
                store.active_scheduled_trip_ids(now, &window).await?;
            self.last_scheduled_load = Some(now);
        }

        for position in positions {
            if let Some(trip_id) = &position.trip_id {
                self.required_trip_ids.insert(trip_id.clone());
            }
        }

        let mut required_trips = HashMap::new();
        let mut missing_ids = vec![];
        for trip_id in &self.required_trip_ids {
            match self.loaded_trips.get(trip_id) {
                Some(trip) => {
                    required_trips.insert(trip_id.clone(), Arc::clone(trip));
                }
                None => missing_ids.push(trip_id.clone()),
            }
        }

        if !missing_ids.is_empty() {
            let window =
                DateTimeRange::new(now - self.load_slack, now + self.load_slack);
            let batch = store
                .load_trip_instances(now, &window, &missing_ids)
                .await?;
            for (trip_id, trip) in batch.by_id {
                required_trips.insert(trip_id, trip);
            }
            for trip_id in batch.missing {
                if self.reported_unavailable.insert(trip_id.clone()) {
                    log::warn!("trip {} is not in the schedule", trip_id);
                }
            }
            for trip_id in batch.out_of_range {
                if self.reported_unavailable.insert(trip_id.clone()) {
                    log::warn!(
                        "trip {} has no schedule slice covering the load window",
                        trip_id
                    );
                }
            }
        }

        self.loaded_trips = required_trips;
        Ok(())
    }
}

impl Default for TripCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use crate::schedule_store::TripInstanceBatch;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StoreStub {
        active: HashSet<String>,
        trips: HashMap<String, Arc<TripInstance>>,
        active_queries: Mutex<usize>,
        load_queries: Mutex<Vec<Vec<String>>>,
    }

    impl StoreStub {
        fn new(
            active: &[&str],
            trips: Vec<Arc<TripInstance>>,
        ) -> Self {
            Self {
                active: active.iter().map(|id| id.to_string()).collect(),
                trips: trips
                    .into_iter()
                    .map(|trip| (trip.trip_id.clone(), trip))
                    .collect(),
                active_queries: Mutex::new(0),
                load_queries: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl ScheduleStore for StoreStub {
        async fn active_scheduled_trip_ids(
            &self,
            _now: DateTime<Local>,
            _window: &DateTimeRange<Local>,
        ) -> Result<HashSet<String>, ScheduleError> {
            *self.active_queries.lock().unwrap() += 1;
            Ok(self.active.clone())
        }

        async fn load_trip_instances(
            &self,
            _now: DateTime<Local>,
            _window: &DateTimeRange<Local>,
            trip_ids: &[String],
        ) -> Result<TripInstanceBatch, ScheduleError> {
            self.load_queries.lock().unwrap().push(trip_ids.to_vec());
            let mut batch = TripInstanceBatch::default();
            for trip_id in trip_ids {
                match self.trips.get(trip_id) {
                    Some(trip) => {
                        batch.by_id.insert(trip_id.clone(), Arc::clone(trip));
                    }
                    None => batch.missing.push(trip_id.clone()),
                }
            }
            Ok(batch)
        }
    }

    #[tokio::test]
    async fn loads_scheduled_and_positioned_trips() {
        let scheduled = fixtures::trip("t-1", None, 0, &[(1, "s-1", 0, 0, None), (2, "s-2", 60, 60, None)], &[]);
        let positioned = fixtures::trip("t-2", None, 0, &[(1, "s-1", 0, 0, None), (2, "s-2", 60, 60, None)], &[]);
        let store = StoreStub::new(&["t-1"], vec![scheduled, positioned]);
        let mut cache = TripCache::new();

        let positions = [fixtures::position(
            "1",
            "t-2",
            1,
            model::VehicleStopStatus::StoppedAt,
            0,
        )];
        cache
            .load_relevant_trips(&store, Local::now(), &positions)
            .await
            .unwrap();

        assert!(cache.get("t-1").is_some());
        assert!(cache.get("t-2").is_some());
        assert_eq!(*store.active_queries.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn scheduled_reload_waits_for_the_cadence() {
        let store = StoreStub::new(&[], vec![]);
        let mut cache = TripCache::new();

        let now = Local::now();
        cache.load_relevant_trips(&store, now, &[]).await.unwrap();
        cache
            .load_relevant_trips(&store, now + Duration::minutes(1), &[])
            .await
            .unwrap();
        assert_eq!(*store.active_queries.lock().unwrap(), 1);

        cache
            .load_relevant_trips(&store, now + Duration::minutes(6), &[])
            .await
            .unwrap();
        assert_eq!(*store.active_queries.lock().unwrap(), 2);
    }

    #[tokio::test]
    async fn loaded_trips_are_not_fetched_twice() {
        let trip = fixtures::trip("t-1", None, 0, &[(1, "s-1", 0, 0, None), (2, "s-2", 60, 60, None)], &[]);
        let store = StoreStub::new(&["t-1"], vec![trip]);
        let mut cache = TripCache::new();

        let now = Local::now();
        cache.load_relevant_trips(&store, now, &[]).await.unwrap();
        cache
            .load_relevant_trips(&store, now + Duration::seconds(3), &[])
            .await
            .unwrap();
        let loads = store.load_queries.lock().unwrap();
        assert_eq!(loads.len(), 1);
    }

    #[tokio::test]
    async fn missing_trips_do_not_fail_the_load() {
        let store = StoreStub::new(&["ghost"], vec![]);
        let mut cache = TripCache::new();

        cache
            .load_relevant_trips(&store, Local::now(), &[])
            .await
            .unwrap();
        assert!(cache.get("ghost").is_none());
    }
}
