use std::collections::{HashMap, HashSet};
use std::{env, error::Error, sync::Arc};

use async_trait::async_trait;
use chrono::{DateTime, Local};
use model::{DateTimeRange, ObservedStopTime, TripDeviation};
use monitor::schedule_store::{ScheduleError, ScheduleStore, TripInstanceBatch};

use data_model::trip::{assemble_trip_instance, ShapePointRow, StopTimeRow, TripRow};

pub mod data_model;
pub mod queries;

pub struct DatabaseConnectionInfo {
    pub username: String,
    pub password: String,
    pub hostname: String,
    pub port: u16,
    pub database: String,
}

impl DatabaseConnectionInfo {
    pub fn from_env() -> Option<Self> {
        let username = env::var("DATABASE_USER").ok()?;
        let password = env::var("DATABASE_PASSWORD").ok()?;
        let hostname = env::var("DATABASE_HOST").ok()?;
        let port: u16 = env::var("DATABASE_PORT").ok()?.parse().ok()?;
        let database = env::var("DATABASE_NAME").ok()?;
        Some(Self {
            username,
            password,
            hostname,
            port,
            database,
        })
    }

    pub(self) fn postgres_url(self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.username, self.password, self.hostname, self.port, self.database
        )
    }
}

#[derive(Clone)]
pub struct PgDatabase {
    connection: sqlx::PgPool,
}

impl PgDatabase {
    pub async fn connect(
        database_connection_info: DatabaseConnectionInfo,
    ) -> Result<Self, Box<dyn Error>> {
        let url = database_connection_info.postgres_url();
        let pool = sqlx::postgres::PgPool::connect(&url).await?;

        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(Self { connection: pool })
    }

    pub async fn record_observed_stop_times(
        &self,
        observations: &[ObservedStopTime],
    ) -> queries::Result<()> {
        queries::observation::insert_observed_stop_times(&self.connection, observations)
            .await
    }

    pub async fn record_trip_deviations(
        &self,
        deviations: &[TripDeviation],
    ) -> queries::Result<()> {
        queries::observation::insert_trip_deviations(&self.connection, deviations)
            .await
    }
}

#[async_trait]
impl ScheduleStore for PgDatabase {
    async fn active_scheduled_trip_ids(
        &self,
        _now: DateTime<Local>,
        window: &DateTimeRange<Local>,
    ) -> Result<HashSet<String>, ScheduleError> {
        queries::schedule::active_trip_ids(&self.connection, window)
            .await
            .map(|trip_ids| trip_ids.into_iter().collect())
            .map_err(ScheduleError::other)
    }

    async fn load_trip_instances(
        &self,
        now: DateTime<Local>,
        window: &DateTimeRange<Local>,
        trip_ids: &[String],
    ) -> Result<TripInstanceBatch, ScheduleError> {
        let rows = queries::schedule::trips_by_ids(&self.connection, trip_ids)
            .await
            .map_err(ScheduleError::other)?;

        // several service dates may carry the same trip id; keep the row
        // covering `now` when there is one, the earliest overlapping row
        // otherwise
        let mut known: HashSet<String> = HashSet::new();
        let mut chosen: HashMap<String, TripRow> = HashMap::new();
        for row in rows {
            known.insert(row.trip_id.clone());
            if !row.overlaps(window.first, window.last) {
                continue;
            }
            let keep_existing = chosen
                .get(&row.trip_id)
                .map_or(false, |existing| existing.covers(now) || !row.covers(now));
            if !keep_existing {
                chosen.insert(row.trip_id.clone(), row);
            }
        }

        let mut batch = TripInstanceBatch::default();
        for trip_id in trip_ids {
            if !known.contains(trip_id) {
                batch.missing.push(trip_id.clone());
            } else if !chosen.contains_key(trip_id) {
                batch.out_of_range.push(trip_id.clone());
            }
        }
        if chosen.is_empty() {
            return Ok(batch);
        }

        let keys: Vec<_> = chosen
            .values()
            .map(|row| (row.trip_id.clone(), row.service_date))
            .collect();
        let loaded_ids: Vec<String> = chosen.keys().cloned().collect();
        let (stop_time_rows, shape_point_rows) = futures::try_join!(
            queries::schedule::stop_times_for_trips(&self.connection, &keys),
            queries::schedule::shape_points_for_trips(&self.connection, &loaded_ids),
        )
        .map_err(ScheduleError::other)?;

        let mut stop_times_by_trip: HashMap<String, Vec<StopTimeRow>> = HashMap::new();
        for row in stop_time_rows {
            stop_times_by_trip
                .entry(row.trip_id.clone())
                .or_default()
                .push(row);
        }
        let mut shape_points_by_trip: HashMap<String, Vec<ShapePointRow>> =
            HashMap::new();
        for row in shape_point_rows {
            shape_points_by_trip
                .entry(row.trip_id.clone())
                .or_default()
                .push(row);
        }

        for (trip_id, trip_row) in chosen {
            let stop_times = stop_times_by_trip.remove(&trip_id).unwrap_or_default();
            let shape_points =
                shape_points_by_trip.remove(&trip_id).unwrap_or_default();
            match assemble_trip_instance(trip_row, stop_times, shape_points) {
                Some(instance) if instance.stop_times.len() >= 2 => {
                    batch.by_id.insert(trip_id, Arc::new(instance));
                }
                _ => {
                    log::warn!("trip {} has no usable stop times", trip_id);
                    batch.missing.push(trip_id);
                }
            }
        }
        Ok(batch)
    }
}
