use chrono::Local;
use database::PgDatabase;
use model::VehicleMonitorResults;
use monitor::deviations::build_trip_deviations;
use monitor::{MonitorCollection, ScheduleError, TripCache};
use tokio::time::{self, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::publisher::Publisher;

#[derive(Debug)]
pub enum PollError {
    Feed(feed::FeedError),
    Schedule(ScheduleError),
}

impl From<feed::FeedError> for PollError {
    fn from(why: feed::FeedError) -> Self {
        Self::Feed(why)
    }
}

impl From<ScheduleError> for PollError {
    fn from(why: ScheduleError) -> Self {
        Self::Schedule(why)
    }
}

/// The single orchestrator: fetch positions, refresh the trip cache,
/// dispatch every position to its vehicle monitor, hand results to the
/// publisher. One poll per cadence tick; a failed poll is logged and the
/// next tick tries again.
pub struct MonitorService {
    config: Config,
    database: PgDatabase,
    publisher: Publisher,
    collection: MonitorCollection,
    cache: TripCache,
}

impl MonitorService {
    pub fn new(config: Config, database: PgDatabase, publisher: Publisher) -> Self {
        let collection = MonitorCollection::new(
            config.early_tolerance,
            config.expire_position_seconds,
        );
        Self {
            config,
            database,
            publisher,
            collection,
            cache: TripCache::new(),
        }
    }

    pub async fn run(mut self, shutdown: CancellationToken) {
        let mut interval = time::interval(self.config.loop_every);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            tokio::select! {
                _ = shutdown.cancelled() => {
                    log::info!("shutting down");
                    break;
                }
                _ = interval.tick() => {}
            }
            if let Err(why) = self.poll_once().await {
                log::error!("poll failed: {:?}", why);
            }
        }
    }

    async fn poll_once(&mut self) -> Result<(), PollError> {
        let now = Local::now();
        let positions =
            feed::fetch_vehicle_positions(&self.config.vehicle_positions_url, now)
                .await?;
        self.cache
            .load_relevant_trips(&self.database, now, &positions)
            .await?;

        for position in &positions {
            let trip = position
                .trip_id
                .as_ref()
                .and_then(|trip_id| self.cache.get(trip_id));
            let monitor = self.collection.get_or_create(&position.vehicle_id);
            let (stop_position, observations) = monitor.new_position(position, trip);

            let mut results = VehicleMonitorResults::new(&position.vehicle_id);
            results.observed_stop_times = observations;
            if let Some(stop_position) = &stop_position {
                results.trip_deviations =
                    build_trip_deviations(stop_position, self.cache.trips());
            }
            if !results.is_empty() {
                self.publisher.publish(results).await;
            }
        }
        Ok(())
    }
}
