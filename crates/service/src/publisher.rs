use chrono::Local;
use database::PgDatabase;
use model::VehicleMonitorResults;

/// Subject the per-vehicle result bundles are published on.
pub const RESULTS_SUBJECT: &str = "vehicle-monitor-results";

/// Hands monitor results to the enabled sinks: a database recorder and a
/// message-bus publisher. Delivery is best effort; failures are logged and
/// the poll goes on.
pub struct Publisher {
    recorder: Option<PgDatabase>,
    bus: Option<async_nats::Client>,
}

impl Publisher {
    pub fn new(
        recorder: Option<PgDatabase>,
        bus: Option<async_nats::Client>,
    ) -> Self {
        Self { recorder, bus }
    }

    pub async fn publish(&self, mut results: VehicleMonitorResults) {
        if results.is_empty() {
            return;
        }

        let created_at = Local::now();
        for observation in &mut results.observed_stop_times {
            observation.created_at = Some(created_at);
        }
        for deviation in &mut results.trip_deviations {
            deviation.created_at = Some(created_at);
        }

        if let Some(recorder) = &self.recorder {
            if let Err(why) = recorder
                .record_observed_stop_times(&results.observed_stop_times)
                .await
            {
                log::error!(
                    "recording observed stop times for vehicle {} failed: {:?}",
                    results.vehicle_id,
                    why
                );
            }
            if let Err(why) = recorder
                .record_trip_deviations(&results.trip_deviations)
                .await
            {
                log::error!(
                    "recording trip deviations for vehicle {} failed: {:?}",
                    results.vehicle_id,
                    why
                );
            }
        }

        if let Some(bus) = &self.bus {
            match serde_json::to_vec(&results) {
                Ok(payload) => {
                    if let Err(why) =
                        bus.publish(RESULTS_SUBJECT, payload.into()).await
                    {
                        log::error!(
                            "publishing results for vehicle {} failed: {:?}",
                            results.vehicle_id,
                            why
                        );
                    }
                }
                Err(why) => {
                    log::error!(
                        "encoding results for vehicle {} failed: {:?}",
                        results.vehicle_id,
                        why
                    );
                }
            }
        }
    }
}
