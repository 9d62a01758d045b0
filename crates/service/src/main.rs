use database::{DatabaseConnectionInfo, PgDatabase};
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::publisher::Publisher;
use crate::run::MonitorService;

mod config;
mod publisher;
mod run;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match Config::from_env() {
        Ok(config) => config,
        Err(why) => {
            log::error!("invalid configuration: {:?}", why);
            std::process::exit(1);
        }
    };

    // database
    let database_connection_info = DatabaseConnectionInfo::from_env()
        .expect("expected database connection info in env.");
    let database = PgDatabase::connect(database_connection_info)
        .await
        .expect("could not connect to database.");

    // sinks
    let recorder = config.record_to_database.then(|| database.clone());
    let bus = if config.publish_over_nats {
        let url = config
            .nats_url
            .clone()
            .expect("expected NATS_URL in env.");
        Some(
            async_nats::connect(url)
                .await
                .expect("could not connect to message bus."),
        )
    } else {
        None
    };
    let publisher = Publisher::new(recorder, bus);

    // shutdown on ctrl-c; the in-flight poll finishes first
    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            signal.cancel();
        }
    });

    MonitorService::new(config, database, publisher)
        .run(shutdown)
        .await;
}
