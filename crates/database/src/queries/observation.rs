use std::fmt::Write as _;

use chrono::Local;
use model::{ObservedStopTime, TripDeviation};
use sqlx::{Executor, Postgres};

use super::Result;

const OBSERVED_STOP_TIME_COLUMNS: &[&str] = &[
    "route_id",
    "stop_id",
    "next_stop_id",
    "observed_at_stop",
    "observed_at_next_stop",
    "observed_time",
    "travel_seconds",
    "scheduled_seconds",
    "vehicle_id",
    "trip_id",
    "data_set_id",
    "created_at",
];

const TRIP_DEVIATION_COLUMNS: &[&str] = &[
    "deviation_timestamp",
    "trip_progress",
    "data_set_id",
    "trip_id",
    "vehicle_id",
    "at_stop",
    "delay",
    "route_id",
    "created_at",
];

pub async fn insert_observed_stop_times<'c, E>(
    executor: E,
    observations: &[ObservedStopTime],
) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    if observations.is_empty() {
        return Ok(());
    }
    let query_str = multi_row_insert(
        "observed_stop_times",
        OBSERVED_STOP_TIME_COLUMNS,
        observations.len(),
    );
    let mut query = sqlx::query(&query_str);
    for observation in observations {
        query = query
            .bind(&observation.route_id)
            .bind(&observation.stop_id)
            .bind(&observation.next_stop_id)
            .bind(observation.observed_at_stop)
            .bind(observation.observed_at_next_stop)
            .bind(observation.observed_time)
            .bind(observation.travel_seconds)
            .bind(observation.scheduled_seconds)
            .bind(&observation.vehicle_id)
            .bind(&observation.trip_id)
            .bind(observation.data_set_id)
            .bind(observation.created_at.unwrap_or_else(Local::now));
    }
    query.execute(executor).await?;
    Ok(())
}

pub async fn insert_trip_deviations<'c, E>(
    executor: E,
    deviations: &[TripDeviation],
) -> Result<()>
where
    E: Executor<'c, Database = Postgres>,
{
    if deviations.is_empty() {
        return Ok(());
    }
    let query_str =
        multi_row_insert("trip_deviations", TRIP_DEVIATION_COLUMNS, deviations.len());
    let mut query = sqlx::query(&query_str);
    for deviation in deviations {
        query = query
            .bind(deviation.deviation_timestamp)
            .bind(deviation.trip_progress)
            .bind(deviation.data_set_id)
            .bind(&deviation.trip_id)
            .bind(&deviation.vehicle_id)
            .bind(deviation.at_stop)
            .bind(deviation.delay)
            .bind(&deviation.route_id)
            .bind(deviation.created_at.unwrap_or_else(Local::now));
    }
    query.execute(executor).await?;
    Ok(())
}

fn multi_row_insert(table: &str, columns: &[&str], rows: usize) -> String {
    let mut query_str =
        format!("INSERT INTO {} ({}) VALUES ", table, columns.join(", "));
    let mut placeholder = 1;
    for row in 0..rows {
        if row > 0 {
            query_str.push_str(", ");
        }
        query_str.push('(');
        for column in 0..columns.len() {
            if column > 0 {
                query_str.push_str(", ");
            }
            let _ = write!(query_str, "${}", placeholder);
            placeholder += 1;
        }
        query_str.push(')');
    }
    query_str.push(';');
    query_str
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_row_insert_numbers_placeholders_per_row() {
        let query = multi_row_insert("t", &["a", "b"], 2);
        assert_eq!(query, "INSERT INTO t (a, b) VALUES ($1, $2), ($3, $4);");
    }
}
