use chrono::{Local, NaiveDate};
use model::DateTimeRange;
use sqlx::{Executor, Postgres};

use crate::data_model::trip::{ShapePointRow, StopTimeRow, TripRow};

use super::Result;

pub async fn active_trip_ids<'c, E>(
    executor: E,
    window: &DateTimeRange<Local>,
) -> Result<Vec<String>>
where
    E: Executor<'c, Database = Postgres>,
{
    let rows: Vec<(String,)> = sqlx::query_as(
        "
        SELECT DISTINCT
            trip_id
        FROM
            trips
        WHERE
            start_at <= $2 AND end_at >= $1;
        ",
    )
    .bind(window.first)
    .bind(window.last)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().map(|(trip_id,)| trip_id).collect())
}

pub async fn trips_by_ids<'c, E>(
    executor: E,
    trip_ids: &[String],
) -> Result<Vec<TripRow>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            trip_id, route_id, service_id, block_id, service_date,
            start_time, end_time, start_at, end_at, trip_distance, data_set_id
        FROM
            trips
        WHERE
            trip_id = ANY($1)
        ORDER BY
            trip_id, start_at;
        ",
    )
    .bind(trip_ids)
    .fetch_all(executor)
    .await
}

pub async fn stop_times_for_trips<'c, E>(
    executor: E,
    keys: &[(String, NaiveDate)],
) -> Result<Vec<StopTimeRow>>
where
    E: Executor<'c, Database = Postgres>,
{
    let (trip_ids, service_dates): (Vec<String>, Vec<NaiveDate>) =
        keys.iter().cloned().unzip();
    sqlx::query_as(
        "
        SELECT
            st.trip_id, st.service_date, st.stop_id, st.stop_sequence,
            st.arrival_time, st.departure_time, st.shape_dist_traveled
        FROM
            stop_times st
        JOIN
            unnest($1::text[], $2::date[]) AS wanted(trip_id, service_date)
            ON st.trip_id = wanted.trip_id
            AND st.service_date = wanted.service_date
        ORDER BY
            st.trip_id, st.stop_sequence;
        ",
    )
    .bind(&trip_ids)
    .bind(&service_dates)
    .fetch_all(executor)
    .await
}

pub async fn shape_points_for_trips<'c, E>(
    executor: E,
    trip_ids: &[String],
) -> Result<Vec<ShapePointRow>>
where
    E: Executor<'c, Database = Postgres>,
{
    sqlx::query_as(
        "
        SELECT
            trip_id, point_sequence, latitude, longitude, shape_dist_traveled
        FROM
            shape_points
        WHERE
            trip_id = ANY($1)
        ORDER BY
            trip_id, point_sequence;
        ",
    )
    .bind(trip_ids)
    .fetch_all(executor)
    .await
}
