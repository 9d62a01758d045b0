use chrono::{DateTime, Local, NaiveDate, NaiveTime, TimeZone};
use model::{ShapePoint, StopTimeInstance, TripInstance};
use sqlx::prelude::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct TripRow {
    pub trip_id: String,
    pub route_id: String,
    pub service_id: String,
    pub block_id: Option<String>,
    pub service_date: NaiveDate,
    pub start_time: i32,
    pub end_time: i32,
    pub start_at: DateTime<Local>,
    pub end_at: DateTime<Local>,
    pub trip_distance: f64,
    pub data_set_id: i64,
}

impl TripRow {
    pub fn covers(&self, instant: DateTime<Local>) -> bool {
        self.start_at <= instant && instant <= self.end_at
    }

    pub fn overlaps(&self, first: DateTime<Local>, last: DateTime<Local>) -> bool {
        self.start_at <= last && self.end_at >= first
    }
}

#[derive(Debug, Clone, FromRow)]
pub struct StopTimeRow {
    pub trip_id: String,
    pub service_date: NaiveDate,
    pub stop_id: String,
    pub stop_sequence: i32,
    pub arrival_time: i32,
    pub departure_time: i32,
    pub shape_dist_traveled: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct ShapePointRow {
    pub trip_id: String,
    pub point_sequence: i32,
    pub latitude: f64,
    pub longitude: f64,
    pub shape_dist_traveled: f64,
}

/// Builds the in-memory trip instance from its rows. Stop time rows are
/// expected ordered by stop sequence. Returns `None` when the service date
/// has no representable midnight.
pub fn assemble_trip_instance(
    trip: TripRow,
    stop_times: Vec<StopTimeRow>,
    shape_points: Vec<ShapePointRow>,
) -> Option<TripInstance> {
    let midnight = service_midnight(trip.service_date)?.timestamp();

    let stop_times: Vec<StopTimeInstance> = stop_times
        .into_iter()
        .enumerate()
        .map(|(index, row)| StopTimeInstance {
            trip_id: row.trip_id,
            stop_id: row.stop_id,
            stop_sequence: row.stop_sequence as u32,
            arrival_time: midnight + row.arrival_time as i64,
            departure_time: midnight + row.departure_time as i64,
            shape_dist_traveled: row.shape_dist_traveled,
            first_stop: index == 0,
        })
        .collect();

    let shape_points: Vec<ShapePoint> = shape_points
        .into_iter()
        .map(|row| ShapePoint {
            latitude: row.latitude,
            longitude: row.longitude,
            shape_dist_traveled: row.shape_dist_traveled,
        })
        .collect();

    Some(TripInstance {
        data_set_id: trip.data_set_id,
        trip_id: trip.trip_id,
        route_id: trip.route_id,
        service_id: trip.service_id,
        block_id: trip.block_id,
        start_time: trip.start_time as i64,
        trip_distance: trip.trip_distance,
        stop_times,
        shape_points,
    })
}

/// GTFS times count from service midnight; a service day may be longer than
/// 24 hours.
fn service_midnight(date: NaiveDate) -> Option<DateTime<Local>> {
    Local
        .from_local_datetime(&date.and_time(NaiveTime::MIN))
        .earliest()
}
