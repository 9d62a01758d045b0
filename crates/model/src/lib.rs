use chrono::{DateTime, TimeZone};

pub mod monitor_results;
pub mod observed_stop_time;
pub mod trip;
pub mod trip_deviation;
pub mod vehicle_position;

pub use monitor_results::VehicleMonitorResults;
pub use observed_stop_time::ObservedStopTime;
pub use trip::{ShapePoint, StopTimeInstance, TripInstance};
pub use trip_deviation::TripDeviation;
pub use vehicle_position::{VehiclePosition, VehicleStopStatus};

pub struct DateTimeRange<Tz>
where
    Tz: TimeZone,
{
    pub first: DateTime<Tz>,
    pub last: DateTime<Tz>,
}

impl<Tz: TimeZone> DateTimeRange<Tz> {
    pub fn new(first: DateTime<Tz>, last: DateTime<Tz>) -> Self {
        Self { first, last }
    }
}
