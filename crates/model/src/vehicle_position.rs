use serde::{Deserialize, Serialize};

/// Where a vehicle reports itself relative to the stop referenced by its
/// `stop_sequence`.
/// See <https://gtfs.org/realtime/reference/#enum-vehiclestopstatus>
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum VehicleStopStatus {
    /// The vehicle is just about to arrive at the stop.
    IncomingAt,

    /// The vehicle is standing at the stop.
    StoppedAt,

    /// The vehicle has departed the previous stop and is in transit.
    #[default]
    InTransitTo,

    /// The feed did not report a usable status.
    Unknown,
}

impl VehicleStopStatus {
    pub fn is_known(self) -> bool {
        !matches!(self, Self::Unknown)
    }
}

/// One decoded realtime fix for one vehicle. The fetcher guarantees a
/// non-empty vehicle id and a timestamp (defaulted to the poll instant when
/// the feed omits it).
#[derive(Debug, Clone, PartialEq)]
pub struct VehiclePosition {
    pub vehicle_id: String,

    /// Seconds since the unix epoch.
    pub timestamp: i64,

    pub trip_id: Option<String>,

    pub route_id: Option<String>,

    pub latitude: Option<f32>,

    pub longitude: Option<f32>,

    pub bearing: Option<f32>,

    pub stop_status: VehicleStopStatus,

    /// Sequence of the stop the status refers to. Sequences within a trip
    /// increase but need not be contiguous.
    pub stop_sequence: Option<u32>,

    pub stop_id: Option<String>,
}
