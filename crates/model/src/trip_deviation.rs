use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::Serialize;

/// Progress of a vehicle against one trip of its block. Emitted for the trip
/// being performed and for every later trip on the same block, so downstream
/// forecasts see delays propagate.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct TripDeviation {
    /// Timestamp of the position the deviation was derived from, seconds
    /// since the unix epoch.
    pub deviation_timestamp: i64,

    /// Positive: distance already covered on this trip, in feet. Negative:
    /// distance still to travel before this (future) trip begins.
    pub trip_progress: f64,

    pub data_set_id: i64,

    pub trip_id: String,

    pub vehicle_id: String,

    pub at_stop: bool,

    /// Seconds against the schedule, positive = early.
    pub delay: i64,

    pub route_id: String,

    /// Stamped by the publisher at publish time.
    pub created_at: Option<DateTime<Local>>,
}
