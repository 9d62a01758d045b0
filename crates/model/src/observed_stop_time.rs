use chrono::{DateTime, Local};
use schemars::JsonSchema;
use serde::Serialize;

/// An observed traversal of one pair of consecutive scheduled stops,
/// reconstructed from two vehicle positions. Consumed by the travel-time
/// forecasting pipeline.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, PartialEq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObservedStopTime {
    pub route_id: String,

    pub stop_id: String,

    pub next_stop_id: String,

    /// True when a snapshot witnessed the vehicle standing at the pair's
    /// first stop.
    pub observed_at_stop: bool,

    /// True when a snapshot witnessed the vehicle standing at the pair's
    /// second stop.
    pub observed_at_next_stop: bool,

    /// Inferred instant the vehicle arrived at `next_stop_id`, seconds
    /// since the unix epoch.
    pub observed_time: i64,

    /// Seconds the vehicle took from `stop_id` to `next_stop_id`.
    pub travel_seconds: i64,

    /// Seconds the schedule allots for the same pair.
    pub scheduled_seconds: Option<i64>,

    pub vehicle_id: String,

    pub trip_id: String,

    pub data_set_id: i64,

    /// Stamped by the publisher at publish time.
    pub created_at: Option<DateTime<Local>>,
}
