//! Fetches and decodes the realtime vehicle-position feed.

use chrono::{DateTime, Local};
use model::{VehiclePosition, VehicleStopStatus};
use prost::Message;
use std::collections::HashMap;

pub mod data_model {
    pub mod realtime {
        include!(concat!(env!("OUT_DIR"), "/protobuf/transit_realtime.rs"));
    }
}

use data_model::realtime;

#[derive(Debug)]
pub enum FeedError {
    Http(reqwest::Error),
    Decode(prost::DecodeError),
}

impl From<reqwest::Error> for FeedError {
    fn from(why: reqwest::Error) -> Self {
        Self::Http(why)
    }
}

impl From<prost::DecodeError> for FeedError {
    fn from(why: prost::DecodeError) -> Self {
        Self::Decode(why)
    }
}

/// Downloads one feed message and returns the decoded vehicle positions:
/// one entry per vehicle id (the freshest wins), timestamps defaulted to
/// `now` when the feed omits them.
pub async fn fetch_vehicle_positions(
    url: &str,
    now: DateTime<Local>,
) -> Result<Vec<VehiclePosition>, FeedError> {
    let response = reqwest::get(url).await?;
    let bytes = response.bytes().await?;
    decode_vehicle_positions(&bytes, now)
}

pub fn decode_vehicle_positions(
    bytes: &[u8],
    now: DateTime<Local>,
) -> Result<Vec<VehiclePosition>, FeedError> {
    let message = realtime::FeedMessage::decode(bytes)?;

    let mut by_vehicle: HashMap<String, VehiclePosition> = HashMap::new();
    for entity in message.entity {
        let Some(vehicle) = entity.vehicle else {
            continue;
        };
        // positions without a vehicle id cannot be monitored
        let Some(vehicle_id) = vehicle
            .vehicle
            .as_ref()
            .and_then(|descriptor| descriptor.id.clone())
            .filter(|id| !id.is_empty())
        else {
            continue;
        };

        let position = decode_position(vehicle_id.clone(), vehicle, now);
        match by_vehicle.get(&vehicle_id) {
            Some(existing) if existing.timestamp >= position.timestamp => {}
            _ => {
                by_vehicle.insert(vehicle_id, position);
            }
        }
    }
    log::debug!("decoded {} vehicle positions", by_vehicle.len());
    Ok(by_vehicle.into_values().collect())
}

fn decode_position(
    vehicle_id: String,
    vehicle: realtime::VehiclePosition,
    now: DateTime<Local>,
) -> VehiclePosition {
    let stop_status = if vehicle.current_status.is_none()
        && vehicle.current_stop_sequence.is_none()
        && vehicle.stop_id.is_none()
    {
        // no stop is referenced at all, so the protobuf default would claim
        // more than the feed said
        VehicleStopStatus::Unknown
    } else {
        match vehicle.current_status() {
            realtime::vehicle_position::VehicleStopStatus::IncomingAt => {
                VehicleStopStatus::IncomingAt
            }
            realtime::vehicle_position::VehicleStopStatus::StoppedAt => {
                VehicleStopStatus::StoppedAt
            }
            realtime::vehicle_position::VehicleStopStatus::InTransitTo => {
                VehicleStopStatus::InTransitTo
            }
        }
    };

    VehiclePosition {
        vehicle_id,
        timestamp: vehicle
            .timestamp
            .map(|timestamp| timestamp as i64)
            .unwrap_or_else(|| now.timestamp()),
        trip_id: vehicle
            .trip
            .as_ref()
            .and_then(|trip| trip.trip_id.clone()),
        route_id: vehicle
            .trip
            .as_ref()
            .and_then(|trip| trip.route_id.clone()),
        latitude: vehicle.position.as_ref().map(|position| position.latitude),
        longitude: vehicle.position.as_ref().map(|position| position.longitude),
        bearing: vehicle.position.as_ref().and_then(|position| position.bearing),
        stop_status,
        stop_sequence: vehicle.current_stop_sequence,
        stop_id: vehicle.stop_id,
    }
}
