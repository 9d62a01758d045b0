use std::collections::HashMap;

use crate::vehicle_monitor::VehicleMonitor;

/// Per-vehicle monitors, keyed by vehicle id. Monitors are created on first
/// sighting and live for the process lifetime.
pub struct MonitorCollection {
    early_tolerance: f64,
    expire_position_seconds: i64,
    monitors: HashMap<String, VehicleMonitor>,
}

impl MonitorCollection {
    pub fn new(early_tolerance: f64, expire_position_seconds: i64) -> Self {
        Self {
            early_tolerance,
            expire_position_seconds,
            monitors: HashMap::new(),
        }
    }

    pub fn get_or_create(&mut self, vehicle_id: &str) -> &mut VehicleMonitor {
        self.monitors
            .entry(vehicle_id.to_owned())
            .or_insert_with(|| {
                VehicleMonitor::new(
                    vehicle_id,
                    self.early_tolerance,
                    self.expire_position_seconds,
                )
            })
    }

    pub fn len(&self) -> usize {
        self.monitors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.monitors.is_empty()
    }
}
