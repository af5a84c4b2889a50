// edge/reading_generator.rs

use crate::config::{InclusiveRange, PipelineConfig};
use crate::edge::sources::{Clock, RandomSource, SystemClock};
use crate::shared_data::Reading;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// A simulated roadside sensor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EdgeDevice {
    pub device_id: String,
    pub location: String,
}

impl EdgeDevice {
    pub fn new(device_id: &str, location: &str) -> Self {
        Self {
            device_id: device_id.to_string(),
            location: location.to_string(),
        }
    }

    pub fn info(&self) -> String {
        format!("{} @ {}", self.device_id, self.location)
    }
}

/// The fixed roster of demo sensors.
pub fn create_sample_devices() -> Vec<EdgeDevice> {
    vec![
        EdgeDevice::new("EDGE_CAM_01", "Main Street & 1st Avenue"),
        EdgeDevice::new("EDGE_CAM_02", "Highway 101 North"),
        EdgeDevice::new("EDGE_SENSOR_03", "Downtown Market Square"),
        EdgeDevice::new("EDGE_SENSOR_04", "Airport Road Junction"),
        EdgeDevice::new("EDGE_CAM_05", "University Campus Gate"),
    ]
}

/// Produces one synthetic reading per call.
#[derive(Clone)]
pub struct ReadingGenerator {
    vehicle_count_range: InclusiveRange,
    speed_range_kmh: InclusiveRange,
    clock: Arc<dyn Clock>,
}

impl ReadingGenerator {
    pub fn new(config: &PipelineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            vehicle_count_range: InclusiveRange::new(0, config.max_vehicle_count),
            speed_range_kmh: config.speed_range_kmh,
            clock,
        }
    }

    pub fn with_system_clock(config: &PipelineConfig) -> Self {
        Self::new(config, Arc::new(SystemClock))
    }

    pub fn generate(&self, device_id: &str, location: &str, rng: &mut dyn RandomSource) -> Reading {
        let vehicle_count =
            rng.uniform_inclusive(self.vehicle_count_range.low, self.vehicle_count_range.high);
        let average_speed_kmh =
            rng.uniform_inclusive(self.speed_range_kmh.low, self.speed_range_kmh.high);

        let reading = Reading {
            device_id: device_id.to_string(),
            location: location.to_string(),
            vehicle_count,
            average_speed_kmh,
            timestamp: self.clock.now(),
        };
        log::debug!(
            "[Edge] {} generated {} vehicles at {} ({} km/h)",
            reading.device_id,
            reading.vehicle_count,
            reading.location,
            reading.average_speed_kmh
        );
        reading
    }
}
