// fog/classifier.rs

use crate::config::PipelineConfig;
use crate::error::{PipelineError, PipelineResult};
use crate::shared_data::{Classification, CongestionLevel};

/// Maps a vehicle count onto Low / Medium / High.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CongestionClassifier {
    pub low_threshold: u32,
    pub high_threshold: u32,
    pub max_vehicle_count: u32,
}

impl Default for CongestionClassifier {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl CongestionClassifier {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            low_threshold: config.low_threshold,
            high_threshold: config.high_threshold,
            max_vehicle_count: config.max_vehicle_count,
        }
    }

    pub fn classify(&self, vehicle_count: i64) -> PipelineResult<Classification> {
        if vehicle_count < 0 {
            return Err(PipelineError::InvalidInput(format!(
                "vehicle count cannot be negative (got {})",
                vehicle_count
            )));
        }

        let congestion_level = if vehicle_count < i64::from(self.low_threshold) {
            CongestionLevel::Low
        } else if vehicle_count < i64::from(self.high_threshold) {
            CongestionLevel::Medium
        } else {
            CongestionLevel::High
        };

        Ok(Classification {
            congestion_level,
            congestion_percentage: self.congestion_percentage(vehicle_count),
        })
    }

    // Saturates at 100 for counts above the ceiling; one decimal place.
    fn congestion_percentage(&self, vehicle_count: i64) -> f64 {
        let raw = (vehicle_count as f64 / f64::from(self.max_vehicle_count) * 100.0).min(100.0);
        (raw * 10.0).round() / 10.0
    }
}

/// Classify with the default thresholds (30 / 70 out of 120).
pub fn classify(vehicle_count: i64) -> PipelineResult<Classification> {
    CongestionClassifier::default().classify(vehicle_count)
}
