// config.rs

use crate::error::{ConfigError, PipelineError, PipelineResult};
use crate::global_variables::{
    EDGE_TO_FOG_LATENCY_RANGE_MS, FOG_NODE_ID, FOG_TO_CLOUD_LATENCY_RANGE_MS, HIGH_THRESHOLD,
    LOW_THRESHOLD, MAX_BATCH_SIZE, MAX_VEHICLE_COUNT, SPEED_RANGE_KMH,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// An inclusive `[low, high]` range, written as a two-element array in JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "[u32; 2]", into = "[u32; 2]")]
pub struct InclusiveRange {
    pub low: u32,
    pub high: u32,
}

impl InclusiveRange {
    pub const fn new(low: u32, high: u32) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: u32) -> bool {
        self.low <= value && value <= self.high
    }
}

impl From<[u32; 2]> for InclusiveRange {
    fn from(bounds: [u32; 2]) -> Self {
        Self::new(bounds[0], bounds[1])
    }
}

impl From<InclusiveRange> for [u32; 2] {
    fn from(range: InclusiveRange) -> Self {
        [range.low, range.high]
    }
}

/// Tunables for the whole pipeline. Missing JSON fields fall back to the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub low_threshold: u32,
    pub high_threshold: u32,
    pub max_vehicle_count: u32,
    pub speed_range_kmh: InclusiveRange,
    pub edge_to_fog_latency_range_ms: InclusiveRange,
    pub fog_to_cloud_latency_range_ms: InclusiveRange,
    pub max_batch_size: usize,
    /// Secondary escalation rule: also forward when the raw count is above this value.
    pub escalate_on_raw_count_threshold: Option<u32>,
    pub fog_node_id: String,
    /// Actually sleep for the synthesized hop latencies.
    pub simulate_latency: bool,
    /// Seed for reproducible runs; `None` draws from the thread RNG.
    pub seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            low_threshold: LOW_THRESHOLD,
            high_threshold: HIGH_THRESHOLD,
            max_vehicle_count: MAX_VEHICLE_COUNT,
            speed_range_kmh: SPEED_RANGE_KMH.into(),
            edge_to_fog_latency_range_ms: EDGE_TO_FOG_LATENCY_RANGE_MS.into(),
            fog_to_cloud_latency_range_ms: FOG_TO_CLOUD_LATENCY_RANGE_MS.into(),
            max_batch_size: MAX_BATCH_SIZE,
            escalate_on_raw_count_threshold: None,
            fog_node_id: FOG_NODE_ID.to_string(),
            simulate_latency: false,
            seed: None,
        }
    }
}

impl PipelineConfig {
    pub fn from_json_str(json: &str) -> PipelineResult<Self> {
        let config: PipelineConfig = serde_json::from_str(json).map_err(ConfigError::from)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file<P: AsRef<Path>>(path: P) -> PipelineResult<Self> {
        let contents = fs::read_to_string(path).map_err(ConfigError::from)?;
        Self::from_json_str(&contents)
    }

    /// Reads `path` when given, otherwise returns the defaults.
    pub fn load_or_default<P: AsRef<Path>>(path: Option<P>) -> PipelineResult<Self> {
        match path {
            Some(path) => Self::from_json_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> PipelineResult<()> {
        if self.low_threshold >= self.high_threshold {
            return Err(PipelineError::InvalidConfig(format!(
                "low_threshold ({}) must be below high_threshold ({})",
                self.low_threshold, self.high_threshold
            )));
        }
        if self.max_vehicle_count == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_vehicle_count must be positive".to_string(),
            ));
        }
        let ranges = [
            ("speed_range_kmh", self.speed_range_kmh),
            ("edge_to_fog_latency_range_ms", self.edge_to_fog_latency_range_ms),
            ("fog_to_cloud_latency_range_ms", self.fog_to_cloud_latency_range_ms),
        ];
        for (name, range) in ranges {
            if range.low > range.high {
                return Err(PipelineError::InvalidConfig(format!(
                    "{} is empty: [{}, {}]",
                    name, range.low, range.high
                )));
            }
        }
        if self.max_batch_size == 0 {
            return Err(PipelineError::InvalidConfig(
                "max_batch_size must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_business_rules() {
        let config = PipelineConfig::default();
        assert_eq!(config.low_threshold, 30);
        assert_eq!(config.high_threshold, 70);
        assert_eq!(config.max_vehicle_count, 120);
        assert_eq!(config.edge_to_fog_latency_range_ms, InclusiveRange::new(10, 30));
        assert_eq!(config.fog_to_cloud_latency_range_ms, InclusiveRange::new(50, 100));
        assert_eq!(config.max_batch_size, 5);
        assert_eq!(config.escalate_on_raw_count_threshold, None);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_json_keeps_defaults_for_missing_fields() {
        let config = PipelineConfig::from_json_str(
            r#"{ "max_batch_size": 3, "escalate_on_raw_count_threshold": 60,
                 "fog_to_cloud_latency_range_ms": [60, 90] }"#,
        )
        .unwrap();
        assert_eq!(config.max_batch_size, 3);
        assert_eq!(config.escalate_on_raw_count_threshold, Some(60));
        assert_eq!(config.fog_to_cloud_latency_range_ms, InclusiveRange::new(60, 90));
        assert_eq!(config.high_threshold, 70);
    }

    #[test]
    fn inverted_thresholds_are_rejected() {
        let err = PipelineConfig::from_json_str(r#"{ "low_threshold": 80 }"#).unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn empty_latency_range_is_rejected() {
        let err = PipelineConfig::from_json_str(r#"{ "edge_to_fog_latency_range_ms": [30, 10] }"#)
            .unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig(_)));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let err = PipelineConfig::load_or_default(Some("/nonexistent/fog_pipeline.json")).unwrap_err();
        assert!(matches!(err, PipelineError::Config(ConfigError::Io(_))));
        let none: Option<&str> = None;
        assert_eq!(PipelineConfig::load_or_default(none).unwrap(), PipelineConfig::default());
    }

    #[test]
    fn malformed_json_is_a_config_error() {
        let err = PipelineConfig::from_json_str("{ not json").unwrap_err();
        assert!(matches!(err, PipelineError::Config(ConfigError::Parse(_))));
    }
}
