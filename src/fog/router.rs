// fog/router.rs

use crate::config::{InclusiveRange, PipelineConfig};
use crate::edge::sources::RandomSource;
use crate::shared_data::{Classification, CongestionLevel, Reading, RoutingDecision};

/// Decides whether the fog tier handles a reading locally or escalates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoutingEngine {
    pub edge_to_fog_latency_ms: InclusiveRange,
    pub fog_to_cloud_latency_ms: InclusiveRange,
    pub escalate_on_raw_count_threshold: Option<u32>,
}

impl Default for RoutingEngine {
    fn default() -> Self {
        Self::from_config(&PipelineConfig::default())
    }
}

impl RoutingEngine {
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            edge_to_fog_latency_ms: config.edge_to_fog_latency_range_ms,
            fog_to_cloud_latency_ms: config.fog_to_cloud_latency_range_ms,
            escalate_on_raw_count_threshold: config.escalate_on_raw_count_threshold,
        }
    }

    /// High congestion always escalates; the raw-count rule only applies when configured.
    pub fn should_forward(&self, classification: &Classification, vehicle_count: u32) -> bool {
        if classification.congestion_level == CongestionLevel::High {
            return true;
        }
        matches!(self.escalate_on_raw_count_threshold, Some(limit) if vehicle_count > limit)
    }

    pub fn decide(
        &self,
        reading: &Reading,
        classification: &Classification,
        rng: &mut dyn RandomSource,
    ) -> RoutingDecision {
        let forwarded_to_cloud = self.should_forward(classification, reading.vehicle_count);

        let edge_to_fog_latency_ms = rng.uniform_inclusive(
            self.edge_to_fog_latency_ms.low,
            self.edge_to_fog_latency_ms.high,
        );
        let fog_to_cloud_latency_ms = if forwarded_to_cloud {
            Some(rng.uniform_inclusive(
                self.fog_to_cloud_latency_ms.low,
                self.fog_to_cloud_latency_ms.high,
            ))
        } else {
            None
        };

        if forwarded_to_cloud {
            log::info!(
                "[Fog] {} forwarding to cloud: {} vehicles ({})",
                reading.device_id,
                reading.vehicle_count,
                classification.congestion_level
            );
        } else {
            log::debug!(
                "[Fog] {} handled locally: {} vehicles ({})",
                reading.device_id,
                reading.vehicle_count,
                classification.congestion_level
            );
        }

        RoutingDecision {
            forwarded_to_cloud,
            edge_to_fog_latency_ms,
            fog_to_cloud_latency_ms,
        }
    }
}
