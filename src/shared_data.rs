// src/shared_data.rs

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One synthetic sensor reading produced at the edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub device_id: String,
    pub location: String,
    pub vehicle_count: u32,
    pub average_speed_kmh: u32,
    pub timestamp: DateTime<Local>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum CongestionLevel {
    Low,
    Medium,
    High,
}

impl CongestionLevel {
    pub const ALL: [CongestionLevel; 3] = [Self::Low, Self::Medium, Self::High];

    pub fn as_str(&self) -> &'static str {
        match self {
            CongestionLevel::Low => "Low",
            CongestionLevel::Medium => "Medium",
            CongestionLevel::High => "High",
        }
    }
}

impl fmt::Display for CongestionLevel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Classification {
    pub congestion_level: CongestionLevel,
    pub congestion_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoutingDecision {
    pub forwarded_to_cloud: bool,
    pub edge_to_fog_latency_ms: u32,
    /// Only set when the reading was forwarded.
    pub fog_to_cloud_latency_ms: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CloudAction {
    None,
    AdjustSignalTiming,
    AlertTrafficControl,
}

impl CloudAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            CloudAction::None => "NONE",
            CloudAction::AdjustSignalTiming => "ADJUST_SIGNAL_TIMING",
            CloudAction::AlertTrafficControl => "ALERT_TRAFFIC_CONTROL",
        }
    }
}

impl fmt::Display for CloudAction {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsResult {
    pub action: CloudAction,
    pub recommendation: String,
}

/// The immutable record emitted for every reading that made it through the pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficEvent {
    pub reading: Reading,
    pub classification: Classification,
    pub routing: RoutingDecision,
    pub analytics: Option<AnalyticsResult>,
    /// Fog node that classified the reading.
    pub processed_by: String,
}

impl TrafficEvent {
    pub fn forwarded_to_cloud(&self) -> bool {
        self.routing.forwarded_to_cloud
    }

    pub fn congestion_level(&self) -> CongestionLevel {
        self.classification.congestion_level
    }

    pub fn total_latency_ms(&self) -> u32 {
        self.routing.edge_to_fog_latency_ms + self.routing.fog_to_cloud_latency_ms.unwrap_or(0)
    }

    pub fn flow(&self) -> &'static str {
        if self.routing.forwarded_to_cloud {
            "Edge → Fog → Cloud"
        } else {
            "Edge → Fog (Local)"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn event(forwarded: bool) -> TrafficEvent {
        TrafficEvent {
            reading: Reading {
                device_id: "EDGE_SENSOR_01".to_string(),
                location: "Main St & 1st Ave".to_string(),
                vehicle_count: if forwarded { 90 } else { 10 },
                average_speed_kmh: 40,
                timestamp: Local.with_ymd_and_hms(2024, 5, 1, 8, 30, 0).unwrap(),
            },
            classification: Classification {
                congestion_level: if forwarded {
                    CongestionLevel::High
                } else {
                    CongestionLevel::Low
                },
                congestion_percentage: if forwarded { 75.0 } else { 8.3 },
            },
            routing: RoutingDecision {
                forwarded_to_cloud: forwarded,
                edge_to_fog_latency_ms: 12,
                fog_to_cloud_latency_ms: forwarded.then_some(80),
            },
            analytics: None,
            processed_by: "FOG_NODE_CENTRAL".to_string(),
        }
    }

    #[test]
    fn total_latency_counts_cloud_hop_only_when_forwarded() {
        assert_eq!(event(true).total_latency_ms(), 92);
        assert_eq!(event(false).total_latency_ms(), 12);
    }

    #[test]
    fn flow_describes_the_path_taken() {
        assert_eq!(event(true).flow(), "Edge → Fog → Cloud");
        assert_eq!(event(false).flow(), "Edge → Fog (Local)");
    }

    #[test]
    fn cloud_action_serializes_in_upper_snake_case() {
        let json = serde_json::to_string(&CloudAction::AlertTrafficControl).unwrap();
        assert_eq!(json, "\"ALERT_TRAFFIC_CONTROL\"");
        let json = serde_json::to_string(&CloudAction::None).unwrap();
        assert_eq!(json, "\"NONE\"");
    }

    #[test]
    fn congestion_levels_are_ordered() {
        assert!(CongestionLevel::Low < CongestionLevel::Medium);
        assert!(CongestionLevel::Medium < CongestionLevel::High);
    }
}
