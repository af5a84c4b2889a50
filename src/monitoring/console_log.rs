// monitoring/console_log.rs

use crate::global_variables::CONSOLE_LOG_CAPACITY;
use crate::shared_data::TrafficEvent;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogKind {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub timestamp: String,
    pub message: String,
    pub kind: LogKind,
}

/// Bounded operator console; the oldest line is dropped once full.
#[derive(Debug, Clone)]
pub struct ConsoleLog {
    capacity: usize,
    entries: VecDeque<ConsoleEntry>,
}

impl Default for ConsoleLog {
    fn default() -> Self {
        Self::with_capacity(CONSOLE_LOG_CAPACITY)
    }
}

impl ConsoleLog {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, kind: LogKind, message: impl Into<String>) {
        if self.capacity == 0 {
            return;
        }
        if self.entries.len() == self.capacity {
            self.entries.pop_front();
        }
        self.entries.push_back(ConsoleEntry {
            timestamp: Local::now().format("%H:%M:%S").to_string(),
            message: message.into(),
            kind,
        });
    }

    pub fn push_event(&mut self, event: &TrafficEvent) {
        for (kind, message) in narrate(event) {
            self.push(kind, message);
        }
    }

    pub fn entries(&self) -> impl Iterator<Item = &ConsoleEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

/// The per-hop lines an operator sees for one event.
pub fn narrate(event: &TrafficEvent) -> Vec<(LogKind, String)> {
    let reading = &event.reading;
    let mut lines = vec![
        (
            LogKind::Info,
            format!(
                "[EDGE] {} generated data: {} vehicles at {}",
                reading.device_id, reading.vehicle_count, reading.location
            ),
        ),
        (
            LogKind::Success,
            format!(
                "[LATENCY] Edge → Fog: {}ms",
                event.routing.edge_to_fog_latency_ms
            ),
        ),
        (
            LogKind::Info,
            format!(
                "[FOG] Processing complete. Congestion: {} ({:.1}%)",
                event.classification.congestion_level, event.classification.congestion_percentage
            ),
        ),
    ];

    match (&event.analytics, event.routing.fog_to_cloud_latency_ms) {
        (Some(analytics), Some(cloud_ms)) => {
            lines.push((
                LogKind::Warning,
                format!("[LATENCY] Fog → Cloud: {}ms", cloud_ms),
            ));
            lines.push((
                LogKind::Warning,
                format!(
                    "[CLOUD] Data stored. Action: {} ({})",
                    analytics.action, analytics.recommendation
                ),
            ));
        }
        _ => lines.push((
            LogKind::Success,
            "[FOG] Traffic normal. Handled locally. Cloud processing not needed".to_string(),
        )),
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cloud::analytics::analyze;
    use crate::fog::classifier::classify;
    use crate::shared_data::{Reading, RoutingDecision};

    fn event(vehicle_count: u32, forwarded: bool) -> TrafficEvent {
        let classification = classify(i64::from(vehicle_count)).unwrap();
        TrafficEvent {
            reading: Reading {
                device_id: "EDGE_CAM_02".to_string(),
                location: "Highway 101 North".to_string(),
                vehicle_count,
                average_speed_kmh: 60,
                timestamp: Local::now(),
            },
            classification,
            routing: RoutingDecision {
                forwarded_to_cloud: forwarded,
                edge_to_fog_latency_ms: 18,
                fog_to_cloud_latency_ms: forwarded.then_some(64),
            },
            analytics: forwarded.then(|| analyze(&classification)),
            processed_by: "FOG_NODE_CENTRAL".to_string(),
        }
    }

    #[test]
    fn forwarded_event_narrates_cloud_hop() {
        let lines = narrate(&event(95, true));
        assert_eq!(lines.len(), 5);
        assert_eq!(
            lines[0].1,
            "[EDGE] EDGE_CAM_02 generated data: 95 vehicles at Highway 101 North"
        );
        assert_eq!(lines[3], (LogKind::Warning, "[LATENCY] Fog → Cloud: 64ms".to_string()));
        assert!(lines[4].1.contains("ALERT_TRAFFIC_CONTROL"));
    }

    #[test]
    fn local_event_says_cloud_was_skipped() {
        let lines = narrate(&event(12, false));
        assert_eq!(lines.len(), 4);
        assert_eq!(lines[3].0, LogKind::Success);
        assert!(lines[3].1.contains("Handled locally"));
    }

    #[test]
    fn oldest_entries_are_evicted_at_capacity() {
        let mut log = ConsoleLog::with_capacity(3);
        for i in 0..5 {
            log.push(LogKind::Info, format!("line {}", i));
        }
        let messages: Vec<_> = log.entries().map(|e| e.message.as_str()).collect();
        assert_eq!(messages, ["line 2", "line 3", "line 4"]);
    }

    #[test]
    fn default_capacity_is_one_hundred() {
        let mut log = ConsoleLog::default();
        for _ in 0..30 {
            log.push_event(&event(90, true));
        }
        assert_eq!(log.len(), 100);
        log.clear();
        assert!(log.is_empty());
    }
}
