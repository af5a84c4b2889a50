// monitoring/event_store.rs

use crate::error::StorageError;
use crate::global_variables::CLOUD_AVERAGE_WINDOW;
use crate::pipeline::recorder::EventRecorder;
use crate::shared_data::{AnalyticsResult, CongestionLevel, TrafficEvent};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FogStats {
    pub node_id: String,
    pub total_processed: u64,
    pub forwarded_to_cloud: u64,
    pub filtered_locally: u64,
    /// Share of readings the fog tier kept away from the cloud, 2 decimals.
    pub cloud_reduction_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Trend {
    Increasing,
    Decreasing,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CloudSummary {
    pub total_records: usize,
    pub average_last_10: f64,
    pub latest_trend: Option<Trend>,
    pub latest_analytics: Option<AnalyticsResult>,
}

/// Keeps every recorded event in memory along with the fog counters.
#[derive(Debug)]
pub struct InMemoryEventStore {
    node_id: String,
    events: Mutex<Vec<TrafficEvent>>,
    total_processed: AtomicU64,
    forwarded_to_cloud: AtomicU64,
    filtered_locally: AtomicU64,
}

impl InMemoryEventStore {
    pub fn new(node_id: &str) -> Self {
        Self {
            node_id: node_id.to_string(),
            events: Mutex::new(Vec::new()),
            total_processed: AtomicU64::new(0),
            forwarded_to_cloud: AtomicU64::new(0),
            filtered_locally: AtomicU64::new(0),
        }
    }

    // A poisoned lock still holds consistent data: events are only ever pushed whole.
    fn lock_events(&self) -> MutexGuard<'_, Vec<TrafficEvent>> {
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn len(&self) -> usize {
        self.lock_events().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_events().is_empty()
    }

    pub fn events(&self) -> Vec<TrafficEvent> {
        self.lock_events().clone()
    }

    /// The newest `n` events, oldest first.
    pub fn recent(&self, n: usize) -> Vec<TrafficEvent> {
        let events = self.lock_events();
        let start = events.len().saturating_sub(n);
        events[start..].to_vec()
    }

    pub fn level_counts(&self) -> BTreeMap<CongestionLevel, usize> {
        let mut counts: BTreeMap<CongestionLevel, usize> =
            CongestionLevel::ALL.iter().map(|&level| (level, 0)).collect();
        for event in self.lock_events().iter() {
            *counts.entry(event.congestion_level()).or_default() += 1;
        }
        counts
    }

    /// Counters are read under the events lock, so they always add up.
    pub fn fog_stats(&self) -> FogStats {
        let _events = self.lock_events();
        let total_processed = self.total_processed.load(Ordering::SeqCst);
        let forwarded_to_cloud = self.forwarded_to_cloud.load(Ordering::SeqCst);
        let filtered_locally = self.filtered_locally.load(Ordering::SeqCst);
        let reduction = filtered_locally as f64 / total_processed.max(1) as f64 * 100.0;

        FogStats {
            node_id: self.node_id.clone(),
            total_processed,
            forwarded_to_cloud,
            filtered_locally,
            cloud_reduction_percentage: (reduction * 100.0).round() / 100.0,
        }
    }

    pub fn cloud_summary(&self) -> CloudSummary {
        let events = self.lock_events();
        let forwarded: Vec<&TrafficEvent> =
            events.iter().filter(|e| e.forwarded_to_cloud()).collect();

        let window = &forwarded[forwarded.len().saturating_sub(CLOUD_AVERAGE_WINDOW)..];
        let average = if window.is_empty() {
            0.0
        } else {
            let sum: u64 = window
                .iter()
                .map(|e| u64::from(e.reading.vehicle_count))
                .sum();
            sum as f64 / window.len() as f64
        };

        let latest = forwarded.last();
        let latest_trend = latest.map(|e| {
            if f64::from(e.reading.vehicle_count) > average {
                Trend::Increasing
            } else {
                Trend::Decreasing
            }
        });

        CloudSummary {
            total_records: forwarded.len(),
            average_last_10: (average * 100.0).round() / 100.0,
            latest_trend,
            latest_analytics: latest.and_then(|e| e.analytics.clone()),
        }
    }

    /// Drops every event and resets the counters.
    pub fn clear_all(&self) {
        let mut events = self.lock_events();
        events.clear();
        self.total_processed.store(0, Ordering::SeqCst);
        self.forwarded_to_cloud.store(0, Ordering::SeqCst);
        self.filtered_locally.store(0, Ordering::SeqCst);
        log::info!("[Store] cleared all traffic events");
    }
}

impl EventRecorder for InMemoryEventStore {
    fn record(&self, event: &TrafficEvent) -> Result<(), StorageError> {
        let mut events = self.lock_events();
        events.push(event.clone());

        self.total_processed.fetch_add(1, Ordering::SeqCst);
        if event.forwarded_to_cloud() {
            self.forwarded_to_cloud.fetch_add(1, Ordering::SeqCst);
        } else {
            self.filtered_locally.fetch_add(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
